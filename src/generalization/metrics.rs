// src/generalization/metrics.rs

use crate::math::geometry::{Layer, PolygonSet, Ring, RingProperties};
use std::fmt;

/// Kennzahlen einer Ringmenge
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    /// Summe der Ringlängen
    pub perimeter: f64,
    /// Summe der gespeicherten Punkte (inklusive Schlusspunkte)
    pub vertex_count: u64,
    /// Summe der (vorzeichenlosen) Ringflächen
    pub total_area: f64,
}

impl Metrics {
    pub fn measure<'a>(rings: impl IntoIterator<Item = &'a Ring>) -> Self {
        rings.into_iter().fold(Self::default(), |acc, ring| Self {
            perimeter: acc.perimeter + ring.perimeter(),
            vertex_count: acc.vertex_count + ring.vertex_count() as u64,
            total_area: acc.total_area + ring.area(),
        })
    }

    pub fn of_set(set: &PolygonSet) -> Self {
        Self::measure(set.iter())
    }
}

/// Kennzahlen einer Ringliste
pub fn measure(rings: &[Ring]) -> Metrics {
    Metrics::measure(rings)
}

/// Prozentuale Änderung `(updated - original) / original * 100`.
/// Liefert 0, wenn `original` 0 ist; siehe [`PercentageChange`] für die unterscheidbare Variante.
pub fn percentage_change(original: f64, updated: f64) -> f64 {
    if original == 0.0 {
        return 0.0;
    }
    (updated - original) / original * 100.0
}

/// Prozentuale Änderung, die eine leere Ausgangsmenge nicht als "keine Änderung" ausgibt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PercentageChange {
    Defined(f64),
    /// Der Ausgangswert war 0
    Undefined,
}

impl PercentageChange {
    pub fn between(original: f64, updated: f64) -> Self {
        if original == 0.0 {
            PercentageChange::Undefined
        } else {
            PercentageChange::Defined(percentage_change(original, updated))
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            PercentageChange::Defined(value) => Some(*value),
            PercentageChange::Undefined => None,
        }
    }
}

impl fmt::Display for PercentageChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentageChange::Defined(value) => write!(f, "{value:.2}%"),
            PercentageChange::Undefined => write!(f, "n/a"),
        }
    }
}

/// Veränderung zwischen zwei Messungen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsDelta {
    pub perimeter: PercentageChange,
    pub vertex_count: PercentageChange,
    pub total_area: PercentageChange,
    /// `before - after`, positiv wenn Fläche verloren ging
    pub area_difference: f64,
}

impl MetricsDelta {
    pub fn between(before: &Metrics, after: &Metrics) -> Self {
        Self {
            perimeter: PercentageChange::between(before.perimeter, after.perimeter),
            vertex_count: PercentageChange::between(
                before.vertex_count as f64,
                after.vertex_count as f64,
            ),
            total_area: PercentageChange::between(before.total_area, after.total_area),
            area_difference: before.total_area - after.total_area,
        }
    }
}

impl Layer {
    /// Referenzwerte der Eingabeschicht. Die Fläche stammt aus dem Flächenattribut
    /// der Features, falls vorhanden, sonst aus der Geometrie.
    pub fn reference_metrics(&self) -> Metrics {
        let geometric = Metrics::of_set(&self.decompose());
        let total_area = self
            .features
            .iter()
            .map(|feature| {
                feature.area.unwrap_or_else(|| {
                    feature.geometry.rings().iter().map(|ring| ring.area()).sum()
                })
            })
            .sum();

        Metrics {
            total_area,
            ..geometric
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{
        geometry::{Feature, Geometry, ShapeGenerators},
        types::Point2D,
    };
    use approx::assert_relative_eq;

    fn square(origin: f64, side: f64) -> Ring {
        ShapeGenerators::square(Point2D::new(origin, origin), side).unwrap()
    }

    #[test]
    fn test_measure() {
        let metrics = measure(&[square(0.0, 10.0), square(100.0, 20.0)]);
        assert_relative_eq!(metrics.perimeter, 120.0);
        assert_eq!(metrics.vertex_count, 10);
        assert_relative_eq!(metrics.total_area, 500.0);
    }

    #[test]
    fn test_measure_empty() {
        assert_eq!(measure(&[]), Metrics::default());
    }

    #[test]
    fn test_percentage_change() {
        assert_relative_eq!(percentage_change(200.0, 150.0), -25.0);
        assert_relative_eq!(percentage_change(50.0, 75.0), 50.0);
        assert_eq!(percentage_change(0.0, 42.0), 0.0);
    }

    #[test]
    fn test_percentage_change_tri_state() {
        assert_eq!(PercentageChange::between(0.0, 42.0), PercentageChange::Undefined);
        assert_eq!(PercentageChange::between(0.0, 42.0).to_string(), "n/a");
        assert_eq!(PercentageChange::between(4.0, 3.0).value(), Some(-25.0));
        assert_eq!(PercentageChange::between(3.0, 4.0).to_string(), "33.33%");
    }

    #[test]
    fn test_metrics_delta() {
        let before = Metrics {
            perimeter: 400.0,
            vertex_count: 100,
            total_area: 10_000.0,
        };
        let after = Metrics {
            perimeter: 380.0,
            vertex_count: 25,
            total_area: 9_500.0,
        };
        let delta = MetricsDelta::between(&before, &after);
        assert_eq!(delta.perimeter.value(), Some(-5.0));
        assert_eq!(delta.vertex_count.value(), Some(-75.0));
        assert_eq!(delta.total_area.value(), Some(-5.0));
        assert_relative_eq!(delta.area_difference, 500.0);
    }

    #[test]
    fn test_reference_metrics_prefers_area_attribute() {
        let layer = Layer::new(
            None,
            vec![
                Feature::new(Geometry::Single(square(0.0, 10.0))).with_area(99.0),
                Feature::new(Geometry::Multi(vec![square(50.0, 10.0), square(80.0, 2.0)])),
            ],
        );
        let metrics = layer.reference_metrics();
        assert_relative_eq!(metrics.total_area, 99.0 + 100.0 + 4.0);
        assert_eq!(metrics.vertex_count, 15);
        assert_relative_eq!(metrics.perimeter, 40.0 + 40.0 + 8.0);
    }
}
