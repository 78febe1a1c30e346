// src/math/algorithms/simplification.rs

use crate::math::{
    error::{MathError, MathResult},
    geometry::polygon::Ring,
    types::Point2D,
    utils::simple_geometry::point_line_distance,
};

/// Douglas-Peucker-Vereinfachung mit Toleranz `epsilon`.
///
/// Zwischen zwei behaltenen Punkten wird der Punkt mit dem größten senkrechten
/// Abstand zur Sehne gesucht. Nur wenn dieser Abstand echt größer als `epsilon` ist,
/// wird er behalten und beide Hälften werden weiter unterteilt. Bei gleichen Abständen
/// gewinnt der erste Punkt. Damit ist das Ergebnis deterministisch und eine größere
/// Toleranz behält nie mehr Punkte als eine kleinere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DouglasPeucker {
    epsilon: f64,
}

impl DouglasPeucker {
    pub fn new(epsilon: f64) -> MathResult<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(MathError::invalid_parameter(
                "epsilon",
                epsilon,
                "must be a finite, non-negative tolerance",
            ));
        }
        Ok(Self { epsilon })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Vereinfacht einen offenen Linienzug. Erster und letzter Punkt bleiben immer erhalten.
    pub fn simplify_points(&self, points: &[Point2D]) -> Vec<Point2D> {
        if self.epsilon == 0.0 || points.len() < 3 {
            return points.to_vec();
        }

        let mut keep = vec![false; points.len()];
        keep[0] = true;
        keep[points.len() - 1] = true;

        // Explizite Arbeitsliste statt Rekursion: verrauschte Ränder können sehr lang sein
        let mut ranges = vec![(0, points.len() - 1)];
        while let Some((first, last)) = ranges.pop() {
            if last <= first + 1 {
                continue;
            }

            let (start, end) = (points[first], points[last]);
            let mut max_distance = 0.0;
            let mut max_index = first;
            for (i, &point) in points.iter().enumerate().take(last).skip(first + 1) {
                let distance = point_line_distance(point, start, end);
                if distance > max_distance {
                    max_distance = distance;
                    max_index = i;
                }
            }

            if max_distance > self.epsilon {
                keep[max_index] = true;
                ranges.push((max_index, last));
                ranges.push((first, max_index));
            }
        }

        points
            .iter()
            .zip(keep)
            .filter_map(|(&point, kept)| kept.then_some(point))
            .collect()
    }

    /// Vereinfacht einen Ring als offenen Pfad vom Start- zum Schlusspunkt.
    /// Da beide Endpunkte identisch sind und behalten werden, bleibt das Ergebnis geschlossen.
    pub fn simplify_ring(&self, ring: &Ring) -> MathResult<Ring> {
        Ring::new(self.simplify_points(ring.vertices()))
    }
}
