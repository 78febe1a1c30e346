// src/math/geometry/polygon/core.rs

use crate::math::{
    error::*,
    types::{Bounds2D, Point2D},
    utils::constants,
};

/// Geschlossener Ring: geordnete Punktfolge, deren erster und letzter Punkt identisch sind.
///
/// Der Ring ist der Rand (Exterior) eines Polygons. Selbstüberschneidungen werden
/// hier nicht geprüft; die Eingabe muss bereits repariert sein.
/// Weniger als [`constants::MIN_RING_VERTICES`] Punkte sind als Zwischenergebnis
/// erlaubt, gelten aber nicht als gültiger Polygonrand (siehe [`Ring::is_valid_boundary`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    vertices: Vec<Point2D>,
}

impl Ring {
    /// Erstellt einen Ring aus bereits geschlossenen Vertices.
    /// Erster und letzter Punkt müssen exakt gleich sein.
    pub fn new(vertices: Vec<Point2D>) -> MathResult<Self> {
        let (Some(&first), Some(&last)) = (vertices.first(), vertices.last()) else {
            return Err(MathError::InsufficientPoints {
                expected: 1,
                actual: 0,
            });
        };

        if first != last {
            return Err(MathError::NotClosed {
                first: first.to_string(),
                last: last.to_string(),
            });
        }

        Ok(Self { vertices })
    }

    /// Erstellt einen Ring und schließt ihn explizit.
    /// Liegt der letzte Punkt nicht (innerhalb EPSILON) auf dem ersten, wird der erste angehängt;
    /// liegt er nur fast darauf, wird er auf den ersten Punkt gesetzt.
    pub fn closed(mut vertices: Vec<Point2D>) -> MathResult<Self> {
        let (Some(&first), Some(&last)) = (vertices.first(), vertices.last()) else {
            return Err(MathError::InsufficientPoints {
                expected: 1,
                actual: 0,
            });
        };

        if vertices.len() > 1 && first.distance_squared(last) <= constants::EPSILON_SQUARED {
            if let Some(end) = vertices.last_mut() {
                *end = first;
            }
        } else if first != last {
            vertices.push(first);
        }

        Ok(Self { vertices })
    }

    /// Gibt einen Slice aller gespeicherten Vertices zurück (inklusive Schlusspunkt).
    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    /// Vertices ohne den duplizierten Schlusspunkt.
    pub fn distinct_vertices(&self) -> &[Point2D] {
        if self.vertices.len() > 1 {
            &self.vertices[..self.vertices.len() - 1]
        } else {
            &self.vertices
        }
    }

    /// Anzahl der gespeicherten Punkte, inklusive Schlusspunkt.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Startpunkt (= Schlusspunkt) des Rings.
    pub fn start(&self) -> Point2D {
        self.vertices[0]
    }

    /// Prüft, ob erster und letzter Punkt identisch sind.
    pub fn is_closed(&self) -> bool {
        self.vertices.first() == self.vertices.last()
    }

    /// Geschlossen und mit mindestens 4 Punkten: als Polygonrand verwendbar.
    pub fn is_valid_boundary(&self) -> bool {
        self.is_closed() && self.vertices.len() >= constants::MIN_RING_VERTICES
    }

    /// Iterator über aufeinanderfolgende Punktpaare (Kanten).
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.vertices.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Summe der Kantenlängen.
    pub fn length(&self) -> f64 {
        self.edges().map(|(a, b)| a.distance(b)).sum()
    }

    /// Berechnet die Bounding Box des Rings.
    pub fn bounds(&self) -> Option<Bounds2D> {
        Bounds2D::from_points_iter(self.vertices.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_points() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_closed_appends_first_point() {
        let ring = Ring::closed(square_points()).unwrap();
        assert_eq!(ring.vertex_count(), 5);
        assert!(ring.is_closed());
        assert!(ring.is_valid_boundary());
        assert_eq!(ring.distinct_vertices().len(), 4);
        assert_eq!(ring.edges().count(), 4);
    }

    #[test]
    fn test_closed_snaps_nearly_closed_ring() {
        let mut points = square_points();
        points.push(Point2D::new(1e-12, 0.0));
        let ring = Ring::closed(points).unwrap();
        assert_eq!(ring.vertex_count(), 5);
        assert_eq!(ring.vertices()[4], Point2D::new(0.0, 0.0));
    }

    #[test]
    fn test_new_rejects_open_ring() {
        let err = Ring::new(square_points()).unwrap_err();
        assert!(matches!(err, MathError::NotClosed { .. }));

        let err = Ring::new(Vec::new()).unwrap_err();
        assert!(matches!(err, MathError::InsufficientPoints { .. }));
    }

    #[test]
    fn test_length() {
        let ring = Ring::closed(square_points()).unwrap();
        assert_relative_eq!(ring.length(), 400.0);
    }

    #[test]
    fn test_short_ring_is_not_valid_boundary() {
        let ring = Ring::closed(vec![Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)]).unwrap();
        assert!(ring.is_closed());
        assert_eq!(ring.vertex_count(), 3);
        assert!(!ring.is_valid_boundary());
    }
}
