// src/math/utils.rs

/// Mathematische Konstanten
pub mod constants {
    /// Allgemeine Toleranz für Koordinatenvergleiche (CRS-Einheiten)
    pub const EPSILON: f64 = 1e-9;
    pub const EPSILON_SQUARED: f64 = EPSILON * EPSILON; // Für Vergleiche mit quadrierten Längen

    /// Ein geschlossener Ring braucht mindestens 4 gespeicherte Punkte (3 + Schlusspunkt)
    pub const MIN_RING_VERTICES: usize = 4;

    /// Kleinstes Polygon: ein Dreieck
    pub const MIN_POLYGON_VERTICES: usize = MIN_RING_VERTICES - 1;
}

/// Geometrische Hilfsfunktionen (einfach, ohne komplexe Strukturen)
pub mod simple_geometry {
    use crate::math::types::Point2D;
    use crate::math::utils::constants;

    /// Berechnet das Kreuzprodukt zweier 2D-Vektoren (Skalar)
    pub fn cross_product_2d(a: Point2D, b: Point2D) -> f64 {
        a.x * b.y - a.y * b.x
    }

    /// Senkrechter Abstand eines Punktes zur Geraden.
    /// Fällt die Gerade zu einem Punkt zusammen, wird der normale Punktabstand geliefert.
    pub fn point_line_distance(point: Point2D, line_start: Point2D, line_end: Point2D) -> f64 {
        let line_vec = line_end - line_start;
        let line_len = line_vec.length();
        if line_len < constants::EPSILON {
            return point.distance(line_start);
        }

        (cross_product_2d(line_vec, point - line_start) / line_len).abs()
    }
}
