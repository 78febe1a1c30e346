// src/math/geometry/polygon/properties.rs

use crate::math::geometry::polygon::core::Ring;

/// Trait für geometrische Eigenschaften von Ringen.
pub trait RingProperties {
    /// Fläche nach der Shoelace-Formel (immer positiv).
    fn area(&self) -> f64;

    /// Vorzeichenbehaftete Fläche: positiv für gegen den Uhrzeigersinn.
    fn signed_area(&self) -> f64;

    /// Umfang. Für einen geschlossenen Ring identisch mit `length()`.
    fn perimeter(&self) -> f64;
}

impl RingProperties for Ring {
    fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    fn signed_area(&self) -> f64 {
        // Der Ring ist geschlossen, daher reichen die gespeicherten Kanten.
        let doubled: f64 = self
            .edges()
            .map(|(p1, p2)| (p1.x * p2.y) - (p2.x * p1.y))
            .sum();
        doubled * 0.5
    }

    fn perimeter(&self) -> f64 {
        self.length()
    }
}
