// src/math/algorithms/smoothing/traits.rs

use crate::math::{error::MathResult, geometry::polygon::Ring};

/// Haupt-Trait für Algorithmen, die einen geschlossenen Ring glätten.
///
/// Ermöglicht es, Glättungsstrategien austauschbar zu verwenden. Implementierungen
/// liefern immer einen neuen, geschlossenen Ring.
pub trait Smoothing {
    /// Glättet einen Ring und gibt den geglätteten Ring zurück.
    fn smooth(&self, ring: &Ring) -> MathResult<Ring>;

    /// Ersetzt den Ring an Ort und Stelle durch seine geglättete Version.
    fn smooth_mut(&self, ring: &mut Ring) -> MathResult<()> {
        *ring = self.smooth(ring)?;
        Ok(())
    }
}
