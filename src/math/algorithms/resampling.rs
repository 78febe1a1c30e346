// src/math/algorithms/resampling.rs

use crate::math::{
    error::{MathError, MathResult},
    geometry::polygon::Ring,
    types::Point2D,
};

/// Tastet einen Ring in gleichmäßigen Abständen entlang seiner Bogenlänge neu ab.
///
/// Ab Bogenlänge 0 wird alle `step` Einheiten ein linear interpolierter Punkt erzeugt,
/// solange die Bogenlänge die Gesamtlänge nicht überschreitet. Der erste Punkt ist der
/// Startpunkt des Rings; der ursprüngliche letzte Punkt ist nicht garantiert enthalten.
/// Es entstehen `floor(length / step) + 1` Punkte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLengthResampler {
    step: f64,
}

impl ArcLengthResampler {
    pub fn new(step: f64) -> MathResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(MathError::invalid_parameter(
                "step_distance",
                step,
                "must be a finite value greater than 0",
            ));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Die emittierten Punkte, ohne den Ring zu schließen.
    pub fn resample_points(&self, ring: &Ring) -> MathResult<Vec<Point2D>> {
        let vertices = ring.vertices();

        // Kumulierte Bogenlänge am Anfang jedes Vertex
        let mut cumulative = Vec::with_capacity(vertices.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for (a, b) in ring.edges() {
            total += a.distance(b);
            cumulative.push(total);
        }

        if !total.is_finite() || total <= 0.0 {
            return Err(MathError::invalid_parameter(
                "ring_length",
                total,
                "cannot resample a ring without positive finite length",
            ));
        }

        let count = (total / self.step).floor() as usize;
        let mut points = Vec::with_capacity(count + 1);
        let mut segment = 0;
        let last_segment = vertices.len() - 2;

        for j in 0..=count {
            // j * step statt Aufsummieren: kein Drift bei vielen Schritten
            let target = (j as f64 * self.step).min(total);

            while segment < last_segment && cumulative[segment + 1] < target {
                segment += 1;
            }

            let start = cumulative[segment];
            let segment_length = cumulative[segment + 1] - start;
            let t = if segment_length > 0.0 {
                ((target - start) / segment_length).clamp(0.0, 1.0)
            } else {
                0.0
            };
            points.push(vertices[segment].lerp(vertices[segment + 1], t));
        }

        Ok(points)
    }

    /// Wie [`resample_points`](Self::resample_points), schließt das Ergebnis aber zu einem Ring.
    pub fn resample(&self, ring: &Ring) -> MathResult<Ring> {
        Ring::closed(self.resample_points(ring)?)
    }
}
