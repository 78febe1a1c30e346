// src/math/algorithms/smoothing/chaikin.rs

use crate::math::{
    algorithms::smoothing::traits::Smoothing,
    error::{MathError, MathResult},
    geometry::polygon::Ring,
    types::Point2D,
};

/// Implementiert den Chaikin-Algorithmus (Corner Cutting) für geschlossene Ringe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaikinSmoother {
    /// Anzahl der anzuwendenden Glättungsiterationen. 0 ist die Identität.
    pub iterations: u32,
    /// Schnittverhältnis für neue Punkte auf Kanten (Chaikin: 0.25).
    /// Ein Wert von 0.25 setzt die neuen Punkte bei 25% und 75% der Kantenlänge.
    pub cut_ratio: f64,
}

impl Default for ChaikinSmoother {
    fn default() -> Self {
        Self {
            iterations: 1,
            cut_ratio: 0.25,
        }
    }
}

impl ChaikinSmoother {
    /// Jede Iteration verdoppelt die Punktzahl; darüber hinaus wächst der Ring unbrauchbar groß.
    pub const MAX_ITERATIONS: u32 = 16;

    pub fn new(iterations: u32) -> MathResult<Self> {
        if iterations > Self::MAX_ITERATIONS {
            return Err(MathError::invalid_parameter(
                "smoothing_iterations",
                iterations,
                format!("must not exceed {}", Self::MAX_ITERATIONS),
            ));
        }
        Ok(Self {
            iterations,
            ..Default::default()
        })
    }

    /// Muss zwischen 0 und 0.5 liegen
    pub fn with_cut_ratio(mut self, ratio: f64) -> Self {
        self.cut_ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 0.5)
        } else {
            0.25
        };
        self
    }

    /// Eine Iteration auf den distinkten Vertices (ohne Schlusspunkt).
    /// Die letzte Kante läuft zyklisch zum ersten Vertex zurück.
    fn chaikin_iteration(&self, points: &[Point2D]) -> Vec<Point2D> {
        let n = points.len();
        let mut smoothed = Vec::with_capacity(n * 2);

        for i in 0..n {
            let p0 = points[i];
            let p1 = points[(i + 1) % n];
            smoothed.push(p0.lerp(p1, self.cut_ratio));
            smoothed.push(p0.lerp(p1, 1.0 - self.cut_ratio));
        }

        smoothed
    }
}

impl Smoothing for ChaikinSmoother {
    fn smooth(&self, ring: &Ring) -> MathResult<Ring> {
        if self.iterations == 0 {
            return Ok(ring.clone());
        }

        let distinct = ring.distinct_vertices();
        if distinct.len() < 3 {
            return Err(MathError::InsufficientPoints {
                expected: 3,
                actual: distinct.len(),
            });
        }

        let mut current = distinct.to_vec();
        for _ in 0..self.iterations {
            current = self.chaikin_iteration(&current);
        }

        // Erster Punkt stammt aus Kante 0->1, letzter aus Kante n-1->0: explizit schließen
        Ring::closed(current)
    }
}
