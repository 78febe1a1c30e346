// src/math/geometry/polygon/builder.rs

use super::core::Ring;
use crate::math::{error::MathResult, types::Point2D};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::f64::consts::TAU;

/// Builder für Ringe. `build()` schließt den Ring immer.
#[derive(Debug, Clone, Default)]
pub struct RingBuilder {
    vertices: Vec<Point2D>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fügt ein Rechteck hinzu (gegen den Uhrzeigersinn)
    pub fn rectangle(mut self, min: Point2D, max: Point2D) -> Self {
        self.vertices.extend([
            Point2D::new(min.x, min.y),
            Point2D::new(max.x, min.y),
            Point2D::new(max.x, max.y),
            Point2D::new(min.x, max.y),
        ]);
        self
    }

    /// Unterteilt jede bisherige Kante so, dass kein Segment länger als `spacing` ist.
    /// Praktisch, um dichte Ränder für die Decimation zu erzeugen.
    pub fn densify(mut self, spacing: f64) -> Self {
        if spacing <= 0.0 || self.vertices.len() < 2 {
            return self;
        }

        let mut closed = self.vertices.clone();
        if closed.first() != closed.last() {
            closed.push(closed[0]);
        }

        let mut dense = Vec::with_capacity(closed.len());
        for pair in closed.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let steps = (a.distance(b) / spacing).ceil().max(1.0) as usize;
            for i in 0..steps {
                dense.push(a.lerp(b, i as f64 / steps as f64));
            }
        }

        self.vertices = dense;
        self
    }

    pub fn build(self) -> MathResult<Ring> {
        Ring::closed(self.vertices)
    }
}

/// Generatoren für typische Testformen
pub struct ShapeGenerators;

impl ShapeGenerators {
    pub fn circle_vertices(center: Point2D, radius: f64, segments: usize) -> Vec<Point2D> {
        (0..segments)
            .map(|i| {
                let angle = TAU * i as f64 / segments as f64;
                Point2D::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin(),
                )
            })
            .collect()
    }

    /// Achsenparalleles Quadrat mit Ecke `origin` und Kantenlänge `side`
    pub fn square(origin: Point2D, side: f64) -> MathResult<Ring> {
        RingBuilder::new()
            .rectangle(origin, origin + Point2D::new(side, side))
            .build()
    }

    pub fn regular_polygon(center: Point2D, radius: f64, sides: usize) -> MathResult<Ring> {
        Ring::closed(Self::circle_vertices(center, radius, sides.max(3)))
    }

    /// Kreis mit zufällig verrauschtem Radius; reproduzierbar über `seed`.
    /// Simuliert digitalisierte Grenzen (Waldabteilungen, Parzellen) mit vielen kleinen Zacken.
    pub fn jittered_circle(
        center: Point2D,
        radius: f64,
        segments: usize,
        jitter: f64,
        seed: u64,
    ) -> MathResult<Ring> {
        let mut rng = StdRng::seed_from_u64(seed);
        let vertices = (0..segments.max(3))
            .map(|i| {
                let angle = TAU * i as f64 / segments.max(3) as f64;
                let r = radius + rng.random_range(-jitter..=jitter);
                Point2D::new(center.x + r * angle.cos(), center.y + r * angle.sin())
            })
            .collect();
        Ring::closed(vertices)
    }
}
