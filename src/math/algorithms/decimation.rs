// src/math/algorithms/decimation.rs

use crate::math::{
    error::{MathError, MathResult},
    geometry::polygon::Ring,
    types::Point2D,
};
use serde::{Deserialize, Serialize};

/// Wie ein per Stride beibehaltener Vertex aus seinem Nachfolger gemittelt wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrideAveraging {
    /// x bleibt, y wird mit dem Nachfolger gemittelt
    #[default]
    YOnly,
    /// Beide Koordinaten werden gemittelt (Kantenmittelpunkt)
    Midpoint,
    /// Vertex wird unverändert übernommen
    Keep,
}

impl StrideAveraging {
    fn apply(self, current: Point2D, next: Point2D) -> Point2D {
        match self {
            StrideAveraging::YOnly => Point2D::new(current.x, (current.y + next.y) / 2.0),
            StrideAveraging::Midpoint => current.lerp(next, 0.5),
            StrideAveraging::Keep => current,
        }
    }
}

/// Politik zur Reduktion der Vertexanzahl eines Rings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecimationPolicy {
    /// Behält jeden `stride`-ten Vertex. Ohne festen Stride wird er aus der
    /// Vertexanzahl abgeleitet, siehe [`DecimationPolicy::default_stride`].
    Stride {
        #[serde(default)]
        stride: Option<usize>,
        #[serde(default)]
        averaging: StrideAveraging,
    },
    /// Behält einen Vertex, wenn er mindestens `threshold` vom zuletzt
    /// behaltenen Vertex entfernt ist.
    DistanceThreshold { threshold: f64 },
}

impl Default for DecimationPolicy {
    fn default() -> Self {
        DecimationPolicy::Stride {
            stride: None,
            averaging: StrideAveraging::default(),
        }
    }
}

impl DecimationPolicy {
    /// Kleine Ringe werden nur halbiert, größere auf jeden zehnten Punkt reduziert.
    pub fn default_stride(vertex_count: usize) -> usize {
        if vertex_count < 10 { 2 } else { 10 }
    }

    pub fn validate(&self) -> MathResult<()> {
        match *self {
            DecimationPolicy::Stride {
                stride: Some(0), ..
            } => Err(MathError::invalid_parameter(
                "stride",
                0,
                "must be at least 1",
            )),
            DecimationPolicy::DistanceThreshold { threshold }
                if !threshold.is_finite() || threshold <= 0.0 =>
            {
                Err(MathError::invalid_parameter(
                    "distance_threshold",
                    threshold,
                    "must be a finite distance greater than 0",
                ))
            }
            _ => Ok(()),
        }
    }

    /// Wendet die Politik an. Das Ergebnis ist immer geschlossen, kann aber
    /// weniger als vier Punkte haben; die Mindestanzahl prüft der Aufrufer.
    pub fn decimate(&self, ring: &Ring) -> MathResult<Ring> {
        self.validate()?;
        match *self {
            DecimationPolicy::Stride { stride, averaging } => {
                let stride = stride.unwrap_or_else(|| Self::default_stride(ring.vertex_count()));
                decimate_stride(ring, stride, averaging)
            }
            DecimationPolicy::DistanceThreshold { threshold } => {
                decimate_by_distance(ring, threshold)
            }
        }
    }
}

/// Kandidaten sind die Indizes `0..n-1`; der Schlusspunkt selbst wird nie gewählt,
/// dient aber als Nachfolger des letzten Kandidaten.
fn decimate_stride(ring: &Ring, stride: usize, averaging: StrideAveraging) -> MathResult<Ring> {
    let vertices = ring.vertices();
    let retained: Vec<Point2D> = (0..vertices.len().saturating_sub(1))
        .step_by(stride)
        .map(|i| averaging.apply(vertices[i], vertices[i + 1]))
        .collect();

    if retained.is_empty() {
        return Err(MathError::InsufficientPoints {
            expected: 2,
            actual: vertices.len(),
        });
    }

    Ring::closed(retained)
}

fn decimate_by_distance(ring: &Ring, threshold: f64) -> MathResult<Ring> {
    let vertices = ring.vertices();
    let Some((&last, interior)) = vertices.split_last() else {
        return Err(MathError::InsufficientPoints {
            expected: 1,
            actual: 0,
        });
    };
    let Some((&first, candidates)) = interior.split_first() else {
        return Ring::new(vec![last]);
    };

    let mut retained = vec![first];
    let mut anchor = first;
    for &vertex in candidates {
        if vertex.distance(anchor) >= threshold {
            retained.push(vertex);
            anchor = vertex;
        }
    }

    // Schlusspunkt wird immer behalten
    retained.push(last);
    Ring::new(retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::polygon::RingBuilder;

    fn dense_rectangle() -> Ring {
        // 24 Kanten à 50, Ecken auf geraden Indizes
        RingBuilder::new()
            .rectangle(Point2D::new(0.0, 0.0), Point2D::new(400.0, 200.0))
            .densify(50.0)
            .build()
            .unwrap()
    }

    fn ring_of(count: usize) -> Ring {
        let points = (0..count)
            .map(|i| Point2D::new(i as f64, (i % 3) as f64))
            .collect();
        Ring::closed(points).unwrap()
    }

    #[test]
    fn test_default_stride() {
        assert_eq!(DecimationPolicy::default_stride(9), 2);
        assert_eq!(DecimationPolicy::default_stride(10), 10);
        assert_eq!(DecimationPolicy::default_stride(250), 10);
    }

    #[test]
    fn test_stride_keeps_every_kth_and_averages_y() {
        let ring = ring_of(25); // 26 gespeicherte Punkte
        let policy = DecimationPolicy::default();
        let result = policy.decimate(&ring).unwrap();

        // Indizes 0, 10, 20 plus Schlusspunkt
        assert_eq!(result.vertex_count(), 4);
        let v = ring.vertices();
        assert_eq!(result.vertices()[0], Point2D::new(v[0].x, (v[0].y + v[1].y) / 2.0));
        assert_eq!(result.vertices()[1], Point2D::new(v[10].x, (v[10].y + v[11].y) / 2.0));
        assert_eq!(result.vertices()[2], Point2D::new(v[20].x, (v[20].y + v[21].y) / 2.0));
        assert!(result.is_closed());
    }

    #[test]
    fn test_stride_small_ring_halves() {
        let ring = ring_of(7); // 8 gespeicherte Punkte -> Stride 2
        let result = DecimationPolicy::Stride {
            stride: None,
            averaging: StrideAveraging::Keep,
        }
        .decimate(&ring)
        .unwrap();

        let kept: Vec<_> = [0, 2, 4, 6].iter().map(|&i| ring.vertices()[i]).collect();
        assert_eq!(&result.vertices()[..4], kept.as_slice());
        assert_eq!(result.vertex_count(), 5);
    }

    #[test]
    fn test_stride_twelve_points_collapses() {
        // 12 gespeicherte Punkte, Stride 10: nur 0 und 10 bleiben
        let ring = ring_of(11);
        let result = DecimationPolicy::Stride {
            stride: None,
            averaging: StrideAveraging::Keep,
        }
        .decimate(&ring)
        .unwrap();
        assert_eq!(result.vertex_count(), 3);
        assert!(!result.is_valid_boundary());
    }

    #[test]
    fn test_stride_midpoint_averaging() {
        let ring = RingBuilder::new()
            .rectangle(Point2D::ZERO, Point2D::new(10.0, 10.0))
            .build()
            .unwrap();
        let result = DecimationPolicy::Stride {
            stride: Some(1),
            averaging: StrideAveraging::Midpoint,
        }
        .decimate(&ring)
        .unwrap();
        assert_eq!(
            result.vertices(),
            &[
                Point2D::new(5.0, 0.0),
                Point2D::new(10.0, 5.0),
                Point2D::new(5.0, 10.0),
                Point2D::new(0.0, 5.0),
                Point2D::new(5.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_distance_keeps_every_other_vertex() {
        let ring = dense_rectangle();
        assert_eq!(ring.vertex_count(), 25);

        let result = DecimationPolicy::DistanceThreshold { threshold: 100.0 }
            .decimate(&ring)
            .unwrap();

        let expected: Vec<_> = (0..=24).step_by(2).map(|i| ring.vertices()[i]).collect();
        assert_eq!(result.vertices(), expected.as_slice());
        assert_eq!(result.vertex_count(), 13);
    }

    #[test]
    fn test_distance_forces_final_vertex() {
        let ring = Ring::closed(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(100.0, 100.0),
            Point2D::new(0.0, 100.0),
            Point2D::new(0.0, 10.0),
        ])
        .unwrap();

        let result = DecimationPolicy::DistanceThreshold { threshold: 100.0 }
            .decimate(&ring)
            .unwrap();

        // (0,10) liegt nur 90 vom letzten behaltenen Punkt entfernt
        assert_eq!(result.vertex_count(), 5);
        assert_eq!(result.vertices()[3], Point2D::new(0.0, 100.0));
        assert_eq!(result.vertices()[4], Point2D::new(0.0, 0.0));
    }

    #[test]
    fn test_distance_small_threshold_keeps_all() {
        let ring = dense_rectangle();
        let result = DecimationPolicy::DistanceThreshold { threshold: 1.0 }
            .decimate(&ring)
            .unwrap();
        assert_eq!(result, ring);
    }

    #[test]
    fn test_invalid_parameters() {
        let ring = dense_rectangle();
        assert!(matches!(
            DecimationPolicy::Stride {
                stride: Some(0),
                averaging: StrideAveraging::YOnly
            }
            .decimate(&ring),
            Err(MathError::InvalidParameter { name: "stride", .. })
        ));
        assert!(matches!(
            DecimationPolicy::DistanceThreshold { threshold: -1.0 }.decimate(&ring),
            Err(MathError::InvalidParameter {
                name: "distance_threshold",
                ..
            })
        ));
        assert!(
            DecimationPolicy::DistanceThreshold { threshold: 0.0 }
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_policy_serde() {
        let json = r#"{"kind":"stride","averaging":"midpoint"}"#;
        let policy: DecimationPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(
            policy,
            DecimationPolicy::Stride {
                stride: None,
                averaging: StrideAveraging::Midpoint
            }
        );

        let json = r#"{"kind":"distance_threshold","threshold":25.0}"#;
        let policy: DecimationPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy, DecimationPolicy::DistanceThreshold { threshold: 25.0 });
    }
}
