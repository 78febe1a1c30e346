// src/generalization/pipeline.rs

use crate::generalization::{
    config::{GeneralizationConfig, GeneralizationPolicy},
    metrics::{Metrics, MetricsDelta},
};
use crate::math::{
    algorithms::{
        ArcLengthResampler, ChaikinSmoother, DecimationPolicy, DouglasPeucker, Smoothing,
    },
    error::{MathError, MathResult},
    geometry::{PolygonSet, Ring, RingProperties, RingValidator},
    utils::constants,
};
use std::fmt;
use tracing::{debug, warn};

/// Warum ein Polygon nicht in die Ausgabe gelangt ist. Nie fatal für die Konfiguration.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Eine Stufe hat weniger als `expected` Punkte übrig gelassen
    TooFewVertices { expected: usize, actual: usize },
    /// Fläche der Eingabe unter `min_area`
    BelowAreaThreshold { area: f64, min_area: f64 },
    /// Eingabe ungültig oder Ring ohne Länge
    DegenerateGeometry { reason: String },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::TooFewVertices { expected, actual } => {
                write!(f, "too few vertices ({actual} < {expected})")
            }
            RejectionReason::BelowAreaThreshold { area, min_area } => {
                write!(f, "area {area:.2} below threshold {min_area}")
            }
            RejectionReason::DegenerateGeometry { reason } => {
                write!(f, "degenerate geometry: {reason}")
            }
        }
    }
}

/// Abgelehntes Polygon mit seiner Position in der Eingabemenge
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub index: usize,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PolygonOutcome {
    Accepted(Ring),
    Rejected(RejectionReason),
}

/// Ergebnis eines Laufs mit einer Konfiguration
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    pub config: GeneralizationConfig,
    pub output: PolygonSet,
    pub before: Metrics,
    pub after: Metrics,
    pub deltas: MetricsDelta,
    pub rejections: Vec<Rejection>,
}

impl SweepResult {
    pub fn accepted_count(&self) -> usize {
        self.output.len()
    }
}

/// Vorbereitete Stufen einer Politik; alle Parameter sind bereits geprüft.
#[derive(Debug, Clone, Copy)]
enum Stages {
    Decimate(DecimationPolicy),
    ResampleSimplifySmooth {
        resampler: ArcLengthResampler,
        simplifier: DouglasPeucker,
        smoother: ChaikinSmoother,
    },
}

/// Generalisierungs-Pipeline für eine einzelne Konfiguration.
///
/// Pro Polygon: Flächenfilter, Validierung, Politik, Vertexfilter. Läuft synchron
/// und verändert die Eingabe nicht.
#[derive(Debug, Clone)]
pub struct GeneralizationPipeline {
    config: GeneralizationConfig,
    stages: Stages,
    validator: RingValidator,
    min_vertices: usize,
}

impl GeneralizationPipeline {
    /// Prüft die Konfiguration, bevor irgendein Polygon verarbeitet wird.
    pub fn new(config: GeneralizationConfig) -> MathResult<Self> {
        config.validate()?;

        let stages = match config.policy {
            GeneralizationPolicy::Decimation(policy) => Stages::Decimate(policy),
            GeneralizationPolicy::ResampleSimplifySmooth(policy) => {
                let (resampler, simplifier, smoother) = policy.stages()?;
                Stages::ResampleSimplifySmooth {
                    resampler,
                    simplifier,
                    smoother,
                }
            }
        };

        Ok(Self {
            config,
            stages,
            validator: RingValidator::new(),
            min_vertices: config.min_vertices as usize,
        })
    }

    pub fn config(&self) -> &GeneralizationConfig {
        &self.config
    }

    /// Verarbeitet ein einzelnes Polygon.
    pub fn process(&self, ring: &Ring) -> PolygonOutcome {
        match self.generalize(ring) {
            Ok(ring) => PolygonOutcome::Accepted(ring),
            Err(reason) => PolygonOutcome::Rejected(reason),
        }
    }

    fn generalize(&self, ring: &Ring) -> Result<Ring, RejectionReason> {
        let area = ring.area();
        if area < self.config.min_area {
            return Err(RejectionReason::BelowAreaThreshold {
                area,
                min_area: self.config.min_area,
            });
        }

        let report = self.validator.validate(ring);
        if let Some(error) = report.errors.first() {
            return Err(RejectionReason::DegenerateGeometry {
                reason: error.to_string(),
            });
        }

        let generalized = match &self.stages {
            Stages::Decimate(policy) => policy.decimate(ring).map_err(degenerate)?,
            Stages::ResampleSimplifySmooth {
                resampler,
                simplifier,
                smoother,
            } => {
                // Gezählt werden die erzeugten Punkte, bevor der Ring geschlossen wird
                let emitted = resampler.resample_points(ring).map_err(degenerate)?;
                self.check_count(emitted.len())?;
                let resampled = Ring::closed(emitted).map_err(degenerate)?;

                let simplified = simplifier.simplify_ring(&resampled).map_err(degenerate)?;
                if !simplified.is_valid_boundary() {
                    return Err(RejectionReason::TooFewVertices {
                        expected: constants::MIN_RING_VERTICES,
                        actual: simplified.vertex_count(),
                    });
                }
                smoother.smooth(&simplified).map_err(degenerate)?
            }
        };

        self.check_count(generalized.distinct_vertices().len())?;
        Ok(generalized)
    }

    /// Mindestanzahl verbleibender Vertices, ohne den Schlusspunkt
    fn check_count(&self, actual: usize) -> Result<(), RejectionReason> {
        if actual < self.min_vertices {
            return Err(RejectionReason::TooFewVertices {
                expected: self.min_vertices,
                actual,
            });
        }
        Ok(())
    }

    /// Verarbeitet alle Polygone der Menge nacheinander und misst vorher/nachher.
    pub fn run(&self, input: &PolygonSet) -> SweepResult {
        let mut output = PolygonSet::empty_like(input);
        let mut rejections = Vec::new();

        for (index, ring) in input.iter().enumerate() {
            match self.process(ring) {
                PolygonOutcome::Accepted(ring) => output.push(ring),
                PolygonOutcome::Rejected(reason) => {
                    match &reason {
                        RejectionReason::BelowAreaThreshold { .. } => {
                            debug!(index, %reason, "Polygon skipped")
                        }
                        _ => warn!(index, config = %self.config, %reason, "Polygon rejected"),
                    }
                    rejections.push(Rejection { index, reason });
                }
            }
        }

        let before = Metrics::of_set(input);
        let after = Metrics::of_set(&output);
        debug!(
            config = %self.config,
            accepted = output.len(),
            rejected = rejections.len(),
            "Configuration finished"
        );

        SweepResult {
            config: self.config,
            deltas: MetricsDelta::between(&before, &after),
            output,
            before,
            after,
            rejections,
        }
    }
}

/// Fehler einer Stufe an einem einzelnen Ring betreffen nur diesen Ring.
fn degenerate(error: MathError) -> RejectionReason {
    match error {
        MathError::TooFewVertices { expected, actual } => {
            RejectionReason::TooFewVertices { expected, actual }
        }
        other => RejectionReason::DegenerateGeometry {
            reason: other.to_string(),
        },
    }
}

/// Führt eine Konfiguration auf der Eingabemenge aus.
/// Ungültige Parameter schlagen fehl, bevor ein Polygon verarbeitet wird.
pub fn run_configuration(
    input: &PolygonSet,
    config: &GeneralizationConfig,
) -> MathResult<SweepResult> {
    Ok(GeneralizationPipeline::new(*config)?.run(input))
}
