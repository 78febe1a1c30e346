// src/math/geometry/polygon/validation.rs

use super::{core::Ring, properties::RingProperties};
use crate::math::utils::constants;
use std::fmt;

/// Validation-Ergebnisse
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotClosed,
    InsufficientVertices { count: usize, minimum: usize },
    InvalidVertex { vertex_index: usize, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotClosed => write!(f, "ring is not closed"),
            ValidationError::InsufficientVertices { count, minimum } => {
                write!(f, "ring has {count} points, needs at least {minimum}")
            }
            ValidationError::InvalidVertex {
                vertex_index,
                reason,
            } => write!(f, "vertex {vertex_index}: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Kante mit Länge 0 (doppelter Punkt)
    DegenerateEdge { vertex_index: usize },
    NearlyDegenerateEdge { vertex_index: usize, length: f64 },
    /// Ring umschließt keine Fläche
    ZeroArea,
}

/// Validator für Ringe, die in die Generalisierung gehen.
///
/// Prüft nur, was die Algorithmen voraussetzen (geschlossen, genug Punkte, endliche Koordinaten).
/// Selbstüberschneidungen sind Sache der Eingabe-Reparatur.
#[derive(Debug, Clone)]
pub struct RingValidator {
    tolerance: f64,
}

impl Default for RingValidator {
    fn default() -> Self {
        Self {
            tolerance: constants::EPSILON * 1000.0, // Etwas größere Toleranz für praktische Anwendung
        }
    }
}

impl RingValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validiert einen Ring
    pub fn validate(&self, ring: &Ring) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if !ring.is_closed() {
            errors.push(ValidationError::NotClosed);
        }

        let count = ring.vertex_count();
        if count < constants::MIN_RING_VERTICES {
            errors.push(ValidationError::InsufficientVertices {
                count,
                minimum: constants::MIN_RING_VERTICES,
            });
        }

        for (i, vertex) in ring.vertices().iter().enumerate() {
            if !vertex.is_finite() {
                errors.push(ValidationError::InvalidVertex {
                    vertex_index: i,
                    reason: "Non-finite coordinates".to_string(),
                });
            }
        }

        // Kanten nur prüfen, wenn die Koordinaten brauchbar sind
        if errors.is_empty() {
            self.validate_edges(ring, &mut warnings);
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    fn validate_edges(&self, ring: &Ring, warnings: &mut Vec<ValidationWarning>) {
        for (i, (a, b)) in ring.edges().enumerate() {
            let edge_length = a.distance(b);
            if edge_length == 0.0 {
                warnings.push(ValidationWarning::DegenerateEdge { vertex_index: i });
            } else if edge_length < self.tolerance {
                warnings.push(ValidationWarning::NearlyDegenerateEdge {
                    vertex_index: i,
                    length: edge_length,
                });
            }
        }

        // Auch kollineare Ringe mit positiver Länge umschließen keine Fläche
        if ring.area() <= constants::EPSILON {
            warnings.push(ValidationWarning::ZeroArea);
        }
    }
}
