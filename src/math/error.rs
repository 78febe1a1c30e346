// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Too few vertices: expected at least {expected}, got {actual}")]
    TooFewVertices { expected: usize, actual: usize },

    #[error("Polygon without exterior coordinates")]
    EmptyPolygon,

    #[error("Unsupported geometry type: {found} (expected Polygon or MultiPolygon)")]
    UnsupportedGeometryType { found: String },

    #[error("Ring is not closed: first {first} != last {last}")]
    NotClosed { first: String, last: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl MathError {
    /// Kurzform für `InvalidParameter` mit beliebigem anzeigbaren Wert.
    pub fn invalid_parameter(
        name: &'static str,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        MathError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type MathResult<T> = Result<T, MathError>;
