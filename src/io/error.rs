// src/io/error.rs
use crate::math::error::MathError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("Invalid JSON layer: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Math(#[from] MathError),
}

impl IoError {
    /// Hängt den betroffenen Pfad an einen I/O-Fehler an
    pub fn at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type IoResult<T> = Result<T, IoError>;
