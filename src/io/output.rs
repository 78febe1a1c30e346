// src/io/output.rs

use crate::generalization::{Metrics, SweepResult, SweepSink};
use crate::io::{
    error::{IoError, IoResult},
    layer::write_layer,
};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Schreibt die Ausgabeschicht jeder Konfiguration als eigene JSON-Datei,
/// benannt nach ihren Parametern (`<prefix>_<label>.json`).
#[derive(Debug, Clone)]
pub struct LayerDirectorySink {
    directory: PathBuf,
    prefix: String,
}

impl LayerDirectorySink {
    /// Legt das Verzeichnis an, falls es fehlt
    pub fn create(directory: impl Into<PathBuf>) -> IoResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|e| IoError::at(&directory, e))?;
        Ok(Self {
            directory,
            prefix: "generalized".to_string(),
        })
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, result: &SweepResult) -> PathBuf {
        self.directory
            .join(format!("{}_{}.json", self.prefix, result.config.label()))
    }
}

impl SweepSink for LayerDirectorySink {
    fn begin(&mut self, _reference: &Metrics) -> IoResult<()> {
        Ok(())
    }

    fn record(&mut self, result: &SweepResult) -> IoResult<()> {
        let path = self.path_for(result);
        write_layer(&path, &result.output)?;
        debug!(path = %path.display(), polygons = result.output.len(), "Output layer written");
        Ok(())
    }
}
