// src/io/mod.rs

//! Ein- und Ausgabe rund um die Generalisierung: JSON-Schichten und Statistik-Datei.

pub mod error;
pub mod layer;
pub mod output;
pub mod stats;

pub use self::error::{IoError, IoResult};
pub use self::layer::{layer_to_json, parse_layer, read_layer, write_layer};
pub use self::output::LayerDirectorySink;
pub use self::stats::StatsFileSink;
