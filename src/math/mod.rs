// src/math/mod.rs

pub mod algorithms;
pub mod error;
pub mod geometry;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        algorithms::{
            ArcLengthResampler, ChaikinSmoother, DecimationPolicy, DouglasPeucker, Smoothing,
            StrideAveraging,
        },
        error::{MathError, MathResult},
        geometry::{Feature, Geometry, Layer, PolygonSet, Ring, RingProperties, RingValidator},
        types::*,
    };
}
