// src/math/geometry/mod.rs

pub mod collection;
pub mod polygon;

pub use self::collection::{Feature, Geometry, Layer, PolygonSet};
pub use self::polygon::{
    Ring, RingBuilder, RingProperties, RingValidator, ShapeGenerators, ValidationError,
    ValidationReport, ValidationWarning,
};
