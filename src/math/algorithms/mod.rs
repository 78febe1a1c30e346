// src/math/algorithms/mod.rs

// Deklaration der Algorithmus-Kategorien der Generalisierung
pub mod decimation;
pub mod resampling;
pub mod simplification;
pub mod smoothing;

// Re-Exporte für den direkten Zugriff auf die Algorithmen und deren Parameter
pub use self::decimation::{DecimationPolicy, StrideAveraging};
pub use self::resampling::ArcLengthResampler;
pub use self::simplification::DouglasPeucker;
pub use self::smoothing::{ChaikinSmoother, Smoothing};
