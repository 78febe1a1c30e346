// src/math/geometry/polygon/mod.rs

// Deklaration der Untermodule für Ring-spezifische Funktionalität
pub mod builder;
pub mod core; // Enthält die Ring-Struktur selbst
pub mod properties; // Fläche, Umfang, Orientierung
pub mod validation;

// Re-Exporte für den einfachen Zugriff auf die wichtigsten Ring-Elemente
pub use self::builder::{RingBuilder, ShapeGenerators};
pub use self::core::Ring;
pub use self::properties::RingProperties;
pub use self::validation::{
    RingValidator, ValidationError, ValidationReport, ValidationWarning,
};
