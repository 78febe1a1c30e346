// src/math/algorithms/smoothing/mod.rs

pub mod chaikin;
pub mod traits;

pub use self::chaikin::ChaikinSmoother;
pub use self::traits::Smoothing;
