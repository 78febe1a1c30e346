// src/lib.rs

//! Generalisierung von Polygonrändern: Ausdünnen, Neuabtasten, Vereinfachen und
//! Glätten von Ringen sowie Parameter-Sweeps mit Vorher/Nachher-Statistik.

pub mod generalization;
pub mod io;
pub mod math;
