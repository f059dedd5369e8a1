// src/ml/mod.rs

pub mod artifacts;
pub mod encoder;
pub mod forest;
pub mod pipeline;
