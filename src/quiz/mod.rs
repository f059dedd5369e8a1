// src/quiz/mod.rs

pub mod dataset;
pub mod presenter;
pub mod recorder;
pub mod service;
pub mod session;
pub mod shuffle;
pub mod store;
