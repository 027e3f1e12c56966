//! Organ donor registry with deterministic donor/recipient compatibility scoring.

pub mod config;
pub mod error;
pub mod matching;
pub mod registry;
pub mod telemetry;
