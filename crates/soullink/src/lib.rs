//! SoulLink compatibility scan: quiz scoring engine plus the configuration,
//! error, and telemetry plumbing shared by the API service.

pub mod config;
pub mod error;
pub mod quiz;
pub mod telemetry;
