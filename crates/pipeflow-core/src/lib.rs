//! Pipeflow Core - Reading types and configuration
//!
//! This crate provides the foundational types for the pipeflow simulator:
//!
//! - **Reading**: the flow reading entity in its wire shape
//! - **Config**: TOML configuration schema, discovery, and validation

pub mod config;
pub mod reading;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigResult, SimulatorConfig};
pub use reading::{round3, FlowReading};

/// Simulator version
pub const SIMULATOR_VERSION: &str = env!("CARGO_PKG_VERSION");
