//! Configuration module for the conversion engine
//!
//! This module provides the `ConverterConfig` struct and its builder. The
//! configuration is fixed when a converter is constructed; no option is a
//! per-call parameter.

pub mod builder;
pub mod types;

pub use builder::ConverterConfigBuilder;
pub use types::ConverterConfig;
