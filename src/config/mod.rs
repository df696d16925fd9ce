//! Configuration module for warmupcache
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Command-line flags are merged on top of the file before validation.
//!
//! # Example
//!
//! ```no_run
//! use warmupcache::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("warmup.toml")).unwrap();
//! println!("Warming {} sitemaps", config.warmup.sitemaps.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, UserAgentConfig, WarmupConfig, DEFAULT_TIMEOUT_SECS};

// Re-export parser functions
pub use parser::{load_config, parse_config, read_config};
pub use validation::{validate, MAX_PARALLELISM};
