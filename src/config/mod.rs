//! Configuration module for Link-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a configuration file is optional.
//! [`load_config`] validates immediately; [`read_config`] leaves validation to
//! the caller so overrides can be applied first.
//!
//! # Example
//!
//! ```no_run
//! use link_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ripple.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, UserAgentConfig, DEFAULT_MAX_DEPTH};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, parse_config, read_config, read_config_with_hash,
};

pub use validation::validate;
