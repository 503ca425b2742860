//! Engine configuration for leadscout
//!
//! This module handles loading, parsing, and validating the optional TOML
//! engine-settings file. Every setting has a built-in default so the engine
//! runs without a file at all.
//!
//! # Example
//!
//! ```no_run
//! use leadscout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("engine.toml")).unwrap();
//! println!("Inter-page delay: {}ms", config.run.page_delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserSettings, EngineConfig, HttpSettings, RunSettings};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
