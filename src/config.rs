//! Tunable constants, loadable from a YAML file
//!
//! All four knobs ship with the defaults the surfaces were designed
//! around; a config file may override any subset.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Maximum gap between consecutive quotes that still clusters them (seconds)
pub const DEFAULT_SEQUENCE_GAP_SECONDS: f64 = 17.5;
/// Queries shorter than this never filter (characters)
pub const DEFAULT_SEARCH_MIN_QUERY_LEN: usize = 3;
/// Search input inactivity before the query commits (milliseconds)
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 150;
/// Delay between a hide request and the hidden state taking effect (milliseconds)
pub const DEFAULT_HIDE_DELAY_MS: u64 = 300;

/// Errors that can occur loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Runtime configuration for the data layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteboardConfig {
    /// Maximum start-to-end gap for sequence clustering, in seconds
    #[serde(default = "default_sequence_gap_seconds")]
    pub sequence_gap_seconds: f64,
    /// Minimum query length before search filters at all
    #[serde(default = "default_search_min_query_len")]
    pub search_min_query_len: usize,
    /// Debounce interval for search input, in milliseconds
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Hide-transition delay, in milliseconds
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
}

fn default_sequence_gap_seconds() -> f64 {
    DEFAULT_SEQUENCE_GAP_SECONDS
}

fn default_search_min_query_len() -> usize {
    DEFAULT_SEARCH_MIN_QUERY_LEN
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

fn default_hide_delay_ms() -> u64 {
    DEFAULT_HIDE_DELAY_MS
}

impl Default for QuoteboardConfig {
    fn default() -> Self {
        Self {
            sequence_gap_seconds: DEFAULT_SEQUENCE_GAP_SECONDS,
            search_min_query_len: DEFAULT_SEARCH_MIN_QUERY_LEN,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            hide_delay_ms: DEFAULT_HIDE_DELAY_MS,
        }
    }
}

impl QuoteboardConfig {
    /// Parse a YAML document; missing keys fall back to defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}
