//! Planner configuration.
//!
//! Tuning knobs for the optimizer and codec, loaded from JSON. Every field has
//! a default, so a config file only needs to name what it changes.
//!
//! ```
//! use furnplan_logic::config::{validate_config, PlannerConfig};
//!
//! let config = PlannerConfig::from_json(r#"{ "primary_weight": 4.0 }"#).unwrap();
//! assert!(config.repair_minimums);
//! assert!(validate_config(&config).is_empty());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::EncodeMode;
use crate::error::PlannerError;

/// Optimizer and codec settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Drop existing placements before optimizing instead of keeping them
    /// as fixed obstacles.
    pub clear_existing: bool,
    /// Weight of the primary stat in the optimizer objective.
    pub primary_weight: f64,
    /// Run the repair pass for groups left below their minimum.
    pub repair_minimums: bool,
    /// Format written when re-encoding a plan.
    pub encode_mode: EncodeMode,
    /// Optional cap on pieces the optimizer adds in one run. A capped run may
    /// leave the room short of full.
    pub max_optimizer_placements: Option<u32>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            clear_existing: false,
            primary_weight: 10.0,
            repair_minimums: true,
            encode_mode: EncodeMode::Uncompressed,
            max_optimizer_placements: None,
        }
    }
}

impl PlannerConfig {
    pub fn from_json(json: &str) -> Result<Self, PlannerError> {
        serde_json::from_str(json).map_err(|e| PlannerError::Config(e.to_string()))
    }

    /// Parse and validate in one step; the first problem becomes the error.
    pub fn from_json_validated(json: &str) -> Result<Self, PlannerError> {
        let config = Self::from_json(json)?;
        match validate_config(&config).first() {
            Some(err) => Err(PlannerError::Config(err.to_string())),
            None => Ok(config),
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Weight is negative, zero, or not finite.
    InvalidPrimaryWeight(f64),
    /// The optimizer would never add anything.
    ZeroPlacementCap,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPrimaryWeight(w) => {
                write!(f, "primary_weight must be a positive number, got {}", w)
            }
            ConfigError::ZeroPlacementCap => {
                write!(f, "max_optimizer_placements must be at least 1")
            }
        }
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &PlannerConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if !config.primary_weight.is_finite() || config.primary_weight <= 0.0 {
        errors.push(ConfigError::InvalidPrimaryWeight(config.primary_weight));
    }
    if config.max_optimizer_placements == Some(0) {
        errors.push(ConfigError::ZeroPlacementCap);
    }

    errors
}
