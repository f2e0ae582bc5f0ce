use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;

use crate::error::ConfigError;
use crate::leaderboard::TEAMS_PER_PAGE;
use crate::proximity::{ProximityPolicy, MIN_SPACING_M, NEAR_RADIUS_M};

/// Settings read from an optional TOML file. Anything left out keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub proximity: ProximityConfig,
    pub leaderboard: LeaderboardConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    pub near_radius_m: f64,
    pub min_spacing_m: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            near_radius_m: NEAR_RADIUS_M,
            min_spacing_m: MIN_SPACING_M,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    /// Zero is rejected when the file is parsed.
    pub page_size: NonZeroUsize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            page_size: TEAMS_PER_PAGE,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.proximity;
        let radii = [
            ("near_radius_m", p.near_radius_m),
            ("min_spacing_m", p.min_spacing_m),
        ];
        for (name, value) in radii {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    message: format!("{} must be a positive number, got {}", name, value),
                });
            }
        }
        if p.near_radius_m > p.min_spacing_m {
            return Err(ConfigError::Invalid {
                message: format!(
                    "near_radius_m ({}) must not exceed min_spacing_m ({})",
                    p.near_radius_m, p.min_spacing_m
                ),
            });
        }
        Ok(())
    }

    pub fn policy(&self) -> ProximityPolicy {
        ProximityPolicy {
            near_radius_m: self.proximity.near_radius_m,
            min_spacing_m: self.proximity.min_spacing_m,
        }
    }
}
