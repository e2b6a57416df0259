//! # Search Configuration
//!
//! All planner and forward-model knobs in one serialisable struct with a
//! fluent builder, mirroring the simulator configuration pattern: defaults,
//! validation, JSON round-tripping and environment overrides.

use crate::types::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// MCTS iterations per decision
    pub num_simulations: u32,
    /// Rollout depth bound (plies) below a freshly expanded node
    pub max_rollout_depth: u32,
    /// PUCT exploration constant
    pub c_puct: f32,
    /// Softmax temperature for expansion priors
    pub tau_prior: f32,
    /// Softmax temperature for opponent action sampling inside `step`
    pub tau_opp: f32,
    /// Enable hybrid (outcome-split) expansion
    pub hybrid_expansion: bool,
    /// Moves with accuracy below this threshold get hit/miss children
    pub hybrid_accuracy_threshold: f32,
    /// Moves with crit chance at or above this threshold get a crit child
    pub hybrid_crit_threshold: f32,
    /// A raw heuristic score at or above this short-circuits the search
    pub dominant_move_threshold: f32,
    /// Model accuracy rolls (false = every move hits)
    pub model_miss: bool,
    /// Model critical hits
    pub model_crit: bool,
    /// Critical hit damage multiplier
    pub crit_multiplier: f32,
    /// Secondary effects with proc chance below this are ignored by the
    /// forward model
    pub status_threshold: f32,
    /// Root RNG seed; fixed seed + fixed state reproduces the decision
    pub seed: u64,
    /// Optional wall-clock budget for one decision
    pub time_budget_ms: Option<u64>,
    /// Number of independent root-parallel trees (1 disables parallelism)
    pub root_parallelism: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_simulations: 160,
            max_rollout_depth: 4,
            c_puct: 1.4,
            tau_prior: 12.0,
            tau_opp: 8.0,
            hybrid_expansion: true,
            hybrid_accuracy_threshold: 0.85,
            hybrid_crit_threshold: 1.0 / 8.0,
            dominant_move_threshold: 150.0,
            model_miss: true,
            model_crit: true,
            crit_multiplier: 1.5,
            status_threshold: 0.30,
            seed: 0,
            time_budget_ms: None,
            root_parallelism: 1,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.to_path_buf(),
        })?;
        let config: SearchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.num_simulations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "num_simulations".to_string(),
                value: "0".to_string(),
            });
        }
        if self.c_puct <= 0.0 || !self.c_puct.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "c_puct".to_string(),
                value: self.c_puct.to_string(),
            });
        }
        if self.tau_prior <= 0.0 || self.tau_opp <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "tau".to_string(),
                value: format!("prior={} opp={}", self.tau_prior, self.tau_opp),
            });
        }
        if self.root_parallelism == 0 {
            return Err(ConfigError::InvalidValue {
                field: "root_parallelism".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment overrides on top of this configuration.
    pub fn with_env_overrides(mut self) -> ConfigResult<Self> {
        if let Ok(sims) = std::env::var("ORANGURU_SIMULATIONS") {
            self.num_simulations = sims.parse().unwrap_or(self.num_simulations);
        }
        if let Ok(seed) = std::env::var("ORANGURU_SEED") {
            self.seed = seed.parse().unwrap_or(self.seed);
        }
        if let Ok(depth) = std::env::var("ORANGURU_ROLLOUT_DEPTH") {
            self.max_rollout_depth = depth.parse().unwrap_or(self.max_rollout_depth);
        }
        if let Ok(trees) = std::env::var("ORANGURU_ROOT_TREES") {
            self.root_parallelism = trees.parse().unwrap_or(self.root_parallelism);
        }
        self.validate()?;
        Ok(self)
    }
}

/// Builder for `SearchConfig`
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn num_simulations(mut self, n: u32) -> Self {
        self.config.num_simulations = n;
        self
    }

    pub fn max_rollout_depth(mut self, depth: u32) -> Self {
        self.config.max_rollout_depth = depth;
        self
    }

    pub fn c_puct(mut self, c: f32) -> Self {
        self.config.c_puct = c;
        self
    }

    pub fn tau_prior(mut self, tau: f32) -> Self {
        self.config.tau_prior = tau;
        self
    }

    pub fn tau_opp(mut self, tau: f32) -> Self {
        self.config.tau_opp = tau;
        self
    }

    pub fn hybrid_expansion(mut self, enable: bool) -> Self {
        self.config.hybrid_expansion = enable;
        self
    }

    pub fn dominant_move_threshold(mut self, threshold: f32) -> Self {
        self.config.dominant_move_threshold = threshold;
        self
    }

    pub fn model_miss(mut self, enable: bool) -> Self {
        self.config.model_miss = enable;
        self
    }

    pub fn model_crit(mut self, enable: bool) -> Self {
        self.config.model_crit = enable;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn time_budget_ms(mut self, budget: u64) -> Self {
        self.config.time_budget_ms = Some(budget);
        self
    }

    pub fn root_parallelism(mut self, trees: u32) -> Self {
        self.config.root_parallelism = trees;
        self
    }

    pub fn build(self) -> ConfigResult<SearchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    pub fn build_unchecked(self) -> SearchConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_rejects_zero_simulations() {
        let result = SearchConfig::builder().num_simulations(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = SearchConfig::builder()
            .num_simulations(32)
            .seed(99)
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.num_simulations, 32);
        assert_eq!(back.seed, 99);
    }
}
