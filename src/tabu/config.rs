//! Tabu Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;

/// Configuration for the Tabu Search driver.
///
/// # Examples
///
/// ```
/// use u_vrp::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_tabu_tenure(10)
///     .with_max_iterations(200);
/// assert_eq!(config.max_no_improvement, 200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabuConfig {
    /// Iterations a recorded move stays forbidden.
    pub tabu_tenure: usize,
    /// Hard cap on iterations.
    pub max_iterations: usize,
    /// Stop after this many consecutive iterations without a new best.
    pub max_no_improvement: usize,
    /// Swap candidates sampled per iteration.
    pub max_swap_moves: usize,
    /// Relocate candidates sampled per iteration.
    pub max_relocate_moves: usize,
    /// 2-opt candidates sampled per iteration.
    pub max_two_opt_moves: usize,
    /// Optional wall-clock budget, checked before each iteration.
    pub time_limit: Option<Duration>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            tabu_tenure: 20,
            max_iterations: 1000,
            max_no_improvement: 200,
            max_swap_moves: 50,
            max_relocate_moves: 30,
            max_two_opt_moves: 20,
            time_limit: None,
        }
    }
}

impl TabuConfig {
    pub fn with_tabu_tenure(mut self, tenure: usize) -> Self {
        self.tabu_tenure = tenure;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_max_no_improvement(mut self, n: usize) -> Self {
        self.max_no_improvement = n;
        self
    }

    /// Sets the per-iteration candidate caps for swap, relocate and 2-opt.
    pub fn with_neighborhood_size(mut self, swap: usize, relocate: usize, two_opt: usize) -> Self {
        self.max_swap_moves = swap;
        self.max_relocate_moves = relocate;
        self.max_two_opt_moves = two_opt;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if self.tabu_tenure == 0 {
            return Err(RoutingError::InvalidConfig(
                "tabu_tenure must be at least 1".into(),
            ));
        }
        if self.max_no_improvement == 0 {
            return Err(RoutingError::InvalidConfig(
                "max_no_improvement must be at least 1".into(),
            ));
        }
        if self.max_swap_moves + self.max_relocate_moves + self.max_two_opt_moves == 0 {
            return Err(RoutingError::InvalidConfig(
                "at least one neighborhood cap must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TabuConfig::default();
        assert_eq!(config.tabu_tenure, 20);
        assert_eq!(config.max_iterations, 1000);
        assert_eq!(config.max_no_improvement, 200);
        assert_eq!(
            (config.max_swap_moves, config.max_relocate_moves, config.max_two_opt_moves),
            (50, 30, 20)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_tenure() {
        assert!(TabuConfig::default().with_tabu_tenure(0).validate().is_err());
    }

    #[test]
    fn test_validate_empty_neighborhood() {
        let config = TabuConfig::default().with_neighborhood_size(0, 0, 0);
        assert!(matches!(config.validate(), Err(RoutingError::InvalidConfig(_))));
        let config = TabuConfig::default().with_neighborhood_size(0, 5, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: TabuConfig =
            serde_json::from_str(r#"{"tabu_tenure": 7}"#).expect("valid json");
        assert_eq!(config.tabu_tenure, 7);
        assert_eq!(config.max_iterations, 1000);
    }
}
