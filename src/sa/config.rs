//! SA configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::neighborhood::OperatorWeights;

/// Configuration for the Simulated Annealing driver.
///
/// Cooling is geometric: `T ← T · cooling_rate` after every
/// `iterations_per_temperature` candidates. The run ends when
/// `T ≤ final_temperature`, after `max_iterations` candidates, or when the
/// optional wall-clock `time_limit` has passed.
///
/// # Examples
///
/// ```
/// use u_vrp::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(500.0)
///     .with_cooling_rate(0.9)
///     .with_iterations_per_temperature(50);
/// assert_eq!(config.max_iterations, 10_000);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaConfig {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// The run stops once the temperature is at or below this value.
    pub final_temperature: f64,
    /// Geometric cooling factor in (0, 1).
    pub cooling_rate: f64,
    /// Candidates evaluated at each temperature.
    pub iterations_per_temperature: usize,
    /// Hard cap on candidates evaluated.
    pub max_iterations: usize,
    /// Operator roulette weights.
    pub operator_weights: OperatorWeights,
    /// Optional wall-clock budget, checked between temperature levels.
    pub time_limit: Option<Duration>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1000.0,
            final_temperature: 1.0,
            cooling_rate: 0.95,
            iterations_per_temperature: 100,
            max_iterations: 10_000,
            operator_weights: OperatorWeights::default(),
            time_limit: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, alpha: f64) -> Self {
        self.cooling_rate = alpha;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_operator_weights(mut self, weights: OperatorWeights) -> Self {
        self.operator_weights = weights;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), RoutingError> {
        if !(self.initial_temperature > 0.0) {
            return Err(RoutingError::InvalidConfig(
                "initial_temperature must be positive".into(),
            ));
        }
        if !(self.final_temperature > 0.0) {
            return Err(RoutingError::InvalidConfig(
                "final_temperature must be positive".into(),
            ));
        }
        if self.final_temperature >= self.initial_temperature {
            return Err(RoutingError::InvalidConfig(
                "final_temperature must be less than initial_temperature".into(),
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(RoutingError::InvalidConfig(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if self.iterations_per_temperature == 0 {
            return Err(RoutingError::InvalidConfig(
                "iterations_per_temperature must be at least 1".into(),
            ));
        }
        self.operator_weights.validate()
    }
}
