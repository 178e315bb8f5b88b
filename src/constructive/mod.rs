//! Constructive heuristics for building initial VRP solutions.
//!
//! - [`greedy_nearest_neighbor`]: Capacity- and time-window-aware nearest neighbor, O(n²)
//! - [`clarke_wright_savings`]: Clarke-Wright savings algorithm (1964), O(n² log n)

mod clarke_wright;
mod greedy;

pub use clarke_wright::clarke_wright_savings;
pub use greedy::{greedy_nearest_neighbor, GREEDY_MAX_WAITING};

use serde::{Deserialize, Serialize};

use crate::models::{ProblemInstance, Solution};

/// Which heuristic builds the starting solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionMethod {
    /// [`greedy_nearest_neighbor`].
    #[default]
    Greedy,
    /// [`clarke_wright_savings`].
    Savings,
}

impl ConstructionMethod {
    /// Runs the heuristic.
    pub fn construct(self, instance: &ProblemInstance) -> Solution {
        match self {
            ConstructionMethod::Greedy => greedy_nearest_neighbor(instance),
            ConstructionMethod::Savings => clarke_wright_savings(instance),
        }
    }
}
