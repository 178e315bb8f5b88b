//! Constraint evaluators and objective functions.
//!
//! Each evaluator is a pure function of a [`ProblemInstance`] and a
//! [`Solution`]: it lists violations (empty means the constraint holds) and,
//! where it makes sense, exposes a numeric penalty for soft objectives.
//!
//! - [`CapacityEvaluator`]: per-route load against vehicle capacity
//! - [`TimeWindowEvaluator`]: arrival times, waiting and lateness
//! - [`FleetEvaluator`]: vehicle-type compatibility and per-type capacity
//! - [`TrafficModel`]: hour-of-day travel time multipliers
//! - [`Objective`]: the score drivers minimize
//!
//! [`ProblemInstance`]: crate::models::ProblemInstance
//! [`Solution`]: crate::models::Solution

mod capacity;
mod fleet;
mod objective;
mod time_window;
mod traffic;

pub use capacity::CapacityEvaluator;
pub use fleet::FleetEvaluator;
pub use objective::Objective;
pub use time_window::{RouteSchedule, TimeWindowEvaluator};
pub use traffic::{RouteTiming, TrafficCondition, TrafficModel, TrafficReport};

use crate::models::{Solution, Violation};

/// A hard or soft constraint checked against a whole solution.
pub trait ConstraintEvaluator {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// All violations of this constraint in `solution`.
    fn violations(&self, solution: &Solution) -> Vec<Violation>;

    /// Returns `true` if `solution` has no violations of this constraint.
    fn is_feasible(&self, solution: &Solution) -> bool {
        self.violations(solution).is_empty()
    }

    /// Soft penalty for use in a penalized objective.
    fn penalty(&self, _solution: &Solution) -> f64 {
        0.0
    }
}
