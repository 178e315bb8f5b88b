//! Objective functions ranked by the metaheuristic drivers.

use serde::{Deserialize, Serialize};

use super::{CapacityEvaluator, TimeWindowEvaluator};
use crate::models::{ProblemInstance, Solution};

/// The score a driver minimizes.
///
/// [`Solution::total_cost`] is always plain distance; a penalized objective
/// only changes how drivers rank candidates.
///
/// # Examples
///
/// ```
/// use u_vrp::evaluation::Objective;
/// use u_vrp::models::{Customer, Fleet, ProblemInstance, Solution};
///
/// let instance = ProblemInstance::new("obj", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 3.0, 4.0, 30))
///     .with_fleet(Fleet::homogeneous(1, 20));
/// let mut sol = Solution::from_routes(0, &[vec![1]]);
/// sol.calculate_cost(&instance);
///
/// assert!((Objective::Distance.score(&instance, &sol) - 10.0).abs() < 1e-10);
/// let penalized = Objective::Penalized { capacity_weight: 1.0, time_weight: 0.0 };
/// assert!((penalized.score(&instance, &sol) - 10_010.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Total distance.
    #[default]
    Distance,
    /// Distance plus weighted capacity and time-window penalties.
    Penalized {
        /// Weight of the overload penalty (1000 per unit).
        capacity_weight: f64,
        /// Weight of the time cost above plain travel.
        time_weight: f64,
    },
}

impl Objective {
    /// Scores `solution`, whose cost caches must be current.
    pub fn score(&self, instance: &ProblemInstance, solution: &Solution) -> f64 {
        match *self {
            Objective::Distance => solution.total_cost(),
            Objective::Penalized {
                capacity_weight,
                time_weight,
            } => {
                let mut score = solution.total_cost();
                if capacity_weight != 0.0 {
                    score += capacity_weight * CapacityEvaluator::new(instance).load_penalty(solution);
                }
                if time_weight != 0.0 {
                    let time_cost = TimeWindowEvaluator::new(instance).time_cost(solution);
                    score += time_weight * (time_cost - solution.total_distance());
                }
                score
            }
        }
    }

    /// Recomputes the cost caches of `solution` and scores it.
    pub fn evaluate(&self, instance: &ProblemInstance, solution: &mut Solution) -> f64 {
        solution.calculate_cost(instance);
        self.score(instance, solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fleet, TimeWindow};

    #[test]
    fn test_distance_objective_is_cost() {
        let inst = ProblemInstance::new("o", Customer::depot(0.0, 0.0))
            .with_customer(Customer::new(1, 6.0, 8.0, 1));
        let mut sol = Solution::from_routes(0, &[vec![1]]);
        assert!((Objective::Distance.evaluate(&inst, &mut sol) - 20.0).abs() < 1e-10);
        assert!((sol.total_cost() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_penalized_time_term() {
        let inst = ProblemInstance::new("o", Customer::depot(0.0, 0.0))
            .with_customer(
                Customer::new(1, 10.0, 0.0, 1)
                    .with_time_window(TimeWindow::new(0.0, 5.0).expect("valid")),
            )
            .with_fleet(Fleet::homogeneous(1, 10));
        let mut sol = Solution::from_routes(0, &[vec![1]]);
        let obj = Objective::Penalized {
            capacity_weight: 1.0,
            time_weight: 1.0,
        };
        // 5 units late × 10
        assert!((obj.evaluate(&inst, &mut sol) - 70.0).abs() < 1e-10);
        assert!((sol.total_cost() - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_default_is_distance() {
        assert_eq!(Objective::default(), Objective::Distance);
    }
}
