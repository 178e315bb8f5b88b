//! Vehicle capacity constraint.

use super::ConstraintEvaluator;
use crate::models::{ProblemInstance, Solution, Violation, ViolationType};

/// Penalty charged per unit of overload.
const OVERLOAD_PENALTY: f64 = 1000.0;

/// Checks that no route carries more than its vehicle's capacity.
///
/// Route `i` is driven by vehicle `i`; routes beyond the fleet size use the
/// fleet's uniform capacity.
///
/// # Examples
///
/// ```
/// use u_vrp::evaluation::{CapacityEvaluator, ConstraintEvaluator};
/// use u_vrp::models::{Customer, Fleet, ProblemInstance, Solution};
///
/// let instance = ProblemInstance::new("cap", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 1.0, 0.0, 15))
///     .with_customer(Customer::new(2, 2.0, 0.0, 10))
///     .with_fleet(Fleet::homogeneous(1, 20));
///
/// let sol = Solution::from_routes(0, &[vec![1, 2]]);
/// let eval = CapacityEvaluator::new(&instance);
/// assert_eq!(eval.route_load(sol.route(0)), 25);
/// assert_eq!(eval.violations(&sol).len(), 1);
/// assert!((eval.load_penalty(&sol) - 5000.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CapacityEvaluator<'a> {
    instance: &'a ProblemInstance,
}

impl<'a> CapacityEvaluator<'a> {
    /// Creates an evaluator over `instance`.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self { instance }
    }

    /// Summed demand of the non-depot nodes of `route`.
    pub fn route_load(&self, route: &[usize]) -> i32 {
        let depot = self.instance.depot();
        route
            .iter()
            .filter(|&&n| n != depot)
            .map(|&n| self.instance.demand(n))
            .sum()
    }

    /// Capacity of the vehicle driving route `route_index`.
    pub fn vehicle_capacity(&self, route_index: usize) -> i32 {
        self.instance.fleet().capacity_of(route_index)
    }

    /// Overload × 1000, summed over routes.
    pub fn load_penalty(&self, solution: &Solution) -> f64 {
        solution
            .routes()
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let over = self.route_load(r) - self.vehicle_capacity(i);
                f64::from(over.max(0)) * OVERLOAD_PENALTY
            })
            .sum()
    }
}

impl ConstraintEvaluator for CapacityEvaluator<'_> {
    fn name(&self) -> &'static str {
        "capacity"
    }

    fn violations(&self, solution: &Solution) -> Vec<Violation> {
        solution
            .routes()
            .iter()
            .enumerate()
            .filter_map(|(route_index, r)| {
                let load = self.route_load(r);
                let capacity = self.vehicle_capacity(route_index);
                (load > capacity).then(|| {
                    Violation::new(ViolationType::CapacityExceeded {
                        route_index,
                        load,
                        capacity,
                    })
                })
            })
            .collect()
    }

    fn penalty(&self, solution: &Solution) -> f64 {
        self.load_penalty(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fleet};

    fn setup() -> ProblemInstance {
        ProblemInstance::new("cap", Customer::depot(0.0, 0.0))
            .with_customer(Customer::new(1, 1.0, 0.0, 10))
            .with_customer(Customer::new(2, 2.0, 0.0, 15))
            .with_customer(Customer::new(3, 3.0, 0.0, 20))
            .with_fleet(Fleet::from_capacities(vec![30, 15]))
    }

    #[test]
    fn test_route_load_skips_depot() {
        let inst = setup();
        let eval = CapacityEvaluator::new(&inst);
        assert_eq!(eval.route_load(&[0, 1, 2, 0]), 25);
        assert_eq!(eval.route_load(&[0, 0]), 0);
    }

    #[test]
    fn test_per_vehicle_capacity() {
        let inst = setup();
        let eval = CapacityEvaluator::new(&inst);
        // route 0 (cap 30) carries 25, route 1 (cap 15) carries 20
        let sol = Solution::from_routes(0, &[vec![1, 2], vec![3]]);
        let v = eval.violations(&sol);
        assert_eq!(v.len(), 1);
        assert_eq!(
            v[0].kind,
            ViolationType::CapacityExceeded {
                route_index: 1,
                load: 20,
                capacity: 15
            }
        );
        assert!((eval.penalty(&sol) - 5000.0).abs() < 1e-10);
    }

    #[test]
    fn test_extra_route_uses_uniform_capacity() {
        let inst = setup();
        let eval = CapacityEvaluator::new(&inst);
        assert_eq!(eval.vehicle_capacity(5), 15);
        let sol = Solution::from_routes(0, &[vec![1], vec![2], vec![3]]);
        assert_eq!(eval.violations(&sol).len(), 1);
    }

    #[test]
    fn test_feasible() {
        let inst = setup();
        let eval = CapacityEvaluator::new(&inst);
        let sol = Solution::from_routes(0, &[vec![3, 1], vec![2]]);
        assert!(eval.is_feasible(&sol));
        assert_eq!(eval.load_penalty(&sol), 0.0);
    }
}
