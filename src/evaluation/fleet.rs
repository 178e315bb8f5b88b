//! Heterogeneous fleet constraint.

use std::collections::{BTreeMap, BTreeSet};

use super::ConstraintEvaluator;
use crate::models::{ProblemInstance, Solution, VehicleType, Violation, ViolationType};

/// Checks vehicle-type compatibility and per-type capacity.
///
/// Route `i` is driven by vehicle `i`. Routes whose vehicle has no type are
/// not checked. A customer's allowed types come from
/// [`Customer::allowed_vehicle_types`](crate::models::Customer::allowed_vehicle_types).
/// Per-type capacity is checked only for types registered with
/// [`with_type_capacity`](Self::with_type_capacity).
///
/// # Examples
///
/// ```
/// use u_vrp::evaluation::{ConstraintEvaluator, FleetEvaluator};
/// use u_vrp::models::{Customer, Fleet, ProblemInstance, Solution, VehicleType};
///
/// let instance = ProblemInstance::new("fleet", Customer::depot(0.0, 0.0))
///     .with_customer(
///         Customer::new(1, 1.0, 0.0, 10).with_allowed_vehicle_types([VehicleType::Large]),
///     )
///     .with_fleet(Fleet::homogeneous(1, 50).with_vehicle_type(0, VehicleType::Small));
///
/// let sol = Solution::from_routes(0, &[vec![1]]);
/// let eval = FleetEvaluator::new(&instance);
/// assert_eq!(eval.violations(&sol).len(), 1);
/// assert!((eval.fleet_cost(&sol) - 100.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct FleetEvaluator<'a> {
    instance: &'a ProblemInstance,
    type_capacities: BTreeMap<VehicleType, i32>,
}

impl<'a> FleetEvaluator<'a> {
    /// Creates an evaluator with no per-type capacities.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            type_capacities: BTreeMap::new(),
        }
    }

    /// Registers the capacity limit of a vehicle type.
    pub fn with_type_capacity(mut self, vehicle_type: VehicleType, capacity: i32) -> Self {
        self.type_capacities.insert(vehicle_type, capacity);
        self
    }

    /// Indices of typed vehicles allowed to serve `customer`.
    pub fn compatible_vehicles(&self, customer: usize) -> BTreeSet<usize> {
        let allowed = self
            .instance
            .customer(customer)
            .and_then(|c| c.allowed_vehicle_types());
        self.instance
            .fleet()
            .vehicles()
            .iter()
            .enumerate()
            .filter_map(|(i, v)| {
                let ty = v.vehicle_type()?;
                allowed.is_none_or(|set| set.contains(&ty)).then_some(i)
            })
            .collect()
    }

    /// Fixed usage cost of every route that serves at least one customer.
    ///
    /// Untyped vehicles are charged as [`VehicleType::Medium`].
    pub fn fleet_cost(&self, solution: &Solution) -> f64 {
        let fleet = self.instance.fleet();
        solution
            .routes()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.len() > 2)
            .map(|(i, _)| {
                fleet
                    .type_of(i)
                    .unwrap_or(VehicleType::Medium)
                    .usage_cost()
            })
            .sum()
    }
}

impl ConstraintEvaluator for FleetEvaluator<'_> {
    fn name(&self) -> &'static str {
        "fleet"
    }

    fn violations(&self, solution: &Solution) -> Vec<Violation> {
        let depot = self.instance.depot();
        let fleet = self.instance.fleet();
        let mut out = Vec::new();

        for (route_index, route) in solution.routes().iter().enumerate() {
            let Some(vehicle_type) = fleet.type_of(route_index) else {
                continue;
            };

            let mut load = 0;
            for &node in route.iter().filter(|&&n| n != depot) {
                load += self.instance.demand(node);
                let allowed = self
                    .instance
                    .customer(node)
                    .and_then(|c| c.allowed_vehicle_types());
                if allowed.is_some_and(|set| !set.contains(&vehicle_type)) {
                    out.push(Violation::new(ViolationType::IncompatibleVehicle {
                        route_index,
                        customer_id: node,
                        vehicle_type,
                    }));
                }
            }

            if let Some(&capacity) = self.type_capacities.get(&vehicle_type) {
                if load > capacity {
                    out.push(Violation::new(ViolationType::TypeCapacityExceeded {
                        route_index,
                        vehicle_type,
                        load,
                        capacity,
                    }));
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fleet};

    fn setup() -> ProblemInstance {
        let fleet = Fleet::homogeneous(3, 100)
            .with_vehicle_type(0, VehicleType::Small)
            .with_vehicle_type(1, VehicleType::Large);
        ProblemInstance::new("fleet", Customer::depot(0.0, 0.0))
            .with_customer(
                Customer::new(1, 1.0, 0.0, 40)
                    .with_allowed_vehicle_types([VehicleType::Large, VehicleType::Medium]),
            )
            .with_customer(Customer::new(2, 2.0, 0.0, 30))
            .with_fleet(fleet)
    }

    #[test]
    fn test_incompatible_type() {
        let inst = setup();
        let eval = FleetEvaluator::new(&inst);
        let bad = Solution::from_routes(0, &[vec![1], vec![2]]);
        let v = eval.violations(&bad);
        assert_eq!(v.len(), 1);
        assert!(matches!(
            v[0].kind,
            ViolationType::IncompatibleVehicle {
                route_index: 0,
                customer_id: 1,
                vehicle_type: VehicleType::Small
            }
        ));
        let good = Solution::from_routes(0, &[vec![2], vec![1]]);
        assert!(eval.is_feasible(&good));
    }

    #[test]
    fn test_untyped_route_skipped() {
        let inst = setup();
        let eval = FleetEvaluator::new(&inst);
        let sol = Solution::from_routes(0, &[vec![], vec![], vec![1, 2]]);
        assert!(eval.violations(&sol).is_empty());
    }

    #[test]
    fn test_type_capacity() {
        let inst = setup();
        let eval = FleetEvaluator::new(&inst).with_type_capacity(VehicleType::Small, 20);
        let sol = Solution::from_routes(0, &[vec![2], vec![1]]);
        let v = eval.violations(&sol);
        assert_eq!(v.len(), 1);
        assert!(matches!(
            v[0].kind,
            ViolationType::TypeCapacityExceeded { load: 30, capacity: 20, .. }
        ));
    }

    #[test]
    fn test_compatible_vehicles() {
        let inst = setup();
        let eval = FleetEvaluator::new(&inst);
        assert_eq!(eval.compatible_vehicles(1), BTreeSet::from([1]));
        assert_eq!(eval.compatible_vehicles(2), BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_fleet_cost() {
        let inst = setup();
        let eval = FleetEvaluator::new(&inst);
        // small(100) + empty large (free) + untyped as medium(150)
        let sol = Solution::from_routes(0, &[vec![2], vec![], vec![1]]);
        assert!((eval.fleet_cost(&sol) - 250.0).abs() < 1e-10);
    }
}
