//! Solution and violation types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ProblemInstance, RouteArena, VehicleType};
use crate::evaluation::{
    CapacityEvaluator, ConstraintEvaluator, FleetEvaluator, TimeWindowEvaluator,
};

/// A type of constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Route load exceeds its vehicle's capacity.
    CapacityExceeded {
        /// Route index in the solution.
        route_index: usize,
        /// Summed demand on the route.
        load: i32,
        /// Vehicle capacity.
        capacity: i32,
    },
    /// Arrival after the customer's window closed.
    LateArrival {
        /// Route index.
        route_index: usize,
        /// Customer where it happened.
        customer_id: usize,
        /// Actual arrival time.
        arrival: f64,
        /// Window close.
        latest: f64,
    },
    /// Arrival before the window opens when waiting is not allowed.
    EarlyArrival {
        /// Route index.
        route_index: usize,
        /// Customer where it happened.
        customer_id: usize,
        /// Actual arrival time.
        arrival: f64,
        /// Window open.
        earliest: f64,
    },
    /// Arrival so early that the wait exceeds the tolerance.
    ExcessiveWaiting {
        /// Route index.
        route_index: usize,
        /// Customer where it happened.
        customer_id: usize,
        /// Required wait.
        waiting: f64,
        /// Allowed wait.
        max_waiting: f64,
    },
    /// Customer served by a vehicle type it does not accept.
    IncompatibleVehicle {
        /// Route index.
        route_index: usize,
        /// Customer where it happened.
        customer_id: usize,
        /// Type of the route's vehicle.
        vehicle_type: VehicleType,
    },
    /// Route load exceeds the capacity of its vehicle type.
    TypeCapacityExceeded {
        /// Route index.
        route_index: usize,
        /// Type of the route's vehicle.
        vehicle_type: VehicleType,
        /// Summed demand on the route.
        load: i32,
        /// Type capacity.
        capacity: i32,
    },
    /// Customer appears more than once.
    DuplicateCustomer {
        /// Repeated customer.
        customer_id: usize,
    },
    /// Customers not served by any route.
    UnservedCustomers {
        /// Missing customers, ascending.
        customers: Vec<usize>,
    },
    /// A route references a node id the instance does not have.
    UnknownNode {
        /// Route index.
        route_index: usize,
        /// Offending id.
        node: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationType::CapacityExceeded {
                route_index,
                load,
                capacity,
            } => write!(
                f,
                "Route {route_index}: Load {load} exceeds capacity {capacity}"
            ),
            ViolationType::LateArrival {
                route_index,
                customer_id,
                arrival,
                latest,
            } => write!(
                f,
                "Route {route_index}: Late arrival at customer {customer_id} (arrival: {arrival:.1}, deadline: {latest})"
            ),
            ViolationType::EarlyArrival {
                route_index,
                customer_id,
                arrival,
                earliest,
            } => write!(
                f,
                "Route {route_index}: Early arrival at customer {customer_id} (arrival: {arrival:.1}, opens: {earliest})"
            ),
            ViolationType::ExcessiveWaiting {
                route_index,
                customer_id,
                waiting,
                max_waiting,
            } => write!(
                f,
                "Route {route_index}: Excessive waiting at customer {customer_id} (waiting: {waiting:.1} > {max_waiting})"
            ),
            ViolationType::IncompatibleVehicle {
                route_index,
                customer_id,
                vehicle_type,
            } => write!(
                f,
                "Route {route_index}: Customer {customer_id} cannot be served by vehicle type {vehicle_type}"
            ),
            ViolationType::TypeCapacityExceeded {
                route_index,
                vehicle_type,
                load,
                capacity,
            } => write!(
                f,
                "Route {route_index}: Load {load} exceeds {vehicle_type} capacity {capacity}"
            ),
            ViolationType::DuplicateCustomer { customer_id } => {
                write!(f, "Customer {customer_id} served multiple times")
            }
            ViolationType::UnservedCustomers { customers } => {
                write!(f, "Unserved customers: {customers:?}")
            }
            ViolationType::UnknownNode { route_index, node } => {
                write!(f, "Route {route_index}: Unknown node {node}")
            }
        }
    }
}

/// A candidate route plan.
///
/// Every route starts and ends at the depot. Cost, timing, load and
/// feasibility fields are caches: they are stale after any structural change
/// until [`calculate_cost`](Self::calculate_cost) or
/// [`check_feasibility`](Self::check_feasibility) recomputes them from the
/// routes.
///
/// # Examples
///
/// ```
/// use u_vrp::models::{Customer, Fleet, ProblemInstance, Solution};
///
/// let instance = ProblemInstance::new("demo", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 3.0, 4.0, 10))
///     .with_fleet(Fleet::homogeneous(1, 20));
///
/// let mut sol = Solution::new();
/// sol.add_route(instance.depot(), &[1]);
/// assert_eq!(sol.route(0), &[0, 1, 0]);
/// assert!((sol.calculate_cost(&instance) - 10.0).abs() < 1e-10);
/// assert!(sol.check_feasibility(&instance));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    routes: RouteArena,
    total_cost: f64,
    total_distance: f64,
    total_time: f64,
    route_loads: Vec<i32>,
    route_distances: Vec<f64>,
    route_times: Vec<f64>,
    feasible: bool,
    violations: Vec<Violation>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self {
            routes: RouteArena::new(),
            total_cost: 0.0,
            total_distance: 0.0,
            total_time: 0.0,
            route_loads: Vec::new(),
            route_distances: Vec::new(),
            route_times: Vec::new(),
            feasible: true,
            violations: Vec::new(),
        }
    }

    /// Builds a solution from plain node sequences, normalizing depot ends.
    pub fn from_routes<R: AsRef<[usize]>>(depot: usize, routes: &[R]) -> Self {
        let mut sol = Self::new();
        for r in routes {
            sol.add_route(depot, r.as_ref());
        }
        sol
    }

    /// Adds a route, prepending/appending the depot when missing.
    pub fn add_route(&mut self, depot: usize, route: &[usize]) {
        let mut nodes = Vec::with_capacity(route.len() + 2);
        if route.first() != Some(&depot) {
            nodes.push(depot);
        }
        nodes.extend_from_slice(route);
        if nodes.len() < 2 || nodes.last() != Some(&depot) {
            nodes.push(depot);
        }
        self.routes.push_route(&nodes);
    }

    /// All routes.
    pub fn routes(&self) -> &RouteArena {
        &self.routes
    }

    /// Mutable access for neighborhood moves.
    pub fn routes_mut(&mut self) -> &mut RouteArena {
        &mut self.routes
    }

    /// Nodes of route `r`, depot ends included.
    pub fn route(&self, r: usize) -> &[usize] {
        self.routes.route(r)
    }

    /// Number of routes.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of non-depot stops across all routes.
    pub fn num_customers_served(&self, depot: usize) -> usize {
        self.routes
            .iter()
            .map(|r| r.iter().filter(|&&n| n != depot).count())
            .sum()
    }

    /// Recomputes distance, time, load and cost from the routes.
    ///
    /// Travel time equals distance. Arrival before a window opens waits
    /// for it; service time is added at every customer. Cost is the total
    /// distance. Legs touching a node the instance does not have add
    /// nothing; [`check_feasibility`](Self::check_feasibility) reports them.
    pub fn calculate_cost(&mut self, instance: &ProblemInstance) -> f64 {
        let depot = instance.depot();
        self.route_loads.clear();
        self.route_distances.clear();
        self.route_times.clear();

        for route in self.routes.iter() {
            let mut distance = 0.0;
            let mut time = 0.0;
            let mut load = 0;
            for leg in route.windows(2) {
                let Some(d) = instance.try_distance(leg[0], leg[1]) else {
                    continue;
                };
                distance += d;
                time += d;
                let to = leg[1];
                if to != depot {
                    time += instance.waiting_time(to, time);
                    time += instance.service_time(to);
                    load += instance.demand(to);
                }
            }
            self.route_distances.push(distance);
            self.route_times.push(time);
            self.route_loads.push(load);
        }

        self.total_distance = self.route_distances.iter().sum();
        self.total_time = self.route_times.iter().sum();
        self.total_cost = self.total_distance;
        self.total_cost
    }

    /// Recomputes the violation list and feasibility flag.
    ///
    /// Combines capacity, time window (default tolerance) and fleet checks
    /// with coverage: every customer exactly once, no unknown nodes.
    pub fn check_feasibility(&mut self, instance: &ProblemInstance) -> bool {
        let mut violations = self.coverage_violations(instance);
        violations.extend(CapacityEvaluator::new(instance).violations(self));
        violations.extend(TimeWindowEvaluator::new(instance).violations(self));
        violations.extend(FleetEvaluator::new(instance).violations(self));
        self.feasible = violations.is_empty();
        self.violations = violations;
        self.feasible
    }

    /// Recomputes cost and feasibility, returning the cost.
    pub fn evaluate(&mut self, instance: &ProblemInstance) -> f64 {
        self.check_feasibility(instance);
        self.calculate_cost(instance)
    }

    fn coverage_violations(&self, instance: &ProblemInstance) -> Vec<Violation> {
        let depot = instance.depot();
        let n = instance.customers().len();
        let mut violations = Vec::new();
        let mut served = vec![false; n];

        for (route_index, route) in self.routes.iter().enumerate() {
            let depot_bounded =
                route.len() >= 2 && route.first() == Some(&depot) && route.last() == Some(&depot);
            if !depot_bounded {
                log::error!("route {route_index} is not closed at depot {depot}: {route:?}");
                debug_assert!(depot_bounded, "route {route_index} is not closed at the depot");
            }
            for &node in route {
                if node == depot {
                    continue;
                }
                if node >= n {
                    violations.push(Violation::new(ViolationType::UnknownNode {
                        route_index,
                        node,
                    }));
                } else if served[node] {
                    violations.push(Violation::new(ViolationType::DuplicateCustomer {
                        customer_id: node,
                    }));
                } else {
                    served[node] = true;
                }
            }
        }

        let unserved: Vec<usize> = instance.customer_ids().filter(|&c| !served[c]).collect();
        if !unserved.is_empty() {
            violations.push(Violation::new(ViolationType::UnservedCustomers {
                customers: unserved,
            }));
        }
        violations
    }

    /// Route index serving `customer`, if any.
    pub fn customer_route(&self, customer: usize) -> Option<usize> {
        self.routes.iter().position(|r| r.contains(&customer))
    }

    /// Removes the first occurrence of `customer`. Returns `false` if absent.
    pub fn remove_customer(&mut self, customer: usize) -> bool {
        let Some(r) = self.customer_route(customer) else {
            return false;
        };
        let Some(pos) = self.routes.route(r).iter().position(|&n| n == customer) else {
            return false;
        };
        self.routes.remove(r, pos);
        true
    }

    /// Inserts `customer` into route `r`, clamping `pos` away from the depot
    /// slots. Out-of-range routes are ignored.
    pub fn insert_customer(&mut self, customer: usize, r: usize, pos: usize) {
        if r >= self.routes.len() {
            return;
        }
        let len = self.routes.route(r).len();
        let pos = pos.clamp(1, len.saturating_sub(1).max(1));
        self.routes.insert(r, pos, customer);
    }

    /// Cached total cost.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Cached total distance.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Cached total route time.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Cached per-route loads.
    pub fn route_loads(&self) -> &[i32] {
        &self.route_loads
    }

    /// Cached per-route distances.
    pub fn route_distances(&self) -> &[f64] {
        &self.route_distances
    }

    /// Cached per-route times.
    pub fn route_times(&self) -> &[f64] {
        &self.route_times
    }

    /// Cached feasibility flag.
    pub fn is_feasible(&self) -> bool {
        self.feasible
    }

    /// Cached violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Snapshot for persistence and visualization.
    pub fn to_view(&self) -> SolutionView {
        SolutionView {
            routes: self.routes.to_vecs(),
            total_cost: self.total_cost,
            total_distance: self.total_distance,
            total_time: self.total_time,
            feasible: self.feasible,
            violations: self.violations.iter().map(ToString::to_string).collect(),
            vehicle_loads: self.route_loads.clone(),
            route_distances: self.route_distances.clone(),
            route_times: self.route_times.clone(),
        }
    }

    /// Distinct customers served.
    pub fn served_set(&self, depot: usize) -> BTreeSet<usize> {
        self.routes
            .iter()
            .flat_map(|r| r.iter().copied())
            .filter(|&n| n != depot)
            .collect()
    }
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VRP Solution: {} routes", self.num_routes())?;
        writeln!(f, "Total Cost: {:.2}", self.total_cost)?;
        writeln!(f, "Total Distance: {:.2}", self.total_distance)?;
        writeln!(f, "Feasible: {}", self.feasible)?;
        for (i, route) in self.routes.iter().enumerate() {
            let stops: Vec<String> = route.iter().map(ToString::to_string).collect();
            writeln!(f, "Route {i}: {}", stops.join(" -> "))?;
        }
        if !self.violations.is_empty() {
            let msgs: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
            writeln!(f, "Violations: {}", msgs.join(", "))?;
        }
        Ok(())
    }
}

/// Serializable snapshot of a [`Solution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionView {
    /// Routes with depot ends.
    pub routes: Vec<Vec<usize>>,
    /// Total cost.
    pub total_cost: f64,
    /// Total distance.
    pub total_distance: f64,
    /// Total route time.
    pub total_time: f64,
    /// Feasibility flag.
    pub feasible: bool,
    /// Human-readable violations.
    pub violations: Vec<String>,
    /// Per-route loads.
    pub vehicle_loads: Vec<i32>,
    /// Per-route distances.
    pub route_distances: Vec<f64>,
    /// Per-route times.
    pub route_times: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Customer, Fleet, TimeWindow};

    fn setup() -> ProblemInstance {
        ProblemInstance::new("t", Customer::depot(0.0, 0.0))
            .with_customer(Customer::new(1, 1.0, 0.0, 10))
            .with_customer(Customer::new(2, 2.0, 0.0, 10))
            .with_customer(Customer::new(3, 3.0, 0.0, 10))
            .with_fleet(Fleet::homogeneous(2, 30))
            .with_euclidean_matrix()
    }

    #[test]
    fn test_add_route_normalizes_depot() {
        let mut sol = Solution::new();
        sol.add_route(0, &[1, 2]);
        sol.add_route(0, &[0, 3]);
        sol.add_route(0, &[]);
        assert_eq!(sol.route(0), &[0, 1, 2, 0]);
        assert_eq!(sol.route(1), &[0, 3, 0]);
        assert_eq!(sol.route(2), &[0, 0]);
    }

    #[test]
    fn test_calculate_cost_line() {
        let inst = setup();
        let mut sol = Solution::from_routes(0, &[vec![1, 2, 3]]);
        // 0→1→2→3→0 = 1+1+1+3
        assert!((sol.calculate_cost(&inst) - 6.0).abs() < 1e-10);
        assert_eq!(sol.route_loads(), &[30]);
        assert!((sol.total_time() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_calculate_cost_idempotent() {
        let inst = setup();
        let mut sol = Solution::from_routes(0, &[vec![1], vec![3, 2]]);
        let a = sol.calculate_cost(&inst);
        let b = sol.calculate_cost(&inst);
        assert_eq!(a, b);
        assert_eq!(sol.route_distances().len(), 2);
    }

    #[test]
    fn test_time_includes_waiting_and_service() {
        let inst = ProblemInstance::new("tw", Customer::depot(0.0, 0.0))
            .with_customer(
                Customer::new(1, 5.0, 0.0, 1)
                    .with_service_time(2.0)
                    .with_time_window(TimeWindow::new(10.0, 50.0).expect("valid")),
            )
            .with_fleet(Fleet::homogeneous(1, 10));
        let mut sol = Solution::from_routes(0, &[vec![1]]);
        sol.calculate_cost(&inst);
        // arrive 5, wait to 10, serve to 12, return at 17
        assert!((sol.total_time() - 17.0).abs() < 1e-10);
        assert!((sol.total_cost() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_feasible_solution() {
        let inst = setup();
        let mut sol = Solution::from_routes(0, &[vec![1, 2, 3]]);
        assert!(sol.check_feasibility(&inst));
        assert!(sol.violations().is_empty());
    }

    #[test]
    fn test_capacity_and_coverage_flagged() {
        let inst = setup().with_fleet(Fleet::homogeneous(1, 15));
        let mut sol = Solution::from_routes(0, &[vec![1, 2, 2]]);
        assert!(!sol.check_feasibility(&inst));
        let kinds: Vec<_> = sol.violations().iter().map(|v| &v.kind).collect();
        assert!(kinds
            .iter()
            .any(|k| matches!(k, ViolationType::DuplicateCustomer { customer_id: 2 })));
        assert!(kinds.iter().any(|k| matches!(
            k,
            ViolationType::UnservedCustomers { customers } if customers == &vec![3]
        )));
        assert!(kinds
            .iter()
            .any(|k| matches!(k, ViolationType::CapacityExceeded { load: 30, .. })));
    }

    #[test]
    fn test_unknown_node_flagged() {
        let inst = setup();
        let mut sol = Solution::from_routes(0, &[vec![1, 2, 3, 9]]);
        assert!(!sol.check_feasibility(&inst));
        assert!(matches!(
            sol.violations()[0].kind,
            ViolationType::UnknownNode { node: 9, .. }
        ));
    }

    #[test]
    fn test_unknown_node_without_matrix() {
        let inst = ProblemInstance::new("pair", Customer::depot(0.0, 0.0))
            .with_customer(Customer::new(1, 3.0, 4.0, 5));
        let mut sol = Solution::from_routes(0, &[vec![1, 9]]);

        assert!(!sol.check_feasibility(&inst));
        assert_eq!(sol.violations().len(), 1);
        assert!(matches!(
            sol.violations()[0].kind,
            ViolationType::UnknownNode {
                route_index: 0,
                node: 9
            }
        ));
        // only 0→1 is a known leg
        assert!((sol.calculate_cost(&inst) - 5.0).abs() < 1e-10);
        assert_eq!(sol.route_loads(), &[5]);
    }

    #[test]
    fn test_remove_and_insert_customer() {
        let mut sol = Solution::from_routes(0, &[vec![1, 2], vec![3]]);
        assert_eq!(sol.customer_route(3), Some(1));
        assert!(sol.remove_customer(2));
        assert!(!sol.remove_customer(2));
        sol.insert_customer(2, 1, 0);
        assert_eq!(sol.route(1), &[0, 2, 3, 0]);
        sol.insert_customer(4, 0, 99);
        assert_eq!(sol.route(0), &[0, 1, 4, 0]);
    }

    #[test]
    fn test_view_and_display() {
        let inst = setup();
        let mut sol = Solution::from_routes(0, &[vec![1, 2, 3]]);
        sol.evaluate(&inst);
        let view = sol.to_view();
        assert_eq!(view.routes, vec![vec![0, 1, 2, 3, 0]]);
        assert!(view.feasible);
        let text = sol.to_string();
        assert!(text.contains("Route 0: 0 -> 1 -> 2 -> 3 -> 0"));
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::new(ViolationType::CapacityExceeded {
            route_index: 2,
            load: 25,
            capacity: 20,
        });
        assert_eq!(v.to_string(), "Route 2: Load 25 exceeds capacity 20");
    }
}
