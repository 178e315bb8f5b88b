//! Greedy nearest-neighbor construction with capacity and time windows.
//!
//! # Algorithm
//!
//! Vehicles are filled one at a time. From the current position the route
//! extends to the nearest unvisited customer that fits the remaining
//! capacity and can be reached before its window closes, waiting for the
//! window to open if the wait is at most [`GREEDY_MAX_WAITING`]. When no
//! candidate fits, the route returns to the depot and the next vehicle
//! starts.
//!
//! Customers left over once every vehicle has a route get additional
//! routes at the fleet's uniform capacity. If even an empty vehicle cannot
//! take any of them, the lowest-id leftover is forced onto a route of its
//! own. Every customer is therefore assigned, and the result may be
//! infeasible.
//!
//! Candidates are scanned in ascending id order and only a strictly shorter
//! distance replaces the incumbent, so ties go to the lowest id.
//!
//! # Complexity
//!
//! O(n²) where n = number of customers.
//!
//! # Reference
//!
//! Solomon, M.M. (1987). "Algorithms for the Vehicle Routing and Scheduling
//! Problems with Time Window Constraints", *Operations Research* 35(2), 254-265.

use crate::models::{ProblemInstance, Solution};

/// Longest wait for a window to open that the greedy heuristic accepts.
pub const GREEDY_MAX_WAITING: f64 = 100.0;

/// Constructs a solution with the greedy nearest-neighbor heuristic.
///
/// Route `i` of the result is driven by vehicle `i`. A vehicle that cannot
/// take any remaining customer keeps an empty `[depot, depot]` route so
/// later routes stay aligned with their vehicles. The returned solution has
/// its cost and feasibility computed.
///
/// # Examples
///
/// ```
/// use u_vrp::constructive::greedy_nearest_neighbor;
/// use u_vrp::models::{Customer, Fleet, ProblemInstance};
///
/// let instance = ProblemInstance::new("greedy", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 1.0, 0.0, 10))
///     .with_customer(Customer::new(2, 2.0, 0.0, 10))
///     .with_customer(Customer::new(3, 3.0, 0.0, 10))
///     .with_fleet(Fleet::homogeneous(1, 30));
///
/// let solution = greedy_nearest_neighbor(&instance);
/// assert_eq!(solution.route(0), &[0, 1, 2, 3, 0]);
/// assert!(solution.is_feasible());
/// ```
pub fn greedy_nearest_neighbor(instance: &ProblemInstance) -> Solution {
    let depot = instance.depot();
    let mut unvisited: Vec<bool> = instance.customers().iter().map(|_| true).collect();
    if let Some(d) = unvisited.get_mut(depot) {
        *d = false;
    }
    let mut remaining = instance.num_customers();
    let mut solution = Solution::new();

    let fleet = instance.fleet();
    for vehicle in 0..fleet.vehicle_count() {
        if remaining == 0 {
            break;
        }
        let route = build_route(instance, &mut unvisited, fleet.capacity_of(vehicle));
        remaining -= route.len();
        solution.add_route(depot, &route);
    }

    while remaining > 0 {
        let capacity = fleet.capacity_of(solution.num_routes());
        let mut route = build_route(instance, &mut unvisited, capacity);
        if route.is_empty() {
            let Some(forced) = unvisited.iter().position(|&u| u) else {
                break;
            };
            log::warn!(
                "greedy: customer {forced} fits no vehicle, forcing it onto route {}",
                solution.num_routes()
            );
            unvisited[forced] = false;
            route.push(forced);
        }
        remaining -= route.len();
        solution.add_route(depot, &route);
    }

    solution.evaluate(instance);
    log::debug!(
        "greedy: {} routes, cost {:.2}, feasible {}",
        solution.num_routes(),
        solution.total_cost(),
        solution.is_feasible()
    );
    solution
}

/// Extends one route from the depot until nothing else fits.
///
/// Returns the customers in visiting order and marks them visited.
fn build_route(instance: &ProblemInstance, unvisited: &mut [bool], capacity: i32) -> Vec<usize> {
    let mut route = Vec::new();
    let mut current = instance.depot();
    let mut load = 0;
    let mut time = 0.0;

    loop {
        let mut best: Option<(usize, f64)> = None;

        for (c, _) in unvisited.iter().enumerate().filter(|&(_, &u)| u) {
            if load + instance.demand(c) > capacity {
                continue;
            }
            let d = instance.distance(current, c);
            let arrival = time + d;
            if let Some(tw) = instance.customer(c).and_then(|cust| cust.time_window()) {
                if tw.is_late(arrival) || tw.waiting_time(arrival) > GREEDY_MAX_WAITING {
                    continue;
                }
            }
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((c, d));
            }
        }

        let Some((next, d)) = best else {
            break;
        };
        unvisited[next] = false;
        route.push(next);
        time += d;
        time += instance.waiting_time(next, time);
        time += instance.service_time(next);
        load += instance.demand(next);
        current = next;
    }

    route
}
