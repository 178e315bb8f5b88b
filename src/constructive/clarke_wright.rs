//! Clarke-Wright savings algorithm.
//!
//! # Algorithm
//!
//! The savings algorithm (Clarke & Wright, 1964) starts with each customer
//! on its own route (depot → customer → depot). It then merges routes by
//! computing the "savings" of linking two customers directly:
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! Pairs are visited in decreasing order of savings (stable, so equal
//! savings keep ascending `(i, j)` order) and stop at the first
//! non-positive saving. Two routes merge when `i` and `j` are endpoints of
//! different routes and the combined load fits the fleet's uniform
//! capacity. The merged route is oriented so that `i` and `j` become
//! adjacent.
//!
//! # Complexity
//!
//! O(n² log n) where n = number of customers (dominated by sorting savings).
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use crate::models::{ProblemInstance, Solution};

/// A savings value for linking two customers.
#[derive(Debug)]
struct Saving {
    i: usize,
    j: usize,
    value: f64,
}

/// Constructs a solution using the Clarke-Wright savings algorithm.
///
/// Assumes a homogeneous fleet: every merge is checked against
/// [`Fleet::uniform_capacity`](crate::models::Fleet::uniform_capacity).
/// Heterogeneous fleets are only checked afterwards by the solution's
/// feasibility evaluation. The number of routes is not limited by the
/// fleet size. The returned solution has its cost and feasibility computed.
///
/// # Examples
///
/// ```
/// use u_vrp::constructive::clarke_wright_savings;
/// use u_vrp::models::{Customer, Fleet, ProblemInstance};
///
/// let instance = ProblemInstance::new("cw", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 1.0, 0.0, 10))
///     .with_customer(Customer::new(2, 2.0, 0.0, 10))
///     .with_customer(Customer::new(3, 3.0, 0.0, 10))
///     .with_fleet(Fleet::homogeneous(1, 30));
///
/// let solution = clarke_wright_savings(&instance);
/// assert_eq!(solution.num_routes(), 1);
/// assert!((solution.total_cost() - 6.0).abs() < 1e-10);
/// ```
pub fn clarke_wright_savings(instance: &ProblemInstance) -> Solution {
    let depot = instance.depot();
    let capacity = instance.fleet().uniform_capacity();
    if instance.fleet().is_heterogeneous() {
        log::warn!("savings: heterogeneous fleet, merging against uniform capacity {capacity}");
    }

    let customers: Vec<usize> = instance.customer_ids().collect();
    let n = instance.customers().len();

    let mut savings = Vec::with_capacity(customers.len() * customers.len().saturating_sub(1) / 2);
    for (a, &i) in customers.iter().enumerate() {
        for &j in &customers[a + 1..] {
            let value =
                instance.distance(depot, i) + instance.distance(depot, j) - instance.distance(i, j);
            savings.push(Saving { i, j, value });
        }
    }
    savings.sort_by(|a, b| b.value.total_cmp(&a.value));

    // route_of[customer] = route id; routes start as one per customer
    let mut route_of = vec![usize::MAX; n];
    let mut route_members: Vec<Vec<usize>> = Vec::with_capacity(customers.len());
    let mut route_load: Vec<i32> = Vec::with_capacity(customers.len());
    for (r, &c) in customers.iter().enumerate() {
        route_of[c] = r;
        route_members.push(vec![c]);
        route_load.push(instance.demand(c));
    }

    for saving in &savings {
        if saving.value <= 0.0 {
            break;
        }
        let (i, j) = (saving.i, saving.j);
        let (ri, rj) = (route_of[i], route_of[j]);
        if ri == rj {
            continue;
        }
        let combined_load = route_load[ri] + route_load[rj];
        if combined_load > capacity {
            continue;
        }

        let r1 = &route_members[ri];
        let r2 = &route_members[rj];
        let i_first = r1.first() == Some(&i);
        let i_last = r1.last() == Some(&i);
        let j_first = r2.first() == Some(&j);
        let j_last = r2.last() == Some(&j);
        if !(i_first || i_last) || !(j_first || j_last) {
            continue;
        }

        let merged: Vec<usize> = if i_first && j_first {
            r1.iter().rev().chain(r2).copied().collect()
        } else if i_first && j_last {
            r2.iter().chain(r1).copied().collect()
        } else if i_last && j_first {
            r1.iter().chain(r2).copied().collect()
        } else {
            r1.iter().chain(r2.iter().rev()).copied().collect()
        };
        log::trace!("savings: merge {i}-{j} ({:.3}), load {combined_load}", saving.value);

        for &c in &route_members[rj] {
            route_of[c] = ri;
        }
        route_members[ri] = merged;
        route_members[rj].clear();
        route_load[ri] = combined_load;
        route_load[rj] = 0;
    }

    let mut solution = Solution::new();
    for members in route_members.iter().filter(|m| !m.is_empty()) {
        solution.add_route(depot, members);
    }
    solution.evaluate(instance);
    log::debug!(
        "savings: {} routes, cost {:.2}, feasible {}",
        solution.num_routes(),
        solution.total_cost(),
        solution.is_feasible()
    );
    solution
}
