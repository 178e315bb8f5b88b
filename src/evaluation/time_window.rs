//! Time window constraint.
//!
//! # Algorithm
//!
//! Walks each route from time 0 at the depot, adding travel time (equal to
//! distance) per leg. At a customer with a window `[e, l]`:
//!
//! - arrival `> l` is a late arrival (hard violation);
//! - arrival `< e` waits until `e` when waiting is allowed and the wait is
//!   within the tolerance, otherwise it is a violation and no wait happens;
//! - service time is then added.
//!
//! Legs touching a node the instance does not have are skipped; coverage
//! checks report such nodes.
//!
//! # Complexity
//!
//! O(n) per solution, n = total number of route stops.

use super::ConstraintEvaluator;
use crate::models::{ProblemInstance, Solution, Violation, ViolationType, Visit};

const WAIT_COST: f64 = 0.5;
const EARLY_COST: f64 = 2.0;
const LATE_COST: f64 = 10.0;

/// Detailed timing of one route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSchedule {
    /// One entry per stop after the starting depot.
    pub visits: Vec<Visit>,
    /// Time the vehicle is back at the depot.
    pub total_time: f64,
    /// Summed waiting.
    pub waiting_time: f64,
    /// Summed service.
    pub service_time: f64,
    /// Window violations found along the route.
    pub violations: Vec<Violation>,
}

/// Checks arrival times against customer time windows.
///
/// # Examples
///
/// ```
/// use u_vrp::evaluation::{ConstraintEvaluator, TimeWindowEvaluator};
/// use u_vrp::models::{Customer, ProblemInstance, Solution, TimeWindow};
///
/// let instance = ProblemInstance::new("tw", Customer::depot(0.0, 0.0))
///     .with_customer(
///         Customer::new(1, 10.0, 0.0, 1).with_time_window(TimeWindow::new(0.0, 5.0).unwrap()),
///     );
///
/// let sol = Solution::from_routes(0, &[vec![1]]);
/// let eval = TimeWindowEvaluator::new(&instance);
/// assert_eq!(eval.violations(&sol).len(), 1); // arrives at 10 > 5
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowEvaluator<'a> {
    instance: &'a ProblemInstance,
    allow_waiting: bool,
    max_waiting_time: f64,
}

impl<'a> TimeWindowEvaluator<'a> {
    /// Creates an evaluator that allows waiting up to 60 time units.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            allow_waiting: true,
            max_waiting_time: 60.0,
        }
    }

    /// Sets whether early arrivals may wait for the window to open.
    pub fn with_allow_waiting(mut self, allow: bool) -> Self {
        self.allow_waiting = allow;
        self
    }

    /// Sets the longest acceptable wait.
    pub fn with_max_waiting_time(mut self, max: f64) -> Self {
        self.max_waiting_time = max;
        self
    }

    /// Whether early arrivals may wait.
    pub fn allow_waiting(&self) -> bool {
        self.allow_waiting
    }

    /// Longest acceptable wait.
    pub fn max_waiting_time(&self) -> f64 {
        self.max_waiting_time
    }

    fn route_violations(&self, route_index: usize, route: &[usize], out: &mut Vec<Violation>) {
        let depot = self.instance.depot();
        let mut time = 0.0;
        for leg in route.windows(2) {
            let to = leg[1];
            let Some(travel) = self.instance.try_distance(leg[0], to) else {
                continue;
            };
            time += travel;
            if to == depot {
                continue;
            }
            if let Some(tw) = self.instance.customer(to).and_then(|c| c.time_window()) {
                if tw.is_late(time) {
                    out.push(Violation::new(ViolationType::LateArrival {
                        route_index,
                        customer_id: to,
                        arrival: time,
                        latest: tw.latest(),
                    }));
                } else if time < tw.earliest() {
                    let waiting = tw.earliest() - time;
                    if !self.allow_waiting {
                        out.push(Violation::new(ViolationType::EarlyArrival {
                            route_index,
                            customer_id: to,
                            arrival: time,
                            earliest: tw.earliest(),
                        }));
                    } else if waiting > self.max_waiting_time {
                        out.push(Violation::new(ViolationType::ExcessiveWaiting {
                            route_index,
                            customer_id: to,
                            waiting,
                            max_waiting: self.max_waiting_time,
                        }));
                    } else {
                        time = tw.earliest();
                    }
                }
            }
            time += self.instance.service_time(to);
        }
    }

    /// Soft time cost: travel + service + 0.5 per unit waited, 2.0 per unit
    /// early when the wait is not acceptable, 10.0 per unit late.
    pub fn time_cost(&self, solution: &Solution) -> f64 {
        solution.routes().iter().map(|r| self.route_time_cost(r)).sum()
    }

    fn route_time_cost(&self, route: &[usize]) -> f64 {
        let depot = self.instance.depot();
        let mut time = 0.0;
        let mut cost = 0.0;
        for leg in route.windows(2) {
            let to = leg[1];
            let Some(travel) = self.instance.try_distance(leg[0], to) else {
                continue;
            };
            time += travel;
            cost += travel;
            if to == depot {
                continue;
            }
            if let Some(tw) = self.instance.customer(to).and_then(|c| c.time_window()) {
                if time < tw.earliest() {
                    let waiting = tw.earliest() - time;
                    if self.allow_waiting && waiting <= self.max_waiting_time {
                        time = tw.earliest();
                        cost += waiting * WAIT_COST;
                    } else {
                        cost += waiting * EARLY_COST;
                    }
                } else if tw.is_late(time) {
                    cost += (time - tw.latest()) * LATE_COST;
                }
            }
            let service = self.instance.service_time(to);
            time += service;
            cost += service;
        }
        cost
    }

    /// Stop-by-stop schedule of one route.
    ///
    /// Service at an early customer always starts when the window opens;
    /// unacceptable waits are still reported as violations.
    pub fn route_schedule(&self, route_index: usize, route: &[usize]) -> RouteSchedule {
        let depot = self.instance.depot();
        let mut schedule = RouteSchedule {
            visits: Vec::with_capacity(route.len().saturating_sub(1)),
            total_time: 0.0,
            waiting_time: 0.0,
            service_time: 0.0,
            violations: Vec::new(),
        };
        let mut time = 0.0;

        for leg in route.windows(2) {
            let to = leg[1];
            let Some(travel) = self.instance.try_distance(leg[0], to) else {
                continue;
            };
            let arrival = time + travel;
            let mut visit = Visit {
                node: to,
                arrival_time: arrival,
                waiting_time: 0.0,
                service_start: arrival,
                departure_time: arrival,
            };

            if to != depot {
                if let Some(tw) = self.instance.customer(to).and_then(|c| c.time_window()) {
                    if arrival < tw.earliest() {
                        let waiting = tw.earliest() - arrival;
                        visit.waiting_time = waiting;
                        visit.service_start = tw.earliest();
                        schedule.waiting_time += waiting;
                        if !self.allow_waiting {
                            schedule.violations.push(Violation::new(ViolationType::EarlyArrival {
                                route_index,
                                customer_id: to,
                                arrival,
                                earliest: tw.earliest(),
                            }));
                        } else if waiting > self.max_waiting_time {
                            schedule
                                .violations
                                .push(Violation::new(ViolationType::ExcessiveWaiting {
                                    route_index,
                                    customer_id: to,
                                    waiting,
                                    max_waiting: self.max_waiting_time,
                                }));
                        }
                    } else if tw.is_late(arrival) {
                        schedule.violations.push(Violation::new(ViolationType::LateArrival {
                            route_index,
                            customer_id: to,
                            arrival,
                            latest: tw.latest(),
                        }));
                    }
                }
                let service = self.instance.service_time(to);
                visit.departure_time = visit.service_start + service;
                schedule.service_time += service;
            }

            time = visit.departure_time;
            schedule.visits.push(visit);
        }

        schedule.total_time = time;
        schedule
    }
}

impl ConstraintEvaluator for TimeWindowEvaluator<'_> {
    fn name(&self) -> &'static str {
        "time_window"
    }

    fn violations(&self, solution: &Solution) -> Vec<Violation> {
        let mut out = Vec::new();
        for (i, route) in solution.routes().iter().enumerate() {
            self.route_violations(i, route, &mut out);
        }
        out
    }

    fn penalty(&self, solution: &Solution) -> f64 {
        self.time_cost(solution)
    }
}
