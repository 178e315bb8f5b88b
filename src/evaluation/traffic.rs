//! Time-dependent traffic model.
//!
//! # Algorithm
//!
//! Travel time for a leg departing at time `t` is the base distance scaled
//! by the multiplier of hour `⌊t⌋ mod 24`. Route timing simulates a route
//! leg by leg from a chosen departure, re-reading the multiplier at each
//! departure. The best departure is a brute-force scan over every second
//! hour of the day.
//!
//! # Complexity
//!
//! Route timing is O(n); best departure is O(12·n) per route.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::models::{ProblemInstance, Solution};

/// Hours in the traffic day.
pub const HOURS_PER_DAY: usize = 24;

/// Urban diurnal pattern: light at night, peaks at 8:00 and 18:00.
const DEFAULT_FACTORS: [f64; HOURS_PER_DAY] = [
    0.8, 0.8, 0.8, 0.8, 0.8, 0.9, // 0-5
    1.0, 1.4, 1.6, 1.3, // 6-9
    1.1, 1.0, 1.2, 1.1, // 10-13
    1.0, 1.0, 1.1, // 14-16
    1.5, 1.7, 1.4, // 17-19
    1.2, 1.0, 0.9, 0.8, // 20-23
];

/// Timing of a route simulated under traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteTiming {
    /// Final time minus departure.
    pub total_time: f64,
    /// Time at each node, starting with the departure.
    pub arrival_times: Vec<f64>,
    /// Travel time of each leg.
    pub travel_times: Vec<f64>,
    /// Clock time when the route ends.
    pub final_time: f64,
}

/// Qualitative traffic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficCondition {
    /// Multiplier below 0.9.
    Light,
    /// Multiplier below 1.2.
    Normal,
    /// Multiplier below 1.5.
    Heavy,
    /// Anything heavier.
    VeryHeavy,
}

impl TrafficCondition {
    fn from_factor(factor: f64) -> Self {
        if factor < 0.9 {
            TrafficCondition::Light
        } else if factor < 1.2 {
            TrafficCondition::Normal
        } else if factor < 1.5 {
            TrafficCondition::Heavy
        } else {
            TrafficCondition::VeryHeavy
        }
    }
}

impl fmt::Display for TrafficCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrafficCondition::Light => "Light Traffic",
            TrafficCondition::Normal => "Normal Traffic",
            TrafficCondition::Heavy => "Heavy Traffic",
            TrafficCondition::VeryHeavy => "Very Heavy Traffic",
        };
        f.write_str(s)
    }
}

/// Traffic conditions for one hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficReport {
    /// Hour of day.
    pub hour: usize,
    /// Travel time multiplier.
    pub factor: f64,
    /// Qualitative level.
    pub condition: TrafficCondition,
    /// `true` when the multiplier is below 1.2.
    pub recommended: bool,
}

/// Hour-indexed travel time multipliers over an instance's base distances.
///
/// Advisory only: the solving loop costs solutions at hour 0.
///
/// # Examples
///
/// ```
/// use u_vrp::evaluation::TrafficModel;
/// use u_vrp::models::{Customer, ProblemInstance};
///
/// let instance = ProblemInstance::new("traffic", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 10.0, 0.0, 1));
///
/// let traffic = TrafficModel::new(&instance);
/// assert!((traffic.travel_time(0, 1, 8.5) - 16.0).abs() < 1e-10);
/// assert!((traffic.travel_time(0, 1, 26.0) - 8.0).abs() < 1e-10);
/// assert!(!traffic.traffic_report(18).recommended);
/// ```
#[derive(Debug, Clone)]
pub struct TrafficModel<'a> {
    instance: &'a ProblemInstance,
    factors: [f64; HOURS_PER_DAY],
}

impl<'a> TrafficModel<'a> {
    /// Creates a model with the default urban pattern.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self {
            instance,
            factors: DEFAULT_FACTORS,
        }
    }

    /// Replaces the whole multiplier table.
    pub fn with_factors(mut self, factors: [f64; HOURS_PER_DAY]) -> Self {
        self.factors = factors;
        self
    }

    /// Overrides the multiplier of one hour (taken mod 24).
    pub fn with_factor(mut self, hour: usize, factor: f64) -> Self {
        self.factors[hour % HOURS_PER_DAY] = factor;
        self
    }

    /// Multiplier for `hour` (taken mod 24).
    pub fn factor(&self, hour: usize) -> f64 {
        self.factors[hour % HOURS_PER_DAY]
    }

    fn hour_of(time: f64) -> usize {
        (time.floor() as i64).rem_euclid(HOURS_PER_DAY as i64) as usize
    }

    /// Travel time of a leg departing at `departure_time`.
    ///
    /// A leg touching an unknown node takes no time.
    pub fn travel_time(&self, from: usize, to: usize, departure_time: f64) -> f64 {
        self.instance
            .try_base_distance(from, to)
            .map_or(0.0, |d| d * self.factor(Self::hour_of(departure_time)))
    }

    /// Simulates `route` departing the depot at `start_time`.
    ///
    /// Service time is added at every non-depot stop.
    pub fn route_timing(&self, route: &[usize], start_time: f64) -> RouteTiming {
        if route.len() < 2 {
            return RouteTiming {
                total_time: 0.0,
                arrival_times: Vec::new(),
                travel_times: Vec::new(),
                final_time: start_time,
            };
        }
        let depot = self.instance.depot();
        let mut time = start_time;
        let mut arrival_times = Vec::with_capacity(route.len());
        let mut travel_times = Vec::with_capacity(route.len() - 1);
        arrival_times.push(time);

        for leg in route.windows(2) {
            let travel = self.travel_time(leg[0], leg[1], time);
            travel_times.push(travel);
            time += travel;
            if leg[1] != depot {
                time += self.instance.service_time(leg[1]);
            }
            arrival_times.push(time);
        }

        RouteTiming {
            total_time: time - start_time,
            arrival_times,
            travel_times,
            final_time: time,
        }
    }

    /// Best departure hour per route, scanning every second hour.
    ///
    /// Routes without customers get hour 0. Ties keep the earliest hour.
    pub fn best_departure_hours(&self, solution: &Solution) -> Vec<usize> {
        solution
            .routes()
            .iter()
            .map(|route| {
                if route.len() <= 2 {
                    return 0;
                }
                let mut best_hour = 0;
                let mut best_time = f64::INFINITY;
                for hour in (0..HOURS_PER_DAY).step_by(2) {
                    let t = self.route_timing(route, hour as f64).total_time;
                    if t < best_time {
                        best_time = t;
                        best_hour = hour;
                    }
                }
                best_hour
            })
            .collect()
    }

    /// Summed route duration under traffic. Routes without an entry in
    /// `departures` leave at hour 0.
    pub fn traffic_cost(&self, solution: &Solution, departures: &[usize]) -> f64 {
        solution
            .routes()
            .iter()
            .enumerate()
            .map(|(i, route)| {
                let start = departures.get(i).copied().unwrap_or(0) as f64;
                self.route_timing(route, start).total_time
            })
            .sum()
    }

    /// Conditions for `hour`.
    pub fn traffic_report(&self, hour: usize) -> TrafficReport {
        let factor = self.factor(hour);
        TrafficReport {
            hour,
            factor,
            condition: TrafficCondition::from_factor(factor),
            recommended: factor < 1.2,
        }
    }

    /// One scaled copy of the base matrix per hour, ready for
    /// [`ProblemInstance::with_hourly_matrices`].
    pub fn hourly_matrices(&self) -> Vec<DistanceMatrix> {
        let base = match self.instance.distance_matrix() {
            Some(m) => m.clone(),
            None => DistanceMatrix::from_customers(self.instance.customers()),
        };
        self.factors.iter().map(|&f| base.scaled(f)).collect()
    }
}
