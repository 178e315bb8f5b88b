//! Domain model types for vehicle routing problems.
//!
//! Provides the core abstractions: customers with demands and time windows,
//! a fleet of capacitated (optionally typed) vehicles, the problem instance
//! with its distance oracle, and solutions whose routes live in a single
//! [`RouteArena`].

mod customer;
mod problem;
mod route;
mod solution;
mod vehicle;

pub use customer::{Customer, TimeWindow};
pub use problem::ProblemInstance;
pub use route::{RouteArena, Visit};
pub use solution::{Solution, SolutionView, Violation, ViolationType};
pub use vehicle::{Fleet, Vehicle, VehicleType};
