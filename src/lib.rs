//! # u-vrp
//!
//! Vehicle routing with capacity, time windows, heterogeneous fleets and
//! hour-of-day traffic. Builds a starting plan with a construction
//! heuristic, improves it with Simulated Annealing or Tabu Search, and
//! reports constraint violations as data on the [`Solution`](models::Solution).
//!
//! ## Modules
//!
//! - [`models`]: problem instance, fleet, routes and solutions
//! - [`distance`]: dense distance matrix
//! - [`evaluation`]: capacity, time-window, fleet and traffic evaluators; objectives
//! - [`constructive`]: greedy nearest neighbor and Clarke-Wright savings
//! - [`neighborhood`]: swap, relocate, 2-opt and CROSS-exchange moves
//! - [`sa`]: Simulated Annealing driver
//! - [`tabu`]: Tabu Search driver
//! - [`solver`]: the [`solve`] entry point
//!
//! ## Example
//!
//! ```
//! use u_vrp::models::{Customer, Fleet, ProblemInstance};
//! use u_vrp::{solve, SolveOptions};
//!
//! let instance = ProblemInstance::new("quickstart", Customer::depot(0.0, 0.0))
//!     .with_customer(Customer::new(1, 10.0, 0.0, 8))
//!     .with_customer(Customer::new(2, 10.0, 10.0, 8))
//!     .with_customer(Customer::new(3, -5.0, 5.0, 8))
//!     .with_fleet(Fleet::homogeneous(2, 20));
//!
//! let options = SolveOptions::default().with_seed(7);
//! let outcome = solve(&instance, "tabu_search", &options).unwrap();
//! assert_eq!(outcome.solution.num_customers_served(0), 3);
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod neighborhood;
pub mod sa;
pub mod solver;
pub mod tabu;

pub use error::RoutingError;
pub use solver::{solve, solve_with_cancel, Algorithm, SolveOptions, SolveOutcome, SolveStats};
