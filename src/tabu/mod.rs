//! Tabu Search over VRP solutions.
//!
//! # Algorithm
//!
//! Each iteration samples at most `max_swap_moves` swaps (distinct customer
//! pairs), `max_relocate_moves` relocations and `max_two_opt_moves` segment
//! reversals from the current solution, scores every candidate and moves to
//! the best admissible one. A candidate is admissible if it does not match
//! a live [`TabuList`] entry, or if it beats the best score found so far
//! (aspiration). The inverse of the applied move becomes tabu for
//! `tabu_tenure` iterations. The search stops at `max_iterations`, after
//! `max_no_improvement` iterations without a new best, or when no
//! admissible move remains.
//!
//! # Complexity
//!
//! O(I · k · (n + m)) for I iterations and k sampled candidates per
//! iteration, each copied and re-evaluated.
//!
//! # Reference
//!
//! Glover, F. (1986). "Future Paths for Integer Programming and Links to
//! Artificial Intelligence", *Computers & Operations Research* 13(5), 533-549.
//!
//! Gendreau, M., Hertz, A. & Laporte, G. (1994). "A Tabu Search Heuristic
//! for the Vehicle Routing Problem", *Management Science* 40(10), 1276-1290.

mod config;
mod runner;
mod tabu_list;

pub use config::TabuConfig;
pub use runner::{TabuResult, TabuRunner, TabuStats};
pub use tabu_list::TabuList;
