//! Distance matrices.
//!
//! Provides the dense matrix behind the static and hour-of-day distance
//! tables of a [`ProblemInstance`](crate::models::ProblemInstance).

mod matrix;

pub use matrix::DistanceMatrix;
