//! Configuration errors.
//!
//! Only problems that make a solve request meaningless live here. Constraint
//! violations found in a candidate plan are data on the
//! [`Solution`](crate::models::Solution), never errors.

use thiserror::Error;

/// Errors raised before any search begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// The requested algorithm name is not recognized.
    #[error("unknown algorithm `{name}` (expected one of: simulated_annealing, tabu_search, greedy, savings)")]
    UnknownAlgorithm {
        /// The rejected name.
        name: String,
    },

    /// The fleet has no vehicles.
    #[error("fleet must contain at least one vehicle")]
    NoVehicles,

    /// A vehicle has non-positive capacity.
    #[error("vehicle {vehicle} has non-positive capacity {capacity}")]
    ZeroCapacity {
        /// Vehicle index within the fleet.
        vehicle: usize,
        /// The offending capacity.
        capacity: i32,
    },

    /// A node is stored at an index different from its id.
    #[error("node at index {index} has id {id}; node ids must be contiguous from 0")]
    NodeIdMismatch {
        /// Position in the node list.
        index: usize,
        /// Id carried by the node.
        id: usize,
    },

    /// The depot id does not refer to a known node.
    #[error("depot {depot} is not a known node")]
    UnknownDepot {
        /// Configured depot id.
        depot: usize,
    },

    /// The depot carries demand.
    #[error("depot must have zero demand, found {demand}")]
    DepotHasDemand {
        /// Demand found at the depot.
        demand: i32,
    },

    /// The depot carries a time window.
    #[error("depot must not have a time window")]
    DepotHasTimeWindow,

    /// A distance matrix does not match the number of nodes.
    #[error("distance matrix has size {found}, expected {expected}")]
    MatrixSizeMismatch {
        /// Number of nodes in the instance.
        expected: usize,
        /// Size of the supplied matrix.
        found: usize,
    },

    /// A driver configuration is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
