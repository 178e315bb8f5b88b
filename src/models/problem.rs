//! Problem instance: nodes, fleet and the distance oracle.

use serde::{Deserialize, Serialize};

use super::{Customer, Fleet};
use crate::distance::DistanceMatrix;
use crate::error::RoutingError;

/// A vehicle routing problem instance.
///
/// Nodes are stored so that `customers()[i].id() == i`. One of them is the
/// depot. Distances come from, in order of preference: the hourly traffic
/// table for the requested hour, the static matrix, or the Euclidean
/// distance between node coordinates.
///
/// Instances are assembled by a loader and then only read while solving.
///
/// # Examples
///
/// ```
/// use u_vrp::models::{Customer, Fleet, ProblemInstance, TimeWindow};
///
/// let instance = ProblemInstance::new("demo", Customer::depot(0.0, 0.0))
///     .with_customer(Customer::new(1, 3.0, 4.0, 10))
///     .with_customer(
///         Customer::new(2, 6.0, 8.0, 5).with_time_window(TimeWindow::new(20.0, 40.0).unwrap()),
///     )
///     .with_fleet(Fleet::homogeneous(2, 20))
///     .with_euclidean_matrix();
///
/// assert!(instance.validate().is_ok());
/// assert!((instance.distance(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(instance.waiting_time(2, 10.0), 10.0);
/// assert!(instance.is_within_time_window(1, 1e9));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInstance {
    name: String,
    depot: usize,
    customers: Vec<Customer>,
    fleet: Fleet,
    #[serde(default)]
    distance_matrix: Option<DistanceMatrix>,
    #[serde(default)]
    hourly_matrices: Vec<DistanceMatrix>,
}

impl ProblemInstance {
    /// Creates an instance whose only node is the depot.
    ///
    /// The fleet defaults to a single vehicle of capacity 100.
    pub fn new(name: impl Into<String>, depot: Customer) -> Self {
        let depot_id = depot.id();
        let mut instance = Self {
            name: name.into(),
            depot: depot_id,
            customers: Vec::new(),
            fleet: Fleet::homogeneous(1, 100),
            distance_matrix: None,
            hourly_matrices: Vec::new(),
        };
        instance.add_customer(depot);
        instance
    }

    /// Adds (or replaces) a node. The node list grows to fit its id.
    ///
    /// Gaps left by skipped ids are filled with zero-demand placeholders at
    /// the origin; [`validate`](Self::validate) rejects them.
    pub fn add_customer(&mut self, customer: Customer) {
        let id = customer.id();
        if id >= self.customers.len() {
            // Placeholder ids point past the end so validation catches them.
            let filler = |i: usize| Customer::new(usize::MAX - i, 0.0, 0.0, 0);
            let start = self.customers.len();
            self.customers.extend((start..=id).map(filler));
        }
        self.customers[id] = customer;
    }

    /// Builder form of [`add_customer`](Self::add_customer).
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.add_customer(customer);
        self
    }

    /// Sets the fleet.
    pub fn with_fleet(mut self, fleet: Fleet) -> Self {
        self.fleet = fleet;
        self
    }

    /// Installs a precomputed static distance matrix.
    pub fn with_distance_matrix(mut self, matrix: DistanceMatrix) -> Self {
        self.distance_matrix = Some(matrix);
        self
    }

    /// Computes and installs the Euclidean distance matrix.
    pub fn with_euclidean_matrix(mut self) -> Self {
        self.distance_matrix = Some(DistanceMatrix::from_customers(&self.customers));
        self
    }

    /// Installs hour-of-day matrices; entry `h` is used for `hour == h`.
    pub fn with_hourly_matrices(mut self, matrices: Vec<DistanceMatrix>) -> Self {
        self.hourly_matrices = matrices;
        self
    }

    /// Checks the structural invariants required before solving.
    pub fn validate(&self) -> Result<(), RoutingError> {
        for (index, c) in self.customers.iter().enumerate() {
            if c.id() != index {
                return Err(RoutingError::NodeIdMismatch { index, id: c.id() });
            }
        }
        let depot = self
            .customers
            .get(self.depot)
            .ok_or(RoutingError::UnknownDepot { depot: self.depot })?;
        if depot.demand() != 0 {
            return Err(RoutingError::DepotHasDemand {
                demand: depot.demand(),
            });
        }
        if depot.time_window().is_some() {
            return Err(RoutingError::DepotHasTimeWindow);
        }
        if self.fleet.vehicle_count() == 0 {
            return Err(RoutingError::NoVehicles);
        }
        for (vehicle, v) in self.fleet.vehicles().iter().enumerate() {
            if v.capacity() <= 0 {
                return Err(RoutingError::ZeroCapacity {
                    vehicle,
                    capacity: v.capacity(),
                });
            }
        }
        let expected = self.customers.len();
        for m in self.distance_matrix.iter().chain(&self.hourly_matrices) {
            if m.size() != expected {
                return Err(RoutingError::MatrixSizeMismatch {
                    expected,
                    found: m.size(),
                });
            }
        }
        Ok(())
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Depot node id.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// All nodes, indexed by id (depot included).
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Node with the given id.
    pub fn customer(&self, id: usize) -> Option<&Customer> {
        self.customers.get(id)
    }

    /// Ids of all non-depot nodes, ascending.
    pub fn customer_ids(&self) -> impl Iterator<Item = usize> + '_ {
        let depot = self.depot;
        (0..self.customers.len()).filter(move |&id| id != depot)
    }

    /// Number of non-depot nodes.
    pub fn num_customers(&self) -> usize {
        self.customers.len().saturating_sub(1)
    }

    /// Demand of a node (0 for unknown ids).
    pub fn demand(&self, id: usize) -> i32 {
        self.customers.get(id).map_or(0, Customer::demand)
    }

    /// Service time of a node (0 for unknown ids).
    pub fn service_time(&self, id: usize) -> f64 {
        self.customers.get(id).map_or(0.0, Customer::service_time)
    }

    /// The fleet.
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// The static distance matrix, if one was installed.
    pub fn distance_matrix(&self) -> Option<&DistanceMatrix> {
        self.distance_matrix.as_ref()
    }

    /// Number of installed hour-of-day matrices.
    pub fn num_time_slots(&self) -> usize {
        self.hourly_matrices.len()
    }

    /// Distance between two nodes at hour 0.
    ///
    /// # Panics
    ///
    /// Panics if either node is unknown; see [`try_distance`](Self::try_distance).
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distance_at(from, to, 0)
    }

    /// Distance between two nodes when departing in the given hour slot.
    ///
    /// # Panics
    ///
    /// Panics if either node is unknown.
    pub fn distance_at(&self, from: usize, to: usize, hour: usize) -> f64 {
        if let Some(m) = self.hourly_matrices.get(hour) {
            m.get(from, to)
        } else {
            self.base_distance(from, to)
        }
    }

    /// Distance ignoring the hourly table: static matrix, else Euclidean.
    ///
    /// # Panics
    ///
    /// Panics if either node is unknown.
    pub fn base_distance(&self, from: usize, to: usize) -> f64 {
        match &self.distance_matrix {
            Some(m) => m.get(from, to),
            None => self.customers[from].distance_to(&self.customers[to]),
        }
    }

    /// [`distance`](Self::distance), or `None` when a node is unknown.
    pub fn try_distance(&self, from: usize, to: usize) -> Option<f64> {
        match self.hourly_matrices.first() {
            Some(m) => m.try_get(from, to),
            None => self.try_base_distance(from, to),
        }
    }

    /// [`base_distance`](Self::base_distance), or `None` when a node is unknown.
    pub fn try_base_distance(&self, from: usize, to: usize) -> Option<f64> {
        match &self.distance_matrix {
            Some(m) => m.try_get(from, to),
            None => {
                let a = self.customers.get(from)?;
                let b = self.customers.get(to)?;
                Some(a.distance_to(b))
            }
        }
    }

    /// Returns `true` if `time` lies inside the node's window.
    ///
    /// Nodes without a window always accept.
    pub fn is_within_time_window(&self, node: usize, time: f64) -> bool {
        self.customers
            .get(node)
            .and_then(Customer::time_window)
            .is_none_or(|tw| tw.contains(time))
    }

    /// Time spent waiting for the window to open when arriving at `arrival`.
    pub fn waiting_time(&self, node: usize, arrival: f64) -> f64 {
        self.customers
            .get(node)
            .and_then(Customer::time_window)
            .map_or(0.0, |tw| tw.waiting_time(arrival))
    }
}
