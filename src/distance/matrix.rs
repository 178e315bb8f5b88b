//! Dense distance matrix.

use serde::{Deserialize, Serialize};

use crate::models::Customer;

/// Square table of leg lengths, indexed `[from][to]` by node id.
///
/// Backs both the static matrix and each hour-of-day traffic table of a
/// [`ProblemInstance`](crate::models::ProblemInstance). Entries need not be
/// symmetric.
///
/// # Examples
///
/// ```
/// use u_vrp::distance::DistanceMatrix;
/// use u_vrp::models::Customer;
///
/// let nodes = [Customer::depot(0.0, 0.0), Customer::new(1, 3.0, 4.0, 10)];
/// let base = DistanceMatrix::from_customers(&nodes);
/// let rush = base.scaled(1.5);
///
/// assert!((rush.get(1, 0) - 7.5).abs() < 1e-10);
/// assert_eq!(rush.try_get(0, 2), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// All-zero matrix over `size` nodes.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * size],
        }
    }

    /// Euclidean matrix; `nodes[i]` must have id `i`.
    pub fn from_customers(nodes: &[Customer]) -> Self {
        let size = nodes.len();
        let cells = nodes
            .iter()
            .flat_map(|a| nodes.iter().map(move |b| a.distance_to(b)))
            .collect();
        Self { size, cells }
    }

    /// Wraps a row-major grid, or `None` when `cells.len() != size * size`.
    pub fn from_data(size: usize, cells: Vec<f64>) -> Option<Self> {
        (cells.len() == size * size).then_some(Self { size, cells })
    }

    /// Leg length from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either id is `>= size()`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.cells[from * self.size + to]
    }

    /// Leg length, or `None` when either id is outside the matrix.
    pub fn try_get(&self, from: usize, to: usize) -> Option<f64> {
        if from < self.size && to < self.size {
            Some(self.cells[from * self.size + to])
        } else {
            None
        }
    }

    /// Overwrites one directed entry.
    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.cells[from * self.size + to] = value;
    }

    /// Number of nodes covered.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Copy with every entry multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            size: self.size,
            cells: self.cells.iter().map(|d| d * factor).collect(),
        }
    }
}
