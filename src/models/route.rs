//! Route storage and visit timing.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Timing of a single stop along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    /// Node being visited.
    pub node: usize,
    /// Arrival time at this node.
    pub arrival_time: f64,
    /// Time spent waiting for the window to open.
    pub waiting_time: f64,
    /// Time service begins.
    pub service_start: f64,
    /// Departure time (service start + service duration).
    pub departure_time: f64,
}

/// All routes of a solution stored in one flat buffer.
///
/// Route `r` occupies `nodes[offsets[r]..offsets[r + 1]]`. Cloning copies
/// two vectors regardless of the number of routes, which keeps neighbor
/// generation cheap.
///
/// # Examples
///
/// ```
/// use u_vrp::models::RouteArena;
///
/// let mut arena = RouteArena::new();
/// arena.push_route(&[0, 1, 2, 0]);
/// arena.push_route(&[0, 3, 0]);
/// arena.insert(1, 1, 4);
/// assert_eq!(arena.route(1), &[0, 4, 3, 0]);
/// assert_eq!(arena.remove(0, 2), 2);
/// assert_eq!(arena.route(0), &[0, 1, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteArena {
    nodes: Vec<usize>,
    offsets: Vec<usize>,
}

impl RouteArena {
    /// Creates an arena with no routes.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            offsets: vec![0],
        }
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Returns `true` if there are no routes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a route.
    pub fn push_route(&mut self, route: &[usize]) {
        if self.offsets.is_empty() {
            self.offsets.push(0);
        }
        self.nodes.extend_from_slice(route);
        self.offsets.push(self.nodes.len());
    }

    fn span(&self, r: usize) -> Range<usize> {
        self.offsets[r]..self.offsets[r + 1]
    }

    /// Nodes of route `r`.
    ///
    /// # Panics
    ///
    /// Panics if `r` is out of range.
    pub fn route(&self, r: usize) -> &[usize] {
        &self.nodes[self.span(r)]
    }

    /// Mutable nodes of route `r` (length cannot change through this view).
    pub fn route_mut(&mut self, r: usize) -> &mut [usize] {
        let span = self.span(r);
        &mut self.nodes[span]
    }

    /// Iterates over all routes in order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.offsets
            .windows(2)
            .map(move |w| &self.nodes[w[0]..w[1]])
    }

    /// Inserts `node` at position `pos` of route `r`.
    pub fn insert(&mut self, r: usize, pos: usize, node: usize) {
        let at = self.offsets[r] + pos;
        debug_assert!(at <= self.offsets[r + 1]);
        self.nodes.insert(at, node);
        for o in &mut self.offsets[r + 1..] {
            *o += 1;
        }
    }

    /// Removes and returns the node at position `pos` of route `r`.
    pub fn remove(&mut self, r: usize, pos: usize) -> usize {
        let at = self.offsets[r] + pos;
        debug_assert!(at < self.offsets[r + 1]);
        let node = self.nodes.remove(at);
        for o in &mut self.offsets[r + 1..] {
            *o -= 1;
        }
        node
    }

    /// Replaces positions `range` of route `r` with `replacement`.
    pub fn splice(&mut self, r: usize, range: Range<usize>, replacement: &[usize]) {
        let base = self.offsets[r];
        let removed = range.len();
        self.nodes
            .splice(base + range.start..base + range.end, replacement.iter().copied());
        for o in &mut self.offsets[r + 1..] {
            *o = *o + replacement.len() - removed;
        }
    }

    /// Copies the routes out as nested vectors.
    pub fn to_vecs(&self) -> Vec<Vec<usize>> {
        self.iter().map(<[usize]>::to_vec).collect()
    }
}

impl Default for RouteArena {
    fn default() -> Self {
        Self::new()
    }
}
