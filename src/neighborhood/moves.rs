//! Move records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NeighborhoodOperator;
use crate::models::RouteArena;

/// A structural change to a solution's routes.
///
/// Positions are indices into a route including its leading depot, so
/// position 1 is the first customer. A move is only meaningful against the
/// routes it was sampled from.
///
/// # Examples
///
/// ```
/// use u_vrp::models::RouteArena;
/// use u_vrp::neighborhood::Move;
///
/// let mut routes = RouteArena::new();
/// routes.push_route(&[0, 1, 2, 0]);
/// routes.push_route(&[0, 3, 0]);
///
/// let mv = Move::Relocate { customer: 2, from_route: 0, from_pos: 2, to_route: 1, to_pos: 1 };
/// mv.apply(&mut routes);
/// assert_eq!(routes.route(1), &[0, 2, 3, 0]);
///
/// mv.inverse().apply(&mut routes);
/// assert_eq!(routes.route(0), &[0, 1, 2, 0]);
/// assert_eq!(routes.route(1), &[0, 3, 0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Exchange the nodes at two positions.
    Swap {
        /// Route of the first position.
        route_a: usize,
        /// First position.
        pos_a: usize,
        /// Node at the first position before the move.
        customer_a: usize,
        /// Route of the second position.
        route_b: usize,
        /// Second position.
        pos_b: usize,
        /// Node at the second position before the move.
        customer_b: usize,
    },
    /// Remove a customer and reinsert it elsewhere.
    Relocate {
        /// Customer being moved.
        customer: usize,
        /// Source route.
        from_route: usize,
        /// Position in the source route.
        from_pos: usize,
        /// Target route.
        to_route: usize,
        /// Position in the target route, counted after the removal.
        to_pos: usize,
    },
    /// Reverse `route[i..=j]`.
    TwoOpt {
        /// Route index.
        route: usize,
        /// First reversed position.
        i: usize,
        /// Last reversed position.
        j: usize,
    },
    /// Exchange `a[start_a..=end_a]` with `b[start_b..=end_b]`.
    CrossExchange {
        /// First route.
        route_a: usize,
        /// Segment start in the first route.
        start_a: usize,
        /// Segment end in the first route.
        end_a: usize,
        /// Second route.
        route_b: usize,
        /// Segment start in the second route.
        start_b: usize,
        /// Segment end in the second route.
        end_b: usize,
    },
}

impl Move {
    /// The operator family this move belongs to.
    pub fn operator(&self) -> NeighborhoodOperator {
        match self {
            Move::Swap { .. } => NeighborhoodOperator::Swap,
            Move::Relocate { .. } => NeighborhoodOperator::Relocate,
            Move::TwoOpt { .. } => NeighborhoodOperator::TwoOpt,
            Move::CrossExchange { .. } => NeighborhoodOperator::CrossExchange,
        }
    }

    /// Applies the move in place.
    ///
    /// # Panics
    ///
    /// Panics if a route index or position is out of range.
    pub fn apply(&self, routes: &mut RouteArena) {
        match *self {
            Move::Swap {
                route_a,
                pos_a,
                route_b,
                pos_b,
                ..
            } => {
                let a = routes.route(route_a)[pos_a];
                let b = routes.route(route_b)[pos_b];
                routes.route_mut(route_a)[pos_a] = b;
                routes.route_mut(route_b)[pos_b] = a;
            }
            Move::Relocate {
                from_route,
                from_pos,
                to_route,
                to_pos,
                ..
            } => {
                let node = routes.remove(from_route, from_pos);
                routes.insert(to_route, to_pos, node);
            }
            Move::TwoOpt { route, i, j } => {
                routes.route_mut(route)[i..=j].reverse();
            }
            Move::CrossExchange {
                route_a,
                start_a,
                end_a,
                route_b,
                start_b,
                end_b,
            } => {
                let seg_a = routes.route(route_a)[start_a..=end_a].to_vec();
                let seg_b = routes.route(route_b)[start_b..=end_b].to_vec();
                routes.splice(route_a, start_a..end_a + 1, &seg_b);
                routes.splice(route_b, start_b..end_b + 1, &seg_a);
            }
        }
    }

    /// The move that undoes this one when applied right after it.
    pub fn inverse(&self) -> Move {
        match *self {
            Move::Swap {
                route_a,
                pos_a,
                customer_a,
                route_b,
                pos_b,
                customer_b,
            } => Move::Swap {
                route_a,
                pos_a,
                customer_a: customer_b,
                route_b,
                pos_b,
                customer_b: customer_a,
            },
            Move::Relocate {
                customer,
                from_route,
                from_pos,
                to_route,
                to_pos,
            } => Move::Relocate {
                customer,
                from_route: to_route,
                from_pos: to_pos,
                to_route: from_route,
                to_pos: from_pos,
            },
            Move::TwoOpt { .. } => *self,
            Move::CrossExchange {
                route_a,
                start_a,
                end_a,
                route_b,
                start_b,
                end_b,
            } => Move::CrossExchange {
                route_a,
                start_a,
                end_a: start_a + (end_b - start_b),
                route_b,
                start_b,
                end_b: start_b + (end_a - start_a),
            },
        }
    }

    /// Tabu membership: whether `self` is the kind of move `entry` forbids.
    ///
    /// - swaps match on the unordered pair of customers;
    /// - relocations match on customer, source route and target route;
    /// - 2-opt moves match on route and segment bounds;
    /// - cross exchanges match on both routes and segments, in either order.
    pub fn matches(&self, entry: &Move) -> bool {
        match (*self, *entry) {
            (
                Move::Swap {
                    customer_a: a1,
                    customer_b: b1,
                    ..
                },
                Move::Swap {
                    customer_a: a2,
                    customer_b: b2,
                    ..
                },
            ) => (a1 == a2 && b1 == b2) || (a1 == b2 && b1 == a2),
            (
                Move::Relocate {
                    customer: c1,
                    from_route: f1,
                    to_route: t1,
                    ..
                },
                Move::Relocate {
                    customer: c2,
                    from_route: f2,
                    to_route: t2,
                    ..
                },
            ) => c1 == c2 && f1 == f2 && t1 == t2,
            (Move::TwoOpt { .. }, Move::TwoOpt { .. }) => self == entry,
            (
                Move::CrossExchange {
                    route_a,
                    start_a,
                    end_a,
                    route_b,
                    start_b,
                    end_b,
                },
                other @ Move::CrossExchange { .. },
            ) => {
                other == *self
                    || other
                        == (Move::CrossExchange {
                            route_a: route_b,
                            start_a: start_b,
                            end_a: end_b,
                            route_b: route_a,
                            start_b: start_a,
                            end_b: end_a,
                        })
            }
            _ => false,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Swap {
                customer_a,
                customer_b,
                ..
            } => write!(f, "swap({customer_a}, {customer_b})"),
            Move::Relocate {
                customer,
                from_route,
                to_route,
                ..
            } => write!(f, "relocate({customer}: {from_route} -> {to_route})"),
            Move::TwoOpt { route, i, j } => write!(f, "2-opt(route {route}, {i}..={j})"),
            Move::CrossExchange {
                route_a, route_b, ..
            } => write!(f, "cross({route_a}, {route_b})"),
        }
    }
}
