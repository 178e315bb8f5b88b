//! Relocate operator.
//!
//! # Algorithm
//!
//! Picks a random route; if it serves customers, removes a random one and
//! reinserts it at a random interior position of a random target route
//! (possibly the same one). Routes holding only the depot receive the
//! customer at position 1.

use rand::Rng;

use super::Move;
use crate::models::RouteArena;

/// Samples a relocation of one random customer.
///
/// Returns `None` when the randomly chosen source route has no customers.
///
/// # Examples
///
/// ```
/// use u_vrp::models::RouteArena;
/// use u_vrp::neighborhood::{sample_relocate, Move};
///
/// let mut routes = RouteArena::new();
/// routes.push_route(&[0, 1, 2, 0]);
///
/// let mut rng = u_numflow::random::create_rng(42);
/// let mv = sample_relocate(&routes, 0, &mut rng).unwrap();
/// assert!(matches!(mv, Move::Relocate { from_route: 0, to_route: 0, .. }));
/// ```
pub fn sample_relocate<R: Rng>(routes: &RouteArena, depot: usize, rng: &mut R) -> Option<Move> {
    if routes.is_empty() {
        return None;
    }
    let from_route = rng.random_range(0..routes.len());
    let source = routes.route(from_route);
    let candidates: Vec<usize> = source
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n != depot)
        .map(|(p, _)| p)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let from_pos = candidates[rng.random_range(0..candidates.len())];
    let customer = source[from_pos];

    let to_route = rng.random_range(0..routes.len());
    let mut target_len = routes.route(to_route).len();
    if to_route == from_route {
        target_len -= 1;
    }
    let to_pos = if target_len <= 2 {
        1
    } else {
        rng.random_range(1..target_len)
    };

    Some(Move::Relocate {
        customer,
        from_route,
        from_pos,
        to_route,
        to_pos,
    })
}
