//! Short-term memory of recently reversed moves.

use std::collections::VecDeque;

use crate::neighborhood::Move;

/// Recently recorded moves, each tagged with the iteration it was added.
///
/// Entries are appended in iteration order, so eviction only ever pops
/// from the front.
///
/// # Examples
///
/// ```
/// use u_vrp::neighborhood::Move;
/// use u_vrp::tabu::TabuList;
///
/// let mut tabu = TabuList::new();
/// let mv = Move::TwoOpt { route: 0, i: 1, j: 3 };
/// tabu.push(mv, 0);
/// assert!(tabu.is_tabu(&mv));
///
/// tabu.evict(5, 5);
/// assert!(tabu.is_tabu(&mv));
/// tabu.evict(6, 5);
/// assert!(!tabu.is_tabu(&mv));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TabuList {
    entries: VecDeque<(Move, usize)>,
}

impl TabuList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `mv` as forbidden from `iteration` on.
    pub fn push(&mut self, mv: Move, iteration: usize) {
        self.entries.push_back((mv, iteration));
    }

    /// Drops entries older than `tenure` iterations at `iteration`.
    pub fn evict(&mut self, iteration: usize, tenure: usize) {
        while self
            .entries
            .front()
            .is_some_and(|&(_, added)| iteration.saturating_sub(added) > tenure)
        {
            self.entries.pop_front();
        }
    }

    /// Whether `mv` matches any live entry.
    pub fn is_tabu(&self, mv: &Move) -> bool {
        self.entries.iter().any(|(entry, _)| mv.matches(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap(a: usize, b: usize) -> Move {
        Move::Swap {
            route_a: 0,
            pos_a: 1,
            customer_a: a,
            route_b: 1,
            pos_b: 1,
            customer_b: b,
        }
    }

    #[test]
    fn test_swap_pair_unordered() {
        let mut tabu = TabuList::new();
        tabu.push(swap(3, 7), 0);
        assert!(tabu.is_tabu(&swap(7, 3)));
        assert!(!tabu.is_tabu(&swap(3, 8)));
    }

    #[test]
    fn test_relocate_direction() {
        let mut tabu = TabuList::new();
        let mv = Move::Relocate {
            customer: 4,
            from_route: 0,
            from_pos: 2,
            to_route: 1,
            to_pos: 1,
        };
        tabu.push(mv.inverse(), 0);
        // moving 4 back from route 1 to route 0 is forbidden
        assert!(tabu.is_tabu(&Move::Relocate {
            customer: 4,
            from_route: 1,
            from_pos: 3,
            to_route: 0,
            to_pos: 1,
        }));
        // moving it further along is allowed
        assert!(!tabu.is_tabu(&Move::Relocate {
            customer: 4,
            from_route: 1,
            from_pos: 1,
            to_route: 2,
            to_pos: 1,
        }));
    }

    #[test]
    fn test_evict_by_age() {
        let mut tabu = TabuList::new();
        tabu.push(swap(1, 2), 0);
        tabu.push(swap(3, 4), 3);
        tabu.evict(3, 2);
        assert_eq!(tabu.len(), 1);
        assert!(!tabu.is_tabu(&swap(1, 2)));
        assert!(tabu.is_tabu(&swap(3, 4)));
        tabu.evict(100, 2);
        assert!(tabu.is_empty());
    }
}
