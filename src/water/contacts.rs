//! Live (water fixture, foreign fixture) contact pairs.
//!
//! Three mutation entry points: `begin`, `end`, `clear`. Iteration hands out
//! a snapshot so forces can be applied while the set is untouched.

use std::collections::BTreeSet;

use crate::physics::FixtureHandle;

/// Directed pair: `water` belongs to the water body, `other` to a foreign body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixtureContact {
    pub water: FixtureHandle,
    pub other: FixtureHandle,
}

/// Ordered so that force accumulation is deterministic across runs.
#[derive(Default, Debug)]
pub struct ContactSet {
    pairs: BTreeSet<FixtureContact>,
}

impl ContactSet {
    pub fn begin(&mut self, contact: FixtureContact) -> bool {
        self.pairs.insert(contact)
    }

    pub fn end(&mut self, contact: FixtureContact) -> bool {
        self.pairs.remove(&contact)
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, contact: &FixtureContact) -> bool {
        self.pairs.contains(contact)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FixtureContact> {
        self.pairs.iter()
    }

    pub fn snapshot(&self) -> Vec<FixtureContact> {
        self.pairs.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ArenaIndex;

    fn handle(index: u32, generation: u32) -> FixtureHandle {
        FixtureHandle(ArenaIndex { index, generation })
    }

    #[test]
    fn begin_end_clear() {
        let mut set = ContactSet::default();
        let c = FixtureContact {
            water: handle(0, 0),
            other: handle(1, 0),
        };
        assert!(set.begin(c));
        assert!(!set.begin(c));
        assert_eq!(set.len(), 1);
        assert!(set.end(c));
        assert!(!set.end(c));
        set.begin(c);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn stale_generation_is_a_different_pair() {
        let mut set = ContactSet::default();
        set.begin(FixtureContact {
            water: handle(0, 1),
            other: handle(1, 0),
        });
        assert!(!set.end(FixtureContact {
            water: handle(0, 0),
            other: handle(1, 0),
        }));
        assert_eq!(set.len(), 1);
    }
}
