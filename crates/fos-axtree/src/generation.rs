//! Tree Generations
//!
//! A tree carries a generation counter that advances on every successful
//! update. Derived values (set positions, table layouts) are cached with the
//! generation they were computed at and dropped once the tree moves on.

use serde::{Deserialize, Serialize};

/// Number of updates a tree has applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    /// Generation of a tree that has not applied any update
    pub const INITIAL: Self = Generation(0);

    pub fn value(self) -> u64 {
        self.0
    }

    /// Generation after one more applied update
    #[must_use]
    pub fn next(self) -> Self {
        Generation(self.0.saturating_add(1))
    }
}

/// Derived data valid for a single generation
#[derive(Debug, Default)]
pub struct Cached<T> {
    generation: Generation,
    value: T,
}

impl<T: Default> Cached<T> {
    /// Mutable access to the data, cleared first when it was computed for
    /// another generation
    pub fn refresh(&mut self, current: Generation) -> &mut T {
        if self.generation != current {
            self.generation = current;
            self.value = T::default();
        }
        &mut self.value
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }
}
