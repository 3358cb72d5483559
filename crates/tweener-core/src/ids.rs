//! Identifiers for scheduled animations.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AnimId(pub u32);

/// Monotonic allocator for AnimId. Ids are never reused within a registry,
/// so a stale id simply stops matching once its record is gone.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> AnimId {
        let id = AnimId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
