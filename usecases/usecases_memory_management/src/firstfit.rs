//! First-Fit Strategy
//!
//! First-fit takes the lowest-addressed free block that is large enough to
//! satisfy the request. Selection is fast but small leftovers accumulate near
//! the start of the range over time.

use super::strategy::PlacementStrategy;
use entities_address_space::{AddressRange, FreeList};

/// First-fit placement
///
/// Scans the address-ordered free list and stops at the first block whose
/// size is at least the requested size.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl FirstFit {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementStrategy for FirstFit {
    fn select(&mut self, free_list: &FreeList, size: usize) -> Option<AddressRange> {
        free_list.iter().find(|block| block.size >= size)
    }

    fn name(&self) -> &'static str {
        "first-fit"
    }
}
