//! Worst-Fit Strategy
//!
//! Worst-fit always carves from the largest free block, leaving the biggest
//! possible remainder behind. When several blocks share the maximum size the
//! lowest-addressed one wins, so identical operation sequences always produce
//! identical layouts.

use super::strategy::PlacementStrategy;
use entities_address_space::{AddressRange, FreeList};

/// Worst-fit placement
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl WorstFit {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementStrategy for WorstFit {
    fn select(&mut self, free_list: &FreeList, size: usize) -> Option<AddressRange> {
        // Fails when even the largest block is too small
        free_list.largest().filter(|block| block.size >= size)
    }

    fn name(&self) -> &'static str {
        "worst-fit"
    }
}
