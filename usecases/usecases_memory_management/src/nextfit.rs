//! Next-Fit Strategy
//!
//! Next-fit is first-fit with a roving cursor. Each search starts at the first
//! free block at or after the end of the previous selection and wraps around to
//! the lowest address, spreading allocations across the range instead of
//! piling them up at the front.

use super::strategy::PlacementStrategy;
use entities_address_space::{AddressRange, FreeList};

/// Next-fit placement
#[derive(Debug, Clone, Copy, Default)]
pub struct NextFit {
    /// End of the last satisfied selection
    cursor: usize,
}

impl NextFit {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Address the next search starts from
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl PlacementStrategy for NextFit {
    fn select(&mut self, free_list: &FreeList, size: usize) -> Option<AddressRange> {
        let found = free_list
            .iter_from(self.cursor)
            .chain(free_list.iter_before(self.cursor))
            .find(|block| block.size >= size)?;
        self.cursor = found.address.saturating_add(size);
        Some(found)
    }

    fn name(&self) -> &'static str {
        "next-fit"
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}
