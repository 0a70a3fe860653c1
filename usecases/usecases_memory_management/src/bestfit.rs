//! Best-Fit Strategy
//!
//! Best-fit takes the smallest free block that is still large enough to
//! satisfy the request. This minimizes the leftover of each split but can
//! leave many small fragments behind.

use super::strategy::PlacementStrategy;
use entities_address_space::{AddressRange, FreeList};

/// Best-fit placement
///
/// Among all blocks with size at least the requested size, picks the one with
/// the minimum size. Equal sizes resolve to the lowest address. An exact fit
/// ends the scan early.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl BestFit {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementStrategy for BestFit {
    fn select(&mut self, free_list: &FreeList, size: usize) -> Option<AddressRange> {
        let mut best: Option<AddressRange> = None;
        for block in free_list.iter().filter(|block| block.size >= size) {
            if block.size == size {
                return Some(block);
            }
            match best {
                Some(b) if b.size <= block.size => {}
                _ => best = Some(block),
            }
        }
        best
    }

    fn name(&self) -> &'static str {
        "best-fit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(blocks: &[(usize, usize)]) -> FreeList {
        let mut list = FreeList::new();
        for &(addr, size) in blocks {
            list.insert(AddressRange::new(addr, size)).unwrap();
        }
        list
    }

    #[test]
    fn test_bestfit_picks_smallest_fitting() {
        let free = list(&[(0, 256), (300, 48), (400, 64), (500, 40)]);
        let mut strategy = BestFit::new();
        assert_eq!(strategy.select(&free, 41), Some(AddressRange::new(300, 48)));
        assert_eq!(strategy.select(&free, 50), Some(AddressRange::new(400, 64)));
    }

    #[test]
    fn test_bestfit_exact_fit() {
        let free = list(&[(0, 64), (100, 32), (200, 32)]);
        let mut strategy = BestFit::new();
        assert_eq!(strategy.select(&free, 32), Some(AddressRange::new(100, 32)));
    }

    #[test]
    fn test_bestfit_tie_takes_lowest_address() {
        let free = list(&[(0, 16), (100, 48), (200, 48)]);
        let mut strategy = BestFit::new();
        assert_eq!(strategy.select(&free, 20), Some(AddressRange::new(100, 48)));
    }

    #[test]
    fn test_bestfit_no_fit() {
        let free = list(&[(0, 16), (100, 48)]);
        let mut strategy = BestFit::new();
        assert_eq!(strategy.select(&free, 49), None);
    }
}
