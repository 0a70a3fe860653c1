//! Free List Module
//!
//! Address-ordered collection of free ranges.
//!
//! Free blocks are kept in a `BTreeMap` keyed by start address with the block
//! size as value. The list is always fully coalesced: no two entries touch or
//! overlap, and no entry is empty. Insertion merges a returned range with its
//! free neighbours; removal deletes, shrinks or splits the entry that holds the
//! consumed range.
//!
//! ## Examples
//!
//! ```rust
//! use entities_address_space::{AddressRange, FreeList};
//!
//! let mut list = FreeList::with_range(AddressRange::new(0, 1024));
//! list.remove(AddressRange::new(0, 256)).unwrap();
//! list.remove(AddressRange::new(256, 256)).unwrap();
//! assert_eq!(list.to_vec(), vec![AddressRange::new(512, 512)]);
//!
//! // Returning the first block does not touch the tail, the second one merges.
//! list.insert(AddressRange::new(0, 256)).unwrap();
//! let merged = list.insert(AddressRange::new(256, 256)).unwrap();
//! assert_eq!(merged, AddressRange::new(0, 1024));
//! assert_eq!(list.len(), 1);
//! ```

use crate::range::{AddressRange, RangeError};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Coalesced, address-ordered set of free ranges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeList {
    /// Key: start address, Value: size
    blocks: BTreeMap<usize, usize>,
}

impl FreeList {
    /// Create an empty free list
    pub fn new() -> Self {
        Self {
            blocks: BTreeMap::new(),
        }
    }

    /// Create a free list holding a single range
    ///
    /// An empty `range` produces an empty list.
    pub fn with_range(range: AddressRange) -> Self {
        let mut list = Self::new();
        if !range.is_empty() {
            list.blocks.insert(range.address, range.size);
        }
        list
    }

    /// Return `range` to the list, merging it with adjacent free entries
    ///
    /// Returns the entry that now covers `range`. Inserting an empty range is
    /// a no-op and returns it unchanged.
    ///
    /// # Errors
    ///
    /// - `RangeError::Overflow` if the range end does not fit in a `usize`
    /// - `RangeError::Overlap` if the range shares an address with a free entry;
    ///   the list is left unchanged
    pub fn insert(&mut self, range: AddressRange) -> Result<AddressRange, RangeError> {
        if range.is_empty() {
            return Ok(range);
        }
        let end = range.checked_end().ok_or(RangeError::Overflow {
            address: range.address,
            size: range.size,
        })?;

        // Entries are disjoint and sorted, so only the last one starting
        // before `end` can reach into the range.
        if let Some((&addr, &size)) = self.blocks.range(..end).next_back() {
            let existing = AddressRange::new(addr, size);
            if existing.overlaps(&range) {
                return Err(RangeError::Overlap { range, existing });
            }
        }

        let mut merged = range;

        if let Some(prev) = self.predecessor(range.address) {
            if prev.is_adjacent_to(&range) {
                self.blocks.remove(&prev.address);
                merged.address = prev.address;
                merged.size += prev.size;
            }
        }

        if let Some(next_size) = self.blocks.remove(&end) {
            merged.size += next_size;
        }

        self.blocks.insert(merged.address, merged.size);
        Ok(merged)
    }

    /// Take `range` out of the free list
    ///
    /// The entry holding `range` is deleted when it matches exactly, shrunk when
    /// `range` is a prefix or suffix of it, and split in two otherwise. Removing
    /// an empty range is a no-op.
    ///
    /// # Errors
    ///
    /// - `RangeError::Overflow` if the range end does not fit in a `usize`
    /// - `RangeError::NotFree` if no single entry fully contains `range`
    pub fn remove(&mut self, range: AddressRange) -> Result<(), RangeError> {
        if range.is_empty() {
            return Ok(());
        }
        range.checked_end().ok_or(RangeError::Overflow {
            address: range.address,
            size: range.size,
        })?;
        let block = self
            .blocks
            .range(..=range.address)
            .next_back()
            .map(|(&addr, &size)| AddressRange::new(addr, size))
            .filter(|block| block.covers(&range))
            .ok_or(RangeError::NotFree(range))?;

        self.blocks.remove(&block.address);

        if range.address > block.address {
            self.blocks.insert(block.address, range.address - block.address);
        }
        if range.end() < block.end() {
            self.blocks.insert(range.end(), block.end() - range.end());
        }
        Ok(())
    }

    /// Last entry starting strictly before `address`
    pub fn predecessor(&self, address: usize) -> Option<AddressRange> {
        self.blocks
            .range(..address)
            .next_back()
            .map(|(&addr, &size)| AddressRange::new(addr, size))
    }

    /// Free entries in ascending address order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = AddressRange> + '_ {
        self.blocks
            .iter()
            .map(|(&addr, &size)| AddressRange::new(addr, size))
    }

    /// Free entries starting at or after `address`, ascending
    pub fn iter_from(&self, address: usize) -> impl Iterator<Item = AddressRange> + '_ {
        self.blocks
            .range((Bound::Included(address), Bound::Unbounded))
            .map(|(&addr, &size)| AddressRange::new(addr, size))
    }

    /// Free entries starting strictly before `address`, ascending
    pub fn iter_before(&self, address: usize) -> impl Iterator<Item = AddressRange> + '_ {
        self.blocks
            .range(..address)
            .map(|(&addr, &size)| AddressRange::new(addr, size))
    }

    /// Largest entry; ties resolve to the lowest address
    pub fn largest(&self) -> Option<AddressRange> {
        self.iter().fold(None, |best: Option<AddressRange>, block| match best {
            Some(b) if b.size >= block.size => Some(b),
            _ => Some(block),
        })
    }

    /// Number of free entries
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Sum of all free entry sizes
    pub fn total_size(&self) -> usize {
        self.blocks.values().sum()
    }

    /// Snapshot of the free entries in address order
    pub fn to_vec(&self) -> Vec<AddressRange> {
        self.iter().collect()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(list: &FreeList) -> Vec<usize> {
        list.iter().map(|r| r.size).collect()
    }

    #[test]
    fn test_with_range() {
        let list = FreeList::with_range(AddressRange::new(128, 1024));
        assert_eq!(list.to_vec(), vec![AddressRange::new(128, 1024)]);
        assert!(FreeList::with_range(AddressRange::new(128, 0)).is_empty());
    }

    #[test]
    fn test_insert_without_neighbours() {
        let mut list = FreeList::new();
        list.insert(AddressRange::new(100, 10)).unwrap();
        list.insert(AddressRange::new(0, 10)).unwrap();
        list.insert(AddressRange::new(50, 10)).unwrap();
        let addrs: Vec<usize> = list.iter().map(|r| r.address).collect();
        assert_eq!(addrs, vec![0, 50, 100]);
    }

    #[test]
    fn test_insert_merges_predecessor() {
        let mut list = FreeList::with_range(AddressRange::new(0, 32));
        let merged = list.insert(AddressRange::new(32, 16)).unwrap();
        assert_eq!(merged, AddressRange::new(0, 48));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_insert_merges_successor() {
        let mut list = FreeList::with_range(AddressRange::new(64, 32));
        let merged = list.insert(AddressRange::new(32, 32)).unwrap();
        assert_eq!(merged, AddressRange::new(32, 64));
        assert_eq!(list.to_vec(), vec![AddressRange::new(32, 64)]);
    }

    #[test]
    fn test_insert_merges_both_sides() {
        let mut list = FreeList::new();
        list.insert(AddressRange::new(0, 16)).unwrap();
        list.insert(AddressRange::new(32, 16)).unwrap();
        let merged = list.insert(AddressRange::new(16, 16)).unwrap();
        assert_eq!(merged, AddressRange::new(0, 48));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_insert_empty_is_noop() {
        let mut list = FreeList::with_range(AddressRange::new(0, 16));
        let before = list.clone();
        list.insert(AddressRange::new(8, 0)).unwrap();
        list.insert(AddressRange::new(16, 0)).unwrap();
        assert_eq!(list, before);
    }

    #[test]
    fn test_insert_rejects_overlap() {
        let mut list = FreeList::with_range(AddressRange::new(100, 100));
        let before = list.clone();
        let err = list.insert(AddressRange::new(150, 100)).unwrap_err();
        assert_eq!(
            err,
            RangeError::Overlap {
                range: AddressRange::new(150, 100),
                existing: AddressRange::new(100, 100),
            }
        );
        assert!(list.insert(AddressRange::new(50, 51)).is_err());
        assert!(list.insert(AddressRange::new(100, 1)).is_err());
        assert_eq!(list, before);
    }

    #[test]
    fn test_insert_rejects_overflow() {
        let mut list = FreeList::new();
        let err = list.insert(AddressRange::new(usize::MAX, 2)).unwrap_err();
        assert!(matches!(err, RangeError::Overflow { .. }));
    }

    #[test]
    fn test_remove_exact() {
        let mut list = FreeList::with_range(AddressRange::new(0, 64));
        list.remove(AddressRange::new(0, 64)).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_prefix_and_suffix() {
        let mut list = FreeList::with_range(AddressRange::new(0, 64));
        list.remove(AddressRange::new(0, 16)).unwrap();
        assert_eq!(list.to_vec(), vec![AddressRange::new(16, 48)]);
        list.remove(AddressRange::new(48, 16)).unwrap();
        assert_eq!(list.to_vec(), vec![AddressRange::new(16, 32)]);
    }

    #[test]
    fn test_remove_splits_middle() {
        let mut list = FreeList::with_range(AddressRange::new(0, 64));
        list.remove(AddressRange::new(16, 16)).unwrap();
        assert_eq!(
            list.to_vec(),
            vec![AddressRange::new(0, 16), AddressRange::new(32, 32)]
        );
    }

    #[test]
    fn test_remove_not_free() {
        let mut list = FreeList::new();
        list.insert(AddressRange::new(0, 16)).unwrap();
        list.insert(AddressRange::new(32, 16)).unwrap();
        let before = list.clone();
        // Spans the gap between two entries
        assert_eq!(
            list.remove(AddressRange::new(8, 32)),
            Err(RangeError::NotFree(AddressRange::new(8, 32)))
        );
        // Entirely inside the gap
        assert!(list.remove(AddressRange::new(16, 8)).is_err());
        assert_eq!(list, before);
    }

    #[test]
    fn test_predecessor() {
        let mut list = FreeList::new();
        list.insert(AddressRange::new(0, 16)).unwrap();
        list.insert(AddressRange::new(32, 16)).unwrap();
        list.insert(AddressRange::new(64, 16)).unwrap();

        assert_eq!(list.predecessor(32), Some(AddressRange::new(0, 16)));
        assert_eq!(list.predecessor(40), Some(AddressRange::new(32, 16)));
        assert_eq!(list.predecessor(0), None);
    }

    #[test]
    fn test_iter_from_and_before() {
        let mut list = FreeList::new();
        for addr in [0, 100, 200, 300] {
            list.insert(AddressRange::new(addr, 10)).unwrap();
        }
        let from: Vec<usize> = list.iter_from(150).map(|r| r.address).collect();
        let before: Vec<usize> = list.iter_before(150).map(|r| r.address).collect();
        assert_eq!(from, vec![200, 300]);
        assert_eq!(before, vec![0, 100]);
    }

    #[test]
    fn test_largest_prefers_lowest_address() {
        let mut list = FreeList::new();
        list.insert(AddressRange::new(0, 16)).unwrap();
        list.insert(AddressRange::new(32, 64)).unwrap();
        list.insert(AddressRange::new(128, 64)).unwrap();
        list.insert(AddressRange::new(256, 8)).unwrap();
        assert_eq!(list.largest(), Some(AddressRange::new(32, 64)));
        assert_eq!(FreeList::new().largest(), None);
    }

    #[test]
    fn test_totals() {
        let mut list = FreeList::new();
        list.insert(AddressRange::new(0, 16)).unwrap();
        list.insert(AddressRange::new(32, 8)).unwrap();
        assert_eq!(list.total_size(), 24);
        assert_eq!(sizes(&list), vec![16, 8]);
        list.clear();
        assert!(list.is_empty());
    }
}
