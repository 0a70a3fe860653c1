//! Allocation Table Module
//!
//! Maps the start address of every live allocation to the size reserved there.
//! An address is present iff it is currently allocated. Zero-size allocations
//! are recorded like any other; they cover no addresses.

use crate::range::{AddressRange, RangeError};
use std::collections::BTreeMap;

/// Address-keyed record of live allocations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationTable {
    /// Key: start address, Value: reserved size
    entries: BTreeMap<usize, usize>,
}

impl AllocationTable {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Record an allocation of `size` at `address`
    ///
    /// A zero-size record at `address` is replaced. Zero-size records strictly
    /// inside `[address, address + size)` are dropped: those addresses now lie
    /// in the middle of a block.
    ///
    /// # Errors
    ///
    /// `RangeError::Duplicate` if a non-empty allocation already starts at
    /// `address`; the table is left unchanged.
    pub fn record(&mut self, address: usize, size: usize) -> Result<(), RangeError> {
        if self.entries.get(&address).map_or(false, |&prev| prev > 0) {
            return Err(RangeError::Duplicate(address));
        }
        self.drop_empty_within(AddressRange::new(address, size));
        self.entries.insert(address, size);
        Ok(())
    }

    /// Forget zero-size records strictly inside `range`
    fn drop_empty_within(&mut self, range: AddressRange) {
        let end = range.end();
        if end - range.address < 2 {
            return;
        }
        let stale: Vec<usize> = self
            .entries
            .range(range.address + 1..end)
            .filter(|&(_, &size)| size == 0)
            .map(|(&addr, _)| addr)
            .collect();
        for addr in stale {
            self.entries.remove(&addr);
        }
    }

    /// Forget the allocation at `address`, returning its range
    pub fn release(&mut self, address: usize) -> Option<AddressRange> {
        self.entries
            .remove(&address)
            .map(|size| AddressRange::new(address, size))
    }

    /// Size recorded at `address`
    pub fn get(&self, address: usize) -> Option<usize> {
        self.entries.get(&address).copied()
    }

    pub fn contains(&self, address: usize) -> bool {
        self.entries.contains_key(&address)
    }

    /// Allocated ranges in ascending address order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = AddressRange> + '_ {
        self.entries
            .iter()
            .map(|(&addr, &size)| AddressRange::new(addr, size))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all recorded sizes
    pub fn total_size(&self) -> usize {
        self.entries.values().sum()
    }

    pub fn to_vec(&self) -> Vec<AddressRange> {
        self.iter().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
