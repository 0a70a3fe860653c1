//! Partition Allocator
//!
//! The allocator engine: owns the free list and the allocation table for one
//! contiguous logical range and keeps them partitioning that range exactly.
//!
//! ## Overview
//!
//! Allocation asks the configured [`PlacementStrategy`] for a free block, takes
//! the requested number of addresses from its front and leaves the remainder
//! free. Freeing looks the address up in the allocation table and hands the
//! recorded range back to the free list, which merges it with free neighbours.
//!
//! Every address in `[base, base + capacity)` is at all times either free or
//! allocated, never both and never neither.
//!
//! ## Examples
//!
//! ```rust
//! use usecases_memory_management::{AllocationStrategy, PartitionAllocator};
//!
//! let mut allocator = PartitionAllocator::new(65536, 1024, AllocationStrategy::WorstFit).unwrap();
//! let a = allocator.allocate(256).unwrap();
//! let b = allocator.allocate(512).unwrap();
//! assert!(allocator.allocate(512).is_none());
//! assert!(allocator.free(b));
//! assert!(allocator.free(a));
//! assert_eq!(allocator.free_blocks().len(), 1);
//! ```
//!
//! ## See Also
//!
//! - [`strategy`](super::strategy/index.html): the placement policy interface
//! - [`factory`](super::factory/index.html): building allocators from a configuration

use super::factory::AllocationStrategy;
use super::strategy::PlacementStrategy;
use entities_address_space::{AddressRange, AllocationTable, FreeList, RangeError};
use log::{debug, trace, warn};
use thiserror::Error;

/// Allocation errors
///
/// None of these are fatal; the `Option`/`bool` operations fold them into
/// `None`/`false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// Negative requested size
    #[error("invalid allocation size {requested}")]
    InvalidSize { requested: isize },
    /// No free block satisfies the strategy for the requested size
    #[error("out of space: no free block for {requested} bytes")]
    OutOfSpace { requested: usize },
    /// Address is not the start of a live allocation
    #[error("address {address:#x} is not allocated")]
    UnknownAddress { address: usize },
    /// Managed range must hold at least one address
    #[error("capacity must be positive")]
    InvalidCapacity,
    /// `base + capacity` does not fit in the address type
    #[error("range at {base:#x} with capacity {capacity} overflows the address space")]
    AddressOverflow { base: usize, capacity: usize },
    /// Strategy name not in the strategy table
    #[error("unknown allocation strategy '{0}'")]
    UnknownStrategy(String),
    /// Free list and allocation table no longer partition the range
    #[error("partition invariant violated: {0}")]
    CorruptPartition(String),
}

impl From<RangeError> for AllocationError {
    fn from(err: RangeError) -> Self {
        AllocationError::CorruptPartition(err.to_string())
    }
}

/// Snapshot of allocator occupancy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocatorStats {
    pub free_bytes: usize,
    pub allocated_bytes: usize,
    pub free_blocks: usize,
    pub allocated_blocks: usize,
    pub largest_free_block: usize,
    /// `1 - largest_free_block / free_bytes`, or 0.0 when nothing is free
    pub fragmentation: f64,
}

/// Dynamic partition allocator over `[base, base + capacity)`
///
/// Single-threaded: both operations take `&mut self`. Wrap the allocator in a
/// `Mutex` to share it, holding the lock for the whole operation.
#[derive(Debug)]
pub struct PartitionAllocator {
    base: usize,
    capacity: usize,
    free_list: FreeList,
    allocations: AllocationTable,
    strategy: Box<dyn PlacementStrategy>,
}

impl PartitionAllocator {
    /// Create an allocator using one of the built-in strategies
    ///
    /// # Errors
    ///
    /// - `AllocationError::InvalidCapacity` if `capacity` is 0
    /// - `AllocationError::AddressOverflow` if `base + capacity` overflows
    pub fn new(
        base: usize,
        capacity: usize,
        strategy: AllocationStrategy,
    ) -> Result<Self, AllocationError> {
        Self::with_strategy(base, capacity, strategy.create())
    }

    /// Create an allocator driven by a caller-supplied strategy
    pub fn with_strategy(
        base: usize,
        capacity: usize,
        strategy: Box<dyn PlacementStrategy>,
    ) -> Result<Self, AllocationError> {
        if capacity == 0 {
            return Err(AllocationError::InvalidCapacity);
        }
        if base.checked_add(capacity).is_none() {
            return Err(AllocationError::AddressOverflow { base, capacity });
        }
        debug!(
            "creating {} allocator over [{:#x}, {:#x})",
            strategy.name(),
            base,
            base + capacity
        );
        Ok(Self {
            base,
            capacity,
            free_list: FreeList::with_range(AddressRange::new(base, capacity)),
            allocations: AllocationTable::new(),
            strategy,
        })
    }

    /// Allocate `size` addresses, returning the start address
    ///
    /// Returns `None` for negative sizes and when no free block satisfies the
    /// strategy. A zero-size request returns the start of the block the
    /// strategy would pick without consuming anything.
    pub fn allocate(&mut self, size: isize) -> Option<usize> {
        match self.try_allocate(size) {
            Ok(address) => Some(address),
            Err(err) => {
                debug!("{}: allocation of {} failed: {}", self.strategy.name(), size, err);
                None
            }
        }
    }

    /// Allocate `size` addresses, reporting why a request failed
    ///
    /// # Errors
    ///
    /// - `AllocationError::InvalidSize` if `size` is negative
    /// - `AllocationError::OutOfSpace` if the strategy finds no block
    /// - `AllocationError::CorruptPartition` if the strategy picks a block that
    ///   is too small or not free, or the address is already allocated; state
    ///   is unchanged
    pub fn try_allocate(&mut self, size: isize) -> Result<usize, AllocationError> {
        let size = usize::try_from(size)
            .map_err(|_| AllocationError::InvalidSize { requested: size })?;

        let candidate = self
            .strategy
            .select(&self.free_list, size)
            .ok_or(AllocationError::OutOfSpace { requested: size })?;
        trace!("{}: selected {} for {} bytes", self.strategy.name(), candidate, size);

        let (taken, remainder) = candidate.split_at(size).ok_or_else(|| {
            AllocationError::CorruptPartition(format!(
                "{} selected {} for {} bytes",
                self.strategy.name(),
                candidate,
                size
            ))
        })?;
        // Zero-size ranges leave the free list untouched
        self.free_list.remove(taken)?;
        if !taken.is_empty() && !remainder.is_empty() {
            trace!("split {} into {} allocated and {} free", candidate, taken, remainder);
        }

        if let Err(err) = self.allocations.record(taken.address, size) {
            self.free_list.insert(taken)?;
            return Err(err.into());
        }

        debug!("{}: allocated {}", self.strategy.name(), taken);
        debug_assert!(self.check_invariants().is_ok());
        Ok(taken.address)
    }

    /// Free the allocation starting at `address`
    ///
    /// Returns `false` when `address` is not the start of a live allocation.
    pub fn free(&mut self, address: usize) -> bool {
        match self.try_free(address) {
            Ok(_) => true,
            Err(err) => {
                debug!("{}: free failed: {}", self.strategy.name(), err);
                false
            }
        }
    }

    /// Free the allocation starting at `address`, returning its size
    ///
    /// # Errors
    ///
    /// `AllocationError::UnknownAddress` if `address` was never allocated, was
    /// already freed, or points into the middle of a block.
    pub fn try_free(&mut self, address: usize) -> Result<usize, AllocationError> {
        let size = self
            .allocations
            .get(address)
            .ok_or(AllocationError::UnknownAddress { address })?;
        let range = AddressRange::new(address, size);

        let merged = self.free_list.insert(range)?;
        self.allocations.release(address);
        if merged != range {
            trace!("coalesced {} into {}", range, merged);
        }

        debug!("{}: freed {}", self.strategy.name(), range);
        debug_assert!(self.check_invariants().is_ok());
        Ok(range.size)
    }

    /// Free ranges in ascending address order
    pub fn free_blocks(&self) -> Vec<AddressRange> {
        self.free_list.to_vec()
    }

    /// Borrow the free list for iteration without copying
    pub fn free_list(&self) -> &FreeList {
        &self.free_list
    }

    /// Live allocations in ascending address order, zero-size ones included
    pub fn allocated_blocks(&self) -> Vec<AddressRange> {
        self.allocations.to_vec()
    }

    /// Size recorded for the allocation starting at `address`
    pub fn allocated_size(&self, address: usize) -> Option<usize> {
        self.allocations.get(address)
    }

    pub fn is_allocated(&self, address: usize) -> bool {
        self.allocations.contains(address)
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// One past the last managed address
    pub fn end(&self) -> usize {
        self.base + self.capacity
    }

    pub fn managed_range(&self) -> AddressRange {
        AddressRange::new(self.base, self.capacity)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn free_space(&self) -> usize {
        self.free_list.total_size()
    }

    pub fn allocated_space(&self) -> usize {
        self.allocations.total_size()
    }

    pub fn largest_free_block(&self) -> Option<AddressRange> {
        self.free_list.largest()
    }

    pub fn stats(&self) -> AllocatorStats {
        let free_bytes = self.free_space();
        let largest = self.largest_free_block().map_or(0, |block| block.size);
        let fragmentation = if free_bytes == 0 {
            0.0
        } else {
            1.0 - largest as f64 / free_bytes as f64
        };
        AllocatorStats {
            free_bytes,
            allocated_bytes: self.allocated_space(),
            free_blocks: self.free_list.len(),
            allocated_blocks: self.allocations.len(),
            largest_free_block: largest,
            fragmentation,
        }
    }

    /// Return to the freshly constructed state
    pub fn reset(&mut self) {
        debug!("{}: reset, dropping {} allocations", self.strategy.name(), self.allocations.len());
        self.free_list = FreeList::with_range(self.managed_range());
        self.allocations.clear();
        self.strategy.reset();
    }

    /// Verify that free and allocated ranges partition the managed range
    ///
    /// Checks that the free list is sorted, coalesced and in range, that every
    /// allocation lies in range, and that free and allocated ranges together
    /// cover every managed address exactly once.
    ///
    /// # Errors
    ///
    /// `AllocationError::CorruptPartition` describing the first violation.
    pub fn check_invariants(&self) -> Result<(), AllocationError> {
        let result = self.find_violation();
        if let Err(err) = &result {
            warn!("{}", err);
        }
        result
    }

    fn find_violation(&self) -> Result<(), AllocationError> {
        let corrupt = |msg: String| Err(AllocationError::CorruptPartition(msg));
        let end = self.end();

        let free = self.free_list.to_vec();
        for block in &free {
            if block.is_empty() {
                return corrupt(format!("empty free block at {:#x}", block.address));
            }
        }
        for pair in free.windows(2) {
            if pair[0].end() >= pair[1].address {
                return corrupt(format!("free blocks {} and {} not coalesced", pair[0], pair[1]));
            }
        }

        let managed = self.managed_range();
        for block in self.allocations.iter() {
            if !managed.contains(block.address) || !managed.covers(&block) {
                return corrupt(format!("allocation {} outside managed range", block));
            }
        }

        let live: Vec<AddressRange> = self
            .allocations
            .iter()
            .filter(|block| !block.is_empty())
            .collect();
        for block in self.allocations.iter().filter(AddressRange::is_empty) {
            let idx = live.partition_point(|other| other.address < block.address);
            if idx > 0 && live[idx - 1].contains(block.address) {
                return corrupt(format!(
                    "zero-size allocation at {:#x} inside {}",
                    block.address,
                    live[idx - 1]
                ));
            }
        }

        let mut covered: Vec<AddressRange> = free.into_iter().chain(live).collect();
        covered.sort_unstable();

        let mut expected = self.base;
        for block in covered {
            if block.address != expected {
                let what = if block.address > expected { "gap" } else { "overlap" };
                return corrupt(format!("{} at {:#x} before {}", what, expected, block));
            }
            expected = block.end();
        }
        if expected != end {
            return corrupt(format!("coverage ends at {:#x}, range ends at {:#x}", expected, end));
        }
        Ok(())
    }
}
