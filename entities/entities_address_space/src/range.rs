//! Address Range Module
//!
//! Provides the `AddressRange` value type shared by free lists and allocation
//! tables, together with the `RangeError` type reported by collections that
//! store ranges.
//!
//! A range is a half-open interval `[address, address + size)` over a purely
//! logical address space. Nothing is backed by real memory.

use std::fmt;
use thiserror::Error;

/// A contiguous span of logical addresses
///
/// Used both for free blocks and for allocated blocks. A range with `size == 0`
/// is empty and covers no addresses.
///
/// # Examples
///
/// ```rust
/// use entities_address_space::AddressRange;
///
/// let a = AddressRange::new(128, 32);
/// let b = AddressRange::new(160, 64);
/// assert_eq!(a.end(), 160);
/// assert!(a.is_adjacent_to(&b));
/// assert!(!a.overlaps(&b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddressRange {
    /// First address covered by the range
    pub address: usize,
    /// Number of addresses covered
    pub size: usize,
}

impl AddressRange {
    /// Create a new range starting at `address` spanning `size` addresses
    pub const fn new(address: usize, size: usize) -> Self {
        Self { address, size }
    }

    /// One past the last address covered by the range
    ///
    /// Saturates at `usize::MAX`; collections reject ranges whose end would
    /// overflow before storing them.
    pub const fn end(&self) -> usize {
        self.address.saturating_add(self.size)
    }

    /// Checked variant of [`end`](Self::end)
    pub fn checked_end(&self) -> Option<usize> {
        self.address.checked_add(self.size)
    }

    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// `true` if `self` ends exactly where `other` begins
    pub fn is_adjacent_to(&self, other: &AddressRange) -> bool {
        self.checked_end() == Some(other.address)
    }

    /// `true` if the two ranges share at least one address
    ///
    /// Empty ranges never overlap anything.
    pub fn overlaps(&self, other: &AddressRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.address < other.end()
            && other.address < self.end()
    }

    /// `true` if `address` lies inside the range
    pub fn contains(&self, address: usize) -> bool {
        address >= self.address && address < self.end()
    }

    /// `true` if every address of `other` lies inside `self`
    ///
    /// An empty `other` is covered when its start lies within `[address, end]`.
    pub fn covers(&self, other: &AddressRange) -> bool {
        other.address >= self.address && other.end() <= self.end()
    }

    /// Split the range after `size` addresses
    ///
    /// Returns the prefix of length `size` and the remainder. Returns `None`
    /// when `size` exceeds the range.
    pub fn split_at(&self, size: usize) -> Option<(AddressRange, AddressRange)> {
        if size > self.size {
            return None;
        }
        Some((
            AddressRange::new(self.address, size),
            AddressRange::new(self.address + size, self.size - size),
        ))
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x}) ({} bytes)", self.address, self.end(), self.size)
    }
}

/// Errors reported by range collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The range would share addresses with an entry already stored
    #[error("range {range} overlaps existing entry {existing}")]
    Overlap {
        range: AddressRange,
        existing: AddressRange,
    },
    /// The range is not fully contained in a single free entry
    #[error("range {0} is not free")]
    NotFree(AddressRange),
    /// `address + size` does not fit in a `usize`
    #[error("range at {address:#x} with size {size} overflows the address space")]
    Overflow { address: usize, size: usize },
    /// An entry already exists at this address
    #[error("address {0:#x} is already recorded")]
    Duplicate(usize),
}
