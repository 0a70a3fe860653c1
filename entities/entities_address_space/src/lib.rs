//! Entities Layer: Address Space
//!
//! Core data types for partitioned memory management over a logical address
//! range. Nothing here touches real memory: addresses are plain integers and a
//! range is a bookkeeping record.
//!
//! ## Overview
//!
//! The `entities_address_space` crate is the innermost layer of the allocator
//! workspace. It has no dependencies on other workspace crates and is used by
//! the use cases layer to build placement strategies and the allocator engine.
//!
//! ## Modules
//!
//! - **[`range`](range/index.html)**: `AddressRange`, the `{address, size}` pair
//!   used for both free and allocated blocks, and `RangeError`.
//!
//! - **[`free_list`](free_list/index.html)**: `FreeList`, an address-ordered,
//!   always-coalesced set of free ranges with insert-and-merge, remove-and-split
//!   and ordered iteration.
//!
//! - **[`allocation_table`](allocation_table/index.html)**: `AllocationTable`,
//!   the mapping from allocated start address to reserved size.
//!
//! ## Usage
//!
//! ```rust
//! use entities_address_space::{AddressRange, AllocationTable, FreeList};
//!
//! let mut free = FreeList::with_range(AddressRange::new(0, 1024));
//! let mut table = AllocationTable::new();
//!
//! // Carve 128 bytes off the front
//! free.remove(AddressRange::new(0, 128)).unwrap();
//! table.record(0, 128).unwrap();
//!
//! // And give them back
//! let range = table.release(0).unwrap();
//! free.insert(range).unwrap();
//! assert_eq!(free.to_vec(), vec![AddressRange::new(0, 1024)]);
//! ```

pub mod allocation_table;
pub mod free_list;
pub mod range;

pub use allocation_table::AllocationTable;
pub use free_list::FreeList;
pub use range::{AddressRange, RangeError};
