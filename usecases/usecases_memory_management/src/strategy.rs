//! Placement Strategy Trait
//!
//! Defines the interface every placement policy implements. A strategy only
//! chooses a free block; splitting, bookkeeping and coalescing belong to the
//! allocator, which never branches on which strategy it holds.
//!
//! ## Strategies
//!
//! - **FirstFit**: lowest-addressed block that is large enough
//! - **BestFit**: smallest block that is large enough
//! - **WorstFit**: largest block overall
//! - **NextFit**: first fit, resuming after the previous selection
//!
//! ## See Also
//!
//! - [`allocator`](super::allocator/index.html): the engine that drives strategies
//! - [`factory`](super::factory/index.html): building strategies by name

use entities_address_space::{AddressRange, FreeList};
use std::fmt;

/// Policy choosing which free block an allocation is carved from
///
/// `select` returns the whole free block the allocation will start at; the
/// caller takes the first `size` addresses of it. Returning `None` reports that
/// no block satisfies the policy for `size`.
///
/// Implementations must be deterministic: the same free list, request and
/// internal state always yield the same block. Strategies are `Send` so that an
/// allocator holding one can be moved to another thread.
///
/// ## Examples
///
/// ```rust
/// use entities_address_space::{AddressRange, FreeList};
/// use usecases_memory_management::{FirstFit, PlacementStrategy};
///
/// let mut list = FreeList::new();
/// list.insert(AddressRange::new(0, 16)).unwrap();
/// list.insert(AddressRange::new(64, 128)).unwrap();
///
/// let mut strategy = FirstFit::new();
/// assert_eq!(strategy.select(&list, 32), Some(AddressRange::new(64, 128)));
/// assert_eq!(strategy.select(&list, 256), None);
/// ```
pub trait PlacementStrategy: fmt::Debug + Send {
    /// Pick the free block to allocate `size` addresses from
    fn select(&mut self, free_list: &FreeList, size: usize) -> Option<AddressRange>;

    /// Short stable name, e.g. `"worst-fit"`
    fn name(&self) -> &'static str;

    /// Forget any state carried between selections
    ///
    /// Stateless strategies keep the default no-op.
    fn reset(&mut self) {}
}
