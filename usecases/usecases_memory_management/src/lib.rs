//! Use Cases Layer: Memory Management
//!
//! Dynamic partitioned memory allocation over a contiguous logical address
//! range, with interchangeable placement strategies behind one allocator.
//!
//! ## Overview
//!
//! The `usecases_memory_management` crate is the use cases layer of the
//! allocator workspace. It builds on the address-space entities (free list,
//! allocation table) and provides the placement policies, the allocator engine
//! that splits on allocate and coalesces on free, and a factory for wiring the
//! two together. The "memory" has no backing storage; addresses are integers.
//!
//! ## Placement Strategies
//!
//! - **[`firstfit`](firstfit/index.html)**: First-fit - uses the first block that
//!   can satisfy the request, prioritizing selection speed
//!
//! - **[`bestfit`](bestfit/index.html)**: Best-fit - finds the smallest block that
//!   can satisfy the request, minimizing leftover space
//!
//! - **[`worstfit`](worstfit/index.html)**: Worst-fit - always carves from the
//!   largest block, ties going to the lowest address
//!
//! - **[`nextfit`](nextfit/index.html)**: Next-fit - first-fit with a roving
//!   cursor that wraps around the range
//!
//! - **[`strategy`](strategy/index.html)**: The `PlacementStrategy` trait
//!
//! ## Allocation
//!
//! - **[`allocator`](allocator/index.html)**: `PartitionAllocator` and
//!   `AllocationError`
//! - **[`factory`](factory/index.html)**: `AllocationStrategy`, `AllocatorConfig`
//!   and `create_allocator`
//!
//! ## Logging
//!
//! Operations report through the `log` facade: `debug` for allocation and free
//! outcomes, `trace` for strategy selection, splitting and coalescing, `warn`
//! for invariant violations. No logger is installed here.
//!
//! ## See Also
//!
//! - [`entities_address_space`](../entities_address_space/index.html): ranges,
//!   free list and allocation table

pub mod allocator;
pub mod bestfit;
pub mod factory;
pub mod firstfit;
pub mod nextfit;
pub mod strategy;
pub mod worstfit;

pub use allocator::{AllocationError, AllocatorStats, PartitionAllocator};
pub use bestfit::BestFit;
pub use factory::{create_allocator, AllocationStrategy, AllocatorConfig, STRATEGY_NAMES};
pub use firstfit::FirstFit;
pub use nextfit::NextFit;
pub use strategy::PlacementStrategy;
pub use worstfit::WorstFit;

pub use entities_address_space::AddressRange;
