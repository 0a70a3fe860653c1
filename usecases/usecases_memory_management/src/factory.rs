//! Allocator Factory
//!
//! Builds allocators from a strategy choice and a managed range.
//!
//! Strategy names resolve through the constant [`STRATEGY_NAMES`] table; there
//! is no registry to populate at runtime and every allocator built here is
//! independent of every other.
//!
//! ## Examples
//!
//! ```rust
//! use usecases_memory_management::{create_allocator, AllocationStrategy, AllocatorConfig};
//!
//! let allocator = create_allocator(0, 4096, AllocationStrategy::BestFit).unwrap();
//! assert_eq!(allocator.strategy_name(), "best-fit");
//!
//! let strategy: AllocationStrategy = "next_fit".parse().unwrap();
//! let allocator = AllocatorConfig::new(0x1000, 512).with_strategy(strategy).build().unwrap();
//! assert_eq!(allocator.capacity(), 512);
//! ```

use super::allocator::{AllocationError, PartitionAllocator};
use super::bestfit::BestFit;
use super::firstfit::FirstFit;
use super::nextfit::NextFit;
use super::strategy::PlacementStrategy;
use super::worstfit::WorstFit;
use std::fmt;
use std::str::FromStr;

/// Built-in placement strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllocationStrategy {
    /// Lowest-addressed block that fits
    FirstFit,
    /// Smallest block that fits
    BestFit,
    /// Largest block
    WorstFit,
    /// First fit resuming after the previous allocation
    NextFit,
}

/// Canonical name of every built-in strategy
pub const STRATEGY_NAMES: [(&str, AllocationStrategy); 4] = [
    ("first-fit", AllocationStrategy::FirstFit),
    ("best-fit", AllocationStrategy::BestFit),
    ("worst-fit", AllocationStrategy::WorstFit),
    ("next-fit", AllocationStrategy::NextFit),
];

impl AllocationStrategy {
    pub const ALL: [AllocationStrategy; 4] = [
        AllocationStrategy::FirstFit,
        AllocationStrategy::BestFit,
        AllocationStrategy::WorstFit,
        AllocationStrategy::NextFit,
    ];

    /// Canonical name, as listed in [`STRATEGY_NAMES`]
    pub fn name(self) -> &'static str {
        match self {
            AllocationStrategy::FirstFit => "first-fit",
            AllocationStrategy::BestFit => "best-fit",
            AllocationStrategy::WorstFit => "worst-fit",
            AllocationStrategy::NextFit => "next-fit",
        }
    }

    /// Fresh strategy instance
    pub fn create(self) -> Box<dyn PlacementStrategy> {
        match self {
            AllocationStrategy::FirstFit => Box::new(FirstFit::new()),
            AllocationStrategy::BestFit => Box::new(BestFit::new()),
            AllocationStrategy::WorstFit => Box::new(WorstFit::new()),
            AllocationStrategy::NextFit => Box::new(NextFit::new()),
        }
    }
}

impl fmt::Display for AllocationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AllocationStrategy {
    type Err = AllocationError;

    /// Accepts `worst-fit`, `worst_fit`, `worstfit` and `WorstFit`, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        STRATEGY_NAMES
            .iter()
            .find(|(name, _)| normalize(name) == wanted)
            .map(|&(_, strategy)| strategy)
            .ok_or_else(|| AllocationError::UnknownStrategy(s.to_string()))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Construction parameters for a [`PartitionAllocator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// First managed address
    pub base: usize,
    /// Number of managed addresses
    pub capacity: usize,
    pub strategy: AllocationStrategy,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            base: 0,
            capacity: 1024,
            strategy: AllocationStrategy::WorstFit,
        }
    }
}

impl AllocatorConfig {
    /// Configuration for `[base, base + capacity)` with the default strategy
    pub fn new(base: usize, capacity: usize) -> Self {
        Self {
            base,
            capacity,
            ..Self::default()
        }
    }

    pub fn with_strategy(mut self, strategy: AllocationStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the range without building anything
    ///
    /// # Errors
    ///
    /// - `AllocationError::InvalidCapacity` if `capacity` is 0
    /// - `AllocationError::AddressOverflow` if `base + capacity` overflows
    pub fn validate(&self) -> Result<(), AllocationError> {
        if self.capacity == 0 {
            return Err(AllocationError::InvalidCapacity);
        }
        self.base
            .checked_add(self.capacity)
            .map(|_| ())
            .ok_or(AllocationError::AddressOverflow {
                base: self.base,
                capacity: self.capacity,
            })
    }

    pub fn build(&self) -> Result<PartitionAllocator, AllocationError> {
        self.validate()?;
        PartitionAllocator::new(self.base, self.capacity, self.strategy)
    }
}

/// Create an allocator managing `[base, base + capacity)` with `strategy`
///
/// The allocator starts with one free block spanning the whole range.
///
/// # Errors
///
/// See [`AllocatorConfig::validate`].
pub fn create_allocator(
    base: usize,
    capacity: usize,
    strategy: AllocationStrategy,
) -> Result<PartitionAllocator, AllocationError> {
    AllocatorConfig::new(base, capacity)
        .with_strategy(strategy)
        .build()
}
