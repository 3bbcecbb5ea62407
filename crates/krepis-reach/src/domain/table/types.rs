//! State Table Types
//!
//! Configuration, lookup results, errors and the fingerprint word encoding.
//!
//! # Fingerprint Encoding
//!
//! ```text
//! 0x0000_0000            EMPTY      (never written)
//! 0x0000_0001            TOMBSTONE  (removed or relocated, still probed through)
//! 1ttt_tttt ... tttt     OCCUPIED   (top bit set, 31 tag bits of the key hash)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bytes per probe group (one cache line)
pub const CACHE_LINE_BYTES: usize = 64;

/// Fingerprint words per probe group
pub const PROBE_WINDOW: usize = CACHE_LINE_BYTES / std::mem::size_of::<Fingerprint>();

/// Rehash attempts per lookup before the table is grown instead
pub const MAX_PROBE_ATTEMPTS: usize = 64;

/// Largest supported `max_capacity_pow2`
pub const MAX_CAPACITY_POW2_LIMIT: u32 = 30;

/// Default initial capacity exponent
pub const DEFAULT_INITIAL_CAPACITY_POW2: u32 = 4;

/// Default maximum capacity exponent
pub const DEFAULT_MAX_CAPACITY_POW2: u32 = 15;

/// Stored per-slot summary word
///
/// # Invariants
///
/// - An occupied fingerprint is never equal to `EMPTY` or `TOMBSTONE`
/// - The tag of an occupied fingerprint is the initial hash of its key,
///   masked to the low 31 bits
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Fingerprint(u32);

impl Fingerprint {
    /// Slot never written since the last clear
    pub const EMPTY: Self = Self(0);

    /// Slot vacated by removal or relocation
    pub const TOMBSTONE: Self = Self(1);

    const OCCUPIED: u32 = 1 << 31;
    const TAG_MASK: u32 = !Self::OCCUPIED;

    /// Fingerprint of an occupied slot whose key hashed to `hash`
    #[inline(always)]
    pub const fn occupied(hash: u32) -> Self {
        Self((hash & Self::TAG_MASK) | Self::OCCUPIED)
    }

    /// Check for a never-written slot
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// Check for a tombstone
    #[inline(always)]
    pub const fn is_tombstone(self) -> bool {
        self.0 == Self::TOMBSTONE.0
    }

    /// Check for an occupied slot
    #[inline(always)]
    pub const fn is_occupied(self) -> bool {
        self.0 & Self::OCCUPIED != 0
    }

    /// Hash tag bits (occupied marker stripped)
    #[inline(always)]
    pub const fn tag(self) -> u32 {
        self.0 & Self::TAG_MASK
    }

    /// Check whether this slot may hold a key that hashed to `hash`
    ///
    /// The tag bits are compared explicitly; the key comparison that follows
    /// is authoritative.
    #[inline(always)]
    pub const fn matches(self, hash: u32) -> bool {
        self.is_occupied() && self.tag() == hash & Self::TAG_MASK
    }

    /// Raw word
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Empty")
        } else if self.is_tombstone() {
            write!(f, "Tombstone")
        } else {
            write!(f, "Occupied({:#010x})", self.tag())
        }
    }
}

/// Table geometry
///
/// # Example
///
/// ```rust
/// use krepis_reach::domain::table::TableConfig;
///
/// let config = TableConfig::new(10).initial(2).max(10);
/// assert_eq!(config.initial_capacity(), 4);
/// assert_eq!(config.max_capacity(), 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Slots per state vector
    pub key_length: usize,

    /// Capacity after creation and after every clear, as a power of two
    pub initial_capacity_pow2: u32,

    /// Capacity bound, as a power of two; storage is allocated for it up front
    pub max_capacity_pow2: u32,
}

impl TableConfig {
    /// Configuration with default capacities for states of `key_length` slots
    pub const fn new(key_length: usize) -> Self {
        Self {
            key_length,
            initial_capacity_pow2: DEFAULT_INITIAL_CAPACITY_POW2,
            max_capacity_pow2: DEFAULT_MAX_CAPACITY_POW2,
        }
    }

    /// Set the initial capacity exponent
    #[must_use]
    pub const fn initial(mut self, pow2: u32) -> Self {
        self.initial_capacity_pow2 = pow2;
        self
    }

    /// Set the maximum capacity exponent
    #[must_use]
    pub const fn max(mut self, pow2: u32) -> Self {
        self.max_capacity_pow2 = pow2;
        self
    }

    /// Initial slot count
    pub const fn initial_capacity(&self) -> usize {
        1 << self.initial_capacity_pow2
    }

    /// Maximum slot count
    pub const fn max_capacity(&self) -> usize {
        1 << self.max_capacity_pow2
    }

    /// Reject bad geometry before anything is allocated
    ///
    /// # Errors
    ///
    /// - `InvalidCapacity` if the initial capacity is not below the maximum
    /// - `CapacityTooLarge` if the maximum exceeds `MAX_CAPACITY_POW2_LIMIT`
    pub const fn validate(&self) -> Result<(), TableError> {
        if self.initial_capacity_pow2 >= self.max_capacity_pow2 {
            return Err(TableError::InvalidCapacity {
                initial_pow2: self.initial_capacity_pow2,
                max_pow2: self.max_capacity_pow2,
            });
        }
        if self.max_capacity_pow2 > MAX_CAPACITY_POW2_LIMIT {
            return Err(TableError::CapacityTooLarge {
                max_pow2: self.max_capacity_pow2,
                limit_pow2: MAX_CAPACITY_POW2_LIMIT,
            });
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Outcome of `StateTable::lookup_or_insert`
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Key was new and has been stored
    Inserted,

    /// Key was already a member
    Found,

    /// Key is new but the table is at max capacity and over its load bound
    Full,
}

/// Table statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableStats {
    /// Occupied slots
    pub load: usize,

    /// Current logical capacity
    pub capacity: usize,

    /// Capacity bound
    pub max_capacity: usize,

    /// Doublings since the last clear
    pub resizes: usize,

    /// Entries moved forward into a tombstone on lookup
    pub relocations: usize,

    /// Tombstones turned back into usable slots (by insert or resize)
    pub tombstones_reclaimed: usize,
}

impl TableStats {
    /// Occupied fraction of the current capacity
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.load as f64 / self.capacity as f64
        }
    }
}

/// State table errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Initial capacity must be strictly below the maximum
    #[error("invalid table capacity: initial 2^{initial_pow2} must be below max 2^{max_pow2}")]
    InvalidCapacity {
        /// Requested initial exponent
        initial_pow2: u32,
        /// Requested maximum exponent
        max_pow2: u32,
    },

    /// Maximum capacity beyond what the fingerprint index can address
    #[error("table capacity 2^{max_pow2} exceeds the supported 2^{limit_pow2}")]
    CapacityTooLarge {
        /// Requested maximum exponent
        max_pow2: u32,
        /// Supported maximum exponent
        limit_pow2: u32,
    },

    /// Backing storage could not be reserved
    #[error("failed to allocate {bytes} bytes aligned at {align} for the state table")]
    AllocationFailure {
        /// Requested size
        bytes: usize,
        /// Requested alignment
        align: usize,
    },

    /// Table exhausted at its configured bound
    #[error(
        "state table is full (max size = 2^{max_capacity_pow2}, load = {load}); \
         increase max_capacity_pow2"
    )]
    Full {
        /// Configured bound exponent
        max_capacity_pow2: u32,
        /// Occupied slots at the time of failure
        load: usize,
    },
}

impl TableError {
    /// Whether rerunning with a larger configuration can succeed
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Full { .. })
    }
}
