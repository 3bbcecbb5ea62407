//! State Table - Cache-Line Probed Hash Set
//!
//! # Overview
//!
//! An open-addressing set of fixed-length `i32` vectors. Every lookup touches
//! a bounded number of cache lines: probing is linear inside the 16-slot
//! window of the current hash and moves to another window only by rehashing
//! the key with a new seed.
//!
//! # Probe Sequence
//!
//! ```text
//! mem = hash(key, 0)
//! h_0 = tag(mem)
//! attempt i:   window of (h_i & (capacity - 1)), scanned from that slot, wrapping in the window
//! h_{i+1}   =  hash(key, h_i + i)
//! ```
//!
//! The stored fingerprint keeps the tag of `mem`, and the whole probe
//! sequence derives from that tag, so an entry can be moved by resize
//! without rehashing its payload.
//!
//! # Growth
//!
//! Storage for `max_capacity` slots is reserved at creation. Growth doubles
//! the *logical* capacity inside that storage:
//!
//! ```text
//! resize(old → 2·old)
//!   1. scan [0, old): tombstones → EMPTY
//!                     entries at their home slot under the new mask stay
//!                     all others → staging area, slot → EMPTY
//!   2. zero [old, 2·old)
//!   3. reinsert staged entries with their stored hash
//! ```
//!
//! Staged entries are kept outside the logical table until every slot they
//! may land in is settled, so vacating a staging slot can never open a hole
//! in the probe chain of an entry reinserted before it.
//!
//! # Physical Laws
//!
//! - **H-001**: `lookup_or_insert` of a member always returns `Found`
//! - **H-002**: `load * 4 <= capacity * 3` holds after every insert
//! - **H-003**: Storage is never reallocated after `new`

mod storage;
mod types;

#[cfg(kani)]
mod proofs;

pub use types::{
    Fingerprint, Lookup, TableConfig, TableError, TableStats, CACHE_LINE_BYTES,
    DEFAULT_INITIAL_CAPACITY_POW2, DEFAULT_MAX_CAPACITY_POW2, MAX_CAPACITY_POW2_LIMIT,
    MAX_PROBE_ATTEMPTS, PROBE_WINDOW,
};

use crate::domain::fingerprint::hash_state;
use storage::{SlotIndex, SlotStorage};
use tracing::{debug, warn};

/// Result of walking a key's probe sequence
#[derive(Debug, Clone, Copy)]
enum Probe {
    /// Key stored at `slot`; `tombstone` is an earlier free slot in the same window
    Hit { slot: SlotIndex, tombstone: Option<SlotIndex> },

    /// Key absent; `slot` is where it belongs
    Vacant { slot: SlotIndex, reclaims_tombstone: bool },

    /// Probe attempts used up without a decision
    Exhausted,
}

/// Open-addressing set of fixed-length state vectors
///
/// # Memory Layout
///
/// ```text
/// StateTable
/// ├─ storage.lines: Vec<FingerprintLine>  (64-byte aligned, 16 fingerprints each)
/// ├─ storage.keys:  Vec<i32>              (key_length words per slot)
/// ├─ staging:       Vec<(u32, i32...)>    (entries displaced by the running resize)
/// └─ capacity / load counters
/// ```
///
/// # Example
///
/// ```rust
/// use krepis_reach::domain::table::{Lookup, StateTable, TableConfig};
///
/// let mut table = StateTable::new(TableConfig::new(2).initial(2).max(4)).unwrap();
/// for i in 0..12 {
///     assert_eq!(table.lookup_or_insert(&[i, -i]), Lookup::Inserted);
/// }
/// // 16 slots at 75% load: the next new key cannot be stored
/// assert_eq!(table.lookup_or_insert(&[99, 99]), Lookup::Full);
/// // Members are still found
/// assert_eq!(table.lookup_or_insert(&[3, -3]), Lookup::Found);
/// ```
pub struct StateTable {
    config: TableConfig,
    storage: SlotStorage,
    capacity: usize,
    load: usize,

    /// Hashes of staged entries, parallel to `staging_keys`
    staging_hashes: Vec<u32>,
    staging_keys: Vec<i32>,

    resizes: usize,
    relocations: usize,
    tombstones_reclaimed: usize,
}

impl StateTable {
    /// Create a table and reserve storage for its maximum capacity
    ///
    /// # Errors
    ///
    /// - `InvalidCapacity` / `CapacityTooLarge` for bad geometry (nothing is
    ///   allocated)
    /// - `AllocationFailure` when the storage cannot be reserved
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        config.validate()?;

        let storage = SlotStorage::allocate(config.max_capacity(), config.key_length)?;
        debug!(
            key_length = config.key_length,
            initial = config.initial_capacity(),
            max = config.max_capacity(),
            bytes = storage.footprint(),
            "state table allocated"
        );

        let mut table = Self {
            config,
            storage,
            capacity: config.initial_capacity(),
            load: 0,
            staging_hashes: Vec::new(),
            staging_keys: Vec::new(),
            resizes: 0,
            relocations: 0,
            tombstones_reclaimed: 0,
        };
        table.clear();
        Ok(table)
    }

    /// Forget every member without releasing storage
    ///
    /// Only the fingerprints of the initial capacity are rewritten; slots
    /// beyond it are zeroed by the resize that brings them back into range.
    pub fn clear(&mut self) {
        self.load = 0;
        self.capacity = self.config.initial_capacity();
        self.resizes = 0;
        self.relocations = 0;
        self.tombstones_reclaimed = 0;
        self.storage.clear_range(0, self.capacity);
    }

    /// Insert `key` unless it is already a member
    ///
    /// # Panics
    ///
    /// Panics if `key.len()` differs from the configured key length.
    pub fn lookup_or_insert(&mut self, key: &[i32]) -> Lookup {
        self.check_length(key);
        let mem = hash_state(key, 0);
        self.lookup_hashed(key, mem)
    }

    /// Check membership without modifying the table
    ///
    /// # Panics
    ///
    /// Panics if `key.len()` differs from the configured key length.
    pub fn contains(&self, key: &[i32]) -> bool {
        self.check_length(key);
        matches!(self.probe(key, hash_state(key, 0)), Probe::Hit { .. })
    }

    /// Remove `key`, leaving a tombstone in its slot
    ///
    /// Returns whether the key was a member.
    ///
    /// # Panics
    ///
    /// Panics if `key.len()` differs from the configured key length.
    pub fn remove(&mut self, key: &[i32]) -> bool {
        self.check_length(key);
        match self.probe(key, hash_state(key, 0)) {
            Probe::Hit { slot, .. } => {
                self.storage.set_fingerprint(slot, Fingerprint::TOMBSTONE);
                self.load -= 1;
                true
            }
            _ => false,
        }
    }

    /// Double the logical capacity
    ///
    /// Returns `false` when the table is already at its maximum capacity.
    pub fn resize(&mut self) -> bool {
        if self.capacity >= self.config.max_capacity() {
            return false;
        }

        let old = self.capacity;
        let new = old << 1;
        let new_mask = new - 1;
        self.capacity = new;

        self.staging_hashes.clear();
        self.staging_keys.clear();

        for raw in 0..old {
            let slot = self.storage.index(raw);
            let fp = self.storage.fingerprint(slot);
            if fp.is_empty() {
                continue;
            }
            if fp.is_tombstone() {
                self.storage.set_fingerprint(slot, Fingerprint::EMPTY);
                self.tombstones_reclaimed += 1;
                continue;
            }
            if (fp.tag() as usize & new_mask) == raw {
                continue;
            }
            self.staging_hashes.push(fp.tag());
            self.staging_keys.extend_from_slice(self.storage.key(slot));
            self.storage.set_fingerprint(slot, Fingerprint::EMPTY);
            self.load -= 1;
        }

        self.storage.clear_range(old, new);

        let len = self.config.key_length;
        let hashes = std::mem::take(&mut self.staging_hashes);
        let keys = std::mem::take(&mut self.staging_keys);
        for (k, &mem) in hashes.iter().enumerate() {
            self.reinsert(mem, &keys[k * len..(k + 1) * len]);
        }
        let moved = hashes.len();
        self.staging_hashes = hashes;
        self.staging_keys = keys;

        self.resizes += 1;
        debug!(capacity = new, load = self.load, moved, "state table resized");
        true
    }

    /// Occupied slots
    pub const fn load(&self) -> usize {
        self.load
    }

    /// Current logical capacity
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Capacity bound
    pub const fn max_capacity(&self) -> usize {
        self.config.max_capacity()
    }

    /// Words per key
    pub const fn key_length(&self) -> usize {
        self.config.key_length
    }

    /// Geometry this table was created with
    pub const fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Whether the table holds no members
    pub const fn is_empty(&self) -> bool {
        self.load == 0
    }

    /// Statistics snapshot
    pub const fn stats(&self) -> TableStats {
        TableStats {
            load: self.load,
            capacity: self.capacity,
            max_capacity: self.config.max_capacity(),
            resizes: self.resizes,
            relocations: self.relocations,
            tombstones_reclaimed: self.tombstones_reclaimed,
        }
    }

    /// `Full` as an error carrying the configured bound
    pub const fn full_error(&self) -> TableError {
        TableError::Full {
            max_capacity_pow2: self.config.max_capacity_pow2,
            load: self.load,
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    // Internals
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    fn check_length(&self, key: &[i32]) {
        assert_eq!(
            key.len(),
            self.config.key_length,
            "state has {} slots, table expects {}",
            key.len(),
            self.config.key_length
        );
    }

    /// Whether one more entry keeps `load <= 3/4 capacity`
    #[inline(always)]
    const fn has_room(&self) -> bool {
        (self.load + 1) * 4 <= self.capacity * 3
    }

    fn lookup_hashed(&mut self, key: &[i32], mem: u32) -> Lookup {
        loop {
            match self.probe(key, mem) {
                Probe::Hit { slot, tombstone: Some(tomb) } => {
                    // Pull the entry forward so the next lookup stops earlier
                    self.storage.copy_entry(slot, tomb);
                    self.storage.set_fingerprint(slot, Fingerprint::TOMBSTONE);
                    self.relocations += 1;
                    return Lookup::Found;
                }
                Probe::Hit { tombstone: None, .. } => return Lookup::Found,
                Probe::Vacant { slot, reclaims_tombstone } if self.has_room() => {
                    if reclaims_tombstone {
                        self.tombstones_reclaimed += 1;
                    }
                    self.occupy(slot, mem, key);
                    return Lookup::Inserted;
                }
                Probe::Vacant { .. } | Probe::Exhausted => {
                    if !self.resize() {
                        return Lookup::Full;
                    }
                }
            }
        }
    }

    /// Put a staged entry back, growing again if its windows are packed
    fn reinsert(&mut self, mem: u32, key: &[i32]) {
        if let Probe::Vacant { slot, .. } = self.probe(key, mem) {
            self.occupy(slot, mem, key);
            return;
        }
        if self.lookup_hashed(key, mem) == Lookup::Full {
            warn!(capacity = self.capacity, load = self.load, "staged entry dropped at max capacity");
        }
    }

    fn occupy(&mut self, slot: SlotIndex, mem: u32, key: &[i32]) {
        self.storage.write(slot, Fingerprint::occupied(mem), key);
        self.load += 1;
    }

    fn probe(&self, key: &[i32], mem: u32) -> Probe {
        let width = PROBE_WINDOW.min(self.capacity);
        let mask = self.capacity - 1;
        let mut h = Fingerprint::occupied(mem).tag();

        for attempt in 0..MAX_PROBE_ATTEMPTS {
            let start = h as usize & mask;
            let line_begin = start & !(width - 1);
            let mut tombstone = None;

            for step in 0..width {
                let slot = self.storage.index(line_begin + ((start + step) & (width - 1)));
                let fp = self.storage.fingerprint(slot);

                if fp.is_tombstone() {
                    tombstone.get_or_insert(slot);
                    continue;
                }
                if fp.is_empty() {
                    return Probe::Vacant {
                        slot: tombstone.unwrap_or(slot),
                        reclaims_tombstone: tombstone.is_some(),
                    };
                }
                if fp.matches(mem) && self.storage.key(slot) == key {
                    return Probe::Hit { slot, tombstone };
                }
            }

            h = hash_state(key, h.wrapping_add(attempt as u32));
        }

        Probe::Exhausted
    }
}

impl std::fmt::Debug for StateTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateTable")
            .field("key_length", &self.config.key_length)
            .field("load", &self.load)
            .field("capacity", &self.capacity)
            .field("max_capacity", &self.config.max_capacity())
            .finish_non_exhaustive()
    }
}
