//! Slot Storage
//!
//! Two same-length arrays addressed by one `SlotIndex`:
//!
//! ```text
//! lines: [FingerprintLine; max_capacity / 16]   64-byte aligned, one probe group each
//! keys:  [i32; max_capacity * key_length]       payload of slot i at i * key_length
//! ```
//!
//! Both are reserved once for the maximum capacity. A `SlotIndex` can only be
//! obtained from `SlotStorage::index`, which checks it against that bound.

use super::types::{Fingerprint, TableError, CACHE_LINE_BYTES, PROBE_WINDOW};
use std::mem::{align_of, size_of};

/// One probe group of fingerprints
#[derive(Clone, Copy, Default)]
#[repr(C, align(64))]
struct FingerprintLine([Fingerprint; PROBE_WINDOW]);

const _: () = assert!(size_of::<FingerprintLine>() == CACHE_LINE_BYTES);
const _: () = assert!(align_of::<FingerprintLine>() == CACHE_LINE_BYTES);

/// Validated slot position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct SlotIndex(usize);

impl SlotIndex {
    #[inline(always)]
    pub(crate) const fn as_usize(self) -> usize {
        self.0
    }
}

/// Fixed-size fingerprint and key arrays
pub(crate) struct SlotStorage {
    lines: Vec<FingerprintLine>,
    keys: Vec<i32>,
    key_length: usize,
    slots: usize,
}

impl SlotStorage {
    /// Reserve storage for `slots` entries of `key_length` words
    ///
    /// # Errors
    ///
    /// `AllocationFailure` when either array cannot be reserved.
    pub(crate) fn allocate(slots: usize, key_length: usize) -> Result<Self, TableError> {
        let line_count = slots.div_ceil(PROBE_WINDOW);
        let mut lines = Vec::new();
        lines
            .try_reserve_exact(line_count)
            .map_err(|_| TableError::AllocationFailure {
                bytes: line_count * size_of::<FingerprintLine>(),
                align: CACHE_LINE_BYTES,
            })?;
        lines.resize(line_count, FingerprintLine::default());

        let word_count = slots * key_length;
        let mut keys = Vec::new();
        keys.try_reserve_exact(word_count)
            .map_err(|_| TableError::AllocationFailure {
                bytes: word_count * size_of::<i32>(),
                align: align_of::<i32>(),
            })?;
        keys.resize(word_count, 0);

        Ok(Self { lines, keys, key_length, slots })
    }

    /// Validate a raw position
    ///
    /// # Panics
    ///
    /// Panics if `raw` is outside the allocated slots; the table never
    /// computes such a position.
    #[inline(always)]
    pub(crate) fn index(&self, raw: usize) -> SlotIndex {
        assert!(raw < self.slots, "slot {raw} out of bounds ({})", self.slots);
        SlotIndex(raw)
    }

    #[inline(always)]
    pub(crate) fn fingerprint(&self, slot: SlotIndex) -> Fingerprint {
        let i = slot.as_usize();
        self.lines[i / PROBE_WINDOW].0[i % PROBE_WINDOW]
    }

    #[inline(always)]
    pub(crate) fn set_fingerprint(&mut self, slot: SlotIndex, fp: Fingerprint) {
        let i = slot.as_usize();
        self.lines[i / PROBE_WINDOW].0[i % PROBE_WINDOW] = fp;
    }

    #[inline(always)]
    pub(crate) fn key(&self, slot: SlotIndex) -> &[i32] {
        let start = slot.as_usize() * self.key_length;
        &self.keys[start..start + self.key_length]
    }

    #[inline(always)]
    pub(crate) fn write(&mut self, slot: SlotIndex, fp: Fingerprint, key: &[i32]) {
        let start = slot.as_usize() * self.key_length;
        self.keys[start..start + self.key_length].copy_from_slice(key);
        self.set_fingerprint(slot, fp);
    }

    /// Copy the entry at `from` into `to`; `from` is left untouched
    #[inline(always)]
    pub(crate) fn copy_entry(&mut self, from: SlotIndex, to: SlotIndex) {
        let len = self.key_length;
        let src = from.as_usize() * len;
        self.keys.copy_within(src..src + len, to.as_usize() * len);
        let fp = self.fingerprint(from);
        self.set_fingerprint(to, fp);
    }

    /// Reset the fingerprints of `[start, end)` to EMPTY
    pub(crate) fn clear_range(&mut self, start: usize, end: usize) {
        debug_assert!(end <= self.slots);
        for i in start..end {
            self.lines[i / PROBE_WINDOW].0[i % PROBE_WINDOW] = Fingerprint::EMPTY;
        }
    }

    /// Total bytes reserved
    pub(crate) fn footprint(&self) -> usize {
        self.lines.len() * size_of::<FingerprintLine>() + self.keys.len() * size_of::<i32>()
    }

    #[cfg(test)]
    pub(crate) fn line_address(&self) -> usize {
        self.lines.as_ptr() as usize
    }
}
