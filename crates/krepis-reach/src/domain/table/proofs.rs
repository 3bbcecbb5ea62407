//! Kani Proofs for the Fingerprint Encoding
//!
//! The table itself allocates; these harnesses stick to the stack-only word
//! encoding that every probe decision rests on.
//!
//! # Invariant Correspondence
//! - H-001: an occupied fingerprint always matches the hash it was built from
//! - Slot states (EMPTY, TOMBSTONE, OCCUPIED) never overlap

#[cfg(kani)]
mod kani_proofs {
    use super::super::*;

    /// Occupied fingerprints are distinguishable from both markers
    #[kani::proof]
    fn proof_occupied_is_never_a_marker() {
        let hash: u32 = kani::any();
        let fp = Fingerprint::occupied(hash);

        kani::assert(fp.is_occupied(), "occupied bit must be set");
        kani::assert(!fp.is_empty(), "occupied must not read as EMPTY");
        kani::assert(!fp.is_tombstone(), "occupied must not read as TOMBSTONE");
    }

    /// A fingerprint matches its own hash and agrees with tag equality
    #[kani::proof]
    fn proof_match_is_tag_equality() {
        let stored: u32 = kani::any();
        let probe: u32 = kani::any();
        let fp = Fingerprint::occupied(stored);

        kani::assert(fp.matches(stored), "fingerprint must match its own hash");
        kani::assert(
            fp.matches(probe) == (fp.tag() == Fingerprint::occupied(probe).tag()),
            "match must be exact tag equality",
        );
    }

    /// Markers never match any hash
    #[kani::proof]
    fn proof_markers_never_match() {
        let hash: u32 = kani::any();
        kani::assert(!Fingerprint::EMPTY.matches(hash), "EMPTY matched");
        kani::assert(!Fingerprint::TOMBSTONE.matches(hash), "TOMBSTONE matched");
    }
}
