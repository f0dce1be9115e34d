//! Issue-order guard for concurrent list fetches.
//!
//! Every list fetch takes a ticket when it is issued. A page applied with a
//! ticket older than the last applied one for the same collection is stale:
//! a slow request for an earlier page must not overwrite a newer one.

use std::fmt;

/// Proof that a list fetch was issued, carrying its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub(crate) collection: String,
    pub(crate) sequence: u64,
}

impl FetchTicket {
    /// Collection the fetch targets.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Monotonic per-collection sequence number, starting at 1.
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for FetchTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.collection, self.sequence)
    }
}

/// What happened to a sequenced update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The page replaced the collection's list
    Applied,
    /// A newer fetch was already applied; the page was dropped
    Stale {
        /// Sequence of the dropped page
        sequence: u64,
        /// Sequence of the page currently applied
        applied: u64,
    },
}

impl ApplyOutcome {
    /// Whether the update took effect.
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Per-collection sequence bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Sequencer {
    issued: u64,
    applied: u64,
}

impl Sequencer {
    /// Reserve the next sequence number.
    pub(crate) const fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Record `sequence` as applied unless a newer one already was.
    pub(crate) const fn try_apply(&mut self, sequence: u64) -> ApplyOutcome {
        if sequence < self.applied {
            return ApplyOutcome::Stale {
                sequence,
                applied: self.applied,
            };
        }
        self.applied = sequence;
        ApplyOutcome::Applied
    }
}
