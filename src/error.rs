//! The engine's error taxonomy.
//!
//! The teacher kernel mostly threads `Result<_, ()>` through its file system
//! trait, which is fine when the caller only needs a yes/no answer but loses
//! the information the dedup driver needs to log a useful per-pair skip
//! reason. Every dedup entry point returns `DedupError` instead, following
//! the richer-error style `examples/gifnksm-ov6` pulls in via `thiserror`
//! (used here the same way: `default-features = false` so it stays usable
//! from a `no_std` crate).

use thiserror::Error;

/// Errors produced by the DAT-entry editor, the dedup transaction, the
/// driver, the reflink path, and read interposition.
///
/// Every variant here is skip-and-log at the driver: the caller logs a
/// warning and moves on to the next pair. The one exception is a post-commit
/// invariant violation, which is not representable as a `DedupError` at all
/// — it is corruption, and warrants a fatal abort rather than an ordinary
/// error return (see `transaction::PostCommitInvariant`).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DedupError {
    /// A DAT entry's `blocknr` field is zero: the vblocknr refers to no live
    /// block.
    #[error("DAT entry for vblocknr {0} is unallocated")]
    InvalidEntry(u64),

    /// A DAT entry's `state` is not STANDARD, so it cannot be promoted.
    #[error("DAT entry for vblocknr {0} is not eligible (state != STANDARD)")]
    NotEligible(u64),

    /// `src_vblocknr == dst_vblocknr` for a requested pair.
    #[error("vblocknr {0} cannot be deduplicated against itself")]
    SelfLink(u64),

    /// The destination's current translation could not be resolved; the
    /// destination block is already gone.
    #[error("vblocknr {0} does not currently translate to a live block")]
    DatTranslateFailed(u64),

    /// The segment writer rejected the pair's log write.
    #[error("segment writer rejected the pair (src={src}, dst={dst})")]
    SegmentWriteFailed { src: u64, dst: u64 },

    /// The block comparator found unequal content between the candidate
    /// source and destination extents.
    #[error("source and destination extents are not byte-identical")]
    ContentMismatch,

    /// The caller asked for something this engine deliberately does not
    /// support: chaining a dedup onto an already-deduplicated inode,
    /// reflinking a multi-block source, or an unrecognized descriptor flag
    /// combination.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// Allocation failed while preparing the dedup marker.
    #[error("out of memory while preparing the dedup marker")]
    OutOfMemory,
}
