//! The segment constructor / writer collaborator.
//!
//! Excluded from this crate's scope as the log-structured writer that
//! flushes dirty metadata and data into a new segment; the dedup
//! transaction only needs to ask it to schedule one block's move. Grounded
//! on the teacher's `fs::lfs::segment::SegManager`, narrowed to the one
//! operation a dedup pair drives.

use crate::error::DedupError;

/// Schedules the physical relocation implied by a committed DAT mutation.
pub trait SegmentWriter {
    /// Requests that `dst_vblocknr`'s new DESTINATION mapping be reflected
    /// in the next segment flush. Returns `SegmentWriteFailed` if the
    /// writer has no room left in its reserved credit for this commit.
    fn move_block(&mut self, src_vblocknr: u64, dst_vblocknr: u64) -> Result<(), DedupError>;
}
