//! Sizing and layout constants, gathered in one place the way the teacher
//! kernel centralizes disk-layout numbers in its own `param.rs`.

/// Size of a physical block, in bytes. The comparator and the reflink path
/// both walk extents one block at a time at this granularity.
pub const BLOCK_SIZE: usize = 4096;

/// Size of the marker payload written into a dedup destination inode's first
/// data block: `{ source_ino: u64 }`, little-endian.
pub const MARKER_SIZE: usize = core::mem::size_of::<u64>();

/// Current restriction on whole-file reflink: the source inode must span no
/// more than this many data blocks. Multi-block whole-file reflink is left
/// for a later revision; see the open-question notes in the design ledger.
pub const MAX_REFLINK_SOURCE_BLOCKS: u64 = 1;

/// Upper bound on the number of block descriptors accepted by a single
/// `dedup` driver call. Real ioctl surfaces that feed this kind of API cap
/// the batch so one request fits in a bounded kernel buffer (compare
/// `IOCTL_DEDUPE_MAX_DESTS` in the FIDEDUPERANGE wrapper this crate's driver
/// loop is grounded on); the dedup core re-exposes the same kind of bound so
/// callers cannot force an unbounded allocation through the descriptor list.
pub const MAX_BLOCKS_PER_CALL: usize = 4096;
