//! The dedup-marker payload codec.
//!
//! A reflinked destination inode's first data block holds
//! `{source_ino: u64}`, little-endian, and the inode's size is set to the
//! payload's byte length. Kept as its own tiny module, the way the
//! teacher's `dat::codec` isolates the wire shape from the logic that
//! consumes it, since both `reflink` and `read_interposition` need the
//! same encode/decode pair.

use crate::param::MARKER_SIZE;

/// Encodes the marker payload written into a destination inode's block 0.
pub fn encode(source_ino: u64) -> [u8; MARKER_SIZE] {
    source_ino.to_le_bytes()
}

/// Decodes a marker payload out of a raw block's leading bytes. Panics if
/// `block` is shorter than the marker — callers only ever invoke this on a
/// full `BLOCK_SIZE` buffer.
pub fn decode(block: &[u8]) -> u64 {
    let mut bytes = [0u8; MARKER_SIZE];
    bytes.copy_from_slice(&block[..MARKER_SIZE]);
    u64::from_le_bytes(bytes)
}
