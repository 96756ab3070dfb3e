//! The block comparator: proves byte-equality of two inodes' data
//! extents by walking each through the block device, one logical block
//! index at a time, exactly like NILFS's own `nilfs_dedup_extent_same`
//! (`examples/original_source/fs/nilfs2/dedup.c`) except layered onto this
//! crate's `BlockDevice` trait instead of `sb_bread`.
//!
//! Produces no side effects on either inode and takes no lock of its own —
//! callers already hold whatever VFS inode locks the remap entry point
//! took. Not restartable: a failed comparison is the caller's cue to
//! re-invoke from scratch, not to resume mid-extent.

use crate::block::BlockDevice;
use crate::inode::InodeState;
use crate::log::Logger;
use crate::log_warn;

/// Compares `src`'s and `dst`'s data extents for byte-for-byte equality.
/// Returns `false` (and logs a warning) on any size mismatch, missing block
/// map entry, or I/O failure — the comparator never propagates an error.
pub fn extents_equal<D: BlockDevice>(
    src: &InodeState,
    dst: &InodeState,
    device: &D,
    logger: &impl Logger,
) -> bool {
    if src.size != dst.size {
        return false;
    }

    for i in 0..src.block_count() as usize {
        let (Some(&src_blocknr), Some(&dst_blocknr)) = (src.blocks.get(i), dst.blocks.get(i))
        else {
            log_warn!(logger, "extents_equal: missing block map entry at index {i}");
            return false;
        };

        let src_buf = match device.read_block(src_blocknr) {
            Ok(buf) => buf,
            Err(_) => {
                log_warn!(
                    logger,
                    "extents_equal: failed to read source block {src_blocknr}"
                );
                return false;
            }
        };
        let dst_buf = match device.read_block(dst_blocknr) {
            Ok(buf) => buf,
            Err(_) => {
                log_warn!(
                    logger,
                    "extents_equal: failed to read destination block {dst_blocknr}"
                );
                return false;
            }
        };

        if src_buf.as_bytes() != dst_buf.as_bytes() {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::block::test_support::MemDevice;
    use crate::block::BlockBuf;
    use crate::log::test_support::RecordingLogger;

    fn block_of(byte: u8) -> BlockBuf {
        let mut buf = BlockBuf::zeroed();
        buf.as_bytes_mut()[0] = byte;
        buf
    }

    #[test]
    fn equal_single_block_extents() {
        let device = MemDevice::new()
            .with_block(1000, block_of(b'X'))
            .with_block(2000, block_of(b'X'));
        let src = InodeState::with_blocks(vec![1000]);
        let dst = InodeState::with_blocks(vec![2000]);
        let logger = RecordingLogger::new();
        assert!(extents_equal(&src, &dst, &device, &logger));
    }

    #[test]
    fn unequal_content_detected() {
        let device = MemDevice::new()
            .with_block(1000, block_of(b'X'))
            .with_block(2000, block_of(b'Y'));
        let src = InodeState::with_blocks(vec![1000]);
        let dst = InodeState::with_blocks(vec![2000]);
        let logger = RecordingLogger::new();
        assert!(!extents_equal(&src, &dst, &device, &logger));
    }

    #[test]
    fn size_mismatch_short_circuits() {
        let device = MemDevice::new();
        let src = InodeState::with_blocks(vec![1000]);
        let dst = InodeState::with_blocks(vec![2000, 2001]);
        let logger = RecordingLogger::new();
        assert!(!extents_equal(&src, &dst, &device, &logger));
    }

    #[test]
    fn multi_block_extents_compare_blockwise() {
        let device = MemDevice::new()
            .with_block(1000, block_of(b'A'))
            .with_block(1001, block_of(b'B'))
            .with_block(2000, block_of(b'A'))
            .with_block(2001, block_of(b'B'));
        let src = InodeState::with_blocks(vec![1000, 1001]);
        let dst = InodeState::with_blocks(vec![2000, 2001]);
        let logger = RecordingLogger::new();
        assert!(extents_equal(&src, &dst, &device, &logger));
    }
}
