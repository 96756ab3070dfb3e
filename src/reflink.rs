//! The reflink path: the whole-file case reached from
//! `remap_file_range(REMAP_FILE_DEDUP)` when both positions are zero and
//! `len == src.size`. Grounded on NILFS's `nilfs_reflink`/`nilfs_clone`
//! (`examples/original_source/fs/nilfs2/file.c`), which this crate's
//! `comparator::extents_equal` backs instead of a direct memcmp, and whose
//! whole-file/no-chaining checks are carried forward verbatim.

use alloc::vec;

use crate::block::{BlockBuf, BlockDevice};
use crate::comparator;
use crate::error::DedupError;
use crate::inode::InodeStore;
use crate::log::Logger;
use crate::log_error;
use crate::log_info;
use crate::marker;
use crate::param::MAX_REFLINK_SOURCE_BLOCKS;

/// Deduplicates `dst_ino` onto `src_ino` as a whole-file reflink. Callers
/// are expected to have already verified `len == src.size` and that both
/// file positions are zero, and to be holding the VFS inode locks for the
/// duration of this call.
///
/// On any failure between truncating the destination and finishing the
/// marker write, the destination's prior data is already gone — an accepted
/// limitation of the current design rather than something this function
/// works around; a clean error is still returned so the caller knows to
/// retry rather than assume success.
pub fn reflink<D, I>(
    src_ino: u64,
    dst_ino: u64,
    inodes: &mut I,
    device: &D,
    logger: &impl Logger,
) -> Result<(), DedupError>
where
    D: BlockDevice,
    I: InodeStore,
{
    let dst = inodes.load(dst_ino)?;
    let mut src = inodes.load(src_ino)?;

    // Content equality is checked first, before the destination is touched
    // at all: grounded on `nilfs_extent_same` calling `compare_extents` and
    // returning `-EBADE` ahead of `nilfs_clone`/`nilfs_reflink` ever
    // running. The chain-check and single-block restriction below live
    // inside `nilfs_reflink` itself, strictly after equality has already
    // passed, so they are checked in that order here too.
    if !comparator::extents_equal(&src, &dst, device, logger) {
        return Err(DedupError::ContentMismatch);
    }

    if dst.is_dedup_marker {
        log_error!(
            logger,
            "reflink: destination ino {dst_ino} is already a dedup marker; chaining is not supported"
        );
        return Err(DedupError::Unsupported(
            "destination inode is already a dedup marker; chaining is not supported",
        ));
    }

    if src.block_count() > MAX_REFLINK_SOURCE_BLOCKS {
        log_error!(
            logger,
            "reflink: source ino {src_ino} spans more than one data block; unsupported"
        );
        return Err(DedupError::Unsupported(
            "reflink source spans more than one data block",
        ));
    }

    // Waiting for in-flight direct I/O on the destination is a VFS concern
    // this crate does not model; truncate the destination's data. Block 0's
    // physical address is kept rather than freed — it is about to be
    // overwritten with the marker payload below.
    let marker_blocknr = *dst
        .blocks
        .first()
        .ok_or(DedupError::InvalidEntry(dst_ino))?;
    let mut dst = dst;
    dst.size = 0;
    dst.blocks = vec![];

    // Bump the source's in-memory dedup refcount.
    src.dedup_ref_count += 1;
    inodes.store(src_ino, src)?;

    // Mark the destination as a dedup source from here on.
    dst.is_dedup_marker = true;
    dst.materialized = false;

    // Overwrite block 0 with the marker payload and resize.
    let mut buf = BlockBuf::zeroed();
    let payload = marker::encode(src_ino);
    buf.as_bytes_mut()[..payload.len()].copy_from_slice(&payload);
    device.write_block(marker_blocknr, &buf).map_err(|_| {
        log_error!(
            logger,
            "reflink: failed to write dedup marker for ino {dst_ino}"
        );
        DedupError::OutOfMemory
    })?;
    dst.size = crate::param::MARKER_SIZE as u64;
    dst.blocks = vec![marker_blocknr];

    // Mark the destination inode dirty for writeback.
    inodes.store(dst_ino, dst)?;

    log_info!(
        logger,
        "reflink: ino {dst_ino} deduplicated onto source ino {src_ino}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::test_support::MemDevice;
    use crate::inode::test_support::MemInodes;
    use crate::inode::InodeState;
    use crate::log::test_support::RecordingLogger;

    fn content(byte: u8) -> BlockBuf {
        let mut buf = BlockBuf::zeroed();
        buf.as_bytes_mut()[0] = byte;
        buf
    }

    #[test]
    fn reflink_whole_file_redirects_destination_to_source() {
        let device = MemDevice::new()
            .with_block(1000, content(b'X'))
            .with_block(2000, content(b'X'));
        let mut inodes = MemInodes::new()
            .with_inode(1, InodeState::with_blocks(vec![1000]))
            .with_inode(2, InodeState::with_blocks(vec![2000]));
        let logger = RecordingLogger::new();

        reflink(1, 2, &mut inodes, &device, &logger).unwrap();

        let dst = inodes.get(2);
        assert!(dst.is_dedup_marker);
        assert_eq!(dst.size, crate::param::MARKER_SIZE as u64);
        assert_eq!(dst.blocks, alloc::vec![2000]);

        let marker_block = device.read_block(2000).unwrap();
        assert_eq!(marker::decode(marker_block.as_bytes()), 1);

        let src = inodes.get(1);
        assert_eq!(src.dedup_ref_count, 1);
    }

    #[test]
    fn reflink_onto_existing_dedup_marker_is_rejected() {
        let device = MemDevice::new()
            .with_block(1000, content(b'Z'))
            .with_block(3000, content(b'Z'));
        let mut marker_dst = InodeState::with_blocks(vec![3000]);
        marker_dst.is_dedup_marker = true;
        let mut inodes = MemInodes::new()
            .with_inode(1, InodeState::with_blocks(vec![1000]))
            .with_inode(2, marker_dst);
        let logger = RecordingLogger::new();

        let err = reflink(1, 2, &mut inodes, &device, &logger).unwrap_err();
        assert_eq!(
            err,
            DedupError::Unsupported(
                "destination inode is already a dedup marker; chaining is not supported"
            )
        );
        let dst = inodes.get(2);
        assert_eq!(dst.blocks, alloc::vec![3000]);
        assert_eq!(logger.error_lines.lock().len(), 1);
    }

    // Content equality is checked ahead of the chain-check, so a
    // already-a-marker destination whose content happens to disagree with
    // the source is reported as a content mismatch, not as chaining.
    #[test]
    fn content_mismatch_takes_precedence_over_chain_check() {
        let device = MemDevice::new()
            .with_block(1000, content(b'X'))
            .with_block(3000, content(b'Z'));
        let mut marker_dst = InodeState::with_blocks(vec![3000]);
        marker_dst.is_dedup_marker = true;
        let mut inodes = MemInodes::new()
            .with_inode(1, InodeState::with_blocks(vec![1000]))
            .with_inode(2, marker_dst);
        let logger = RecordingLogger::new();

        let err = reflink(1, 2, &mut inodes, &device, &logger).unwrap_err();
        assert_eq!(err, DedupError::ContentMismatch);
    }

    #[test]
    fn content_mismatch_rejected_before_any_mutation() {
        let device = MemDevice::new()
            .with_block(1000, content(b'X'))
            .with_block(2000, content(b'Y'));
        let mut inodes = MemInodes::new()
            .with_inode(1, InodeState::with_blocks(vec![1000]))
            .with_inode(2, InodeState::with_blocks(vec![2000]));
        let logger = RecordingLogger::new();

        let err = reflink(1, 2, &mut inodes, &device, &logger).unwrap_err();
        assert_eq!(err, DedupError::ContentMismatch);

        let dst = inodes.get(2);
        assert!(!dst.is_dedup_marker);
        assert_eq!(dst.blocks, alloc::vec![2000]);
        assert_eq!(dst.size, crate::param::BLOCK_SIZE as u64);

        let src = inodes.get(1);
        assert_eq!(src.dedup_ref_count, 0);

        assert_eq!(
            device.read_block(2000).unwrap().as_bytes()[0],
            b'Y',
            "destination block must be left untouched"
        );
    }

    #[test]
    fn multi_block_source_rejected() {
        let device = MemDevice::new();
        let mut inodes = MemInodes::new()
            .with_inode(1, InodeState::with_blocks(vec![1000, 1001]))
            .with_inode(2, InodeState::with_blocks(vec![2000, 2001]));
        let logger = RecordingLogger::new();

        let err = reflink(1, 2, &mut inodes, &device, &logger).unwrap_err();
        assert_eq!(
            err,
            DedupError::Unsupported("reflink source spans more than one data block")
        );
        assert_eq!(logger.error_lines.lock().len(), 1);
    }
}
