//! The buffer-cache collaborator.
//!
//! The underlying block I/O layer (buffer cache with `read(blocknr)`,
//! `mark_dirty`, `sync`) is excluded from this crate's scope and consumed
//! here only through the `BlockDevice` trait below. The shape is grounded on
//! the teacher's `bio::{Buf, BufData}` (an owned, locked handle to one
//! block's bytes that the caller must release when done) and on
//! `examples/gifnksm-ov6/crates/kernel/block_io`'s `BlockDevice` trait,
//! which is the more direct match for a collaborator consumed from outside
//! a kernel proper.

use alloc::vec;
use alloc::vec::Vec;

use crate::param::BLOCK_SIZE;

/// One block's worth of bytes, owned by the caller. Analogous to the
/// teacher's `BufData`, minus the in-cache aliasing: every `BlockBuf` here is
/// an independent copy, since this crate does not implement the buffer
/// cache itself.
#[derive(Clone, PartialEq, Eq)]
pub struct BlockBuf {
    data: Vec<u8>,
}

impl BlockBuf {
    pub fn zeroed() -> Self {
        Self {
            data: vec![0u8; BLOCK_SIZE],
        }
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), BLOCK_SIZE);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// A block device addressed by physical block number (blocknr). Mirrors
/// `sb_bread`/`mark_buffer_dirty`/`nilfs_flush_device` from the original
/// NILFS source, generalized into a trait the way the rest of this crate's
/// collaborators are.
pub trait BlockDevice {
    type Error;

    /// Reads the block at `blocknr`.
    fn read_block(&self, blocknr: u64) -> Result<BlockBuf, Self::Error>;

    /// Writes `buf` back to `blocknr` and marks it clean.
    fn write_block(&self, blocknr: u64, buf: &BlockBuf) -> Result<(), Self::Error>;

    /// Flushes any buffered writes to the underlying device.
    fn sync(&self) -> Result<(), Self::Error>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use alloc::collections::BTreeMap;
    use core::convert::Infallible;
    use spin::Mutex;

    use super::{BlockBuf, BlockDevice};

    /// An in-memory block device, the engine's equivalent of
    /// `block_io`'s `MockDevice` test fixture.
    #[derive(Default)]
    pub struct MemDevice {
        blocks: Mutex<BTreeMap<u64, BlockBuf>>,
    }

    impl MemDevice {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_block(self, blocknr: u64, buf: BlockBuf) -> Self {
            self.blocks.lock().insert(blocknr, buf);
            self
        }
    }

    impl BlockDevice for MemDevice {
        type Error = Infallible;

        fn read_block(&self, blocknr: u64) -> Result<BlockBuf, Self::Error> {
            Ok(self
                .blocks
                .lock()
                .entry(blocknr)
                .or_insert_with(BlockBuf::zeroed)
                .clone())
        }

        fn write_block(&self, blocknr: u64, buf: &BlockBuf) -> Result<(), Self::Error> {
            self.blocks.lock().insert(blocknr, buf.clone());
            Ok(())
        }

        fn sync(&self) -> Result<(), Self::Error> {
            Ok(())
        }
    }
}
