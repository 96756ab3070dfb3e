//! The inode collaborator: the slice of per-inode state the reflink path and
//! read interposition touch — size, block map, the dedup-marker flag, the
//! "already materialised" latch, and the in-memory `dedup_ref_count`.
//!
//! The teacher's own `Inode`/`InodeGuard` (`fs/inode.rs`) is a full xv6
//! on-disk inode with a lock and an `InodeInner` cache; this crate only
//! needs the fields the dedup flows read and write, so `InodeStore` is
//! shaped like that cache but narrowed to this engine's concerns, the same
//! way `BlockDevice` narrows the teacher's `bio::Bcache`.

use alloc::vec::Vec;

use crate::error::DedupError;
use crate::param::BLOCK_SIZE;

/// An inode flag bit. The dedup-marker bit is documented as reusing an
/// existing, otherwise-unrelated flag slot on the real inode; this engine
/// only needs the one bit so it is modeled directly rather than as a
/// bitflags set shared with unrelated flags this crate does not own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InodeState {
    pub size: u64,
    pub blocks: Vec<u64>,
    pub is_dedup_marker: bool,
    pub materialized: bool,
    pub dedup_ref_count: u64,
}

impl InodeState {
    pub fn with_blocks(blocks: Vec<u64>) -> Self {
        let size = blocks.len() as u64 * BLOCK_SIZE as u64;
        Self {
            size,
            blocks,
            is_dedup_marker: false,
            materialized: false,
            dedup_ref_count: 0,
        }
    }

    pub fn block_count(&self) -> u64 {
        (self.size + BLOCK_SIZE as u64 - 1) / BLOCK_SIZE as u64
    }
}

/// The collaborator the reflink path and read interposition consume. A real
/// implementation backs this with the teacher's inode cache and its lock;
/// tests back it with a plain in-memory table keyed by inode number.
pub trait InodeStore {
    fn load(&self, ino: u64) -> Result<InodeState, DedupError>;
    fn store(&mut self, ino: u64, state: InodeState) -> Result<(), DedupError>;
}
