//! A block-level deduplication engine layered on a log-structured,
//! copy-on-write filesystem addressed indirectly through a Disk Address
//! Translation (DAT) map: logical vblocknrs held by file metadata are
//! translated to physical blocknrs by DAT entries, and deduplicating two
//! files means redirecting the destination's vblocknr onto the source's
//! physical block.
//!
//! The module layout mirrors the components of the design: [`dat`] is the
//! DAT-entry editor (the three-state promotion machinery), [`comparator`]
//! proves content equality, [`transaction`] wraps one (src, dst) pair in a
//! single filesystem transaction, [`driver`] is the ioctl-facing entry
//! point that classifies a caller-supplied block list into pairs,
//! [`reflink`] is the whole-file case reached from `remap_file_range`, and
//! [`read_interposition`] is the read-time materialisation of an
//! already-deduplicated inode.
//!
//! Everything this crate does *not* own — the buffer cache, the segment
//! constructor, the filesystem transaction lock, the GC-inode staging
//! list, and the inode cache — is consumed only through the traits in
//! [`block`], [`segment`], [`txlock`], [`gc`], and [`inode`], the same way
//! the teacher kernel's filesystem core is built against `bio`/`lock`
//! collaborators rather than a hardwired disk. No concrete implementation
//! of any of those traits lives in this crate; they are provided by
//! whatever kernel links it in, or by the in-memory fakes under each
//! module's `#[cfg(test)] test_support`.

#![cfg_attr(not(test), no_std)]
#![deny(rust_2018_idioms)]
#![deny(unused_must_use)]

extern crate alloc;

pub mod abort;
pub mod block;
pub mod comparator;
pub mod dat;
pub mod driver;
pub mod error;
pub mod gc;
pub mod inode;
pub mod log;
pub mod marker;
pub mod param;
pub mod read_interposition;
pub mod reflink;
pub mod segment;
pub mod transaction;
pub mod txlock;
