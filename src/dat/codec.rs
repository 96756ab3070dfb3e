//! On-disk codec for a DAT entry.
//!
//! The existing on-disk format is a fixed-width record: `{blocknr, start,
//! end, reference_count, state}`, unchanged by this crate (persistent
//! formats are not ours to break). The design notes call out that the
//! natural systems-language shape is a tagged variant rather than
//! three-valued state plus an overloaded `blocknr` field, so `DDatEntry`
//! here is only the wire struct; `super::DatEntry` is the tagged enum the
//! rest of the engine actually works with, and this module is the seam
//! between the two.
//!
//! The `repr(C)` + `zerocopy::{AsBytes, FromBytes}` derive pairing follows
//! the teacher's `ElfHdr`/`ProgHdr` (`src/exec.rs`): both are fixed-layout
//! on-disk records read straight out of a block buffer by reinterpreting
//! its bytes.

use static_assertions::const_assert;
use zerocopy::{AsBytes, FromBytes};

use super::DatEntry;
use crate::param::BLOCK_SIZE;

const STATE_STANDARD: u32 = 0;
const STATE_SOURCE: u32 = 1;
const STATE_DESTINATION: u32 = 2;

/// The on-disk record for one DAT entry. 32 bytes, so `NENTRY` of them pack
/// evenly into a DAT metadata block.
#[repr(C)]
#[derive(Clone, Copy, AsBytes, FromBytes)]
pub struct DDatEntry {
    blocknr: u64,
    start: u64,
    end: u64,
    reference_count: u32,
    state: u32,
}

const_assert!(core::mem::size_of::<DDatEntry>() == 32);

/// Number of DAT entries packed into one on-disk block.
pub const NENTRY: usize = BLOCK_SIZE / core::mem::size_of::<DDatEntry>();

impl DDatEntry {
    pub const ZERO: Self = Self {
        blocknr: 0,
        start: 0,
        end: 0,
        reference_count: 0,
        state: STATE_STANDARD,
    };
}

impl From<DDatEntry> for DatEntry {
    fn from(d: DDatEntry) -> Self {
        match d.state {
            STATE_SOURCE => DatEntry::Source {
                blocknr: d.blocknr,
                reference_count: d.reference_count,
            },
            STATE_DESTINATION => DatEntry::Destination {
                src_vblocknr: d.blocknr,
                reference_count: d.reference_count,
            },
            _ => DatEntry::Standard {
                blocknr: d.blocknr,
                reference_count: d.reference_count,
            },
        }
    }
}

impl From<DatEntry> for DDatEntry {
    fn from(e: DatEntry) -> Self {
        match e {
            DatEntry::Standard {
                blocknr,
                reference_count,
            } => DDatEntry {
                blocknr,
                start: 0,
                end: 0,
                reference_count,
                state: STATE_STANDARD,
            },
            DatEntry::Source {
                blocknr,
                reference_count,
            } => DDatEntry {
                blocknr,
                start: 0,
                end: 0,
                reference_count,
                state: STATE_SOURCE,
            },
            DatEntry::Destination {
                src_vblocknr,
                reference_count,
            } => DDatEntry {
                blocknr: src_vblocknr,
                start: 0,
                end: 0,
                reference_count,
                state: STATE_DESTINATION,
            },
        }
    }
}
