//! The DAT-entry editor: the three-state vblocknr→blocknr indirection and
//! the two primitive promotions the rest of the engine composes.
//!
//! Represented as a tagged enum rather than three-valued state plus an
//! overloaded `blocknr` field, per the design notes' own recommendation —
//! the on-disk layout is unchanged (see `codec`), only the in-memory shape
//! moves the "a DESTINATION's `blocknr` is really a vblocknr" hazard into
//! the type system: a `Destination` variant's field is named
//! `src_vblocknr`, so there is no field whose meaning depends on a sibling
//! field's value.

pub mod codec;

use crate::error::DedupError;

/// One DAT entry, decoded from its on-disk record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatEntry {
    /// A live, undeduplicated vblocknr. `reference_count` is 1 outside of
    /// any dedup involvement.
    Standard { blocknr: u64, reference_count: u32 },
    /// The vblocknr one or more DESTINATION entries resolve through.
    /// `reference_count` is `1 + (number of destinations)`.
    Source { blocknr: u64, reference_count: u32 },
    /// A vblocknr that has been redirected onto a SOURCE. `src_vblocknr` is
    /// the overloaded field the on-disk format calls `blocknr`.
    Destination {
        src_vblocknr: u64,
        reference_count: u32,
    },
}

/// The collaborator that owns the DAT metadata inode's blocks. A real
/// implementation backs this with a `BlockDevice` and the DAT inode's block
/// map (out of scope here, per the excluded-collaborators list); tests back
/// it with a plain in-memory table.
pub trait DatTable {
    fn load(&self, vblocknr: u64) -> Result<DatEntry, DedupError>;
    fn store(&mut self, vblocknr: u64, entry: DatEntry) -> Result<(), DedupError>;
}

/// Promotes a STANDARD entry to SOURCE with `reference_count = 2`
/// (accounting for the entry itself plus the one destination about to link
/// to it). Only ever called on a STANDARD entry; an already-SOURCE entry
/// that is gaining another destination goes through `link_source` instead,
/// which increments its `reference_count` in place without re-running this
/// transition.
pub fn promote_to_source(dat: &mut impl DatTable, vblocknr: u64) -> Result<(), DedupError> {
    match dat.load(vblocknr)? {
        DatEntry::Standard { blocknr, .. } if blocknr == 0 => {
            Err(DedupError::InvalidEntry(vblocknr))
        }
        DatEntry::Standard { blocknr, .. } => dat.store(
            vblocknr,
            DatEntry::Source {
                blocknr,
                reference_count: 2,
            },
        ),
        _ => Err(DedupError::NotEligible(vblocknr)),
    }
}

/// Promotes a STANDARD entry to DESTINATION pointing at `src_vblocknr`.
pub fn promote_to_destination(
    dat: &mut impl DatTable,
    src_vblocknr: u64,
    dst_vblocknr: u64,
) -> Result<(), DedupError> {
    let entry = dat.load(dst_vblocknr)?;
    match entry {
        DatEntry::Standard { blocknr, .. } if blocknr == 0 => {
            return Err(DedupError::InvalidEntry(dst_vblocknr))
        }
        DatEntry::Standard { .. } => {}
        _ => return Err(DedupError::NotEligible(dst_vblocknr)),
    }
    if src_vblocknr == dst_vblocknr {
        return Err(DedupError::SelfLink(src_vblocknr));
    }
    dat.store(
        dst_vblocknr,
        DatEntry::Destination {
            src_vblocknr,
            reference_count: 1,
        },
    )
}

/// Links `vblocknr` in as (or as another consumer of) a source: promotes it
/// from STANDARD the first time, and bumps `reference_count` on every
/// subsequent call while it remains SOURCE. Rejects a DESTINATION outright
/// — a vblocknr that is itself redirected cannot also serve as a source,
/// since that would require a DESTINATION→DESTINATION chain.
fn link_source(dat: &mut impl DatTable, vblocknr: u64) -> Result<(), DedupError> {
    match dat.load(vblocknr)? {
        DatEntry::Standard { .. } => promote_to_source(dat, vblocknr),
        DatEntry::Source {
            blocknr,
            reference_count,
        } => dat.store(
            vblocknr,
            DatEntry::Source {
                blocknr,
                reference_count: reference_count + 1,
            },
        ),
        DatEntry::Destination { .. } => Err(DedupError::NotEligible(vblocknr)),
    }
}

/// Composes `link_source` and `promote_to_destination` into the full pair
/// transition. Does not itself roll back a partial mutation on failure —
/// that is the enclosing transaction's job (see `crate::transaction`),
/// since only the transaction knows whether a segment write has also been
/// scheduled that would need undoing.
pub fn dedup_pair(
    dat: &mut impl DatTable,
    src_vblocknr: u64,
    dst_vblocknr: u64,
) -> Result<(), DedupError> {
    link_source(dat, src_vblocknr)?;
    promote_to_destination(dat, src_vblocknr, dst_vblocknr)
}

/// Resolves a vblocknr to the physical blocknr it currently denotes,
/// following one DESTINATION→SOURCE hop if necessary. DESTINATION chains
/// are forbidden by construction (`link_source` rejects promoting a
/// DESTINATION), so a single hop always suffices.
pub fn translate(dat: &impl DatTable, vblocknr: u64) -> Result<u64, DedupError> {
    match dat.load(vblocknr)? {
        DatEntry::Standard { blocknr, .. } => {
            if blocknr == 0 {
                Err(DedupError::DatTranslateFailed(vblocknr))
            } else {
                Ok(blocknr)
            }
        }
        DatEntry::Source { blocknr, .. } => Ok(blocknr),
        DatEntry::Destination { src_vblocknr, .. } => translate(dat, src_vblocknr),
    }
}
