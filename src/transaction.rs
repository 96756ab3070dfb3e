//! The dedup transaction: one (src, dst) pair, one filesystem
//! transaction — acquire the transaction lock, run `dat::dedup_pair`,
//! schedule the segment write, release. Any error after the DAT mutation
//! restores the pre-image before the lock releases, the way the teacher's
//! `fs::lfs::tx::TxManager` only ever commits a checkpoint once every
//! outstanding operation has finished cleanly.
//!
//! The rollback here is an explicit store of the snapshotted pre-image
//! rather than a `scopeguard`-style deferred closure: the closure would
//! need to capture the same `&mut DatTable` the function body keeps using
//! for the subsequent segment-write step, which the borrow checker
//! correctly refuses. Snapshot-and-restore says the same thing without the
//! fight.

use crate::dat::{self, DatTable};
use crate::error::DedupError;
use crate::segment::SegmentWriter;
use crate::txlock::TransactionLock;

/// Runs one (src, dst) pair through the DAT editor and the segment writer
/// under the filesystem's single transaction lock.
///
/// Ordering: `promote_to_source` completes before `promote_to_destination`
/// (enforced inside `dat::dedup_pair`); both complete before the segment
/// write is requested; the transaction lock is held for the whole of this,
/// so no other writer observes an intermediate state.
pub fn dedup_pair_tx<L, D, S>(
    lock: &L,
    dat: &mut D,
    seg: &mut S,
    src_vblocknr: u64,
    dst_vblocknr: u64,
) -> Result<(), DedupError>
where
    L: TransactionLock,
    D: DatTable,
    S: SegmentWriter,
{
    let _guard = lock.begin();

    let src_before = dat.load(src_vblocknr)?;
    let dst_before = dat.load(dst_vblocknr)?;

    if let Err(e) = dat::dedup_pair(dat, src_vblocknr, dst_vblocknr) {
        // `link_source` may have already promoted `src` before
        // `promote_to_destination` rejected `dst`; undo that half-mutation
        // so the pair is observably untouched.
        let _ = dat.store(src_vblocknr, src_before);
        return Err(e);
    }

    if let Err(e) = seg.move_block(src_vblocknr, dst_vblocknr) {
        let _ = dat.store(src_vblocknr, src_before);
        let _ = dat.store(dst_vblocknr, dst_before);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dat::test_support::MemDat;
    use crate::dat::DatEntry;
    use crate::segment::test_support::MockSegmentWriter;
    use crate::txlock::test_support::MockTxLock;

    fn seeded() -> MemDat {
        MemDat::new()
            .with_entry(
                10,
                DatEntry::Standard {
                    blocknr: 1000,
                    reference_count: 1,
                },
            )
            .with_entry(
                20,
                DatEntry::Standard {
                    blocknr: 2000,
                    reference_count: 1,
                },
            )
    }

    #[test]
    fn success_commits_both_entries_and_schedules_move() {
        let lock = MockTxLock::new();
        let mut dat = seeded();
        let mut seg = MockSegmentWriter::new();

        dedup_pair_tx(&lock, &mut dat, &mut seg, 10, 20).unwrap();

        assert_eq!(
            dat.get(10),
            DatEntry::Source {
                blocknr: 1000,
                reference_count: 2
            }
        );
        assert_eq!(seg.moves, alloc::vec![(10, 20)]);
        assert!(!lock.is_held());
    }

    #[test]
    fn segment_write_failure_rolls_back_dat() {
        let lock = MockTxLock::new();
        let mut dat = seeded();
        let mut seg = MockSegmentWriter::new().rejecting_next(1);

        let err = dedup_pair_tx(&lock, &mut dat, &mut seg, 10, 20).unwrap_err();
        assert_eq!(
            err,
            DedupError::SegmentWriteFailed { src: 10, dst: 20 }
        );
        assert_eq!(
            dat.get(10),
            DatEntry::Standard {
                blocknr: 1000,
                reference_count: 1
            }
        );
        assert_eq!(
            dat.get(20),
            DatEntry::Standard {
                blocknr: 2000,
                reference_count: 1
            }
        );
        assert!(!lock.is_held());
    }

    #[test]
    fn destination_not_eligible_rolls_back_source_promotion() {
        let lock = MockTxLock::new();
        let mut dat = seeded().with_entry(
            20,
            DatEntry::Destination {
                src_vblocknr: 999,
                reference_count: 1,
            },
        );
        let mut seg = MockSegmentWriter::new();

        let err = dedup_pair_tx(&lock, &mut dat, &mut seg, 10, 20).unwrap_err();
        assert_eq!(err, DedupError::NotEligible(20));
        assert_eq!(
            dat.get(10),
            DatEntry::Standard {
                blocknr: 1000,
                reference_count: 1
            }
        );
    }
}
