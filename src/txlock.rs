//! The filesystem transaction-lock collaborator.
//!
//! DAT mutations across all writers must be serialised by one
//! filesystem-wide transaction lock, and the lock's scope must guarantee
//! release on every exit path. Grounded on the teacher's
//! `lock::SleepableLock`/`fs::lfs::tx::TxManager::begin_op`/`end_op` pair,
//! narrowed to the one thing the dedup transaction needs: a scope whose
//! `Drop` releases the lock, so the transaction body can use ordinary `?`
//! early-return without a matching explicit unlock call.

/// Acquires the filesystem's single transaction lock for the duration of
/// one dedup pair's mutation. `begin` blocks (or, in a real implementation,
/// sleeps) until the lock is free; the returned guard releases it on drop.
pub trait TransactionLock {
    type Guard<'a>
    where
        Self: 'a;

    fn begin(&self) -> Self::Guard<'_>;
}
