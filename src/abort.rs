//! Fatal-corruption halt.
//!
//! A post-commit invariant violation — the DAT, right after a transaction
//! the driver itself just committed successfully, fails to translate the
//! way that pair's own promotions guarantee it must — is treated as
//! corruption rather than an ordinary `DedupError`: the filesystem cannot
//! safely continue, so the driver calls here instead of returning an error
//! a caller might shrug off. Grounded on the teacher's own `abort()`
//! (previously delegating to `crate::utils::spin_loop`), narrowed to drop
//! the dependency on the rest of the kernel's utility module this crate no
//! longer carries.

/// Halts execution. There is no recovery path once a post-commit invariant
/// has been observed to fail; the caller is expected to have logged the
/// violation before calling in.
pub fn abort() -> ! {
    panic!("fatal: post-commit DAT invariant violated")
}
