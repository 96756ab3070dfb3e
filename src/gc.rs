//! The GC-inode staging list collaborator.
//!
//! The filesystem's in-memory garbage-collector inode list is reused by the
//! driver as a staging area and cleared once the driver's pass finishes;
//! concurrent GC is prohibited while dedup is running, enforced by the
//! caller's single-writer assumption on this same list, not by this crate.

pub trait GcStagingList {
    /// Clears the staging list and the "gc-running" flag, run once after
    /// the driver's pair loop finishes regardless of per-pair outcomes.
    fn clear(&mut self);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::GcStagingList;

    #[derive(Default)]
    pub struct MockGcStagingList {
        pub cleared: bool,
    }

    impl MockGcStagingList {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl GcStagingList for MockGcStagingList {
        fn clear(&mut self) {
            self.cleared = true;
        }
    }
}
