//! Kernel error type.
//!
//! Failures the kernel can report to the caller. Contract violations (an
//! out-of-range identity, a zero quantum share) are not errors — they trap
//! through debug assertions and bounds checks instead.

/// Failure classes surfaced by the kernel API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// `create_task` found no dead slot to reuse.
    PoolExhausted,
    /// No scheduler-clock prescaler yields a reload value that fits the
    /// timer for the configured quantum; the kernel cannot boot.
    ClockUnfittable,
}

pub type Result<T> = core::result::Result<T, Error>;
