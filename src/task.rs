//! # Task Control Block
//!
//! Defines the task model for Carousel: the task state machine and the
//! per-slot task control block the scheduler threads its ready ring through.
//!
//! TCBs live in a fixed pool indexed by [`TaskId`]; a task's identity *is*
//! its slot index, assigned once at pool initialization and never mutated.
//! The ring links (`next`/`prev`) are slot indices too, so nothing in the
//! scheduler aliases a TCB by address across the ISR boundary.

/// Stable task identity: the task's slot index in the TCB pool.
pub type TaskId = u8;

/// A task entry point. Tasks never return; a task that is done moves itself
/// to [`TaskState::Dead`] and invokes the scheduler.
pub type TaskEntry = extern "C" fn() -> !;

// ---------------------------------------------------------------------------
// Task state machine
// ---------------------------------------------------------------------------

/// Execution state of a task.
///
/// Only `Ready` and `Running` tasks are members of the ready ring; a `Dead`
/// slot is free for reuse by the next task creation. The remaining states
/// all mean "not schedulable" to the kernel and exist for the application
/// to distinguish *why* a task is parked.
///
/// ```text
///   ┌──────┐ create_task ┌───────┐   ring advance   ┌─────────┐
///   │ Dead │ ───────────►│ Ready │ ◄──────────────► │ Running │
///   └──────┘             └───────┘     preempt      └─────────┘
///      ▲                     ▲                           │
///      │                     │ set_state(Ready)          │ set_state(..)
///      │                ┌────┴────────────────┐          │
///      └─────────────── │ Blocked · Waiting · │ ◄────────┘
///        set_state(Dead)│ Dormant             │
///                       └─────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Slot is inactive; its resources may be claimed by a new task.
    Dead,
    /// Task is in the ready ring, waiting for its turn on the CPU.
    Ready,
    /// Task is currently executing.
    Running,
    /// Task is waiting for access to some resource.
    Blocked,
    /// Task is being forced to wait.
    Waiting,
    /// Task is parked and ignored by the scheduler.
    Dormant,
}

impl TaskState {
    /// Whether the state makes a task a ready-ring member.
    #[inline]
    pub const fn is_schedulable(self) -> bool {
        matches!(self, TaskState::Ready | TaskState::Running)
    }
}

// ---------------------------------------------------------------------------
// Task Control Block
// ---------------------------------------------------------------------------

/// Task Control Block (TCB) — the per-slot kernel record.
///
/// `stack_pointer` must remain the first field: the context-switch path
/// treats a TCB's address as the address of its saved-SP cell, and the
/// `#[repr(C)]` layout guarantees the two coincide.
///
/// `next`/`prev` are meaningful only while the task is a ready-ring member
/// (`state.is_schedulable()`).
#[repr(C)]
pub struct TaskControlBlock {
    /// Saved process stack pointer. Updated on every context switch;
    /// points into the task's carved region of the master stack.
    pub(crate) stack_pointer: *mut u32,

    /// Slot index; assigned at pool init and never mutated.
    pub(crate) id: TaskId,

    /// Timer ticks this task consumes per turn on the ring. Positive.
    pub(crate) quantum_share: u32,

    /// Current execution state.
    pub(crate) state: TaskState,

    /// Ring successor (slot index).
    pub(crate) next: TaskId,

    /// Ring predecessor (slot index).
    pub(crate) prev: TaskId,
}

// Safety: the raw stack_pointer always targets the task's own region of the
// kernel-owned master stack, and TCBs are only touched inside critical
// sections or from the tick ISR.
unsafe impl Send for TaskControlBlock {}
unsafe impl Sync for TaskControlBlock {}

impl TaskControlBlock {
    /// An unallocated slot with the given identity. Ring links point at the
    /// slot itself until the scheduler splices it into the ring.
    pub(crate) const fn empty(id: TaskId) -> Self {
        Self {
            stack_pointer: core::ptr::null_mut(),
            id,
            quantum_share: 0,
            state: TaskState::Dead,
            next: id,
            prev: id,
        }
    }

    pub(crate) const EMPTY: Self = Self::empty(0);

    /// The slot's stable identity.
    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
