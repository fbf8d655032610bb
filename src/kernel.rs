//! # Kernel
//!
//! Top-level kernel initialization and the public API for Carousel.
//!
//! The kernel owns the global scheduler instance, wraps every entry point
//! in a critical section, and coordinates boot: pool init, scheduler clock
//! configuration, and the one-way jump into the idle task.
//!
//! ## Startup sequence
//!
//! ```text
//! reset_handler (cortex-m-rt)
//!   └─► main()
//!         ├─► kernel::init(syst, hooks)  ← Pool + clock configuration
//!         ├─► kernel::create_task()      ← Register tasks (×N)
//!         └─► kernel::start()            ← No return
//!               ├─► Disable interrupts
//!               ├─► SysTick to lowest priority
//!               └─► idle task: PSP to the master stack base,
//!                   start the clock, enable interrupts, loop
//! ```
//!
//! After the first tick the system is fully preemptive: the ring decides
//! who runs, and tasks interact with the kernel only through this module.

use cortex_m::peripheral::SYST;

use crate::arch::cortex_m4;
use crate::error::Result;
use crate::scheduler::Scheduler;
use crate::task::{TaskEntry, TaskId, TaskState};

pub use crate::scheduler::Hooks;

// ---------------------------------------------------------------------------
// Global scheduler instance
// ---------------------------------------------------------------------------

/// The process-wide kernel state.
///
/// # Safety
/// Mutated only through [`with_scheduler`] or from the SysTick handler,
/// which runs at the lowest exception priority and is masked whenever
/// task-context code holds the state.
static mut SCHEDULER: Scheduler = Scheduler::new();

/// Raw pointer to the global scheduler for the arch layer's exception
/// handlers, which cannot hold references across the asm boundary.
pub(crate) fn scheduler_ptr() -> *mut Scheduler {
    unsafe { core::ptr::addr_of_mut!(SCHEDULER) }
}

/// Run `f` with exclusive access to the kernel state.
///
/// Interrupts are disabled for the duration, which is what makes the
/// access exclusive: the tick ISR follows the ready-ring `next`/`prev`
/// links and the `current` index, so every task-context mutation of the
/// pool must be complete — no half-spliced ring, no stale living count —
/// before the next tick can fire.
fn with_scheduler<R>(f: impl FnOnce(&mut Scheduler) -> R) -> R {
    cortex_m::interrupt::free(|_cs| unsafe { f(&mut *scheduler_ptr()) })
}

// ---------------------------------------------------------------------------
// Kernel API
// ---------------------------------------------------------------------------

/// Initialize the kernel: reset the TCB pool, install the application
/// hooks, and configure the scheduler clock for one interrupt per quantum.
///
/// Must be called before any other kernel function, exactly once, from the
/// main thread. Fails with [`crate::error::Error::ClockUnfittable`] when no
/// SysTick prescaler can express the configured quantum; the kernel cannot
/// boot in that case.
pub fn init(syst: &mut SYST, hooks: Hooks) -> Result<()> {
    with_scheduler(|scheduler| {
        scheduler.init();
        scheduler.set_hooks(hooks);
    });

    // The clock is configured but not started; nothing can tick until the
    // idle task enables it, so this needs no interrupt masking.
    cortex_m4::init_scheduler_clock(syst)
}

/// Start the kernel. **Does not return.**
///
/// Disables interrupts, drops SysTick to the lowest exception priority,
/// and jumps into the idle task with the process stack reset to the master
/// stack base. The idle task finishes boot: it starts the scheduler clock,
/// re-enables interrupts, and loops on the application idle hook. From the
/// first tick on, created tasks preempt it.
pub fn start() -> ! {
    cortex_m::interrupt::disable();
    cortex_m4::set_interrupt_priorities();

    let stack_base = with_scheduler(|scheduler| scheduler.master_stack_base());
    unsafe { cortex_m4::start_idle_task(stack_base, idle_task) }
}

/// The reserved slot-0 task: runs whenever no application task is
/// schedulable, and performs the tail end of boot on its first entry.
extern "C" fn idle_task() -> ! {
    let on_idle = with_scheduler(|scheduler| scheduler.idle_hook());

    cortex_m4::start_scheduler_clock();
    // Boot's critical section ends here; preemption is live from now on.
    unsafe { cortex_m::interrupt::enable() };

    loop {
        on_idle();
    }
}

/// Create a task and hand it to the scheduler.
///
/// Claims the first free slot, carves the task's stack region out of the
/// master stack, plants the synthetic context frame, and applies
/// `initial_state` through the state-change path; a `Ready` task joins the
/// ring immediately. Identities start at 1 — slot 0 is the idle task.
///
/// # Parameters
/// - `entry`: task body; never returns.
/// - `initial_state`: usually [`TaskState::Ready`]. A task created in a
///   parked state is claimed but not scheduled until someone readies it.
/// - `quantum_share`: ticks per turn on the ring; must be positive.
pub fn create_task(
    entry: TaskEntry,
    initial_state: TaskState,
    quantum_share: u32,
) -> Result<TaskId> {
    with_scheduler(|scheduler| scheduler.create_task(entry, initial_state, quantum_share))
}

/// Move a task to a new state, updating ready-ring membership and the
/// living-task count.
///
/// Demoting the *running* task does not reschedule by itself: the task
/// keeps the CPU until the next tick unless it also calls
/// [`invoke_scheduler`]. A task terminates by setting itself `Dead` and
/// invoking the scheduler.
pub fn set_state(id: TaskId, new_state: TaskState) {
    with_scheduler(|scheduler| scheduler.set_state(id, new_state));
}

/// Surrender the rest of the current task's turn and force a scheduler
/// tick as soon as interrupts allow.
pub fn invoke_scheduler() {
    with_scheduler(|scheduler| scheduler.forfeit_quantum());
    cortex_m4::force_scheduler_interrupt();
}

/// Identity of the task currently owning the CPU.
pub fn running_task_id() -> TaskId {
    with_scheduler(|scheduler| scheduler.running_task_id())
}

/// Number of slots not in the `Dead` state, the idle task included.
pub fn living_task_count() -> u32 {
    with_scheduler(|scheduler| scheduler.living_task_count())
}

/// Scheduler ticks since boot or the last reset. Wraps at `u32::MAX`;
/// applications using it for coarse timing reset it periodically.
pub fn quantum_count() -> u32 {
    with_scheduler(|scheduler| scheduler.quantum_count())
}

/// Reset the quantum counter to zero.
pub fn reset_quantum_count() {
    with_scheduler(|scheduler| scheduler.reset_quantum_count());
}
