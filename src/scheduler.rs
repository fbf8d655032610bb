//! # Scheduler
//!
//! The kernel core: the TCB pool, the ready ring, the quantum-share tick,
//! the state-change transitions, and task bring-up.
//!
//! ## Scheduling algorithm
//!
//! The ready ring is a doubly linked circular list threaded through the TCB
//! pool by slot index; its members are exactly the tasks in the `Ready` or
//! `Running` state. At each SysTick:
//!
//! 1. Count the quantum and fire the application's quantum hook
//! 2. Decrement the running task's remaining quantum; done if still positive
//! 3. Demote the running task to `Ready` (unless it already left `Running`)
//! 4. Advance `current` one hop around the ring
//! 5. Promote the new head to `Running` and reload the remaining quantum
//!    from its share
//!
//! A scheduling decision is one link hop: no scanning, no sorting. All
//! fairness structure lives in the ring order; quantum shares approximate
//! weighted round-robin without a priority queue.
//!
//! ## The idle slot
//!
//! Slot 0 is reserved. Whenever no application task is schedulable the ring
//! is the idle slot linked to itself; as soon as a task registers, idle
//! hands the ring over at the next tick and drops out of the rotation.
//!
//! ## Concurrency contract
//!
//! Every method that mutates the ring, the living-task count, or `current`
//! must run with interrupts disabled. `tick` runs in SysTick context and
//! assumes the ring links are coherent at every entry; task-context callers
//! restore that coherence before re-enabling interrupts.

use crate::arch::cortex_m4;
use crate::config::{IDLE_TASK_ID, MASTER_STACK_SIZE, MAX_TASKS, STACK_REGION_SIZE};
use crate::error::{Error, Result};
use crate::task::{TaskControlBlock, TaskEntry, TaskId, TaskState};

// ---------------------------------------------------------------------------
// Application hooks
// ---------------------------------------------------------------------------

/// Application-supplied callbacks invoked by the kernel.
#[derive(Clone, Copy)]
pub struct Hooks {
    /// Invoked repeatedly from the idle task, with interrupts enabled.
    pub on_idle: fn(),

    /// Invoked from the tick ISR once per quantum with the current quantum
    /// count. Must not block and must not re-enable interrupts.
    pub on_quantum: fn(u32),
}

impl Hooks {
    /// Hooks that do nothing.
    pub const fn new() -> Self {
        Self {
            on_idle: noop_idle,
            on_quantum: noop_quantum,
        }
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Self::new()
    }
}

fn noop_idle() {}

fn noop_quantum(_count: u32) {}

// ---------------------------------------------------------------------------
// Master stack
// ---------------------------------------------------------------------------

/// The kernel-owned stack arena, carved into `MAX_TASKS` equal regions.
/// Stacks grow downward; region tops stay 8-byte aligned per the AAPCS.
#[repr(align(8))]
struct MasterStack([u8; MASTER_STACK_SIZE]);

// ---------------------------------------------------------------------------
// Scheduler state
// ---------------------------------------------------------------------------

/// The complete kernel state: TCB pool, master stack, ready ring, current
/// task, and counters. The single instance lives in `kernel.rs`; all
/// mutation is gated by a critical section or happens in the tick ISR.
pub struct Scheduler {
    /// Fixed pool of TCBs. Slot 0 is the idle task.
    tasks: [TaskControlBlock; MAX_TASKS],

    /// Stack arena; task `id` owns the region ending at
    /// `base - id * STACK_REGION_SIZE`.
    stack: MasterStack,

    /// Slot index of the task owning the CPU.
    current: TaskId,

    /// Number of slots not in the `Dead` state, idle included.
    living: u32,

    /// Quanta elapsed since the last reset. Wraps; applications that care
    /// reset it periodically.
    quantum_count: u32,

    /// Quanta left in the running task's turn. Starts at 1 so the first
    /// tick after boot picks a task immediately.
    remaining_quantum: u32,

    /// Application callbacks.
    hooks: Hooks,
}

impl Scheduler {
    pub const fn new() -> Self {
        let mut tasks = [TaskControlBlock::EMPTY; MAX_TASKS];
        let mut slot = 0;
        while slot < MAX_TASKS {
            tasks[slot] = TaskControlBlock::empty(slot as TaskId);
            slot += 1;
        }
        tasks[IDLE_TASK_ID as usize].state = TaskState::Running;
        tasks[IDLE_TASK_ID as usize].quantum_share = 1;

        Self {
            tasks,
            stack: MasterStack([0; MASTER_STACK_SIZE]),
            current: IDLE_TASK_ID,
            living: 1,
            quantum_count: 0,
            remaining_quantum: 1,
            hooks: Hooks::new(),
        }
    }

    /// Reset the pool to its boot state: every slot dead and self-linked
    /// with its permanent identity, the idle slot running as a self-loop
    /// ring with its stack pointer at the master stack base.
    ///
    /// Hooks are left untouched.
    pub fn init(&mut self) {
        let mut slot = 0;
        while slot < MAX_TASKS {
            self.tasks[slot] = TaskControlBlock::empty(slot as TaskId);
            slot += 1;
        }
        let base = self.master_stack_base();
        self.tasks[IDLE_TASK_ID as usize].state = TaskState::Running;
        self.tasks[IDLE_TASK_ID as usize].quantum_share = 1;
        self.tasks[IDLE_TASK_ID as usize].stack_pointer = base;

        self.current = IDLE_TASK_ID;
        self.living = 1;
        self.quantum_count = 0;
        self.remaining_quantum = 1;
    }

    pub fn set_hooks(&mut self, hooks: Hooks) {
        self.hooks = hooks;
    }

    // -----------------------------------------------------------------------
    // Scheduler tick
    // -----------------------------------------------------------------------

    /// Account one quantum and, when the running task's share is exhausted,
    /// advance the ring. Called from the SysTick handler; the exception
    /// epilogue then restores whichever task `current` names.
    pub fn tick(&mut self) {
        self.quantum_count = self.quantum_count.wrapping_add(1);
        (self.hooks.on_quantum)(self.quantum_count);

        self.remaining_quantum -= 1;
        if self.remaining_quantum > 0 {
            return;
        }

        let outgoing = self.current as usize;
        if self.tasks[outgoing].state == TaskState::Running {
            // The task may already have parked or killed itself; only a
            // still-running task is demoted.
            self.tasks[outgoing].state = TaskState::Ready;
        }

        self.current = self.tasks[outgoing].next;
        let incoming = self.current as usize;
        self.tasks[incoming].state = TaskState::Running;
        self.remaining_quantum = self.tasks[incoming].quantum_share;
    }

    /// Collapse the running task's turn to a single quantum so the next
    /// tick is guaranteed to advance the ring. Used by `invoke_scheduler`.
    pub fn forfeit_quantum(&mut self) {
        self.remaining_quantum = 1;
    }

    // -----------------------------------------------------------------------
    // State-change API
    // -----------------------------------------------------------------------

    /// Move task `id` to `new_state`, maintaining the living-task count and
    /// the ready-ring membership. This is the sole entry point for state
    /// mutation; `next`/`prev` and `state` are never written directly by
    /// callers.
    ///
    /// Moving the running task out of `Running` does not reschedule by
    /// itself; the task keeps the CPU until the next tick unless it also
    /// invokes the scheduler.
    pub fn set_state(&mut self, id: TaskId, new_state: TaskState) {
        debug_assert!((id as usize) < MAX_TASKS);
        let old_state = self.tasks[id as usize].state;

        if old_state == TaskState::Dead && new_state != TaskState::Dead {
            self.living += 1;
        } else if old_state != TaskState::Dead && new_state == TaskState::Dead {
            self.living -= 1;
        }

        if new_state == TaskState::Ready && !old_state.is_schedulable() {
            self.register(id);
        } else if !new_state.is_schedulable() && old_state.is_schedulable() {
            self.deregister(id);
        }

        self.tasks[id as usize].state = new_state;
    }

    // -----------------------------------------------------------------------
    // Ready ring
    // -----------------------------------------------------------------------

    /// Splice slot `id` into the ring. Two independent questions decide the
    /// insertion point: is the ring currently the idle self-loop, and is the
    /// idle slot the one holding the CPU?
    fn register(&mut self, id: TaskId) {
        let idle = IDLE_TASK_ID as usize;
        let idle_is_current = self.current == IDLE_TASK_ID;
        let ring_is_idle_self_loop = self.tasks[idle].next == IDLE_TASK_ID;

        if idle_is_current && ring_is_idle_self_loop {
            // First schedulable task: it becomes the whole ring. Idle keeps
            // its links aimed at the newcomer and leaves the rotation at the
            // next tick advance.
            self.tasks[id as usize].next = id;
            self.tasks[id as usize].prev = id;
            self.tasks[idle].next = id;
            self.tasks[idle].prev = id;
        } else if idle_is_current {
            // Tasks are ready but the ring has not advanced off idle yet;
            // join at the tail, bypassing the idle slot.
            let head = self.tasks[idle].next;
            self.insert_before(head, id);
            self.tasks[idle].prev = id;
        } else {
            // Tail insert relative to the running task.
            self.insert_before(self.current, id);
        }
    }

    /// Insert `id` immediately before `at`, making it the tail of the turn
    /// order whose head is `at`.
    fn insert_before(&mut self, at: TaskId, id: TaskId) {
        let tail = self.tasks[at as usize].prev;
        self.tasks[tail as usize].next = id;
        self.tasks[id as usize].prev = tail;
        self.tasks[id as usize].next = at;
        self.tasks[at as usize].prev = id;
    }

    /// Unlink slot `id` from the ring.
    fn deregister(&mut self, id: TaskId) {
        let idle = IDLE_TASK_ID as usize;

        if self.tasks[id as usize].next == id {
            // Last ring member. Redirect the current slot's successor at
            // idle so the next advance lands there even while the departing
            // task still owns the CPU, and reinstall the idle self-loop.
            self.tasks[self.current as usize].next = IDLE_TASK_ID;
            self.tasks[idle].next = IDLE_TASK_ID;
            self.tasks[idle].prev = IDLE_TASK_ID;
        } else {
            let prev = self.tasks[id as usize].prev;
            let next = self.tasks[id as usize].next;
            self.tasks[prev as usize].next = next;
            self.tasks[next as usize].prev = prev;
        }
    }

    // -----------------------------------------------------------------------
    // Task bring-up
    // -----------------------------------------------------------------------

    /// Claim the first dead slot, carve its stack region, plant the
    /// synthetic context frame, and route the initial state through the
    /// state-change path. Identity 0 is reserved, so a successful result is
    /// always at least 1.
    pub fn create_task(
        &mut self,
        entry: TaskEntry,
        initial_state: TaskState,
        quantum_share: u32,
    ) -> Result<TaskId> {
        debug_assert!(quantum_share > 0);

        for id in 1..MAX_TASKS as TaskId {
            if self.tasks[id as usize].state != TaskState::Dead {
                continue;
            }

            let stack_top = self.stack_region_top(id);
            let sp = cortex_m4::plant_initial_frame(stack_top, entry);

            let tcb = &mut self.tasks[id as usize];
            tcb.stack_pointer = sp;
            tcb.next = id;
            tcb.prev = id;
            tcb.quantum_share = quantum_share;

            self.set_state(id, initial_state);
            return Ok(id);
        }

        Err(Error::PoolExhausted)
    }

    /// One past the highest address of the stack arena. Stacks grow down
    /// from here; the idle task runs directly on the base region.
    pub(crate) fn master_stack_base(&mut self) -> *mut u32 {
        unsafe { self.stack.0.as_mut_ptr().add(MASTER_STACK_SIZE) as *mut u32 }
    }

    fn stack_region_top(&mut self, id: TaskId) -> *mut u32 {
        let base = self.master_stack_base() as usize;
        (base - id as usize * STACK_REGION_SIZE) as *mut u32
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn running_task_id(&self) -> TaskId {
        self.tasks[self.current as usize].id
    }

    pub fn living_task_count(&self) -> u32 {
        self.living
    }

    pub fn quantum_count(&self) -> u32 {
        self.quantum_count
    }

    pub fn reset_quantum_count(&mut self) {
        self.quantum_count = 0;
    }

    pub(crate) fn idle_hook(&self) -> fn() {
        self.hooks.on_idle
    }

    /// Record the preempted task's stack pointer. Called from the SysTick
    /// handler before the tick advances the ring.
    pub(crate) fn save_stack_pointer(&mut self, sp: *mut u32) {
        self.tasks[self.current as usize].stack_pointer = sp;
    }

    /// Stack pointer of the task the exception epilogue should restore.
    pub(crate) fn current_stack_pointer(&self) -> *mut u32 {
        self.tasks[self.current as usize].stack_pointer
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    extern "C" fn parked_entry() -> ! {
        loop {}
    }

    fn sched() -> Scheduler {
        Scheduler::new()
    }

    /// Walk the ring from `current` via `next`, capping the walk so a
    /// broken ring fails the test instead of hanging it.
    fn ring_members(s: &Scheduler) -> ([TaskId; MAX_TASKS + 1], usize) {
        let mut members = [0; MAX_TASKS + 1];
        let mut len = 0;
        let mut at = s.current;
        loop {
            members[len] = at;
            len += 1;
            at = s.tasks[at as usize].next;
            if at == s.current || len > MAX_TASKS {
                break;
            }
        }
        (members, len)
    }

    /// Full coherence check, valid at any point where interrupts would be
    /// enabled and no tick is pending against a self-demoted task.
    fn assert_ring_coherent(s: &Scheduler) {
        let (members, len) = ring_members(s);
        assert!(len <= MAX_TASKS, "ring does not close back on current");

        let mut running = 0;
        for &id in &members[..len] {
            let id = id as usize;
            assert_eq!(s.tasks[s.tasks[id].next as usize].prev as usize, id);
            assert_eq!(s.tasks[s.tasks[id].prev as usize].next as usize, id);
            if s.tasks[id].state == TaskState::Running {
                running += 1;
            }
        }
        assert_eq!(running, 1);
        assert_eq!(s.tasks[s.current as usize].state, TaskState::Running);

        let non_dead = s.tasks.iter().filter(|t| t.state != TaskState::Dead).count() as u32;
        assert_eq!(s.living, non_dead);

        let idle_in_ring = members[..len].contains(&IDLE_TASK_ID);
        let others_schedulable = s.tasks[1..].iter().any(|t| t.state.is_schedulable());
        assert_eq!(idle_in_ring, !others_schedulable);
    }

    #[test]
    fn boot_with_no_tasks_keeps_idle_running() {
        let mut s = sched();
        assert_eq!(s.living_task_count(), 1);
        assert_ring_coherent(&s);

        for _ in 0..10 {
            s.tick();
            assert_eq!(s.running_task_id(), IDLE_TASK_ID);
            assert_ring_coherent(&s);
        }
    }

    #[test]
    fn first_task_takes_over_at_the_next_tick() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 3).unwrap();
        assert_eq!(a, 1);

        // The newcomer is a self-loop and idle aims both links at it until
        // the ring advances.
        assert_eq!(s.tasks[a as usize].next, a);
        assert_eq!(s.tasks[a as usize].prev, a);
        assert_eq!(s.tasks[IDLE_TASK_ID as usize].next, a);
        assert_eq!(s.tasks[IDLE_TASK_ID as usize].prev, a);
        assert_eq!(s.running_task_id(), IDLE_TASK_ID);

        s.tick();
        assert_eq!(s.running_task_id(), a);
        assert_eq!(s.tasks[a as usize].state, TaskState::Running);
        assert_ring_coherent(&s);
    }

    #[test]
    fn second_task_joins_the_tail_while_idle_holds_the_cpu() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        let b = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();

        // Idle still heads into `a`; `b` sits between the tail and the head.
        assert_eq!(s.tasks[IDLE_TASK_ID as usize].next, a);
        assert_eq!(s.tasks[IDLE_TASK_ID as usize].prev, b);
        assert_eq!(s.tasks[a as usize].next, b);
        assert_eq!(s.tasks[b as usize].next, a);
        assert_eq!(s.tasks[a as usize].prev, b);
        assert_eq!(s.tasks[b as usize].prev, a);

        s.tick();
        assert_eq!(s.running_task_id(), a);
        assert_ring_coherent(&s);
    }

    #[test]
    fn single_task_with_share_three_runs_continuously() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 3).unwrap();
        assert_eq!(s.living_task_count(), 2);

        for _ in 0..10 {
            s.tick();
            assert_eq!(s.running_task_id(), a);
            assert_ring_coherent(&s);
        }
    }

    #[test]
    fn round_robin_honors_quantum_shares() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 2).unwrap();
        let b = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();

        let mut observed = [0; 9];
        for slot in observed.iter_mut() {
            s.tick();
            *slot = s.running_task_id();
        }
        assert_eq!(observed, [a, a, b, a, a, b, a, a, b]);
        assert_ring_coherent(&s);
    }

    #[test]
    fn self_termination_passes_the_cpu_and_frees_the_slot() {
        let mut s = sched();
        let t = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        s.tick();
        assert_eq!(s.running_task_id(), t);

        // The task kills itself and surrenders the CPU.
        s.set_state(t, TaskState::Dead);
        assert_eq!(s.living_task_count(), 1);
        s.forfeit_quantum();
        s.tick();

        assert_eq!(s.running_task_id(), IDLE_TASK_ID);
        assert_ring_coherent(&s);

        // The slot is reusable.
        let u = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        assert_eq!(u, t);
    }

    #[test]
    fn self_termination_hands_over_to_the_next_ring_member() {
        let mut s = sched();
        let t = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        let w = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        s.tick();
        assert_eq!(s.running_task_id(), t);

        s.set_state(t, TaskState::Dead);
        s.forfeit_quantum();
        s.tick();

        assert_eq!(s.running_task_id(), w);
        assert_eq!(s.living_task_count(), 2);
        assert_ring_coherent(&s);
    }

    #[test]
    fn pool_exhaustion_reports_and_slot_reuse_recovers() {
        let mut s = sched();
        for expected in 1..MAX_TASKS as TaskId {
            let id = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(
            s.create_task(parked_entry, TaskState::Ready, 1),
            Err(Error::PoolExhausted)
        );

        s.set_state(2, TaskState::Dead);
        let id = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        assert_eq!(id, 2);
    }

    #[test]
    fn dormant_last_task_collapses_the_ring_to_idle() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 2).unwrap();
        s.tick();
        assert_eq!(s.running_task_id(), a);

        s.set_state(a, TaskState::Dormant);
        // Dormant is not Dead: the slot stays claimed.
        assert_eq!(s.living_task_count(), 2);

        // The task keeps the CPU until its share runs out.
        s.tick();
        assert_eq!(s.running_task_id(), a);
        s.tick();
        assert_eq!(s.running_task_id(), IDLE_TASK_ID);
        assert_ring_coherent(&s);
    }

    #[test]
    fn ready_round_trip_restores_the_ring_structure() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        let b = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        let c = s.create_task(parked_entry, TaskState::Dormant, 1).unwrap();
        s.tick();
        assert_eq!(s.running_task_id(), a);

        let before = [
            (s.tasks[a as usize].next, s.tasks[a as usize].prev),
            (s.tasks[b as usize].next, s.tasks[b as usize].prev),
        ];

        s.set_state(c, TaskState::Ready);
        s.set_state(c, TaskState::Dormant);

        let after = [
            (s.tasks[a as usize].next, s.tasks[a as usize].prev),
            (s.tasks[b as usize].next, s.tasks[b as usize].prev),
        ];
        assert_eq!(before, after);
        assert_ring_coherent(&s);
    }

    #[test]
    fn same_state_twice_changes_nothing() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        s.tick();

        let living = s.living_task_count();
        let links = (s.tasks[a as usize].next, s.tasks[a as usize].prev);
        s.set_state(a, TaskState::Running);
        s.set_state(a, TaskState::Running);
        assert_eq!(s.living_task_count(), living);
        assert_eq!((s.tasks[a as usize].next, s.tasks[a as usize].prev), links);
        assert_ring_coherent(&s);

        // Dead to Dead on a free slot must not disturb the living count.
        s.set_state(4, TaskState::Dead);
        assert_eq!(s.living_task_count(), living);
    }

    #[test]
    fn promoting_a_ready_task_to_running_keeps_it_in_the_ring() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        let b = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        s.tick();
        assert_eq!(s.running_task_id(), a);

        // A membership-neutral transition: no register, no deregister.
        let links = (s.tasks[b as usize].next, s.tasks[b as usize].prev);
        s.set_state(b, TaskState::Waiting);
        s.set_state(b, TaskState::Ready);
        s.set_state(b, TaskState::Running);
        assert_eq!((s.tasks[b as usize].next, s.tasks[b as usize].prev), links);
    }

    #[test]
    fn nonschedulable_initial_state_claims_a_slot_without_ring_entry() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Waiting, 4).unwrap();
        assert_eq!(s.living_task_count(), 2);
        assert_eq!(s.tasks[a as usize].state, TaskState::Waiting);

        // Idle still owns a self-loop ring.
        s.tick();
        assert_eq!(s.running_task_id(), IDLE_TASK_ID);
        assert_ring_coherent(&s);

        s.set_state(a, TaskState::Ready);
        s.tick();
        assert_eq!(s.running_task_id(), a);
        assert_eq!(s.tasks[a as usize].quantum_share, 4);
    }

    #[test]
    fn quantum_counter_counts_and_resets() {
        let mut s = sched();
        for _ in 0..7 {
            s.tick();
        }
        assert_eq!(s.quantum_count(), 7);

        s.reset_quantum_count();
        assert_eq!(s.quantum_count(), 0);

        s.tick();
        assert_eq!(s.quantum_count(), 1);
    }

    #[test]
    fn quantum_hook_fires_once_per_tick_with_the_count() {
        static CALLS: AtomicU32 = AtomicU32::new(0);
        static LAST_COUNT: AtomicU32 = AtomicU32::new(0);

        fn on_quantum(count: u32) {
            CALLS.fetch_add(1, Ordering::Relaxed);
            LAST_COUNT.store(count, Ordering::Relaxed);
        }

        let mut s = sched();
        s.set_hooks(Hooks {
            on_idle: || {},
            on_quantum,
        });

        for _ in 0..3 {
            s.tick();
        }
        assert_eq!(CALLS.load(Ordering::Relaxed), 3);
        assert_eq!(LAST_COUNT.load(Ordering::Relaxed), s.quantum_count());
    }

    #[test]
    fn each_task_gets_its_own_stack_region() {
        let mut s = sched();
        let a = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();
        let b = s.create_task(parked_entry, TaskState::Ready, 1).unwrap();

        let base = s.master_stack_base() as usize;
        for &id in &[a, b] {
            let top = base - id as usize * STACK_REGION_SIZE;
            let bottom = top - STACK_REGION_SIZE;
            let sp = s.tasks[id as usize].stack_pointer as usize;
            assert!(sp < top && sp >= bottom);
            assert_eq!(sp % 8, 0);
        }
    }

    #[test]
    fn init_resets_pool_and_points_idle_at_the_stack_base() {
        let mut s = sched();
        s.create_task(parked_entry, TaskState::Ready, 2).unwrap();
        for _ in 0..5 {
            s.tick();
        }

        s.init();
        assert_eq!(s.living_task_count(), 1);
        assert_eq!(s.quantum_count(), 0);
        assert_eq!(s.running_task_id(), IDLE_TASK_ID);
        let base = s.master_stack_base();
        assert_eq!(s.tasks[IDLE_TASK_ID as usize].stack_pointer, base);
        for (slot, tcb) in s.tasks.iter().enumerate().skip(1) {
            assert_eq!(tcb.state, TaskState::Dead);
            assert_eq!(tcb.id as usize, slot);
        }
        assert_ring_coherent(&s);
    }
}
