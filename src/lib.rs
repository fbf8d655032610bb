//! # Carousel
//!
//! A quantum-share round-robin microkernel for single-core ARM Cortex-M4
//! microcontrollers.
//!
//! ## Overview
//!
//! Carousel schedules a fixed pool of tasks around a circular "ready ring".
//! Each task carries a *quantum share*: the number of scheduler-clock ticks
//! it consumes every time it reaches the head of the ring. The scheduler
//! never scans or sorts; a scheduling decision is one pointer hop around the
//! ring, so the tick handler runs in constant time regardless of how many
//! tasks exist.
//!
//! - **Preemptive**: the SysTick timer interrupts the running task at every
//!   quantum boundary and the exception epilogue resumes whichever task the
//!   ring selected.
//! - **Weighted**: a task with share 3 runs three consecutive quanta per
//!   turn; relative CPU weight is the ratio of shares.
//! - **Always runnable**: slot 0 is a reserved idle task that re-enters the
//!   ring whenever no application task is schedulable.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                   Application Tasks                     │
//! ├────────────────────────────────────────────────────────┤
//! │                Kernel API (kernel.rs)                   │
//! │  init() · create_task() · set_state() · start() · ...   │
//! ├────────────────────────────────────────────────────────┤
//! │              Scheduler (scheduler.rs)                   │
//! │    TCB pool + master stack · ready ring · tick          │
//! ├────────────────────────────────────────────────────────┤
//! │              Task Model (task.rs)                       │
//! │    TaskControlBlock · TaskState · ring links            │
//! ├────────────────────────────────────────────────────────┤
//! │           Arch Port (arch/cortex_m4.rs)                 │
//! │    SysTick · Context Switch · Stack Frames · Launch     │
//! ├────────────────────────────────────────────────────────┤
//! │            ARM Cortex-M4 Hardware (Thumb-2)             │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The ready ring
//!
//! The ring is a doubly linked circular list threaded through the TCB pool
//! by slot index. Only tasks in the `Ready` or `Running` state are members.
//! With tasks A, B and C registered:
//!
//! ```text
//!        ┌──► A ──► B ──► C ──┐
//!        │                    │
//!        └────────◄───────────┘        current ──► A (Running)
//! ```
//!
//! At each quantum-share expiry the scheduler demotes the running task to
//! `Ready`, advances `current` one hop, promotes the new head to `Running`
//! and reloads the remaining-quantum counter from its share. When the last
//! application task leaves the ring, the idle slot is reinstalled as a
//! self-loop so the ring is never empty.
//!
//! ## Memory model
//!
//! - **No heap**: all state is statically allocated
//! - **No `alloc`**: pure `core` only
//! - **Fixed-size TCB pool**: `[TaskControlBlock; MAX_TASKS]`
//! - **Master stack**: one kernel-owned region carved into equal per-task
//!   stacks; tasks run on PSP, exception handlers stay on MSP
//! - **Critical sections**: `cortex_m::interrupt::free()` is the only
//!   mutual-exclusion primitive

#![no_std]

pub mod config;
pub mod error;
pub mod task;
pub mod scheduler;
pub mod arch;
pub mod kernel;
