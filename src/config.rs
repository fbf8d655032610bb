//! # Carousel Configuration
//!
//! Compile-time constants governing the kernel. All limits are fixed at
//! compile time — no dynamic allocation.

use crate::task::TaskId;

/// Maximum number of task slots, including the reserved idle slot.
/// Bounds the static TCB pool and determines the per-task stack carve.
/// Must be at least 2 (idle plus one application task).
pub const MAX_TASKS: usize = 5;

/// Slot permanently reserved for the idle task.
pub const IDLE_TASK_ID: TaskId = 0;

/// System clock frequency in Hz (STM32F4 on the 16 MHz HSI).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// Scheduler quantum in microseconds. One SysTick overflow equals one
/// quantum; a task with share N runs N quanta per turn on the ring.
pub const QUANTUM_MICROS: u32 = 1_000;

/// Total size in bytes of the master stack, carved into `MAX_TASKS` equal
/// regions. Must be a multiple of `8 * MAX_TASKS` so every region top keeps
/// the AAPCS 8-byte alignment.
pub const MASTER_STACK_SIZE: usize = MAX_TASKS * 1024;

/// Size of one task's stack region.
pub const STACK_REGION_SIZE: usize = MASTER_STACK_SIZE / MAX_TASKS;
