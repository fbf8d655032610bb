//! # Cortex-M4 Port Layer
//!
//! Hardware-specific code for the ARM Cortex-M4 (Thumb-2) processor:
//! SysTick as the scheduler clock, the context-switch exception handler,
//! synthetic stack frames for task bring-up, and the one-way jump that
//! starts the idle task.
//!
//! ## Context switch mechanism
//!
//! The Cortex-M4 uses a split-stack model:
//! - **MSP** (Main Stack Pointer): used by exception handlers
//! - **PSP** (Process Stack Pointer): used by tasks in Thread mode
//!
//! On exception entry the hardware stacks R0-R3, R12, LR, PC and xPSR onto
//! the process stack. The SysTick handler completes the context save by
//! pushing R4-R11, records the PSP into the outgoing task's TCB, runs the
//! scheduler tick, and unwinds the same sequence from whichever TCB the
//! ring selected. Preemption is therefore a property of the exception
//! return path itself; a freshly created task only needs a plausible saved
//! frame on its stack to be launchable.
//!
//! ## Scheduler clock
//!
//! SysTick counts down from a 24-bit reload value. Its prescaler range is
//! the pair of clock sources: the processor clock (divide by 1) and the
//! external reference (divide by 8 on STM32 parts). The clock search picks
//! the smallest divisor whose reload value for the configured quantum fits
//! the counter width.
//!
//! SysTick runs at the lowest exception priority so a context switch never
//! preempts another interrupt handler.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

use crate::config::{QUANTUM_MICROS, SYSTEM_CLOCK_HZ};
use crate::error::{Error, Result};
use crate::task::TaskEntry;

// ---------------------------------------------------------------------------
// Scheduler clock
// ---------------------------------------------------------------------------

/// SysTick reload register width: 24 bits.
const SYST_MAX_RELOAD: u32 = 0x00FF_FFFF;

/// Legal prescaler range, smallest first.
const PRESCALE_DIVISORS: [u32; 2] = [1, 8];

/// Find the smallest prescaler divisor whose reload value for one quantum
/// fits the SysTick counter. Returns `(divisor, reload)`.
///
/// The timer must tick at least twice per quantum; a quantum shorter than
/// two timer ticks is as unfittable as one that overflows the counter.
fn select_prescale(quantum_micros: u32, clock_hz: u32) -> Option<(u32, u32)> {
    for &divisor in &PRESCALE_DIVISORS {
        let ticks = clock_hz as u64 * quantum_micros as u64 / (1_000_000 * divisor as u64);
        if ticks >= 2 && ticks - 1 <= SYST_MAX_RELOAD as u64 {
            return Some((divisor, (ticks - 1) as u32));
        }
    }
    None
}

/// Configure SysTick for one overflow per quantum, leaving it stopped.
/// Fails if no prescaler fits the configured quantum and system clock.
pub fn init_scheduler_clock(syst: &mut SYST) -> Result<()> {
    let (divisor, reload) =
        select_prescale(QUANTUM_MICROS, SYSTEM_CLOCK_HZ).ok_or(Error::ClockUnfittable)?;
    configure_scheduler_clock(syst, divisor, reload);
    Ok(())
}

/// Load a prescaler divisor and reload value into SysTick. The caller is
/// expected to have stopped the clock first; the current count is cleared.
pub fn configure_scheduler_clock(syst: &mut SYST, divisor: u32, reload: u32) {
    let source = if divisor == 1 {
        SystClkSource::Core
    } else {
        SystClkSource::External
    };
    syst.set_clock_source(source);
    syst.set_reload(reload);
    syst.clear_current();
}

// SysTick Control and Status Register: 0xE000_E010
const SYST_CSR: *mut u32 = 0xE000_E010 as *mut u32;
const SYST_CSR_ENABLE: u32 = 1 << 0;
const SYST_CSR_TICKINT: u32 = 1 << 1;

/// Start the scheduler clock: enable the counter and its interrupt.
pub fn start_scheduler_clock() {
    unsafe {
        let val = core::ptr::read_volatile(SYST_CSR);
        core::ptr::write_volatile(SYST_CSR, val | SYST_CSR_ENABLE | SYST_CSR_TICKINT);
    }
}

/// Stop the scheduler clock, preserving the running task's remaining share.
pub fn stop_scheduler_clock() {
    unsafe {
        let val = core::ptr::read_volatile(SYST_CSR);
        core::ptr::write_volatile(SYST_CSR, val & !(SYST_CSR_ENABLE | SYST_CSR_TICKINT));
    }
}

/// Force the scheduler clock interrupt pending so a tick runs as soon as
/// interrupts allow.
///
/// Sets the PENDSTSET bit in the Interrupt Control and State Register.
#[inline]
pub fn force_scheduler_interrupt() {
    // ICSR address: 0xE000_ED04, PENDSTSET = bit 26
    const ICSR: *mut u32 = 0xE000_ED04 as *mut u32;
    unsafe {
        core::ptr::write_volatile(ICSR, 1 << 26);
    }
}

// ---------------------------------------------------------------------------
// Interrupt priority configuration
// ---------------------------------------------------------------------------

/// Set SysTick to the lowest exception priority so context switches only
/// run when no other handler is active.
pub fn set_interrupt_priorities() {
    unsafe {
        // System Handler Priority Register 3 (SHPR3): 0xE000_ED20
        // Bits [31:24] = SysTick priority
        let shpr3: *mut u32 = 0xE000_ED20 as *mut u32;
        let val = core::ptr::read_volatile(shpr3);
        core::ptr::write_volatile(shpr3, val | (0xFF << 24));
    }
}

// ---------------------------------------------------------------------------
// Synthetic context frames
// ---------------------------------------------------------------------------

/// Words in a full saved context: 8 software-saved (R4-R11) plus the
/// 8-word hardware exception frame.
const CONTEXT_FRAME_WORDS: usize = 16;

/// xPSR value with the Thumb bit set.
const XPSR_THUMB: u32 = 0x0100_0000;

/// Plant a synthetic saved-context frame below `stack_top` so the ordinary
/// exception-return path launches `entry` as if it had just been preempted.
/// Returns the task's initial saved stack pointer.
///
/// ## Stack layout (top = high address, growing down)
///
/// ```text
/// [Hardware stacked frame]
///   xPSR  (Thumb bit set)
///   PC    (task entry point)
///   LR    (task_exit)
///   R12   (0)
///   R3    (0)
///   R2    (0)
///   R1    (0)
///   R0    (0)
/// [Software saved context]
///   R11   (0)
///   ...
///   R4    (0)              <- returned stack pointer
/// ```
///
/// `stack_top` is realigned down to 8 bytes per the AAPCS before the frame
/// is laid down.
pub fn plant_initial_frame(stack_top: *mut u32, entry: TaskEntry) -> *mut u32 {
    let aligned_top = (stack_top as usize) & !0x07;
    let frame = (aligned_top - CONTEXT_FRAME_WORDS * 4) as *mut u32;

    unsafe {
        // Software-saved registers R4-R11
        for word in 0..8 {
            *frame.add(word) = 0;
        }

        // Hardware-stacked frame
        *frame.add(8) = 0; // R0
        *frame.add(9) = 0; // R1
        *frame.add(10) = 0; // R2
        *frame.add(11) = 0; // R3
        *frame.add(12) = 0; // R12
        *frame.add(13) = task_exit as usize as u32; // LR, in case the task returns
        *frame.add(14) = entry as usize as u32; // PC
        *frame.add(15) = XPSR_THUMB; // xPSR
    }

    frame
}

/// Landing pad for tasks that return. Task entries are `fn() -> !`, so this
/// is unreachable in well-formed programs; it parks the CPU rather than
/// wandering into undefined territory.
///
/// Host test builds never execute this function (only its address is taken,
/// to plant it as a synthetic frame's LR), but the address-taken reference
/// still forces the body to be linked; `cortex_m::asm::wfi()` has no host
/// implementation, so the host build substitutes a spin loop here.
#[cfg(all(target_arch = "arm", target_os = "none"))]
extern "C" fn task_exit() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
extern "C" fn task_exit() -> ! {
    loop {
        core::hint::spin_loop();
    }
}

// ---------------------------------------------------------------------------
// Idle task launch
// ---------------------------------------------------------------------------

/// Point the process stack at the master stack base, switch Thread mode to
/// PSP, and branch to the idle entry. Every caller frame is discarded; the
/// idle task owns the base stack region outright.
///
/// # Safety
/// Must be called once, from Thread mode on MSP, with interrupts disabled
/// and a valid `stack_base`.
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub unsafe fn start_idle_task(stack_base: *mut u32, entry: TaskEntry) -> ! {
    core::arch::asm!(
        "msr psp, r0",
        "movs r1, #2",
        "msr control, r1",
        "isb",
        "bx r2",
        in("r0") stack_base,
        in("r2") entry as usize,
        options(noreturn),
    );
}

/// On non-embedded targets the launch is unreachable; defer to runtime the
/// way the `cortex-m` crate does for its assembly shims.
#[cfg(not(all(target_arch = "arm", target_os = "none")))]
pub unsafe fn start_idle_task(_stack_base: *mut u32, _entry: TaskEntry) -> ! {
    unimplemented!("task launch requires a Cortex-M target");
}

// ---------------------------------------------------------------------------
// SysTick handler (tick + context switch)
// ---------------------------------------------------------------------------

/// SysTick exception handler: the scheduler tick wrapped in a full context
/// save and restore.
///
/// ## Sequence
/// 1. Push R4-R11 onto the running task's stack (PSP)
/// 2. Record the updated PSP into the running task's TCB
/// 3. Run the scheduler tick, which may advance the ring
/// 4. Reload PSP from the TCB the ring selected and pop its R4-R11
/// 5. Return from the exception; hardware restores the rest of the frame
///
/// # Safety
/// Called only by the NVIC. Follows the Cortex-M4 exception entry and exit
/// convention exactly; `tick_and_switch` preserves the AAPCS callee-saved
/// registers.
#[cfg(all(target_arch = "arm", target_os = "none"))]
#[unsafe(naked)]
#[no_mangle]
pub unsafe extern "C" fn SysTick() {
    core::arch::naked_asm!(
        // --- Save outgoing context ---
        "mrs r0, psp",
        "stmdb r0!, {{r4-r11}}",

        // Record PSP, run the tick, get the incoming task's PSP in r0
        "bl {tick}",

        // --- Restore incoming context ---
        "ldmia r0!, {{r4-r11}}",
        "msr psp, r0",

        // Return to Thread mode on PSP (EXC_RETURN = 0xFFFFFFFD)
        "ldr r0, =0xFFFFFFFD",
        "bx r0",

        tick = sym tick_and_switch,
    );
}

/// Rust half of the SysTick handler. Takes the outgoing task's stack
/// pointer, accounts the quantum, and returns the stack pointer of the
/// task now owning the CPU.
///
/// # Safety
/// Called from the SysTick handler with the scheduler clock interrupt
/// serialized by its own priority.
#[cfg(all(target_arch = "arm", target_os = "none"))]
unsafe extern "C" fn tick_and_switch(sp: *mut u32) -> *mut u32 {
    let scheduler = &mut *crate::kernel::scheduler_ptr();
    scheduler.save_stack_pointer(sp);
    scheduler.tick();
    scheduler.current_stack_pointer()
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------
