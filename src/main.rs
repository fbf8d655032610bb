//! # Carousel Example Firmware
//!
//! Demonstrates the quantum-share scheduler with three long-running tasks
//! and a short-lived one that exercises slot reuse:
//!
//! | Task | Share | Behavior |
//! |------|-------|----------|
//! | `pulse_task`    | 10 | Toggles LED0 as fast as its turns allow |
//! | `beacon_task`   | 6  | Toggles LED1, at 60% of `pulse_task`'s rate |
//! | `spawner_task`  | 30 | Respawns `one_shot_task` whenever a slot is free |
//! | `one_shot_task` | 1  | Toggles LED3 once, kills itself, yields |
//!
//! The quantum hook drives the timing-sensitive outputs: LED4 toggles every
//! quantum, LED5 at count 30, LED6 at count 60 (where the counter is also
//! reset, giving both a steady period). The idle hook parks the core with
//! `wfi` until the next tick.
//!
//! There is no board support crate here, so the "LEDs" are bits of an
//! atomic port image; watch `LED_PORT` from a debugger, or map the bits to
//! real GPIO writes for a specific board.
//!
//! The firmware only builds for the embedded target; on other targets this
//! binary is an empty stub so the host test suite still links.

#![cfg_attr(all(target_arch = "arm", target_os = "none"), no_std)]
#![cfg_attr(all(target_arch = "arm", target_os = "none"), no_main)]

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod firmware {
    use core::sync::atomic::{AtomicU8, Ordering};

    use cortex_m_rt::entry;
    use panic_halt as _;

    use carousel::config::MAX_TASKS;
    use carousel::kernel::{self, Hooks};
    use carousel::task::TaskState;

    /// Demo output port: one bit per LED.
    static LED_PORT: AtomicU8 = AtomicU8::new(0);

    fn toggle_led(bit: u8) {
        LED_PORT.fetch_xor(1 << bit, Ordering::Relaxed);
    }

    // -----------------------------------------------------------------------
    // Task entry points
    // -----------------------------------------------------------------------

    /// Busy toggler. Never yields; it gives up the CPU only when its ten
    /// quanta run out.
    extern "C" fn pulse_task() -> ! {
        loop {
            toggle_led(0);
        }
    }

    /// Second busy toggler with a smaller share, so LED1 runs at six
    /// tenths of LED0's rate under contention.
    extern "C" fn beacon_task() -> ! {
        loop {
            toggle_led(1);
        }
    }

    /// Keeps the pool full: whenever a slot is free, plant another
    /// `one_shot_task`. Creation failure just means the pool filled up
    /// between the check and the call, so it is ignored.
    extern "C" fn spawner_task() -> ! {
        loop {
            toggle_led(2);
            if kernel::living_task_count() < MAX_TASKS as u32 {
                let _ = kernel::create_task(one_shot_task, TaskState::Ready, 1);
            }
        }
    }

    /// Does one unit of work, then deallocates itself: move to `Dead`,
    /// invoke the scheduler. The trailing loop is only reached if the
    /// forced tick has not fired yet; the task is already deregistered, so
    /// it spins out its final quantum harmlessly.
    extern "C" fn one_shot_task() -> ! {
        toggle_led(3);
        kernel::set_state(kernel::running_task_id(), TaskState::Dead);
        kernel::invoke_scheduler();
        loop {
            cortex_m::asm::nop();
        }
    }

    // -----------------------------------------------------------------------
    // Kernel hooks
    // -----------------------------------------------------------------------

    /// Runs in the tick ISR. LED4 gives one blink per quantum; LED5 and
    /// LED6 divide that down, with the counter reset at 60 so both have a
    /// fixed period.
    fn on_quantum(count: u32) {
        toggle_led(4);
        if count == 30 {
            toggle_led(5);
        } else if count == 60 {
            toggle_led(6);
            kernel::reset_quantum_count();
        }
    }

    /// Nothing to do: sleep until the next interrupt.
    fn on_idle() {
        cortex_m::asm::wfi();
    }

    // -----------------------------------------------------------------------
    // Main entry point
    // -----------------------------------------------------------------------

    #[entry]
    fn main() -> ! {
        let mut cp = cortex_m::Peripherals::take().unwrap();

        kernel::init(&mut cp.SYST, Hooks { on_idle, on_quantum })
            .expect("scheduler clock cannot express the configured quantum");

        kernel::create_task(pulse_task, TaskState::Ready, 10).expect("pulse_task");
        kernel::create_task(beacon_task, TaskState::Ready, 6).expect("beacon_task");
        kernel::create_task(spawner_task, TaskState::Ready, 30).expect("spawner_task");

        kernel::start()
    }
}

#[cfg(not(all(target_arch = "arm", target_os = "none")))]
fn main() {}
