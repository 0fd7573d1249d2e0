//! Shared fixtures for the timer pool integration tests.

#![allow(dead_code, unused_macros)]

use axt_timer::CallerId;

/// Timer clock used by the hosted fixtures: one count per microsecond.
pub const SIM_CLOCK_HZ: u32 = 1_000_000;

pub fn caller(raw: usize) -> CallerId {
    CallerId::new(raw).unwrap()
}

/// Fresh simulated pool with its own devices and controller.
///
/// Expands to `(pool, &'static devices, &'static intc)`. Every expansion
/// owns separate statics, so tests running in parallel never share hardware.
macro_rules! sim_rig {
    () => {
        sim_rig!(0, 1)
    };
    ($irq0:expr, $irq1:expr) => {{
        static DEVICES: [axt_timer::sim::SimDevice; 2] =
            [axt_timer::sim::SimDevice::new($irq0), axt_timer::sim::SimDevice::new($irq1)];
        static INTC: axt_hal::SimInterruptController = axt_hal::SimInterruptController::new();
        (
            axt_timer::sim::pool(&DEVICES, &INTC, crate::common::SIM_CLOCK_HZ),
            &DEVICES,
            &INTC,
        )
    }};
}
