//! Board bring-up: the MMIO-backed pool on the Cortex-M3 design.

use axt_hal::Nvic;
use axt_hal::nvic::NVIC_BASE;

use crate::config::{
    CHANNEL_STRIDE, NUM_DEVICES, TIMER_CLOCK_HZ, TIMER0_BASE, TIMER0_IRQ, TIMER1_BASE, TIMER1_IRQ,
};
use crate::error::TimerError;
use crate::pool::{DeviceDesc, TimerPool};
use crate::regs::MmioTimerRegs;

// SAFETY: fixed addresses from the design's address map; never unmapped.
static TIMER0_CH0: MmioTimerRegs = unsafe { MmioTimerRegs::new(TIMER0_BASE) };
static TIMER0_CH1: MmioTimerRegs = unsafe { MmioTimerRegs::new(TIMER0_BASE + CHANNEL_STRIDE) };
static TIMER1_CH0: MmioTimerRegs = unsafe { MmioTimerRegs::new(TIMER1_BASE) };
static TIMER1_CH1: MmioTimerRegs = unsafe { MmioTimerRegs::new(TIMER1_BASE + CHANNEL_STRIDE) };

static NVIC: Nvic = unsafe { Nvic::new(NVIC_BASE) };

/// Device table for the two on-board timer blocks.
pub fn devices() -> [DeviceDesc; NUM_DEVICES] {
    [
        DeviceDesc::new(TIMER0_IRQ, [&TIMER0_CH0, &TIMER0_CH1]),
        DeviceDesc::new(TIMER1_IRQ, [&TIMER1_CH0, &TIMER1_CH1]),
    ]
}

/// Build the system pool over the on-board timers and publish it.
///
/// Interrupts for the timer lines stay masked until a channel is armed.
///
/// # Safety
/// Must run on the target board, where the timer blocks and the NVIC are
/// mapped at the addresses in [`crate::config`]. Call before the scheduler
/// starts handing out channels.
pub unsafe fn init_board() -> Result<&'static TimerPool<NUM_DEVICES>, TimerError> {
    log::debug!(
        "[TIMER] board: timer0 @ {:#x} irq {}, timer1 @ {:#x} irq {}",
        TIMER0_BASE,
        TIMER0_IRQ,
        TIMER1_BASE,
        TIMER1_IRQ
    );
    crate::init(TimerPool::new(devices(), &NVIC, TIMER_CLOCK_HZ))
}
