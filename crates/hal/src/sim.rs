//! Software interrupt controller for hosted runs.
//!
//! Keeps enable and pending state for lines 0..32 in two atomic bitmaps so
//! it can be a `static` shared between a test thread and simulated devices.

use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::traits::{InterruptController, IrqNumber};

/// Number of lines the simulator models.
pub const SIM_MAX_IRQ: IrqNumber = 32;

pub struct SimInterruptController {
    enabled: AtomicU32,
    pending: AtomicU32,
    cleared: AtomicUsize,
}

impl SimInterruptController {
    pub const fn new() -> Self {
        Self {
            enabled: AtomicU32::new(0),
            pending: AtomicU32::new(0),
            cleared: AtomicUsize::new(0),
        }
    }

    fn bit(irq: IrqNumber) -> u32 {
        debug_assert!(irq < SIM_MAX_IRQ);
        1 << (irq % SIM_MAX_IRQ)
    }

    /// Latch a line pending, as a device asserting its output would.
    pub fn set_pending(&self, irq: IrqNumber) {
        self.pending.fetch_or(Self::bit(irq), Ordering::AcqRel);
    }

    pub fn is_pending(&self, irq: IrqNumber) -> bool {
        self.pending.load(Ordering::Acquire) & Self::bit(irq) != 0
    }

    /// How many times `clear_pending` has been called on any line.
    pub fn clear_count(&self) -> usize {
        self.cleared.load(Ordering::Acquire)
    }
}

impl Default for SimInterruptController {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptController for SimInterruptController {
    fn enable_irq(&self, irq: IrqNumber) {
        self.enabled.fetch_or(Self::bit(irq), Ordering::AcqRel);
    }

    fn disable_irq(&self, irq: IrqNumber) {
        self.enabled.fetch_and(!Self::bit(irq), Ordering::AcqRel);
    }

    fn clear_pending(&self, irq: IrqNumber) {
        self.pending.fetch_and(!Self::bit(irq), Ordering::AcqRel);
        self.cleared.fetch_add(1, Ordering::AcqRel);
    }

    fn is_irq_enabled(&self, irq: IrqNumber) -> bool {
        self.enabled.load(Ordering::Acquire) & Self::bit(irq) != 0
    }
}
