//! Software model of the AXI timer for hosted runs.
//!
//! `SimTimerRegs` keeps the same bit semantics as the hardware channel:
//! TINT is write-one-to-clear, LOAD copies TLR into TCR, and the counter only
//! moves on [`SimTimerRegs::tick`]. [`SimClock`] ticks a whole pool and routes
//! expiries through the interrupt controller into `dispatch`, the same path a
//! real vector takes.
//!
//! Generate mode only; capture and PWM bits are stored but have no effect.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use axt_hal::{InterruptController, IrqNumber, SimInterruptController, interrupts};

use crate::config::CHANNELS_PER_DEVICE;
use crate::pool::{DeviceDesc, TimerPool};
use crate::regs::{Tcsr, TimerRegs};

pub struct SimTimerRegs {
    tcsr: AtomicU32,
    tlr: AtomicU32,
    tcr: AtomicU32,
    /// One-shot expiry reached; counting stops until the next load.
    held: AtomicBool,
}

impl SimTimerRegs {
    pub const fn new() -> Self {
        Self {
            tcsr: AtomicU32::new(0),
            tlr: AtomicU32::new(0),
            tcr: AtomicU32::new(0),
            held: AtomicBool::new(false),
        }
    }

    fn load(&self) {
        self.tcr.store(self.tlr.load(Ordering::Acquire), Ordering::Release);
        self.held.store(false, Ordering::Release);
    }

    /// Force the interrupt flag, as an expiry would.
    pub fn raise(&self) {
        self.tcsr.fetch_or(Tcsr::TINT.bits(), Ordering::AcqRel);
    }

    /// Whether the channel drives its device's interrupt output.
    pub fn irq_asserted(&self) -> bool {
        self.control().contains(Tcsr::TINT | Tcsr::ENIT)
    }

    /// Advance one timer clock. Returns `true` if the channel expired.
    pub fn tick(&self) -> bool {
        let ctrl = self.control();
        if !ctrl.contains(Tcsr::ENT) {
            return false;
        }
        if ctrl.contains(Tcsr::LOAD) {
            self.load();
            return false;
        }
        if self.held.load(Ordering::Acquire) {
            return false;
        }

        let count = self.tcr.load(Ordering::Acquire);
        let (next, expired, terminal) = if ctrl.contains(Tcsr::UDT) {
            (count.saturating_sub(1), count <= 1, 0)
        } else {
            (count.wrapping_add(1), count == u32::MAX, u32::MAX)
        };

        if !expired {
            self.tcr.store(next, Ordering::Release);
            return false;
        }

        self.raise();
        if ctrl.contains(Tcsr::ARHT) {
            self.load();
        } else {
            self.tcr.store(terminal, Ordering::Release);
            self.held.store(true, Ordering::Release);
        }
        true
    }
}

impl Default for SimTimerRegs {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerRegs for SimTimerRegs {
    fn read_tcsr(&self) -> u32 {
        self.tcsr.load(Ordering::Acquire)
    }

    fn write_tcsr(&self, value: u32) {
        let tint = Tcsr::TINT.bits();
        // a concurrent expiry may set TINT between load and store, so retry
        let _ = self.tcsr.fetch_update(Ordering::AcqRel, Ordering::Acquire, |old| {
            let kept = if value & tint == 0 { old & tint } else { 0 };
            Some((value & !tint) | kept)
        });
        if value & Tcsr::LOAD.bits() != 0 {
            self.load();
        }
    }

    fn read_tlr(&self) -> u32 {
        self.tlr.load(Ordering::Acquire)
    }

    fn write_tlr(&self, value: u32) {
        self.tlr.store(value, Ordering::Release);
    }

    fn read_tcr(&self) -> u32 {
        self.tcr.load(Ordering::Acquire)
    }
}

/// One simulated timer block.
pub struct SimDevice {
    pub irq: IrqNumber,
    pub channels: [SimTimerRegs; CHANNELS_PER_DEVICE],
}

impl SimDevice {
    pub const fn new(irq: IrqNumber) -> Self {
        Self {
            irq,
            channels: [SimTimerRegs::new(), SimTimerRegs::new()],
        }
    }

    fn desc(&'static self) -> DeviceDesc {
        let [ch0, ch1] = &self.channels;
        DeviceDesc::new(self.irq, [ch0, ch1])
    }
}

/// Pool over simulated devices.
pub fn pool<const D: usize>(
    devices: &'static [SimDevice; D],
    intc: &'static SimInterruptController,
    clock_hz: u32,
) -> TimerPool<D> {
    TimerPool::new(core::array::from_fn(|i| devices[i].desc()), intc, clock_hz)
}

/// Deterministic timer clock driving a simulated pool.
pub struct SimClock<'a, const D: usize> {
    pool: &'a TimerPool<D>,
    devices: &'a [SimDevice; D],
    intc: &'a SimInterruptController,
    now: u64,
}

impl<'a, const D: usize> SimClock<'a, D> {
    pub fn new(
        pool: &'a TimerPool<D>,
        devices: &'a [SimDevice; D],
        intc: &'a SimInterruptController,
    ) -> Self {
        Self {
            pool,
            devices,
            intc,
            now: 0,
        }
    }

    /// Clocks elapsed since creation.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run `ticks` timer clocks, delivering interrupts after each one.
    pub fn advance(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.now += 1;
            for device in self.devices {
                let mut asserted = false;
                for channel in &device.channels {
                    channel.tick();
                    asserted |= channel.irq_asserted();
                }
                if asserted {
                    self.intc.set_pending(device.irq);
                }
            }
            self.deliver();
        }
    }

    /// Dispatch every pending, enabled line unless the caller has interrupts
    /// masked, in which case they stay latched for a later call.
    pub fn deliver(&self) {
        if !interrupts::is_enabled() {
            return;
        }
        for (index, device) in self.devices.iter().enumerate() {
            if self.intc.is_pending(device.irq) && self.intc.is_irq_enabled(device.irq) {
                self.pool.dispatch(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed(count: u32, extra: Tcsr) -> SimTimerRegs {
        let regs = SimTimerRegs::new();
        regs.write_tlr(count);
        regs.write_tcsr((Tcsr::UDT | Tcsr::LOAD | extra).bits());
        regs.write_tcsr((Tcsr::UDT | Tcsr::ENT | extra).bits());
        regs
    }

    #[test]
    fn tint_is_write_one_to_clear() {
        let regs = SimTimerRegs::new();
        regs.raise();
        regs.write_tcsr(Tcsr::ENT.bits());
        assert!(regs.is_pending());
        regs.write_tcsr((Tcsr::ENT | Tcsr::TINT).bits());
        assert!(!regs.is_pending());
        assert_eq!(regs.control(), Tcsr::ENT);
    }

    #[test]
    fn load_bit_copies_reload_value() {
        let regs = SimTimerRegs::new();
        regs.write_tlr(17);
        assert_eq!(regs.read_tcr(), 0);
        regs.write_tcsr(Tcsr::LOAD.bits());
        assert_eq!(regs.read_tcr(), 17);
    }

    #[test]
    fn stopped_channel_does_not_count() {
        let regs = SimTimerRegs::new();
        regs.write_tlr(3);
        regs.write_tcsr((Tcsr::UDT | Tcsr::LOAD).bits());
        assert!(!regs.tick());
        assert_eq!(regs.read_tcr(), 3);
    }

    #[test]
    fn auto_reload_expires_every_count() {
        let regs = armed(3, Tcsr::ARHT);
        let fired: Vec<bool> = (0..7).map(|_| regs.tick()).collect();
        assert_eq!(fired, [false, false, true, false, false, true, false]);
        assert_eq!(regs.read_tcr(), 2);
    }

    #[test]
    fn oneshot_holds_at_terminal_count() {
        let regs = armed(2, Tcsr::empty());
        assert!(!regs.tick());
        assert!(regs.tick());
        for _ in 0..10 {
            assert!(!regs.tick());
        }
        assert_eq!(regs.read_tcr(), 0);
        assert!(regs.control().contains(Tcsr::ENT));
    }

    #[test]
    fn up_counter_expires_on_wrap() {
        let regs = SimTimerRegs::new();
        regs.write_tlr(u32::MAX - 1);
        regs.write_tcsr((Tcsr::LOAD | Tcsr::ARHT).bits());
        regs.write_tcsr((Tcsr::ENT | Tcsr::ARHT).bits());
        assert!(!regs.tick());
        assert!(regs.tick());
        assert_eq!(regs.read_tcr(), u32::MAX - 1);
    }
}
