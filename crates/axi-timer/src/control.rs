//! Channel configuration: run/stop, interrupt masking, countdown setup.
//!
//! Every operation takes the device lock before checking ownership and keeps
//! it until the registers are written, so a channel freed and reallocated in
//! between can never be touched by its previous owner, and a read-modify-write
//! never interleaves with the dispatcher or the owner of the sibling channel.

use crate::error::TimerError;
use crate::pool::{Channel, TimerDevice, TimerPool};
use crate::regs::Tcsr;
use crate::types::{CallerId, TimerHandle};

impl<const D: usize> TimerPool<D> {
    /// Start counting from the current TCR value with interrupts on.
    pub fn enable(&self, caller: CallerId, handle: TimerHandle) -> Result<(), TimerError> {
        let owned = self.lock_owned(caller, handle)?;
        self.start_locked(owned.device, owned.channel);
        log::debug!("[TIMER] {} running", handle);
        Ok(())
    }

    /// Stop counting. With `remove_handler` the callback is dropped too.
    pub fn disable(
        &self,
        caller: CallerId,
        handle: TimerHandle,
        remove_handler: bool,
    ) -> Result<(), TimerError> {
        let owned = self.lock_owned(caller, handle)?;
        owned.channel.regs.modify(Tcsr::empty(), Tcsr::LOAD | Tcsr::ENT);
        if remove_handler {
            owned.channel.clear_handler();
        }
        drop(owned);
        log::debug!("[TIMER] {} stopped (handler removed: {})", handle, remove_handler);
        Ok(())
    }

    /// Set the channel's interrupt enable and unmask the device line.
    pub fn enable_interrupt(
        &self,
        caller: CallerId,
        handle: TimerHandle,
    ) -> Result<(), TimerError> {
        let owned = self.lock_owned(caller, handle)?;
        self.unmask_locked(owned.device, owned.channel);
        Ok(())
    }

    /// Clear the channel's interrupt enable. The shared device line is only
    /// masked once the sibling channel has its enable clear as well.
    pub fn disable_interrupt(
        &self,
        caller: CallerId,
        handle: TimerHandle,
    ) -> Result<(), TimerError> {
        let owned = self.lock_owned(caller, handle)?;
        let (device, channel) = (owned.device, owned.channel);
        channel.regs.modify(Tcsr::empty(), Tcsr::ENIT);

        let sibling = &device.channels[handle.sibling().channel()];
        if sibling.regs.control().contains(Tcsr::ENIT) {
            log::debug!("[TIMER] {} masked; irq {} kept for sibling", handle, device.irq);
        } else {
            self.intc.disable_irq(device.irq);
            log::debug!("[TIMER] {} masked; irq {} disabled", handle, device.irq);
        }
        Ok(())
    }

    /// Interrupt every `count` clocks until disabled.
    pub fn set_repeating(
        &self,
        caller: CallerId,
        handle: TimerHandle,
        count: u32,
    ) -> Result<(), TimerError> {
        self.arm(caller, handle, count, true)
    }

    /// Interrupt once after `count` clocks. The counter is not reloaded.
    pub fn set_oneshot(
        &self,
        caller: CallerId,
        handle: TimerHandle,
        count: u32,
    ) -> Result<(), TimerError> {
        self.arm(caller, handle, count, false)
    }

    /// [`Self::set_repeating`] with the period given in microseconds.
    pub fn set_repeating_us(
        &self,
        caller: CallerId,
        handle: TimerHandle,
        us: u32,
    ) -> Result<(), TimerError> {
        let count = self.us_to_count(us)?;
        self.set_repeating(caller, handle, count)
    }

    /// [`Self::set_repeating`] with the rate given in hertz.
    pub fn set_repeating_hz(
        &self,
        caller: CallerId,
        handle: TimerHandle,
        hz: u32,
    ) -> Result<(), TimerError> {
        let count = self.hz_to_count(hz)?;
        self.set_repeating(caller, handle, count)
    }

    /// [`Self::set_oneshot`] with the delay given in microseconds.
    pub fn set_oneshot_us(
        &self,
        caller: CallerId,
        handle: TimerHandle,
        us: u32,
    ) -> Result<(), TimerError> {
        let count = self.us_to_count(us)?;
        self.set_oneshot(caller, handle, count)
    }

    fn arm(
        &self,
        caller: CallerId,
        handle: TimerHandle,
        count: u32,
        repeat: bool,
    ) -> Result<(), TimerError> {
        let owned = self.lock_owned(caller, handle)?;
        let (device, channel) = (owned.device, owned.channel);

        let (set, clear) = if repeat {
            (Tcsr::ARHT, Tcsr::MDT)
        } else {
            (Tcsr::empty(), Tcsr::MDT | Tcsr::ARHT)
        };
        channel.regs.write_tlr(count);
        // Generate mode, count down, and hold LOAD so TCR picks up TLR.
        // start_locked drops LOAD again before the channel runs.
        channel.regs.modify(set | Tcsr::UDT | Tcsr::LOAD, clear);
        self.start_locked(device, channel);
        drop(owned);

        log::debug!(
            "[TIMER] {} armed: count={} {}",
            handle,
            count,
            if repeat { "repeating" } else { "one-shot" }
        );
        Ok(())
    }

    fn start_locked(&self, device: &TimerDevice, channel: &Channel) {
        channel.regs.modify(Tcsr::empty(), Tcsr::LOAD);
        self.unmask_locked(device, channel);
        channel.regs.modify(Tcsr::ENT, Tcsr::empty());
    }

    fn unmask_locked(&self, device: &TimerDevice, channel: &Channel) {
        channel.regs.modify(Tcsr::ENIT, Tcsr::empty());
        self.intc.enable_irq(device.irq);
    }
}
