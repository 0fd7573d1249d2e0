//! Shared-IRQ demultiplexing.
//!
//! Each AXI timer block has one interrupt output for both channels. The
//! vector for a block lands in [`TimerPool::dispatch`], which checks both
//! channels because they can expire in the same window.

use crate::config::NUM_DEVICES;
use crate::pool::TimerPool;

impl<const D: usize> TimerPool<D> {
    /// Service one device's interrupt. Returns how many channels were pending.
    ///
    /// Channel 0 is always handled before channel 1. A pending channel with
    /// no handler is acknowledged and dropped. The handler runs without the
    /// device lock held, so it may reconfigure its own channel.
    /// [`TimerPool::device_state`] reports `Servicing` while any pass for the
    /// device is still running.
    pub fn dispatch(&self, device: usize) -> usize {
        let Some(dev) = self.devices.get(device) else {
            log::warn!("[TIMER] dispatch for unknown device {}", device);
            return 0;
        };

        dev.enter_dispatch();
        let mut serviced = 0;
        for (index, channel) in dev.channels.iter().enumerate() {
            if !channel.regs.is_pending() {
                continue;
            }
            serviced += 1;

            let handler = channel.handler();
            if let Some(handler) = handler {
                handler();
            }
            trace_serviced(device, index, handler.is_some());

            let _guard = dev.lock.lock();
            channel.regs.acknowledge();
        }
        self.intc.clear_pending(dev.irq);
        dev.leave_dispatch();
        serviced
    }
}

#[cfg(feature = "verbose-dispatch")]
fn trace_serviced(device: usize, channel: usize, handled: bool) {
    log::trace!(
        "[TIMER] timer{}.{} serviced{}",
        device,
        channel,
        if handled { "" } else { " (no handler)" }
    );
}

#[cfg(not(feature = "verbose-dispatch"))]
fn trace_serviced(_device: usize, _channel: usize, _handled: bool) {}

fn dispatch_global(device: usize) {
    if let Some(pool) = crate::pool() {
        pool.dispatch(device);
    }
}

/// Vector for timer block 0.
#[unsafe(no_mangle)]
pub extern "C" fn axi_timer0_isr() {
    dispatch_global(0);
}

/// Vector for timer block 1.
#[unsafe(no_mangle)]
pub extern "C" fn axi_timer1_isr() {
    dispatch_global(1);
}

/// Device-indexed entry points for the platform's vector table.
pub static TIMER_VECTORS: [extern "C" fn(); NUM_DEVICES] = [axi_timer0_isr, axi_timer1_isr];
