//! Timer registry: devices, channels and their shared state.

use core::ptr;
use core::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use axt_hal::{InterruptController, IrqNumber, IrqSafeLock, IrqSafeLockGuard};

use crate::config::CHANNELS_PER_DEVICE;
use crate::error::TimerError;
use crate::regs::{Tcsr, TimerRegs};
use crate::types::{CallerId, TimerHandle, TimerHandler};

const NO_OWNER: usize = 0;

/// Static description of one timer block handed to [`TimerPool::new`].
#[derive(Clone, Copy)]
pub struct DeviceDesc {
    pub irq: IrqNumber,
    pub channels: [&'static dyn TimerRegs; CHANNELS_PER_DEVICE],
}

impl DeviceDesc {
    pub const fn new(
        irq: IrqNumber,
        channels: [&'static dyn TimerRegs; CHANNELS_PER_DEVICE],
    ) -> Self {
        Self { irq, channels }
    }
}

/// Dispatcher state of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Idle,
    Servicing,
}

pub(crate) struct Channel {
    owner: AtomicUsize,
    handler: AtomicPtr<()>,
    pub(crate) regs: &'static dyn TimerRegs,
}

impl Channel {
    const fn new(regs: &'static dyn TimerRegs) -> Self {
        Self {
            owner: AtomicUsize::new(NO_OWNER),
            handler: AtomicPtr::new(ptr::null_mut()),
            regs,
        }
    }

    pub(crate) fn owner(&self) -> Option<CallerId> {
        CallerId::new(self.owner.load(Ordering::Acquire))
    }

    pub(crate) fn is_owned_by(&self, caller: CallerId) -> bool {
        self.owner.load(Ordering::Acquire) == caller.get()
    }

    /// Claim a free channel. Fails if anyone, including `caller`, owns it.
    pub(crate) fn try_claim(&self, caller: CallerId) -> bool {
        self.owner
            .compare_exchange(NO_OWNER, caller.get(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Drop ownership. The handler is cleared first so the next owner can
    /// never observe it.
    pub(crate) fn release(&self) {
        self.clear_handler();
        self.owner.store(NO_OWNER, Ordering::Release);
    }

    pub(crate) fn set_handler(&self, handler: TimerHandler) {
        self.handler.store(handler as *mut (), Ordering::Release);
    }

    pub(crate) fn clear_handler(&self) {
        self.handler.store(ptr::null_mut(), Ordering::Release);
    }

    pub(crate) fn handler(&self) -> Option<TimerHandler> {
        let raw = self.handler.load(Ordering::Acquire);
        if raw.is_null() {
            None
        } else {
            // SAFETY: only ever stored from a `TimerHandler` in set_handler
            Some(unsafe { core::mem::transmute::<*mut (), TimerHandler>(raw) })
        }
    }
}

pub(crate) struct TimerDevice {
    pub(crate) irq: IrqNumber,
    pub(crate) channels: [Channel; CHANNELS_PER_DEVICE],
    /// Serialises ownership changes, handler stores and TCSR read-modify-write
    /// between tasks and the dispatcher.
    pub(crate) lock: IrqSafeLock<()>,
    /// Dispatch passes in progress; more than one only on hosted runs.
    servicing: AtomicUsize,
}

impl TimerDevice {
    fn new(desc: DeviceDesc) -> Self {
        let [ch0, ch1] = desc.channels;
        Self {
            irq: desc.irq,
            channels: [Channel::new(ch0), Channel::new(ch1)],
            lock: IrqSafeLock::new(()),
            servicing: AtomicUsize::new(0),
        }
    }

    pub(crate) fn enter_dispatch(&self) {
        self.servicing.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn leave_dispatch(&self) {
        self.servicing.fetch_sub(1, Ordering::AcqRel);
    }

    fn state(&self) -> DeviceState {
        if self.servicing.load(Ordering::Acquire) == 0 {
            DeviceState::Idle
        } else {
            DeviceState::Servicing
        }
    }
}

/// A channel held under its device lock on behalf of its owner.
pub(crate) struct OwnedChannel<'a> {
    pub(crate) device: &'a TimerDevice,
    pub(crate) channel: &'a Channel,
    _guard: IrqSafeLockGuard<'a, ()>,
}

/// Fixed pool of `D` AXI timer blocks sharing one interrupt controller.
pub struct TimerPool<const D: usize> {
    pub(crate) devices: [TimerDevice; D],
    pub(crate) intc: &'static dyn InterruptController,
    clock_hz: u32,
}

impl<const D: usize> TimerPool<D> {
    pub fn new(
        descs: [DeviceDesc; D],
        intc: &'static dyn InterruptController,
        clock_hz: u32,
    ) -> Self {
        Self {
            devices: descs.map(TimerDevice::new),
            intc,
            clock_hz,
        }
    }

    /// Stop every channel and drop stale pending state. Run once before the
    /// pool is published.
    pub(crate) fn quiesce(&self) {
        for device in &self.devices {
            let _guard = device.lock.lock();
            for channel in &device.channels {
                channel.regs.write_tcsr(Tcsr::TINT.bits());
            }
            self.intc.disable_irq(device.irq);
            self.intc.clear_pending(device.irq);
        }
    }

    /// Number of allocatable channels.
    pub const fn capacity(&self) -> usize {
        D * CHANNELS_PER_DEVICE
    }

    pub const fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    pub fn device_irq(&self, device: usize) -> Option<IrqNumber> {
        self.devices.get(device).map(|d| d.irq)
    }

    pub fn device_state(&self, device: usize) -> Option<DeviceState> {
        self.devices.get(device).map(TimerDevice::state)
    }

    /// Current owner of a channel, `None` when free.
    pub fn owner(&self, handle: TimerHandle) -> Result<Option<CallerId>, TimerError> {
        self.lookup(handle).map(|(_, channel)| channel.owner())
    }

    /// Live count register of a channel.
    pub fn count(&self, handle: TimerHandle) -> Result<u32, TimerError> {
        self.lookup(handle).map(|(_, channel)| channel.regs.read_tcr())
    }

    pub(crate) fn lookup(
        &self,
        handle: TimerHandle,
    ) -> Result<(&TimerDevice, &Channel), TimerError> {
        match self.devices.get(handle.device()) {
            Some(device) => Ok((device, &device.channels[handle.channel()])),
            None => {
                let err = TimerError::InvalidHandle;
                log::warn!("[TIMER] {}: {}", handle, err);
                Err(err)
            }
        }
    }

    /// Resolve a handle, take its device lock and check that `caller` owns
    /// the channel. The owner cannot change while the returned value lives.
    pub(crate) fn lock_owned(
        &self,
        caller: CallerId,
        handle: TimerHandle,
    ) -> Result<OwnedChannel<'_>, TimerError> {
        let (device, channel) = self.lookup(handle)?;
        let guard = device.lock.lock();
        if channel.is_owned_by(caller) {
            Ok(OwnedChannel {
                device,
                channel,
                _guard: guard,
            })
        } else {
            drop(guard);
            let err = TimerError::NotOwner;
            log::warn!("[TIMER] {} rejected for caller {:#x}: {}", handle, caller.get(), err);
            Err(err)
        }
    }
}
