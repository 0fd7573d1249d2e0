use core::fmt;
use core::num::NonZeroUsize;
use core::ptr::NonNull;

use crate::config::CHANNELS_PER_DEVICE;

/// Callback run from interrupt context when a channel expires.
pub type TimerHandler = fn();

/// Identity of the execution context (task) calling into the pool.
///
/// Opaque and only comparable; typically the scheduler's task handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallerId(NonZeroUsize);

impl CallerId {
    pub const fn new(raw: usize) -> Option<Self> {
        match NonZeroUsize::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Identity derived from the address of a task control block.
    pub fn from_ref<T>(task: &T) -> Self {
        Self(NonNull::from(task).addr())
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }
}

/// One (device, channel) pair: `device * 2 + channel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u16);

impl TimerHandle {
    pub const fn new(device: usize, channel: usize) -> Self {
        Self((device * CHANNELS_PER_DEVICE + channel % CHANNELS_PER_DEVICE) as u16)
    }

    pub const fn from_index(index: u16) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u16 {
        self.0
    }

    pub const fn device(self) -> usize {
        self.0 as usize / CHANNELS_PER_DEVICE
    }

    pub const fn channel(self) -> usize {
        self.0 as usize % CHANNELS_PER_DEVICE
    }

    /// The other channel of the same device.
    pub const fn sibling(self) -> Self {
        Self::new(self.device(), 1 - self.channel())
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer{}.{}", self.device(), self.channel())
    }
}
