#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Hardware abstraction for the AXI timer pool.
//!
//! Root holds the interrupt masking primitives, the IRQ-safe lock and the
//! interrupt controller trait. The Cortex-M NVIC backs the trait on target;
//! `sim` backs it on the host.

pub mod interrupts;
pub mod nvic;
pub mod sim;
pub mod traits;

pub use nvic::Nvic;
pub use sim::SimInterruptController;
pub use traits::{InterruptController, IrqNumber};

use core::mem::ManuallyDrop;
use spin::{Mutex, MutexGuard};

/// Lock that masks interrupts on the calling core while held.
///
/// Used to keep register read-modify-write sequences in task context from
/// interleaving with the interrupt path touching the same device.
pub struct IrqSafeLock<T> {
    inner: Mutex<T>,
}

impl<T> IrqSafeLock<T> {
    pub const fn new(data: T) -> Self {
        Self {
            inner: Mutex::new(data),
        }
    }

    /// Masks interrupts, then acquires.
    pub fn lock(&self) -> IrqSafeLockGuard<'_, T> {
        let state = interrupts::disable();
        let guard = self.inner.lock();
        IrqSafeLockGuard {
            guard: ManuallyDrop::new(guard),
            state,
        }
    }
}

pub struct IrqSafeLockGuard<'a, T> {
    guard: ManuallyDrop<MutexGuard<'a, T>>,
    state: u64,
}

impl<T> core::ops::Deref for IrqSafeLockGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> core::ops::DerefMut for IrqSafeLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for IrqSafeLockGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: the guard is dropped exactly once, here, before the mask is restored
        unsafe { ManuallyDrop::drop(&mut self.guard) };
        interrupts::restore(self.state);
    }
}
