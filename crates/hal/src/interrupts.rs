//! Interrupt masking for the calling core.
//!
//! On Cortex-M this is PRIMASK. Hosted builds get a thread-local mock so the
//! lock discipline can be unit tested; a bare non-ARM build gets a no-op.

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod arch {
    use core::arch::asm;
    use core::sync::atomic::{Ordering, compiler_fence};

    /// Masks IRQs and returns the previous PRIMASK.
    #[inline(always)]
    pub fn disable() -> u64 {
        let primask: u32;
        // SAFETY: reading PRIMASK and setting it via cpsid has no memory effects
        unsafe {
            asm!("mrs {}, PRIMASK", out(reg) primask, options(nomem, nostack, preserves_flags));
            asm!("cpsid i", options(nostack, preserves_flags));
        }
        compiler_fence(Ordering::SeqCst);
        u64::from(primask)
    }

    #[inline(always)]
    pub fn restore(state: u64) {
        compiler_fence(Ordering::SeqCst);
        // PRIMASK bit 0 set means IRQs were already masked
        if state & 1 == 0 {
            // SAFETY: re-enables IRQs only if they were enabled when the matching disable ran
            unsafe { asm!("cpsie i", options(nostack, preserves_flags)) };
        }
    }

    #[inline(always)]
    pub fn is_enabled() -> bool {
        let primask: u32;
        // SAFETY: plain special-register read
        unsafe {
            asm!("mrs {}, PRIMASK", out(reg) primask, options(nomem, nostack, preserves_flags));
        }
        primask & 1 == 0
    }
}

#[cfg(all(not(all(target_arch = "arm", target_os = "none")), any(test, feature = "std")))]
mod arch {
    use std::cell::Cell;

    std::thread_local! {
        static ENABLED: Cell<bool> = const { Cell::new(true) };
    }

    pub fn disable() -> u64 {
        let prev = is_enabled();
        ENABLED.with(|e| e.set(false));
        // encode like PRIMASK: 1 = was masked
        u64::from(!prev)
    }

    pub fn restore(state: u64) {
        ENABLED.with(|e| e.set(state & 1 == 0));
    }

    pub fn is_enabled() -> bool {
        ENABLED.with(Cell::get)
    }
}

#[cfg(all(not(all(target_arch = "arm", target_os = "none")), not(any(test, feature = "std"))))]
mod arch {
    pub fn disable() -> u64 {
        0
    }

    pub fn restore(_state: u64) {}

    pub fn is_enabled() -> bool {
        true
    }
}

/// Masks interrupts and returns the previous state for [`restore`].
#[inline(always)]
pub fn disable() -> u64 {
    arch::disable()
}

/// Restores the state captured by [`disable`].
#[inline(always)]
pub fn restore(state: u64) {
    arch::restore(state);
}

#[inline(always)]
pub fn is_enabled() -> bool {
    arch::is_enabled()
}
