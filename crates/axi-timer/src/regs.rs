//! AXI timer channel registers.
//!
//! Each channel is three consecutive words: TCSR (control/status), TLR (load)
//! and TCR (live count). The second channel of a device sits 0x10 above the
//! first.

use bitflags::bitflags;
use core::ptr::{addr_of, addr_of_mut, read_volatile, write_volatile};

bitflags! {
    /// Timer Control/Status Register (TCSR) bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Tcsr: u32 {
        /// Mode: 0 = generate, 1 = capture.
        const MDT   = 1 << 0;
        /// Count direction: 1 = down.
        const UDT   = 1 << 1;
        /// External generate signal enable.
        const GENT  = 1 << 2;
        /// External capture trigger enable.
        const CAPT  = 1 << 3;
        /// Auto reload on terminal count.
        const ARHT  = 1 << 4;
        /// While set, TCR is loaded from TLR every clock and does not count.
        const LOAD  = 1 << 5;
        /// Interrupt enable.
        const ENIT  = 1 << 6;
        /// Timer running.
        const ENT   = 1 << 7;
        /// Interrupt pending. Write one to clear.
        const TINT  = 1 << 8;
        /// PWM mode (uses both channels).
        const PWMA  = 1 << 9;
        /// Run every channel of the device.
        const ENALL = 1 << 10;
        /// 64-bit cascade. Channel 0 only; never set by this driver.
        const CASC  = 1 << 11;
    }
}

/// Register access for one timer channel.
pub trait TimerRegs: Send + Sync {
    fn read_tcsr(&self) -> u32;
    fn write_tcsr(&self, value: u32);
    fn read_tlr(&self) -> u32;
    fn write_tlr(&self, value: u32);
    fn read_tcr(&self) -> u32;

    fn control(&self) -> Tcsr {
        Tcsr::from_bits_truncate(self.read_tcsr())
    }

    /// Read-modify-write of TCSR.
    ///
    /// TINT is masked out of the write-back so a pending interrupt is never
    /// acknowledged as a side effect, and CASC is always written as zero.
    /// Callers serialise against the dispatcher.
    fn modify(&self, set: Tcsr, clear: Tcsr) {
        let next = ((self.control() | set) - clear) - Tcsr::TINT - Tcsr::CASC;
        self.write_tcsr(next.bits());
    }

    fn is_pending(&self) -> bool {
        self.control().contains(Tcsr::TINT)
    }

    /// Clear TINT, leaving every other control bit as it is.
    fn acknowledge(&self) {
        let next = (self.control() | Tcsr::TINT) - Tcsr::CASC;
        self.write_tcsr(next.bits());
    }
}

#[repr(C)]
struct Registers {
    tcsr: u32, // 0x00
    tlr: u32,  // 0x04
    tcr: u32,  // 0x08
}

/// Memory-mapped channel at a fixed address.
pub struct MmioTimerRegs {
    base: usize,
}

impl MmioTimerRegs {
    /// # Safety
    /// `base` must be the address of an AXI timer channel register block that
    /// stays mapped for the lifetime of the value.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    fn regs(&self) -> *mut Registers {
        self.base as *mut Registers
    }
}

impl TimerRegs for MmioTimerRegs {
    fn read_tcsr(&self) -> u32 {
        // SAFETY: new() guarantees a mapped block
        unsafe { read_volatile(addr_of!((*self.regs()).tcsr)) }
    }

    fn write_tcsr(&self, value: u32) {
        unsafe { write_volatile(addr_of_mut!((*self.regs()).tcsr), value) }
    }

    fn read_tlr(&self) -> u32 {
        unsafe { read_volatile(addr_of!((*self.regs()).tlr)) }
    }

    fn write_tlr(&self, value: u32) {
        unsafe { write_volatile(addr_of_mut!((*self.regs()).tlr), value) }
    }

    fn read_tcr(&self) -> u32 {
        unsafe { read_volatile(addr_of!((*self.regs()).tcr)) }
    }
}
