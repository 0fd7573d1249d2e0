//! Cortex-M NVIC line control.
//!
//! Only the set/clear banks are used: ISER (0x100), ICER (0x180),
//! ISPR (0x200) and ICPR (0x280), each an array of 32-bit words with one bit
//! per line. Writes of zero bits are ignored by hardware, so every access is
//! a single store with no read-modify-write.

use core::ptr::{read_volatile, write_volatile};

use crate::traits::{InterruptController, IrqNumber};

/// System Control Space base on every Cortex-M part.
pub const NVIC_BASE: usize = 0xE000_E000;

const NVIC_ISER: usize = 0x100;
const NVIC_ICER: usize = 0x180;
const NVIC_ISPR: usize = 0x200;
const NVIC_ICPR: usize = 0x280;

pub struct Nvic {
    base: usize,
}

impl Nvic {
    /// # Safety
    /// `base` must point at an NVIC register block (normally [`NVIC_BASE`])
    /// that stays mapped for the lifetime of the value.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    fn word(&self, bank: usize, irq: IrqNumber) -> (*mut u32, u32) {
        let offset = bank + (irq as usize / 32) * 4;
        ((self.base + offset) as *mut u32, 1 << (irq % 32))
    }

    fn set_bit(&self, bank: usize, irq: IrqNumber) {
        let (reg, bit) = self.word(bank, irq);
        // SAFETY: new() guarantees a mapped register block; set/clear banks are write-one
        unsafe { write_volatile(reg, bit) };
    }

    fn test_bit(&self, bank: usize, irq: IrqNumber) -> bool {
        let (reg, bit) = self.word(bank, irq);
        // SAFETY: as above
        unsafe { read_volatile(reg) & bit != 0 }
    }

    /// Force a line pending, mostly useful for bring-up.
    pub fn set_pending(&self, irq: IrqNumber) {
        self.set_bit(NVIC_ISPR, irq);
    }

    pub fn is_pending(&self, irq: IrqNumber) -> bool {
        self.test_bit(NVIC_ISPR, irq)
    }
}

impl InterruptController for Nvic {
    fn enable_irq(&self, irq: IrqNumber) {
        self.set_bit(NVIC_ISER, irq);
    }

    fn disable_irq(&self, irq: IrqNumber) {
        self.set_bit(NVIC_ICER, irq);
    }

    fn clear_pending(&self, irq: IrqNumber) {
        self.set_bit(NVIC_ICPR, irq);
    }

    fn is_irq_enabled(&self, irq: IrqNumber) -> bool {
        self.test_bit(NVIC_ISER, irq)
    }
}
