//! Build-time board configuration.
//!
//! Addresses and IRQ lines follow the default AXI interconnect map of the
//! Cortex-M3 FPGA design: two `axi_timer` blocks on consecutive 64 KiB
//! windows, wired to external interrupts 0 and 1.

use axt_hal::IrqNumber;

/// Channels per AXI timer block. Fixed by the IP.
pub const CHANNELS_PER_DEVICE: usize = 2;

/// Timer blocks in the design. The pool is not resizable at run time.
pub const NUM_DEVICES: usize = 2;

/// Total allocatable channels.
pub const NUM_TIMERS: usize = NUM_DEVICES * CHANNELS_PER_DEVICE;

/// AXI clock feeding both timer blocks.
pub const TIMER_CLOCK_HZ: u32 = 50_000_000;

pub const TIMER0_BASE: usize = 0x41C0_0000;
pub const TIMER1_BASE: usize = 0x41C1_0000;

/// Offset of channel 1 registers from the block base.
pub const CHANNEL_STRIDE: usize = 0x10;

pub const TIMER0_IRQ: IrqNumber = 0;
pub const TIMER1_IRQ: IrqNumber = 1;
