#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Pool of AXI countdown timers shared between tasks.
//!
//! Two timer blocks with two channels each, one interrupt line per block.
//! Tasks claim channels with [`TimerPool::allocate`], configure them through
//! the pool, and get a callback from interrupt context on expiry. Every
//! operation on a channel is checked against the caller that claimed it.
//!
//! On target the pool is built by [`board::init_board`] and reached through
//! [`pool`]. Hosted code builds one over [`sim`] devices instead.

pub mod board;
pub mod config;
mod control;
mod convert;
mod dispatch;
pub mod error;
mod ownership;
mod pool;
pub mod regs;
pub mod sim;
mod types;

pub use config::{NUM_DEVICES, NUM_TIMERS, TIMER_CLOCK_HZ};
pub use convert::{hz_to_count, us_to_count};
pub use dispatch::{TIMER_VECTORS, axi_timer0_isr, axi_timer1_isr};
pub use error::TimerError;
pub use pool::{DeviceDesc, DeviceState, TimerPool};
pub use regs::{MmioTimerRegs, Tcsr, TimerRegs};
pub use types::{CallerId, TimerHandle, TimerHandler};

static POOL: spin::Once<TimerPool<NUM_DEVICES>> = spin::Once::new();

/// Publish the system pool. Every channel is stopped and its pending state
/// dropped before the pool becomes reachable from the vectors.
///
/// Only the first call takes effect.
pub fn init(pool: TimerPool<NUM_DEVICES>) -> Result<&'static TimerPool<NUM_DEVICES>, TimerError> {
    let mut fresh = false;
    let published = POOL.call_once(|| {
        fresh = true;
        pool.quiesce();
        pool
    });
    if fresh {
        log::info!(
            "[TIMER] pool ready: {} channels at {} Hz",
            published.capacity(),
            published.clock_hz()
        );
        Ok(published)
    } else {
        let err = TimerError::AlreadyInitialized;
        log::warn!("[TIMER] {}; keeping the first pool", err);
        Err(err)
    }
}

/// The system pool, once [`init`] has run.
pub fn pool() -> Option<&'static TimerPool<NUM_DEVICES>> {
    POOL.get()
}
