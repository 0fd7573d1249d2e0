//! Integration tests for the process-wide pool and its vector entry points.
//!
//! The global pool can only be published once per process, so everything
//! touching it lives in a single test.

#[macro_use]
mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use axt_hal::InterruptController;
use axt_timer::{Tcsr, TimerError, TimerRegs};
use common::caller;

static FIRED: AtomicUsize = AtomicUsize::new(0);

fn on_expiry() {
    FIRED.fetch_add(1, Ordering::SeqCst);
}

/// Full lifecycle: publish, reject a second publish, dispatch through vectors.
#[test]
fn test_global_pool_lifecycle() {
    let (pool, devices, intc) = sim_rig!(10, 11);
    assert!(axt_timer::pool().is_none());

    // leftovers from a previous boot stage
    devices[1].channels[0].write_tcsr((Tcsr::ENT | Tcsr::ENIT | Tcsr::ARHT).bits());
    devices[1].channels[0].raise();
    intc.enable_irq(11);
    intc.set_pending(11);

    let published = axt_timer::init(pool).unwrap();
    assert_eq!(devices[1].channels[0].read_tcsr(), 0);
    assert!(!intc.is_irq_enabled(11));
    assert!(!intc.is_pending(11));
    assert!(std::ptr::eq(published, axt_timer::pool().unwrap()));

    let (spare, _, _) = sim_rig!(12, 13);
    assert_eq!(axt_timer::init(spare).err(), Some(TimerError::AlreadyInitialized));

    let task = caller(7);
    for _ in 0..2 {
        published.allocate(task).unwrap();
    }
    let h = published.allocate(task).unwrap();
    assert_eq!((h.device(), h.channel()), (1, 0));
    published.set_handler(task, h, on_expiry).unwrap();
    published.set_repeating(task, h, 100).unwrap();
    assert!(intc.is_irq_enabled(11));

    devices[1].channels[0].raise();
    intc.set_pending(11);
    axt_timer::axi_timer1_isr();
    assert_eq!(FIRED.load(Ordering::SeqCst), 1);
    assert!(!devices[1].channels[0].is_pending());
    assert!(!intc.is_pending(11));

    // device 0 vector with nothing pending is harmless
    (axt_timer::TIMER_VECTORS[0])();
    assert_eq!(FIRED.load(Ordering::SeqCst), 1);

    devices[1].channels[0].raise();
    (axt_timer::TIMER_VECTORS[1])();
    assert_eq!(FIRED.load(Ordering::SeqCst), 2);
}
