//! Integration tests for channel ownership across the whole pool.

#[macro_use]
mod common;

use std::sync::Barrier;
use std::thread;

use axt_timer::{TimerError, TimerHandle};
use common::caller;

/// Four allocations in order, a fifth fails, a freed slot comes back first.
#[test]
fn test_allocate_free_reallocate() {
    let (pool, _, _) = sim_rig!();
    let task = caller(0x100);

    let handles: Vec<u16> = (0..4).map(|_| pool.allocate(task).unwrap().index()).collect();
    assert_eq!(handles, [0, 1, 2, 3]);
    assert_eq!(pool.allocate(task), Err(TimerError::NoChannelAvailable));

    pool.free(task, TimerHandle::from_index(1)).unwrap();
    assert_eq!(pool.allocate(task).unwrap().index(), 1);
}

/// Exhaustion holds no matter how earlier frees were interleaved.
#[test]
fn test_exhaustion_after_interleaved_frees() {
    let (pool, _, _) = sim_rig!();
    let (a, b) = (caller(1), caller(2));

    let h0 = pool.allocate(a).unwrap();
    let h1 = pool.allocate(b).unwrap();
    pool.free(a, h0).unwrap();
    let h2 = pool.allocate(b).unwrap();
    assert_eq!(h2, h0);
    pool.free(b, h1).unwrap();

    for _ in 0..3 {
        pool.allocate(a).unwrap();
    }
    assert_eq!(pool.allocate(a), Err(TimerError::NoChannelAvailable));
    assert_eq!(pool.allocate(b), Err(TimerError::NoChannelAvailable));
    assert_eq!(pool.capacity(), axt_timer::NUM_TIMERS);
}

/// A non-owner free is rejected; an owner free hands the slot to someone else.
#[test]
fn test_free_ownership_rules() {
    fn on_expiry() {}

    let (pool, _, _) = sim_rig!();
    let (owner, other) = (caller(1), caller(2));
    let h = pool.allocate(owner).unwrap();
    pool.set_handler(owner, h, on_expiry).unwrap();

    assert_eq!(pool.free(other, h), Err(TimerError::NotOwner));
    assert_eq!(pool.owner(h), Ok(Some(owner)));

    pool.free(owner, h).unwrap();
    assert_eq!(pool.owner(h), Ok(None));

    let again = pool.allocate(other).unwrap();
    assert_eq!(again, h);
    assert_eq!(pool.owner(h), Ok(Some(other)));
    // the previous owner's handle no longer grants anything
    assert_eq!(pool.enable(owner, h), Err(TimerError::NotOwner));
}

/// Tasks hammering allocate/free never observe a channel owned by someone else.
#[test]
fn test_concurrent_churn_keeps_ownership_exclusive() {
    let (pool, _, _) = sim_rig!();
    let barrier = Barrier::new(6);

    thread::scope(|s| {
        for id in 1..=6 {
            let (pool, barrier) = (&pool, &barrier);
            s.spawn(move || {
                let me = caller(id);
                barrier.wait();
                for _ in 0..2_000 {
                    if let Ok(h) = pool.allocate(me) {
                        assert_eq!(pool.owner(h), Ok(Some(me)));
                        pool.free(me, h).unwrap();
                    }
                }
            });
        }
    });

    for index in 0..4 {
        assert_eq!(pool.owner(TimerHandle::from_index(index)), Ok(None));
    }
}

/// Identity taken from a task control block address.
#[test]
fn test_caller_identity_from_task_block() {
    struct Tcb {
        _stack: [u8; 16],
    }

    let (pool, _, _) = sim_rig!();
    let (t1, t2) = (Tcb { _stack: [0; 16] }, Tcb { _stack: [0; 16] });
    let (a, b) = (axt_timer::CallerId::from_ref(&t1), axt_timer::CallerId::from_ref(&t2));
    assert_ne!(a, b);

    let h = pool.allocate(a).unwrap();
    assert_eq!(pool.set_oneshot(b, h, 10), Err(TimerError::NotOwner));
    pool.set_oneshot(a, h, 10).unwrap();
}
