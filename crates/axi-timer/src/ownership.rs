//! Channel ownership: allocate, free, handler registration.

use crate::error::TimerError;
use crate::pool::TimerPool;
use crate::types::{CallerId, TimerHandle, TimerHandler};

impl<const D: usize> TimerPool<D> {
    /// Claim the first free channel, scanning device 0 channel 0 upwards.
    ///
    /// Each claim is a compare-and-swap on the channel's owner word, so two
    /// callers racing for the same channel cannot both win.
    pub fn allocate(&self, caller: CallerId) -> Result<TimerHandle, TimerError> {
        for (d, device) in self.devices.iter().enumerate() {
            for (c, channel) in device.channels.iter().enumerate() {
                if channel.try_claim(caller) {
                    let handle = TimerHandle::new(d, c);
                    log::debug!("[TIMER] {} allocated to {:#x}", handle, caller.get());
                    return Ok(handle);
                }
            }
        }
        log::debug!("[TIMER] allocate by {:#x}: pool exhausted", caller.get());
        Err(TimerError::NoChannelAvailable)
    }

    /// Release a channel and forget its handler.
    ///
    /// The channel keeps whatever register state it had; an expiry already in
    /// flight is acknowledged by the dispatcher without a callback. Runs under
    /// the device lock, so a concurrent `set_handler` by the same owner either
    /// lands before the handler is cleared or is rejected.
    pub fn free(&self, caller: CallerId, handle: TimerHandle) -> Result<(), TimerError> {
        let owned = self.lock_owned(caller, handle)?;
        owned.channel.release();
        drop(owned);
        log::debug!("[TIMER] {} freed", handle);
        Ok(())
    }

    /// Install the expiry callback, replacing any previous one.
    ///
    /// Published with release ordering; the next dispatch that observes it
    /// calls it.
    pub fn set_handler(
        &self,
        caller: CallerId,
        handle: TimerHandle,
        handler: TimerHandler,
    ) -> Result<(), TimerError> {
        let owned = self.lock_owned(caller, handle)?;
        owned.channel.set_handler(handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{self, SimDevice};
    use axt_hal::SimInterruptController;

    fn tick() {}

    fn caller(raw: usize) -> CallerId {
        CallerId::new(raw).unwrap()
    }

    macro_rules! rig {
        () => {{
            static DEVICES: [SimDevice; 2] = [SimDevice::new(0), SimDevice::new(1)];
            static INTC: SimInterruptController = SimInterruptController::new();
            sim::pool(&DEVICES, &INTC, 1_000_000)
        }};
    }

    #[test]
    fn allocation_order_is_deterministic() {
        let pool = rig!();
        let a = caller(1);
        let handles: Vec<u16> = (0..4).map(|_| pool.allocate(a).unwrap().index()).collect();
        assert_eq!(handles, [0, 1, 2, 3]);
        assert_eq!(pool.allocate(a), Err(TimerError::NoChannelAvailable));
    }

    #[test]
    fn freed_channel_is_reallocated_first() {
        let pool = rig!();
        let a = caller(1);
        for _ in 0..4 {
            pool.allocate(a).unwrap();
        }
        pool.free(a, TimerHandle::from_index(1)).unwrap();

        let b = caller(2);
        let h = pool.allocate(b).unwrap();
        assert_eq!(h.index(), 1);
        assert_eq!(pool.owner(h), Ok(Some(b)));
        assert_eq!(pool.allocate(b), Err(TimerError::NoChannelAvailable));
    }

    #[test]
    fn non_owner_cannot_free_or_install_handler() {
        let pool = rig!();
        let (a, b) = (caller(1), caller(2));
        let h = pool.allocate(a).unwrap();
        pool.set_handler(a, h, tick).unwrap();

        assert_eq!(pool.free(b, h), Err(TimerError::NotOwner));
        assert_eq!(pool.set_handler(b, h, tick), Err(TimerError::NotOwner));
        assert_eq!(pool.owner(h), Ok(Some(a)));

        let (_, channel) = pool.lookup(h).unwrap();
        assert!(channel.handler().is_some());
    }

    #[test]
    fn free_clears_owner_and_handler() {
        let pool = rig!();
        let a = caller(1);
        let h = pool.allocate(a).unwrap();
        pool.set_handler(a, h, tick).unwrap();
        pool.free(a, h).unwrap();

        assert_eq!(pool.owner(h), Ok(None));
        let (_, channel) = pool.lookup(h).unwrap();
        assert!(channel.handler().is_none());
        // second free by the former owner is rejected, not a silent reset
        assert_eq!(pool.free(a, h), Err(TimerError::NotOwner));
    }

    #[test]
    fn out_of_range_handle_is_rejected() {
        let pool = rig!();
        let a = caller(1);
        assert_eq!(pool.free(a, TimerHandle::from_index(4)), Err(TimerError::InvalidHandle));
        assert_eq!(pool.owner(TimerHandle::from_index(9)), Err(TimerError::InvalidHandle));
    }

    #[test]
    fn concurrent_allocators_never_share_a_channel() {
        use std::sync::Barrier;
        use std::thread;

        let pool = rig!();
        let barrier = Barrier::new(8);
        let won: Vec<Option<TimerHandle>> = thread::scope(|s| {
            let workers: Vec<_> = (1..=8)
                .map(|id| {
                    let (pool, barrier) = (&pool, &barrier);
                    s.spawn(move || {
                        barrier.wait();
                        pool.allocate(caller(id)).ok()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        let mut granted: Vec<u16> = won.iter().flatten().map(|h| h.index()).collect();
        granted.sort_unstable();
        assert_eq!(granted, [0, 1, 2, 3]);
        assert_eq!(won.iter().filter(|h| h.is_none()).count(), 4);
    }

    #[test]
    fn stale_owner_cannot_install_handler_after_reallocation() {
        use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
        use std::thread;

        fn stale() {}

        let pool = rig!();
        let (a, b, filler) = (caller(1), caller(2), caller(3));
        let h = pool.allocate(a).unwrap();
        for _ in 0..3 {
            pool.allocate(filler).unwrap();
        }

        let done = AtomicBool::new(false);
        let foreign = AtomicUsize::new(0);
        thread::scope(|s| {
            s.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    let _ = pool.set_handler(a, h, stale);
                }
            });
            s.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    if pool.free(a, h).is_ok() {
                        thread::yield_now();
                        let _ = pool.allocate(a);
                    }
                }
            });
            s.spawn(|| {
                for _ in 0..200_000 {
                    if let Ok(got) = pool.allocate(b) {
                        let (_, channel) = pool.lookup(got).unwrap();
                        if channel.handler().is_some() {
                            foreign.fetch_add(1, Ordering::SeqCst);
                        }
                        pool.free(b, got).unwrap();
                    }
                }
                done.store(true, Ordering::Release);
            });
        });

        assert_eq!(foreign.load(Ordering::SeqCst), 0);
    }
}
