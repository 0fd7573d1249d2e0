//! Period to reload-count conversions.

use crate::error::TimerError;
use crate::pool::TimerPool;

const US_PER_SECOND: u64 = 1_000_000;

/// Clocks in `us` microseconds at `clock_hz`, rounded down.
pub const fn us_to_count(clock_hz: u32, us: u32) -> Result<u32, TimerError> {
    let count = clock_hz as u64 * us as u64 / US_PER_SECOND;
    if count == 0 {
        Err(TimerError::InvalidPeriod)
    } else if count > u32::MAX as u64 {
        Err(TimerError::CountOverflow)
    } else {
        Ok(count as u32)
    }
}

/// Clocks per period of a `hz` rate at `clock_hz`, rounded down.
pub const fn hz_to_count(clock_hz: u32, hz: u32) -> Result<u32, TimerError> {
    if hz == 0 || hz > clock_hz {
        return Err(TimerError::InvalidPeriod);
    }
    Ok(clock_hz / hz)
}

impl<const D: usize> TimerPool<D> {
    pub const fn us_to_count(&self, us: u32) -> Result<u32, TimerError> {
        us_to_count(self.clock_hz(), us)
    }

    pub const fn hz_to_count(&self, hz: u32) -> Result<u32, TimerError> {
        hz_to_count(self.clock_hz(), hz)
    }
}
