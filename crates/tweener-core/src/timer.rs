//! Tick-driver seam and time math.
//!
//! The scheduler owns no clock and no timer: an external periodic driver
//! calls [`Anims::tick`](crate::Anims::tick) with a monotonic millisecond
//! timestamp. The registry only gates that driver through [`TickDriver`],
//! pausing it whenever no record is live.

/// Pause/resume handle onto the external periodic driver.
pub trait TickDriver {
    fn pause(&mut self);
    fn resume(&mut self);
}

/// Driver stub for hosts that tick unconditionally.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoopDriver;

impl TickDriver for NoopDriver {
    fn pause(&mut self) {}
    fn resume(&mut self) {}
}

/// Wraparound-safe elapsed milliseconds between two clock readings.
#[inline]
pub fn tick_elaps(now: u32, prev: u32) -> u32 {
    now.wrapping_sub(prev)
}

/// Convert a speed (value units per second) over a value range into an
/// equivalent duration in milliseconds. Never returns 0: a degenerate range
/// still occupies one tick.
pub fn speed_to_duration(speed: u32, start: i32, end: i32) -> u32 {
    let dist = u64::from(start.abs_diff(end));
    let time = dist * 1000 / u64::from(speed.max(1));
    if time == 0 {
        1
    } else {
        time.min(u64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elaps_survives_wraparound() {
        assert_eq!(tick_elaps(10, u32::MAX - 4), 15);
        assert_eq!(tick_elaps(500, 200), 300);
    }

    #[test]
    fn speed_conversion() {
        assert_eq!(speed_to_duration(50, 0, 1000), 20_000);
        assert_eq!(speed_to_duration(1000, 5, 5), 1);
    }
}
