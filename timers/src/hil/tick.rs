// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for the periodic interrupt that drives the timers.
//!
//! The interrupt handler itself belongs to the board: it calls
//! [`TimerRegistry::tick`](crate::TimerRegistry::tick) on every interrupt. A
//! [`TickSource`] only programs the hardware to raise that interrupt at the
//! right rate.

use crate::errorcode::ErrorCode;

/// A hardware counter that raises a periodic interrupt.
pub trait TickSource {
    /// Programs the counter to interrupt `hz` times per second.
    ///
    /// Returns `INVAL` for a rate of zero and `SIZE` if the rate cannot be
    /// reached with the counter's clock and width.
    fn set_rate(&self, hz: u32) -> Result<(), ErrorCode>;

    /// Starts counting with the interrupt enabled.
    fn enable(&self);

    /// Stops counting and masks the interrupt.
    fn disable(&self);

    fn is_enabled(&self) -> bool;
}

/// Boards without a tick source; every rate is unsupported.
impl TickSource for () {
    fn set_rate(&self, _hz: u32) -> Result<(), ErrorCode> {
        Err(ErrorCode::NOSUPPORT)
    }

    fn enable(&self) {}

    fn disable(&self) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Programs `source` to interrupt `timers_hz * tick_ratio` times per second
/// and enables it.
///
/// `timers_hz` is the timer resolution and `tick_ratio` the registry's
/// `TICK_RATIO`, so each timer tick lasts exactly `1 / timers_hz` seconds.
pub fn configure<T: TickSource + ?Sized>(
    source: &T,
    timers_hz: u32,
    tick_ratio: u32,
) -> Result<(), ErrorCode> {
    let rate = timers_hz.checked_mul(tick_ratio).ok_or(ErrorCode::SIZE)?;
    if rate == 0 {
        return Err(ErrorCode::INVAL);
    }
    source.disable();
    source.set_rate(rate)?;
    source.enable();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct FakeSource {
        rate: Cell<u32>,
        max_rate: u32,
        enabled: Cell<bool>,
    }

    impl FakeSource {
        fn new(max_rate: u32) -> Self {
            FakeSource {
                rate: Cell::new(0),
                max_rate,
                enabled: Cell::new(false),
            }
        }
    }

    impl TickSource for FakeSource {
        fn set_rate(&self, hz: u32) -> Result<(), ErrorCode> {
            if hz == 0 {
                return Err(ErrorCode::INVAL);
            }
            if hz > self.max_rate {
                return Err(ErrorCode::SIZE);
            }
            self.rate.set(hz);
            Ok(())
        }

        fn enable(&self) {
            self.enabled.set(true);
        }

        fn disable(&self) {
            self.enabled.set(false);
        }

        fn is_enabled(&self) -> bool {
            self.enabled.get()
        }
    }

    #[test]
    fn configure_programs_interrupt_rate() {
        let source = FakeSource::new(48_000_000);
        assert_eq!(configure(&source, 1_000, 1_000), Ok(()));
        assert_eq!(source.rate.get(), 1_000_000);
        assert!(source.is_enabled());
    }

    #[test]
    fn unreachable_rate_leaves_source_disabled() {
        let source = FakeSource::new(100_000);
        source.enable();
        assert_eq!(configure(&source, 1_000, 1_000), Err(ErrorCode::SIZE));
        assert!(!source.is_enabled());
    }

    #[test]
    fn overflowing_rate_is_rejected() {
        let source = FakeSource::new(u32::MAX);
        assert_eq!(configure(&source, 1 << 20, 1 << 20), Err(ErrorCode::SIZE));
        assert_eq!(configure(&source, 0, 1_000), Err(ErrorCode::INVAL));
        assert_eq!(source.rate.get(), 0);
    }

    #[test]
    fn no_tick_source() {
        assert_eq!(configure(&(), 1_000, 1), Err(ErrorCode::NOSUPPORT));
        assert!(!().is_enabled());
    }
}
