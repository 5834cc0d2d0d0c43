// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Conversions between wall-clock units and timer ticks.
//!
//! The registry only knows ticks. Applications that think in milliseconds
//! convert at the call site:
//!
//! ```rust
//! use soft_timers::time::{ticks_from_ms, Freq1KHz};
//!
//! assert_eq!(ticks_from_ms::<Freq1KHz>(250), 250);
//! ```

use crate::slot::MAX_TIMEOUT;

/// Trait to represent clock frequency in Hz.
pub trait Frequency {
    /// Returns frequency in Hz.
    fn frequency() -> u32;
}

/// 1MHz `Frequency`
#[derive(Debug)]
pub struct Freq1MHz;
impl Frequency for Freq1MHz {
    fn frequency() -> u32 {
        1_000_000
    }
}

/// 32KHz `Frequency`
#[derive(Debug)]
pub struct Freq32KHz;
impl Frequency for Freq32KHz {
    fn frequency() -> u32 {
        32768
    }
}

/// 1KHz `Frequency`, the default timer resolution.
#[derive(Debug)]
pub struct Freq1KHz;
impl Frequency for Freq1KHz {
    fn frequency() -> u32 {
        1000
    }
}

/// 100Hz `Frequency`
#[derive(Debug)]
pub struct Freq100Hz;
impl Frequency for Freq100Hz {
    fn frequency() -> u32 {
        100
    }
}

// 64-bit intermediate so `value * hz` cannot overflow. The result saturates at
// the largest timeout a timer accepts.
fn scale_to_ticks(value: u32, hz: u32, per_second: u64) -> u32 {
    let ticks = u64::from(value) * u64::from(hz) / per_second;
    ticks.min(u64::from(MAX_TIMEOUT)) as u32
}

/// Number of ticks of a `F` clock in `ms` milliseconds, rounded down and
/// saturated to the largest valid timeout.
pub fn ticks_from_ms<F: Frequency>(ms: u32) -> u32 {
    scale_to_ticks(ms, F::frequency(), 1_000)
}

/// Number of ticks of a `F` clock in `us` microseconds, rounded down and
/// saturated to the largest valid timeout.
pub fn ticks_from_us<F: Frequency>(us: u32) -> u32 {
    scale_to_ticks(us, F::frequency(), 1_000_000)
}

/// Milliseconds covered by `ticks` periods of a `F` clock, rounded down.
pub fn ms_from_ticks<F: Frequency>(ticks: u32) -> u32 {
    let hz = u64::from(F::frequency());
    if hz == 0 {
        return 0;
    }
    (u64::from(ticks) * 1_000 / hz).min(u64::from(u32::MAX)) as u32
}
