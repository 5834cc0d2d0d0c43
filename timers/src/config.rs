// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Compile-time configuration of the timer facility.
//!
//! Boolean options live in the typed `CONFIG` object rather than being
//! scattered `#[cfg(feature = ...)]` blocks: every code path is type-checked
//! whether or not the option is enabled, and the compiler folds the constant
//! away so a disabled option costs nothing in the final binary.
//!
//! Numeric parameters (interrupt rate, timer resolution, pool size) are plain
//! constants. The registry itself takes the pool size and the tick ratio as
//! const generics, so a board that needs different values instantiates
//! [`TimerRegistry`](crate::TimerRegistry) directly instead of using
//! [`DefaultTimerRegistry`](crate::DefaultTimerRegistry).

/// Data structure holding compile-time configuration options.
pub(crate) struct Config {
    /// Whether timer lifecycle events are traced to the debug output.
    ///
    /// If enabled, allocation, start, rejected start, stop and restart of a
    /// timer each print one line with the slot index and the timeout.
    pub(crate) trace_timer_events: bool,

    /// Whether the event dispatcher traces each callback it invokes.
    // Separate from `trace_timer_events` because auto-reload timers with short
    // periods make this very noisy.
    pub(crate) trace_dispatch: bool,
}

/// The unique instance of `Config`. This is the only place in the crate where
/// Cargo features are read.
pub(crate) const CONFIG: Config = Config {
    trace_timer_events: cfg!(feature = "trace_timer_events"),
    trace_dispatch: cfg!(feature = "trace_dispatch"),
};

/// Frequency of the periodic interrupt that calls
/// [`TimerRegistry::tick`](crate::TimerRegistry::tick), in Hz.
pub const SYSTEM_TICK_ISR_HZ: u32 = 1_000_000;

/// Resolution of the software timers, in Hz. Timeouts are counted in periods
/// of this clock.
pub const TIMERS_HZ: u32 = 1_000;

/// Number of interrupt invocations that make up one timer tick.
pub const TICK_RATIO: u32 = SYSTEM_TICK_ISR_HZ / TIMERS_HZ;

/// Number of timer slots in the default registry.
pub const MAX_TIMER_SLOTS: usize = 8;

/// Upper bound for the number of slots of any registry.
pub const SLOTS_LIMIT: usize = 0xFF;

const _: () = assert!(
    SYSTEM_TICK_ISR_HZ % TIMERS_HZ == 0,
    "the tick interrupt rate must be an integer multiple of the timer resolution"
);
const _: () = assert!(MAX_TIMER_SLOTS <= SLOTS_LIMIT, "too many timer slots");
