// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Cortex-M support for the soft timers.
//!
//! The board wires the SysTick exception to the registry:
//!
//! ```rust,ignore
//! static TIMERS: DefaultTimerRegistry<'static> = DefaultTimerRegistry::new();
//!
//! #[no_mangle]
//! pub extern "C" fn SysTick() {
//!     TIMERS.tick();
//! }
//!
//! let systick = unsafe { SysTick::new_with_calibration(64_000_000) };
//! soft_timers::hil::tick::configure(&systick, config::TIMERS_HZ, config::TICK_RATIO)?;
//! ```

#![no_std]

pub mod systick;
