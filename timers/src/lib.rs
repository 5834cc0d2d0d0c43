// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Software timers for small embedded systems.
//!
//! A fixed pool of timers shares one periodic interrupt. The interrupt
//! handler calls [`TimerRegistry::tick`], which only counts and flags
//! expiries; the main loop calls [`TimerRegistry::dispatch`], which runs the
//! expired timers' clients. Client code therefore never runs in interrupt
//! context.
//!
//! The crate has no allocator and no locks. See `slot.rs` for the rules that
//! make sharing the pool between the interrupt and the main loop sound.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod debug;
pub mod errorcode;
pub mod hil;
pub mod time;

mod advancer;
mod dispatcher;
mod registry;
mod slot;

pub use crate::errorcode::ErrorCode;
pub use crate::registry::{DefaultTimerRegistry, TimerHandle, TimerRegistry};
pub use crate::slot::{Expirable, TimerKind, TimerStatus, IDLE, MAX_TIMEOUT};
