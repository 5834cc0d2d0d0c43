// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Tick handler: counts time for every running timer.
//!
//! Runs in interrupt context. It does no I/O and never calls a client; its
//! run time is bounded by the number of slots.

use core::sync::atomic::Ordering;

use crate::registry::TimerRegistry;

impl<const SLOTS: usize, const TICK_RATIO: u32> TimerRegistry<'_, SLOTS, TICK_RATIO> {
    /// Entry point for the periodic tick interrupt.
    ///
    /// Every `TICK_RATIO`-th call is one timer tick: each running timer that
    /// has not expired yet advances by one, and timers reaching their timeout
    /// latch their expiry for the next [`dispatch`](Self::dispatch).
    ///
    /// Returns `true` if this call latched at least one expiry, so the
    /// interrupt handler can wake up the main loop.
    ///
    /// Must not be called concurrently with itself.
    pub fn tick(&self) -> bool {
        let sub_ticks = self.sub_ticks.load(Ordering::Relaxed) + 1;
        if sub_ticks < TICK_RATIO {
            self.sub_ticks.store(sub_ticks, Ordering::Relaxed);
            return false;
        }
        self.sub_ticks.store(0, Ordering::Relaxed);

        let mut latched = false;
        for slot in self.slots.iter() {
            latched |= slot.advance();
        }
        latched
    }
}
