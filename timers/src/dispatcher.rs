// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Event dispatcher: delivers expiries to timer clients.
//!
//! Runs on the polling context, typically once per main loop iteration.
//! Clients run synchronously on the caller's stack, so a slow client delays
//! the slots after it and the next pass.

use crate::config::CONFIG;
use crate::debug;
use crate::registry::TimerRegistry;
use crate::slot::TimerKind;

impl<const SLOTS: usize, const TICK_RATIO: u32> TimerRegistry<'_, SLOTS, TICK_RATIO> {
    /// Services every timer whose expiry was latched by the tick handler, in
    /// slot index order.
    ///
    /// For each expired timer the client, if any, is called once. Afterwards
    /// a one-shot timer is retired (it stays claimed and reports
    /// [`Expired`](crate::TimerStatus::Expired) until started again) and an
    /// auto-reload timer is restarted. A client may stop or restart its own
    /// timer from `on_expire` (or stop it and start it anew); the dispatcher
    /// then leaves the slot as the client set it, even if the tick handler
    /// has already counted the new run.
    ///
    /// A call made from inside `on_expire` returns `0` without servicing
    /// anything; the outer pass carries on.
    ///
    /// Returns the number of clients called.
    pub fn dispatch(&self) -> usize {
        if self.dispatching.get() {
            return 0;
        }
        self.dispatching.set(true);

        let mut called = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            if !slot.is_expired() {
                continue;
            }

            let generation = slot.generation.get();
            if let Some(client) = slot.client.get() {
                if CONFIG.trace_dispatch {
                    debug!("timer {}: expired", index);
                }
                client.on_expire();
                called += 1;
            }

            // The client stopped, restarted or started the timer. The latch
            // may already be set again for the new run.
            if slot.generation.get() != generation {
                continue;
            }
            match slot.kind.get() {
                TimerKind::OneShot => slot.retire(),
                TimerKind::AutoReload => slot.rearm(),
            }
        }

        self.dispatching.set(false);
        called
    }

    /// Whether any expiry is waiting for [`dispatch`](Self::dispatch).
    pub fn has_pending(&self) -> bool {
        self.slots.iter().any(|slot| slot.is_expired())
    }
}
