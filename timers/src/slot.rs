// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! A single timer slot and the values describing its state.
//!
//! Field ownership
//! ---------------
//!
//! A slot is shared between the tick handler (interrupt context) and the
//! polling context without a lock. Each field has one writer per state:
//!
//! - `ticks` is incremented by the tick handler only while the slot is
//!   running and `expired` is clear. The polling context writes it to arm,
//!   park or retire the slot.
//! - `expired` is only ever *set* by the tick handler and only ever *cleared*
//!   by the polling context. While it is set the tick handler does not touch
//!   the slot at all, so the polling context owns it exclusively.
//! - `timeout` is read by the tick handler and written by the polling
//!   context while the slot is parked (idle).
//! - `kind`, `client` and `generation` are never touched by the tick handler.
//!
//! Polling-context writers store `ticks` before they release the `expired`
//! latch, so the tick handler never sees a latch cleared on a slot whose
//! counter still sits at the timeout.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Tick counter value of a slot that holds no running timer.
pub const IDLE: u32 = u32::MAX;

/// Largest timeout accepted by a timer. `IDLE` and the value just below it
/// are reserved: the first marks a stopped slot, the second is where a
/// one-shot timer of the largest timeout parks after firing.
pub const MAX_TIMEOUT: u32 = IDLE - 2;

/// Whether a timer fires once or re-arms itself after every expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once; needs a new `start` to run again.
    OneShot,
    /// Re-armed by the dispatcher after every expiry.
    AutoReload,
}

/// Result of [`TimerRegistry::get_status`](crate::TimerRegistry::get_status).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerStatus {
    NotExpired,
    Expired,
}

/// Client of a timer.
///
/// `on_expire` is invoked by the event dispatcher, on the polling context,
/// once for every expiry. It is never called from the tick handler. Any
/// per-timer context is carried by the implementing type.
pub trait Expirable {
    fn on_expire(&self);
}

pub(crate) struct TimerSlot<'a> {
    pub(crate) kind: Cell<TimerKind>,
    pub(crate) ticks: AtomicU32,
    pub(crate) timeout: AtomicU32,
    pub(crate) expired: AtomicBool,
    pub(crate) client: Cell<Option<&'a dyn Expirable>>,
    /// Bumped whenever the polling context arms, re-arms or resets the slot.
    pub(crate) generation: Cell<u32>,
}

impl<'a> TimerSlot<'a> {
    // Repeat operand for the registry's slot array; each use is a fresh slot.
    #[allow(clippy::declare_interior_mutable_const)]
    pub(crate) const IDLE_SLOT: TimerSlot<'a> = TimerSlot::new();

    pub(crate) const fn new() -> Self {
        TimerSlot {
            kind: Cell::new(TimerKind::OneShot),
            ticks: AtomicU32::new(IDLE),
            timeout: AtomicU32::new(0),
            expired: AtomicBool::new(false),
            client: Cell::new(None),
            generation: Cell::new(0),
        }
    }

    pub(crate) fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub(crate) fn timeout(&self) -> u32 {
        self.timeout.load(Ordering::Relaxed)
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Acquire)
    }

    fn bump_generation(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.ticks() == IDLE
    }

    /// Running and not yet past its timeout. An expired timer whose event
    /// has not been dispatched yet is still busy.
    pub(crate) fn is_busy(&self) -> bool {
        let ticks = self.ticks();
        ticks != IDLE && ticks <= self.timeout()
    }

    /// A one-shot timer that fired and was retired by the dispatcher.
    pub(crate) fn is_spent(&self) -> bool {
        let ticks = self.ticks();
        ticks != IDLE && ticks > self.timeout()
    }

    /// Arms the slot. Must only be called on a slot that is not busy.
    pub(crate) fn arm(&self, kind: TimerKind, client: Option<&'a dyn Expirable>, timeout: u32) {
        // Park first so the tick handler skips the slot while it is being
        // reconfigured.
        self.ticks.store(IDLE, Ordering::Relaxed);
        self.expired.store(false, Ordering::Release);
        self.kind.set(kind);
        self.client.set(client);
        self.timeout.store(timeout, Ordering::Relaxed);
        self.bump_generation();
        self.ticks.store(0, Ordering::Release);
    }

    /// Restarts counting from zero, keeping kind, timeout and client.
    pub(crate) fn rearm(&self) {
        self.bump_generation();
        self.ticks.store(0, Ordering::Relaxed);
        self.expired.store(false, Ordering::Release);
    }

    /// Leaves a fired one-shot timer past its timeout, where the tick handler
    /// no longer counts it and `start` accepts it again.
    pub(crate) fn retire(&self) {
        self.ticks.store(self.timeout() + 1, Ordering::Relaxed);
        self.expired.store(false, Ordering::Release);
    }

    /// Returns the slot to idle and forgets its client.
    pub(crate) fn reset(&self) {
        self.ticks.store(IDLE, Ordering::Relaxed);
        self.timeout.store(0, Ordering::Relaxed);
        self.expired.store(false, Ordering::Release);
        self.client.set(None);
        self.bump_generation();
    }

    /// Advances the slot by one timer tick. Returns `true` if this tick
    /// latched the expiry.
    ///
    /// Interrupt context. Only writes `ticks` and sets `expired`.
    pub(crate) fn advance(&self) -> bool {
        if self.expired.load(Ordering::Acquire) {
            return false;
        }
        let ticks = self.ticks();
        let timeout = self.timeout();
        if ticks == IDLE || ticks >= timeout {
            return false;
        }
        let ticks = ticks + 1;
        self.ticks.store(ticks, Ordering::Relaxed);
        if ticks == timeout {
            self.expired.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }
}
