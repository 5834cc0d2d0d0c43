// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Fixed pool of software timers.
//!
//! A [`TimerRegistry`] owns `SLOTS` timer slots. Slots are handed out in
//! increasing index order by [`TimerRegistry::create_timer`] and are never
//! returned to the pool; a claimed slot is started, stopped and restarted as
//! often as needed through its [`TimerHandle`].
//!
//! Two entry points drive the registry:
//!
//! - [`TimerRegistry::tick`] from the periodic interrupt, which counts ticks
//!   and latches expiries;
//! - [`TimerRegistry::dispatch`] from the main loop, which runs the clients of
//!   expired timers and re-arms or retires them.
//!
//! Usage
//! -----
//!
//! ```rust
//! use core::cell::Cell;
//! use soft_timers::{DefaultTimerRegistry, Expirable, TimerKind};
//!
//! struct Blink {
//!     toggles: Cell<u32>,
//! }
//!
//! impl Expirable for Blink {
//!     fn on_expire(&self) {
//!         self.toggles.set(self.toggles.get() + 1);
//!     }
//! }
//!
//! static TIMERS: DefaultTimerRegistry<'static> = DefaultTimerRegistry::new();
//! static BLINK: Blink = Blink { toggles: Cell::new(0) };
//! # unsafe impl Sync for Blink {}
//!
//! let led = TIMERS.create_timer();
//! TIMERS.start(led, TimerKind::AutoReload, Some(&BLINK), 500).unwrap();
//!
//! // SysTick handler: `TIMERS.tick();`
//! // Main loop:       `TIMERS.dispatch();`
//! ```

use core::cell::Cell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::{self, CONFIG};
use crate::debug;
use crate::errorcode::ErrorCode;
use crate::slot::{Expirable, TimerKind, TimerSlot, TimerStatus, IDLE, MAX_TIMEOUT};

/// Registry with the default pool size and tick ratio from [`config`].
pub type DefaultTimerRegistry<'a> =
    TimerRegistry<'a, { config::MAX_TIMER_SLOTS }, { config::TICK_RATIO }>;

/// Reference to a claimed timer slot.
///
/// Only obtainable from [`TimerRegistry::create_timer`]. Using a handle with
/// a registry other than the one that created it is a caller error; an index
/// beyond that registry's pool panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerHandle {
    index: usize,
}

impl TimerHandle {
    /// Slot index of this timer, which is also its dispatch position.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A fixed pool of `SLOTS` software timers advanced every `TICK_RATIO`
/// interrupts.
pub struct TimerRegistry<'a, const SLOTS: usize, const TICK_RATIO: u32> {
    pub(crate) slots: [TimerSlot<'a>; SLOTS],
    /// Slots handed out so far. Polling context only.
    allocated: Cell<usize>,
    /// Set while `dispatch` is running. Polling context only.
    pub(crate) dispatching: Cell<bool>,
    /// Interrupts counted towards the next timer tick. Tick handler only.
    pub(crate) sub_ticks: AtomicU32,
}

// SAFETY: the registry is shared between exactly two contexts, the tick
// interrupt and the polling context, on a single core. The tick handler only
// touches `sub_ticks` and the atomic `ticks`/`timeout`/`expired` fields of
// each slot, following the ownership rules in `slot.rs`. Everything held in a
// `Cell` is only accessed from the polling context, which must not run
// concurrently with itself.
unsafe impl<const SLOTS: usize, const TICK_RATIO: u32> Sync
    for TimerRegistry<'_, SLOTS, TICK_RATIO>
{
}

impl<'a, const SLOTS: usize, const TICK_RATIO: u32> TimerRegistry<'a, SLOTS, TICK_RATIO> {
    /// Creates a registry with every slot idle.
    pub const fn new() -> Self {
        const {
            assert!(SLOTS > 0, "a timer registry needs at least one slot");
            assert!(SLOTS <= config::SLOTS_LIMIT, "too many timer slots");
            assert!(TICK_RATIO > 0, "the tick ratio must be at least 1");
        }
        TimerRegistry {
            slots: [TimerSlot::IDLE_SLOT; SLOTS],
            allocated: Cell::new(0),
            dispatching: Cell::new(false),
            sub_ticks: AtomicU32::new(0),
        }
    }

    /// Returns every slot to idle and forgets all allocations.
    ///
    /// Handles obtained before the call must not be used afterwards. Must
    /// run before the tick interrupt is enabled.
    pub fn init(&self) {
        for slot in self.slots.iter() {
            slot.reset();
        }
        self.allocated.set(0);
        self.sub_ticks.store(0, Ordering::Relaxed);
    }

    /// Claims the next free slot, or returns `NOMEM` if all `SLOTS` are in use.
    pub fn try_create_timer(&self) -> Result<TimerHandle, ErrorCode> {
        let index = self.allocated.get();
        if index >= SLOTS {
            return Err(ErrorCode::NOMEM);
        }
        self.allocated.set(index + 1);
        if CONFIG.trace_timer_events {
            debug!("timer {}: created ({} of {})", index, index + 1, SLOTS);
        }
        Ok(TimerHandle { index })
    }

    /// Claims the next free slot.
    ///
    /// Panics if the pool is exhausted. The pool size is fixed when the board
    /// is built, so running out is a configuration error that cannot be
    /// handled at run time.
    pub fn create_timer(&self) -> TimerHandle {
        match self.try_create_timer() {
            Ok(handle) => handle,
            Err(_) => panic!("soft timers: pool exhausted ({} slots)", SLOTS),
        }
    }

    fn slot(&self, handle: TimerHandle) -> &TimerSlot<'a> {
        &self.slots[handle.index]
    }

    /// Starts a timer that expires after `timeout` timer ticks.
    ///
    /// Returns `BUSY` without changing anything if the timer is running
    /// (including expired but not yet dispatched), and `INVAL` if `timeout`
    /// is `0` or larger than [`MAX_TIMEOUT`].
    pub fn start(
        &self,
        handle: TimerHandle,
        kind: TimerKind,
        client: Option<&'a dyn Expirable>,
        timeout: u32,
    ) -> Result<(), ErrorCode> {
        let slot = self.slot(handle);
        if slot.is_busy() {
            if CONFIG.trace_timer_events {
                debug!("timer {}: start rejected, in use", handle.index);
            }
            return Err(ErrorCode::BUSY);
        }
        if timeout == 0 || timeout > MAX_TIMEOUT {
            return Err(ErrorCode::INVAL);
        }
        slot.arm(kind, client, timeout);
        if CONFIG.trace_timer_events {
            debug!(
                "timer {}: started {:?}, timeout {}",
                handle.index, kind, timeout
            );
        }
        Ok(())
    }

    /// Stops a timer and forgets its client. Stopping an idle timer does
    /// nothing.
    pub fn stop(&self, handle: TimerHandle) {
        self.slot(handle).reset();
        if CONFIG.trace_timer_events {
            debug!("timer {}: stopped", handle.index);
        }
    }

    /// Restarts counting from zero and clears a pending expiry. Kind, timeout
    /// and client are kept.
    ///
    /// An idle timer has no timeout to count towards and stays idle; use
    /// `start` instead.
    pub fn restart(&self, handle: TimerHandle) {
        let slot = self.slot(handle);
        if slot.is_idle() {
            return;
        }
        slot.rearm();
        if CONFIG.trace_timer_events {
            debug!("timer {}: restarted", handle.index);
        }
    }

    /// Whether the timer has reached its timeout since it was last started or
    /// restarted.
    ///
    /// An expiry stays visible until the dispatcher re-arms an auto-reload
    /// timer, or until a one-shot timer is started, restarted or stopped.
    /// Idle timers are never expired.
    pub fn get_status(&self, handle: TimerHandle) -> TimerStatus {
        let slot = self.slot(handle);
        if slot.is_expired() || slot.is_spent() {
            TimerStatus::Expired
        } else {
            TimerStatus::NotExpired
        }
    }

    /// Ticks counted since the timer was (re)started, or [`IDLE`].
    pub fn ticks(&self, handle: TimerHandle) -> u32 {
        self.slot(handle).ticks()
    }

    pub fn timeout(&self, handle: TimerHandle) -> u32 {
        self.slot(handle).timeout()
    }

    pub fn kind(&self, handle: TimerHandle) -> TimerKind {
        self.slot(handle).kind.get()
    }

    pub fn is_idle(&self, handle: TimerHandle) -> bool {
        self.slot(handle).ticks() == IDLE
    }

    /// Whether `start` would currently be rejected with `BUSY`.
    pub fn is_busy(&self, handle: TimerHandle) -> bool {
        self.slot(handle).is_busy()
    }

    /// Number of slots handed out so far.
    pub fn timers_in_use(&self) -> usize {
        self.allocated.get()
    }

    /// Size of the pool.
    pub const fn capacity(&self) -> usize {
        SLOTS
    }
}

impl<const SLOTS: usize, const TICK_RATIO: u32> Default for TimerRegistry<'_, SLOTS, TICK_RATIO> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        calls: Cell<u32>,
    }

    impl Counter {
        const fn new() -> Self {
            Counter {
                calls: Cell::new(0),
            }
        }
    }

    impl Expirable for Counter {
        fn on_expire(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    type Registry<'a> = TimerRegistry<'a, 8, 1>;

    #[test]
    fn new_registry_is_idle() {
        let timers = Registry::new();
        assert_eq!(timers.timers_in_use(), 0);
        assert_eq!(timers.capacity(), 8);
        for slot in timers.slots.iter() {
            assert_eq!(slot.ticks(), IDLE);
            assert_eq!(slot.timeout(), 0);
            assert!(!slot.is_expired());
            assert!(slot.client.get().is_none());
        }
    }

    #[test]
    fn handles_are_handed_out_in_order() {
        let timers = Registry::new();
        for expected in 0..8 {
            assert_eq!(timers.create_timer().index(), expected);
        }
        assert_eq!(timers.timers_in_use(), 8);
    }

    #[test]
    fn try_create_reports_exhaustion() {
        let timers = TimerRegistry::<2, 1>::new();
        assert!(timers.try_create_timer().is_ok());
        assert!(timers.try_create_timer().is_ok());
        assert_eq!(timers.try_create_timer(), Err(ErrorCode::NOMEM));
        assert_eq!(timers.timers_in_use(), 2);
    }

    #[test]
    #[should_panic(expected = "pool exhausted (8 slots)")]
    fn ninth_allocation_is_fatal() {
        let timers = Registry::new();
        for _ in 0..8 {
            timers.create_timer();
        }
        timers.create_timer();
    }

    #[test]
    fn start_arms_the_slot() {
        let timers = Registry::new();
        let counter = Counter::new();
        let t = timers.create_timer();
        assert!(timers.is_idle(t));
        assert_eq!(timers.start(t, TimerKind::AutoReload, Some(&counter), 5), Ok(()));
        assert_eq!(timers.ticks(t), 0);
        assert_eq!(timers.timeout(t), 5);
        assert_eq!(timers.kind(t), TimerKind::AutoReload);
        assert!(timers.is_busy(t));
        assert_eq!(timers.get_status(t), TimerStatus::NotExpired);
    }

    #[test]
    fn start_on_running_timer_is_rejected() {
        let timers = Registry::new();
        let first = Counter::new();
        let second = Counter::new();
        let t = timers.create_timer();
        timers.start(t, TimerKind::OneShot, Some(&first), 5).unwrap();
        timers.tick();
        timers.tick();

        assert_eq!(
            timers.start(t, TimerKind::AutoReload, Some(&second), 9),
            Err(ErrorCode::BUSY)
        );
        assert_eq!(timers.kind(t), TimerKind::OneShot);
        assert_eq!(timers.timeout(t), 5);
        assert_eq!(timers.ticks(t), 2);

        // The original client is still the one that fires.
        for _ in 0..3 {
            timers.tick();
        }
        timers.dispatch();
        assert_eq!(first.calls.get(), 1);
        assert_eq!(second.calls.get(), 0);
    }

    #[test]
    fn start_rejects_unreachable_timeouts() {
        let timers = Registry::new();
        let t = timers.create_timer();
        assert_eq!(timers.start(t, TimerKind::OneShot, None, 0), Err(ErrorCode::INVAL));
        assert_eq!(
            timers.start(t, TimerKind::OneShot, None, MAX_TIMEOUT + 1),
            Err(ErrorCode::INVAL)
        );
        assert!(timers.is_idle(t));
        assert_eq!(timers.start(t, TimerKind::OneShot, None, MAX_TIMEOUT), Ok(()));
    }

    #[test]
    fn expired_but_undispatched_timer_is_still_busy() {
        let timers = Registry::new();
        let t = timers.create_timer();
        timers.start(t, TimerKind::OneShot, None, 1).unwrap();
        timers.tick();
        assert_eq!(timers.get_status(t), TimerStatus::Expired);
        assert_eq!(timers.start(t, TimerKind::OneShot, None, 3), Err(ErrorCode::BUSY));
    }

    #[test]
    fn stop_leaves_any_timer_idle() {
        let timers = Registry::new();
        let counter = Counter::new();
        let running = timers.create_timer();
        let expired = timers.create_timer();
        let never_started = timers.create_timer();
        timers.start(running, TimerKind::AutoReload, Some(&counter), 10).unwrap();
        timers.start(expired, TimerKind::OneShot, Some(&counter), 1).unwrap();
        timers.tick();

        for t in [running, expired, never_started] {
            timers.stop(t);
            assert!(timers.is_idle(t));
            assert_eq!(timers.ticks(t), IDLE);
            assert_eq!(timers.timeout(t), 0);
            assert!(timers.slots[t.index()].client.get().is_none());
            assert_eq!(timers.get_status(t), TimerStatus::NotExpired);
            // Idempotent.
            timers.stop(t);
            assert!(timers.is_idle(t));
        }

        // The expiry latched before the stop is gone.
        assert_eq!(timers.dispatch(), 0);
        assert_eq!(counter.calls.get(), 0);
    }

    #[test]
    fn restart_keeps_configuration() {
        let timers = Registry::new();
        let counter = Counter::new();
        let t = timers.create_timer();
        timers.start(t, TimerKind::AutoReload, Some(&counter), 4).unwrap();
        for _ in 0..4 {
            timers.tick();
        }
        assert_eq!(timers.get_status(t), TimerStatus::Expired);

        timers.restart(t);
        assert_eq!(timers.ticks(t), 0);
        assert_eq!(timers.get_status(t), TimerStatus::NotExpired);
        assert_eq!(timers.kind(t), TimerKind::AutoReload);
        assert_eq!(timers.timeout(t), 4);
        assert!(timers.slots[t.index()].client.get().is_some());

        // The cleared expiry is not dispatched.
        assert_eq!(timers.dispatch(), 0);
        assert_eq!(counter.calls.get(), 0);
    }

    #[test]
    fn restart_leaves_idle_timer_idle() {
        let timers = Registry::new();
        let t = timers.create_timer();
        timers.restart(t);
        assert!(timers.is_idle(t));
        assert!(!timers.is_busy(t));
        assert_eq!(timers.start(t, TimerKind::OneShot, None, 2), Ok(()));
    }

    #[test]
    fn stopped_timer_can_be_started_again() {
        let timers = Registry::new();
        let t = timers.create_timer();
        timers.start(t, TimerKind::OneShot, None, 10).unwrap();
        timers.stop(t);
        assert_eq!(timers.start(t, TimerKind::AutoReload, None, 3), Ok(()));
        assert_eq!(timers.kind(t), TimerKind::AutoReload);
    }

    #[test]
    fn init_forgets_allocations() {
        let timers = Registry::new();
        let t = timers.create_timer();
        timers.start(t, TimerKind::AutoReload, None, 2).unwrap();
        timers.tick();

        timers.init();
        assert_eq!(timers.timers_in_use(), 0);
        assert!(timers.slots.iter().all(|slot| slot.ticks() == IDLE));
        assert_eq!(timers.create_timer().index(), 0);
    }

    #[cfg(feature = "trace_timer_events")]
    #[test]
    fn lifecycle_events_are_traced() {
        let timers = Registry::new();
        crate::debug::capture::begin();
        let t = timers.create_timer();
        timers.start(t, TimerKind::OneShot, None, 5).unwrap();
        assert_eq!(
            timers.start(t, TimerKind::OneShot, None, 5),
            Err(ErrorCode::BUSY)
        );
        timers.restart(t);
        timers.stop(t);
        let lines = crate::debug::capture::end();
        assert_eq!(
            lines,
            [
                "timer 0: created (1 of 8)",
                "timer 0: started OneShot, timeout 5",
                "timer 0: start rejected, in use",
                "timer 0: restarted",
                "timer 0: stopped",
            ]
        );
    }

    #[cfg(not(feature = "trace_timer_events"))]
    #[test]
    fn lifecycle_is_silent_without_tracing() {
        let timers = Registry::new();
        crate::debug::capture::begin();
        let t = timers.create_timer();
        timers.start(t, TimerKind::OneShot, None, 5).unwrap();
        timers.restart(t);
        timers.stop(t);
        assert!(crate::debug::capture::end().is_empty());
    }
}
