// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! State shared between the foreground loop and the step timer interrupt.
//!
//! Every field is a single machine word accessed with `SeqCst`, so a write on one side is visible
//! to the very next read on the other without masking interrupts. Ownership of each field:
//!
//! | Field | Writer | Reader |
//! | ----- | ------ | ------ |
//! | step intents | engine sets, scheduler clears | scheduler |
//! | step rate | engine | scheduler |
//! | duties | engine | foreground drive stage, telemetry |
//! | step levels | scheduler | telemetry |
//! | shutdown | anyone | both |
//! | counters | the side named in the accessor | telemetry |
//!
//! A step intent is a single-slot mailbox: a second request before the scheduler consumes the
//! first overwrites it, it does not queue another step.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering::SeqCst};

use crate::config::{DEFAULT_STEP_PERIOD, DUTY_OFF};
use crate::engine::Steering;
use crate::types::{Axis, DutyChannel, MotorDuty, StepRate};

pub struct SharedState {
    intents: [AtomicBool; 2],
    step_rate: AtomicU16,
    duties: [AtomicU16; 2],
    step_levels: [AtomicBool; 2],
    shutdown: AtomicBool,
    steering: AtomicU8,

    expiries: AtomicU32,
    toggles: AtomicU32,
    skipped_toggles: AtomicU32,
    iterations: AtomicU32,
    timeouts: AtomicU32,
}

impl SharedState {
    /// Start-up state: no intents, default step period, motors off.
    pub const fn new() -> Self {
        Self {
            intents: [AtomicBool::new(false), AtomicBool::new(false)],
            step_rate: AtomicU16::new(DEFAULT_STEP_PERIOD),
            duties: [AtomicU16::new(DUTY_OFF), AtomicU16::new(DUTY_OFF)],
            step_levels: [AtomicBool::new(false), AtomicBool::new(false)],
            shutdown: AtomicBool::new(false),
            steering: AtomicU8::new(Steering::Balanced as u8),

            expiries: AtomicU32::new(0),
            toggles: AtomicU32::new(0),
            skipped_toggles: AtomicU32::new(0),
            iterations: AtomicU32::new(0),
            timeouts: AtomicU32::new(0),
        }
    }

    // ----- step intents -----

    /// Ask for `axis` to step on the next expiry.
    #[inline]
    pub fn request_step(&self, axis: Axis) {
        self.intents[axis.index()].store(true, SeqCst);
    }

    /// Consume the intent for `axis`, leaving it cleared. Returns whether it was set.
    #[inline]
    pub fn take_step(&self, axis: Axis) -> bool {
        self.intents[axis.index()].swap(false, SeqCst)
    }

    #[inline]
    pub fn step_requested(&self, axis: Axis) -> bool {
        self.intents[axis.index()].load(SeqCst)
    }

    // ----- step rate -----

    #[inline]
    pub fn set_step_rate(&self, rate: StepRate) {
        self.step_rate.store(rate.ticks(), SeqCst);
    }

    /// Current step period. The stored value is only ever written from a [`StepRate`], so it is
    /// never zero; the fallback is for a state that was never initialised through this type.
    #[inline]
    pub fn step_rate(&self) -> StepRate {
        StepRate::new(self.step_rate.load(SeqCst)).unwrap_or(StepRate::MAX)
    }

    // ----- duties -----

    #[inline]
    pub fn set_duty(&self, channel: DutyChannel, duty: MotorDuty) {
        self.duties[channel.index()].store(duty.value(), SeqCst);
    }

    #[inline]
    pub fn duty(&self, channel: DutyChannel) -> MotorDuty {
        MotorDuty::from_raw(self.duties[channel.index()].load(SeqCst))
    }

    // ----- step output levels -----

    #[inline]
    pub(crate) fn record_step_level(&self, axis: Axis, high: bool) {
        self.step_levels[axis.index()].store(high, SeqCst);
    }

    /// Last level the scheduler drove on the step line of `axis`.
    #[inline]
    pub fn step_level(&self, axis: Axis) -> bool {
        self.step_levels[axis.index()].load(SeqCst)
    }

    // ----- steering -----

    #[inline]
    pub(crate) fn record_steering(&self, steering: Steering) {
        self.steering.store(steering as u8, SeqCst);
    }

    /// Outcome of the most recent steering decision.
    #[inline]
    pub fn last_steering(&self) -> Steering {
        Steering::from_u8(self.steering.load(SeqCst))
    }

    // ----- shutdown -----

    /// Ask the foreground loop to return and the scheduler to disarm its timer.
    #[inline]
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, SeqCst);
    }

    #[inline]
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(SeqCst)
    }

    // ----- counters -----

    #[inline]
    pub(crate) fn count_expiry(&self) {
        self.expiries.fetch_add(1, SeqCst);
    }

    #[inline]
    pub(crate) fn count_toggle(&self) {
        self.toggles.fetch_add(1, SeqCst);
    }

    #[inline]
    pub(crate) fn count_skipped_toggle(&self) {
        self.skipped_toggles.fetch_add(1, SeqCst);
    }

    #[inline]
    pub(crate) fn count_iteration(&self) {
        self.iterations.fetch_add(1, SeqCst);
    }

    #[inline]
    pub(crate) fn count_timeout(&self) {
        self.timeouts.fetch_add(1, SeqCst);
    }

    pub fn expiries(&self) -> u32 {
        self.expiries.load(SeqCst)
    }

    pub fn toggles(&self) -> u32 {
        self.toggles.load(SeqCst)
    }

    pub fn skipped_toggles(&self) -> u32 {
        self.skipped_toggles.load(SeqCst)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations.load(SeqCst)
    }

    pub fn timeouts(&self) -> u32 {
        self.timeouts.load(SeqCst)
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_motors_off() {
        let shared = SharedState::new();
        for axis in Axis::ALL {
            assert!(!shared.step_requested(axis));
            assert!(!shared.step_level(axis));
        }
        for ch in DutyChannel::ALL {
            assert!(shared.duty(ch).is_off());
        }
        assert_eq!(shared.step_rate().ticks(), DEFAULT_STEP_PERIOD);
        assert!(!shared.shutdown_requested());
    }

    #[test]
    fn intent_is_a_single_slot() {
        let shared = SharedState::new();
        shared.request_step(Axis::Left);
        shared.request_step(Axis::Left);

        assert!(shared.take_step(Axis::Left));
        assert!(!shared.take_step(Axis::Left));
        assert!(!shared.take_step(Axis::Right));
    }

    #[test]
    fn step_rate_round_trips() {
        let shared = SharedState::new();
        shared.set_step_rate(StepRate::new(1234).unwrap());
        assert_eq!(shared.step_rate().ticks(), 1234);
    }

    #[test]
    fn every_request_is_delivered_exactly_once() {
        use std::sync::Arc;
        use std::thread;

        const REQUESTS: u32 = 1_000;

        let shared = Arc::new(SharedState::new());
        let writer = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for _ in 0..REQUESTS {
                    shared.request_step(Axis::Right);
                    // next request only once this one was taken
                    while shared.step_requested(Axis::Right) {
                        thread::yield_now();
                    }
                }
            })
        };

        let mut consumed = 0u32;
        while consumed < REQUESTS {
            if shared.take_step(Axis::Right) {
                consumed += 1;
            } else {
                thread::yield_now();
            }
        }
        writer.join().unwrap();

        assert_eq!(consumed, REQUESTS);
        assert!(!shared.take_step(Axis::Right));
        assert!(!shared.step_requested(Axis::Left));
    }
}
