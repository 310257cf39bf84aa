// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Step scheduler run from the step timer interrupt.
//!
//! Each axis is a two-state machine:
//!
//! ```text
//!          engine: request_step           scheduler: toggle + clear
//!   Idle ------------------------> StepRequested ------------------------> Idle
//! ```
//!
//! Every expiry toggles the step line of each requested axis. The driver steps on the rising edge
//! only, so two expiries make one physical step and the motor runs at half the expiry rate.
//!
//! The handler never waits on hardware. A step line that reports an error is left alone for this
//! expiry and the intent is dropped like any other.

use embedded_hal::digital::StatefulOutputPin;

use crate::driver::StepTimer;
use crate::shared::SharedState;
use crate::types::{Axis, StepRate};

/// Per-axis scheduler state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisState {
    Idle,
    StepRequested,
}

impl AxisState {
    #[inline]
    pub fn from_intent(requested: bool) -> Self {
        if requested {
            AxisState::StepRequested
        } else {
            AxisState::Idle
        }
    }
}

/// Transition taken on a timer expiry: the next state and whether the step line is toggled.
///
/// Both states end up `Idle`; only `StepRequested` toggles.
#[inline]
pub fn on_expiry(state: AxisState) -> (AxisState, bool) {
    match state {
        AxisState::Idle => (AxisState::Idle, false),
        AxisState::StepRequested => (AxisState::Idle, true),
    }
}

/// What happened to one axis during an expiry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisOutcome {
    /// No step was requested.
    Idle,
    /// The step line was toggled and is now at `high`.
    Toggled { high: bool },
    /// A step was requested but the output reported an error.
    Skipped,
}

/// Result of one scheduler invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Expiry {
    pub left: AxisOutcome,
    pub right: AxisOutcome,
    /// Period the timer was rearmed with, `None` after a shutdown disarm.
    pub rearmed: Option<StepRate>,
}

/// Invert the current level of `pin`. Returns the new level.
fn toggle<P: StatefulOutputPin>(pin: &mut P) -> Result<bool, P::Error> {
    let high = pin.is_set_high()?;
    if high {
        pin.set_low()?;
    } else {
        pin.set_high()?;
    }
    Ok(!high)
}

fn service_axis<P>(pin: &mut P, axis: Axis, shared: &SharedState) -> AxisOutcome
where
    P: StatefulOutputPin,
{
    let state = AxisState::from_intent(shared.take_step(axis));
    let (_, toggle_line) = on_expiry(state);
    if !toggle_line {
        return AxisOutcome::Idle;
    }

    match toggle(pin) {
        Ok(high) => {
            shared.record_step_level(axis, high);
            shared.count_toggle();
            AxisOutcome::Toggled { high }
        }
        Err(_) => {
            shared.count_skipped_toggle();
            AxisOutcome::Skipped
        }
    }
}

/// Owns the step timer and both step lines.
pub struct StepScheduler<T, L, R> {
    timer: T,
    left_step: L,
    right_step: R,
    armed: bool,
}

impl<T, L, R> StepScheduler<T, L, R>
where
    T: StepTimer,
    L: StatefulOutputPin,
    R: StatefulOutputPin,
{
    pub fn new(timer: T, left_step: L, right_step: R) -> Self {
        Self {
            timer,
            left_step,
            right_step,
            armed: false,
        }
    }

    /// Release the timer and step lines.
    pub fn free(self) -> (T, L, R) {
        (self.timer, self.left_step, self.right_step)
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Arm the first expiry with the current step rate and unmask the interrupt.
    pub fn start(&mut self, shared: &SharedState) {
        self.timer.arm(shared.step_rate().ticks());
        self.timer.acknowledge();
        self.timer.enable_expiry();
        self.armed = true;
    }

    /// Stop the timer. No further expiries until [`start`](Self::start).
    pub fn disarm(&mut self) {
        self.timer.disable_expiry();
        self.timer.disarm();
        self.timer.acknowledge();
        self.armed = false;
    }

    /// Timer expiry handler.
    pub fn on_expiry(&mut self, shared: &SharedState) -> Expiry {
        self.timer.disable_expiry();
        shared.count_expiry();

        let left = service_axis(&mut self.left_step, Axis::Left, shared);
        let right = service_axis(&mut self.right_step, Axis::Right, shared);

        if shared.shutdown_requested() {
            self.timer.disarm();
            self.timer.acknowledge();
            self.armed = false;
            return Expiry {
                left,
                right,
                rearmed: None,
            };
        }

        let rate = shared.step_rate();
        self.timer.arm(rate.ticks());
        self.timer.acknowledge();
        self.timer.enable_expiry();

        Expiry {
            left,
            right,
            rearmed: Some(rate),
        }
    }
}
