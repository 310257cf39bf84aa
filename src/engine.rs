// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Steering decision and duty scaling.
//!
//! The steering rule is a bang-bang comparator, not a proportional controller:
//!
//! ```text
//! left  > T  -> step the right wheel
//! right < T  -> step the left wheel   (only checked when the first rule did not fire)
//! otherwise  -> balanced, no step this iteration
//! ```
//!
//! The two comparisons look at different signals and can both be true; the first one wins.

use crate::config::{ControlConfig, ADC_MAX};
use crate::shared::SharedState;
use crate::types::{Axis, DutyChannel, MotorDuty, Samples, StepRate};

/// Outcome of one steering decision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Steering {
    /// Neither rule fired. No intent is set.
    Balanced = 0,
    /// Left sensor above threshold.
    StepRight = 1,
    /// Right sensor below threshold.
    StepLeft = 2,
}

impl Steering {
    /// Axis to request a step on, if any.
    #[inline]
    pub fn axis(self) -> Option<Axis> {
        match self {
            Steering::Balanced => None,
            Steering::StepRight => Some(Axis::Right),
            Steering::StepLeft => Some(Axis::Left),
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Steering::StepRight,
            2 => Steering::StepLeft,
            _ => Steering::Balanced,
        }
    }
}

/// Pure steering rule.
#[inline]
pub fn steer(left: u16, right: u16, threshold: u16) -> Steering {
    if left > threshold {
        Steering::StepRight
    } else if right < threshold {
        Steering::StepLeft
    } else {
        Steering::Balanced
    }
}

/// Map a setpoint sample onto a step period: full scale gives `min` ticks (fastest), zero gives
/// `max` ticks (slowest), linear in between. Never returns zero ticks.
pub fn step_rate_for_setpoint(raw: u16, min: u16, max: u16) -> StepRate {
    let min = min.max(1);
    let max = max.max(min);

    let raw = u32::from(raw.min(ADC_MAX));
    let span = u32::from(max - min);
    let ticks = u32::from(max) - raw * span / u32::from(ADC_MAX);
    // ticks is within [min, max] and min >= 1
    StepRate::new(ticks as u16).unwrap_or(StepRate::MAX)
}

/// Everything one engine pass produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Decision {
    pub steering: Steering,
    pub duties: [MotorDuty; 2],
    pub step_rate: StepRate,
}

/// Decision/scaling engine. Sole writer of step intents, step rate and duties.
pub struct Engine {
    config: ControlConfig,
}

impl Engine {
    pub fn new(config: ControlConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Run the steering rule and post the resulting intent.
    ///
    /// Touches nothing but the intent of the chosen axis.
    pub fn decide(&self, left: u16, right: u16, shared: &SharedState) -> Steering {
        let steering = steer(left, right, self.config.threshold);
        if let Some(axis) = steering.axis() {
            shared.request_step(axis);
        }
        shared.record_steering(steering);
        steering
    }

    /// Scale both sensor samples to active-low duties and publish them.
    pub fn scale(&self, samples: &Samples, shared: &SharedState) -> [MotorDuty; 2] {
        let duties = [
            MotorDuty::from_sample(samples.left.raw()),
            MotorDuty::from_sample(samples.right.raw()),
        ];
        for (channel, duty) in DutyChannel::ALL.into_iter().zip(duties) {
            shared.set_duty(channel, duty);
        }
        duties
    }

    /// Publish the step period requested by the setpoint, when tracking is enabled.
    pub fn track_setpoint(&self, setpoint: u16, shared: &SharedState) -> StepRate {
        if self.config.setpoint_tracking {
            let rate = step_rate_for_setpoint(
                setpoint,
                self.config.min_step_period,
                self.config.max_step_period,
            );
            shared.set_step_rate(rate);
        }
        shared.step_rate()
    }

    /// One full engine pass over a set of samples.
    pub fn update(&self, samples: &Samples, shared: &SharedState) -> Decision {
        let duties = self.scale(samples, shared);
        let steering = self.decide(samples.left.raw(), samples.right.raw(), shared);
        let step_rate = self.track_setpoint(samples.setpoint.raw(), shared);
        Decision {
            steering,
            duties,
            step_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STEER_THRESHOLD;
    use crate::types::{Channel, SensorSample};

    fn engine() -> Engine {
        Engine::new(ControlConfig::default())
    }

    fn samples(setpoint: u16, left: u16, right: u16) -> Samples {
        Samples {
            setpoint: SensorSample::new(Channel::Setpoint, setpoint),
            left: SensorSample::new(Channel::LeftSensor, left),
            right: SensorSample::new(Channel::RightSensor, right),
        }
    }

    #[test]
    fn left_over_threshold_steps_right() {
        let shared = SharedState::new();
        shared.set_duty(DutyChannel::Motor1, MotorDuty::from_raw(0x1234));
        let rate_before = shared.step_rate();

        let steering = engine().decide(2500, 1800, &shared);

        assert_eq!(steering, Steering::StepRight);
        assert!(shared.step_requested(Axis::Right));
        assert!(!shared.step_requested(Axis::Left));
        assert_eq!(shared.step_rate(), rate_before);
        assert_eq!(shared.duty(DutyChannel::Motor1).value(), 0x1234);
        assert!(shared.duty(DutyChannel::Motor2).is_off());
    }

    #[test]
    fn right_under_threshold_steps_left() {
        let shared = SharedState::new();
        assert_eq!(engine().decide(1900, 1700, &shared), Steering::StepLeft);
        assert!(shared.step_requested(Axis::Left));
        assert!(!shared.step_requested(Axis::Right));
    }

    #[test]
    fn balanced_sets_nothing() {
        let shared = SharedState::new();
        assert_eq!(engine().decide(1900, 2100, &shared), Steering::Balanced);
        assert!(!shared.step_requested(Axis::Left));
        assert!(!shared.step_requested(Axis::Right));
        assert_eq!(shared.last_steering(), Steering::Balanced);
    }

    #[test]
    fn first_rule_wins_when_both_hold() {
        // left > T and right < T at the same time
        assert_eq!(steer(3000, 100, STEER_THRESHOLD), Steering::StepRight);
    }

    #[test]
    fn threshold_is_exclusive_on_both_sides() {
        assert_eq!(steer(2000, 2000, 2000), Steering::Balanced);
        assert_eq!(steer(2001, 2000, 2000), Steering::StepRight);
        assert_eq!(steer(2000, 1999, 2000), Steering::StepLeft);
    }

    #[test]
    fn custom_threshold_is_used() {
        let shared = SharedState::new();
        let engine = Engine::new(ControlConfig::new().with_threshold(3000));
        assert_eq!(engine.decide(2500, 3500, &shared), Steering::Balanced);
    }

    #[test]
    fn scale_publishes_inverted_duties() {
        let shared = SharedState::new();
        let duties = engine().scale(&samples(0, 0, 4095), &shared);
        assert_eq!(duties[0].value(), 0xFFFF);
        assert_eq!(duties[1].value(), !(4095u16 << 4));
        assert_eq!(shared.duty(DutyChannel::Motor1), duties[0]);
        assert_eq!(shared.duty(DutyChannel::Motor2), duties[1]);
    }

    #[test]
    fn setpoint_maps_linearly_onto_period() {
        assert_eq!(step_rate_for_setpoint(0, 500, 0xFFFF).ticks(), 0xFFFF);
        assert_eq!(step_rate_for_setpoint(4095, 500, 0xFFFF).ticks(), 500);
        let mid = step_rate_for_setpoint(2048, 500, 0xFFFF).ticks();
        assert!(mid > 500 && mid < 0xFFFF);
        // degenerate limits never yield zero
        assert_eq!(step_rate_for_setpoint(4095, 0, 0).ticks(), 1);
    }

    #[test]
    fn tracking_can_be_disabled() {
        let shared = SharedState::new();
        let engine = Engine::new(ControlConfig::new().with_setpoint_tracking(false));
        let decision = engine.update(&samples(4095, 0, 0), &shared);
        assert_eq!(decision.step_rate, StepRate::MAX);
        assert_eq!(shared.step_rate(), StepRate::MAX);
    }

    #[test]
    fn update_runs_every_stage() {
        let shared = SharedState::new();
        let d = engine().update(&samples(4095, 2500, 1800), &shared);
        assert_eq!(d.steering, Steering::StepRight);
        assert_eq!(d.step_rate.ticks(), 500);
        assert_eq!(shared.step_rate().ticks(), 500);
        assert_eq!(d.duties[0], MotorDuty::from_sample(2500));
    }
}
