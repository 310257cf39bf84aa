// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Value types passed between the sampler, the engine and the step scheduler.

use core::num::NonZeroU16;

use crate::config::{ADC_MAX, DUTY_OFF, DUTY_SCALE_SHIFT};
use crate::error::Error;

/// Logical analog input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Speed trimpot.
    Setpoint,
    /// Left phototransistor of the line sensor.
    LeftSensor,
    /// Right phototransistor of the line sensor.
    RightSensor,
}

impl Channel {
    /// Order in which the sampler reads the channels each iteration.
    pub const ALL: [Channel; 3] = [Channel::Setpoint, Channel::LeftSensor, Channel::RightSensor];
}

/// Stepper axis (one per wheel).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Left,
    Right,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Left, Axis::Right];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Axis::Left => 0,
            Axis::Right => 1,
        }
    }
}

/// DC motor PWM output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DutyChannel {
    /// Driven from the left sensor sample.
    Motor1,
    /// Driven from the right sensor sample.
    Motor2,
}

impl DutyChannel {
    pub const ALL: [DutyChannel; 2] = [DutyChannel::Motor1, DutyChannel::Motor2];

    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            DutyChannel::Motor1 => 0,
            DutyChannel::Motor2 => 1,
        }
    }
}

/// One ADC conversion result.
///
/// The magnitude is clamped to the 12-bit range on construction, so anything downstream can rely
/// on `raw() <= ADC_MAX`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SensorSample {
    channel: Channel,
    raw: u16,
}

impl SensorSample {
    pub fn new(channel: Channel, raw: u16) -> Self {
        Self {
            channel,
            raw: raw.min(ADC_MAX),
        }
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    #[inline]
    pub fn raw(&self) -> u16 {
        self.raw
    }
}

/// The three samples taken in one foreground iteration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Samples {
    pub setpoint: SensorSample,
    pub left: SensorSample,
    pub right: SensorSample,
}

/// Timer ticks between two step-scheduler expiries. Never zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct StepRate(NonZeroU16);

impl StepRate {
    /// Slowest rate the 16-bit timer can express.
    pub const MAX: StepRate = StepRate(NonZeroU16::MAX);

    /// Build a step rate, rejecting a zero period.
    pub fn new(ticks: u16) -> Result<Self, Error> {
        NonZeroU16::new(ticks)
            .map(StepRate)
            .ok_or(Error::InvalidStepRate)
    }

    #[inline]
    pub fn ticks(&self) -> u16 {
        self.0.get()
    }
}

/// PWM compare value in actuator units, active-low: [`DUTY_OFF`] is 0% power, 0 is 100%.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MotorDuty(u16);

impl MotorDuty {
    /// Motor fully off under the active-low convention.
    pub const OFF: MotorDuty = MotorDuty(DUTY_OFF);

    /// Scale a 12-bit sample to the 16-bit actuator word and invert it.
    ///
    /// Samples wider than 12 bits are clamped first, otherwise the shift would drop the top bits
    /// and the complement would land far from the intended ratio.
    #[inline]
    pub fn from_sample(raw: u16) -> Self {
        let raw = raw.min(ADC_MAX);
        MotorDuty(!(raw << DUTY_SCALE_SHIFT))
    }

    #[inline]
    pub const fn from_raw(value: u16) -> Self {
        MotorDuty(value)
    }

    #[inline]
    pub fn value(&self) -> u16 {
        self.0
    }

    #[inline]
    pub fn is_off(&self) -> bool {
        self.0 == DUTY_OFF
    }

    /// Rescale to an output whose full scale is `max`, keeping the ratio and the active-low
    /// polarity ([`MotorDuty::OFF`] maps to `max`).
    #[inline]
    pub fn scaled_to(&self, max: u16) -> u16 {
        (u32::from(self.0) * u32::from(max) / u32::from(DUTY_OFF)) as u16
    }
}
