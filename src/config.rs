// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Tuning constants and the validated controller configuration.
//!
//! Every number the control logic depends on is named here so that it can be tuned and tested on
//! its own. Board wiring (ADC channel numbers, timer prescaler) lives in the firmware crate.

use crate::error::Error;
use crate::types::StepRate;

/// ADC resolution in bits.
pub const ADC_BITS: u32 = 12;

/// Largest value a 12-bit conversion can return.
pub const ADC_MAX: u16 = (1 << ADC_BITS) - 1;

/// Line sensor threshold on the 0..=4095 scale.
pub const STEER_THRESHOLD: u16 = 2000;

/// Left shift taking a 12-bit sample to the 16-bit PWM compare range (x16).
pub const DUTY_SCALE_SHIFT: u32 = 4;

/// Full-scale PWM compare value. Active-low, so this is "motor off".
pub const DUTY_OFF: u16 = 0xFFFF;

/// Step period loaded at start-up, in timer ticks.
pub const DEFAULT_STEP_PERIOD: u16 = 0xFFFF;

/// Shortest step period the setpoint can request, in timer ticks.
pub const MIN_STEP_PERIOD: u16 = 500;

/// Longest step period the setpoint can request, in timer ticks.
pub const MAX_STEP_PERIOD: u16 = 0xFFFF;

/// Shortest period a 16-bit auto-reload timer can arm exactly (reload value `ticks - 1 >= 1`).
pub const MIN_TIMER_PERIOD: u16 = 2;

/// Number of end-of-conversion polls before a read is declared timed out.
pub const ADC_POLL_BUDGET: u32 = 10_000;

/// Foreground iterations between two telemetry lines on the debug terminal.
pub const TELEMETRY_INTERVAL: u32 = 500;

/// Controller configuration.
///
/// Built with [`ControlConfig::new`] and the `with_*` methods, then checked once with
/// [`ControlConfig::validate`] before anything is armed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ControlConfig {
    /// Line sensor threshold.
    pub threshold: u16,

    /// Step period used until the first setpoint sample arrives.
    pub initial_step_period: u16,

    /// Setpoint mapping bounds (ticks).
    pub min_step_period: u16,
    pub max_step_period: u16,

    /// When false the step period stays at `initial_step_period`.
    pub setpoint_tracking: bool,

    /// Poll budget per ADC conversion.
    pub adc_poll_budget: u32,
}

impl ControlConfig {
    pub const fn new() -> Self {
        Self {
            threshold: STEER_THRESHOLD,
            initial_step_period: DEFAULT_STEP_PERIOD,
            min_step_period: MIN_STEP_PERIOD,
            max_step_period: MAX_STEP_PERIOD,
            setpoint_tracking: true,
            adc_poll_budget: ADC_POLL_BUDGET,
        }
    }

    /// Set the line sensor threshold.
    pub fn with_threshold(mut self, threshold: u16) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the start-up step period.
    pub fn with_initial_step_period(mut self, ticks: u16) -> Self {
        self.initial_step_period = ticks;
        self
    }

    /// Set the bounds of the setpoint to step period mapping.
    pub fn with_step_period_limits(mut self, min: u16, max: u16) -> Self {
        self.min_step_period = min;
        self.max_step_period = max;
        self
    }

    /// Enable or disable driving the step period from the setpoint trimpot.
    pub fn with_setpoint_tracking(mut self, enabled: bool) -> Self {
        self.setpoint_tracking = enabled;
        self
    }

    /// Set the ADC poll budget.
    pub fn with_adc_poll_budget(mut self, polls: u32) -> Self {
        self.adc_poll_budget = polls;
        self
    }

    /// Check the configuration and return the start-up step rate.
    pub fn validate(&self) -> Result<StepRate, Error> {
        if self.min_step_period < MIN_TIMER_PERIOD || self.initial_step_period < MIN_TIMER_PERIOD {
            return Err(Error::InvalidStepRate);
        }
        if self.min_step_period > self.max_step_period {
            return Err(Error::InvalidConfig("min step period above max"));
        }
        if self.threshold > ADC_MAX {
            return Err(Error::InvalidConfig("threshold outside 12-bit range"));
        }
        if self.adc_poll_budget == 0 {
            return Err(Error::InvalidConfig("adc poll budget is zero"));
        }
        StepRate::new(self.initial_step_period)
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self::new()
    }
}
