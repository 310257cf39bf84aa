// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Foreground control loop.
//!
//! One iteration samples all three channels, runs the engine and writes the new duties to the two
//! PWM outputs. Step intents and the step rate are only published through [`SharedState`]; the
//! step timer interrupt picks them up at its own pace.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut follower = LineFollower::new(adc, pwm1, pwm2, ControlConfig::default())?;
//! follower.init(&SHARED)?;
//! scheduler.start(&SHARED);
//! follower.run(&SHARED, |_| {})?;
//! ```

use embedded_hal::pwm::SetDutyCycle;

use crate::config::ControlConfig;
use crate::driver::AnalogInput;
use crate::engine::{Decision, Engine};
use crate::error::Error;
use crate::sampler::Sampler;
use crate::shared::SharedState;
use crate::types::{DutyChannel, MotorDuty, StepRate};

pub struct LineFollower<A, P1, P2> {
    sampler: Sampler<A>,
    engine: Engine,
    pwm1: P1,
    pwm2: P2,
    initial_rate: StepRate,
}

impl<A, P1, P2> LineFollower<A, P1, P2>
where
    A: AnalogInput,
    P1: SetDutyCycle,
    P2: SetDutyCycle,
{
    /// Validate `config` and assemble the loop. Nothing is driven until [`init`](Self::init).
    pub fn new(adc: A, pwm1: P1, pwm2: P2, config: ControlConfig) -> Result<Self, Error> {
        let initial_rate = config.validate()?;
        Ok(Self {
            sampler: Sampler::new(adc, config.adc_poll_budget),
            engine: Engine::new(config),
            pwm1,
            pwm2,
            initial_rate,
        })
    }

    /// Release the drivers.
    pub fn free(self) -> (A, P1, P2) {
        (self.sampler.free(), self.pwm1, self.pwm2)
    }

    #[inline]
    pub fn config(&self) -> &ControlConfig {
        self.engine.config()
    }

    /// Load the start-up step rate and switch both motors off.
    pub fn init(&mut self, shared: &SharedState) -> Result<(), Error> {
        shared.set_step_rate(self.initial_rate);
        self.stop(shared)
    }

    /// Drive both motors to the "off" duty.
    pub fn stop(&mut self, shared: &SharedState) -> Result<(), Error> {
        for channel in DutyChannel::ALL {
            shared.set_duty(channel, MotorDuty::OFF);
        }
        self.drive([MotorDuty::OFF; 2])
    }

    /// Write duties to the PWM outputs, rescaled to each output's range.
    fn drive(&mut self, duties: [MotorDuty; 2]) -> Result<(), Error> {
        let d1 = duties[0].scaled_to(self.pwm1.max_duty_cycle());
        self.pwm1.set_duty_cycle(d1).map_err(|_| Error::Pwm {
            channel: DutyChannel::Motor1,
        })?;

        let d2 = duties[1].scaled_to(self.pwm2.max_duty_cycle());
        self.pwm2.set_duty_cycle(d2).map_err(|_| Error::Pwm {
            channel: DutyChannel::Motor2,
        })?;

        Ok(())
    }

    /// Run one sample / decide / drive pass.
    pub fn iterate(&mut self, shared: &SharedState) -> Result<Decision, Error> {
        let samples = match self.sampler.sample_all() {
            Ok(samples) => samples,
            Err(e) => {
                if matches!(e, Error::ConversionTimeout { .. }) {
                    shared.count_timeout();
                }
                return Err(e);
            }
        };

        let decision = self.engine.update(&samples, shared);
        self.drive(decision.duties)?;
        shared.count_iteration();

        Ok(decision)
    }

    /// Iterate until a shutdown is requested, then switch the motors off.
    ///
    /// `observe` sees the result of every iteration. Recoverable errors skip the iteration;
    /// anything else stops the motors and is returned.
    pub fn run<F>(&mut self, shared: &SharedState, mut observe: F) -> Result<(), Error>
    where
        F: FnMut(&Result<Decision, Error>),
    {
        while !shared.shutdown_requested() {
            let result = self.iterate(shared);
            observe(&result);

            if let Err(e) = result {
                if !e.is_recoverable() {
                    // keep the first error
                    let _ = self.stop(shared);
                    return Err(e);
                }
            }
        }

        self.stop(shared)
    }
}
