// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Blocking ADC sampler with a bounded wait.
//!
//! Each read starts a fresh conversion and spins on end-of-conversion. Unlike a bare
//! `while !done {}` loop the spin is limited to `poll_budget` polls, after which the read fails with
//! [`Error::ConversionTimeout`] so a dead converter cannot stall the foreground loop.

use crate::driver::AnalogInput;
use crate::error::Error;
use crate::types::{Channel, SensorSample, Samples};

pub struct Sampler<A> {
    adc: A,
    poll_budget: u32,
}

impl<A: AnalogInput> Sampler<A> {
    /// Wrap an ADC driver and route it to every logical channel once.
    pub fn new(mut adc: A, poll_budget: u32) -> Self {
        for channel in Channel::ALL {
            adc.configure(channel);
        }
        Self { adc, poll_budget }
    }

    /// Release the ADC driver.
    pub fn free(self) -> A {
        self.adc
    }

    /// Convert one channel.
    ///
    /// A failed or timed-out conversion is aborted before returning.
    pub fn sample(&mut self, channel: Channel) -> Result<SensorSample, Error> {
        self.adc.start(channel);

        for _ in 0..self.poll_budget {
            match self.adc.poll() {
                Ok(raw) => return Ok(SensorSample::new(channel, raw)),
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(_)) => {
                    self.adc.abort();
                    return Err(Error::Sensor { channel });
                }
            }
        }

        self.adc.abort();
        Err(Error::ConversionTimeout { channel })
    }

    /// Convert setpoint, left and right in that order.
    pub fn sample_all(&mut self) -> Result<Samples, Error> {
        Ok(Samples {
            setpoint: self.sample(Channel::Setpoint)?,
            left: self.sample(Channel::LeftSensor)?,
            right: self.sample(Channel::RightSensor)?,
        })
    }
}
