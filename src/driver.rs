// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Hardware collaborator traits.
//!
//! Step lines and PWM outputs use the embedded-hal 1.0 traits directly
//! ([`embedded_hal::digital::StatefulOutputPin`] and [`embedded_hal::pwm::SetDutyCycle`]). The ADC
//! and the step timer have no suitable embedded-hal trait, so they are described here.

use crate::types::Channel;

/// Single-channel analog input with a split start / poll conversion.
pub trait AnalogInput {
    type Error: core::fmt::Debug;

    /// Route the converter to `channel`. Called once per channel at start-up.
    fn configure(&mut self, channel: Channel);

    /// Select `channel` and start a fresh conversion.
    fn start(&mut self, channel: Channel);

    /// Result of the conversion started last, or `WouldBlock` while it is still running.
    fn poll(&mut self) -> nb::Result<u16, Self::Error>;

    /// Drop a conversion that was given up on, so its late result is never returned for the
    /// next channel.
    fn abort(&mut self) {}
}

/// Periodic timer driving the step scheduler.
pub trait StepTimer {
    /// Load the next expiry `ticks` timer ticks from now.
    fn arm(&mut self, ticks: u16);

    /// Mask the expiry interrupt.
    fn disable_expiry(&mut self);

    /// Unmask the expiry interrupt.
    fn enable_expiry(&mut self);

    /// Clear the pending expiry flag.
    fn acknowledge(&mut self);

    /// Stop the counter. Nothing expires until the timer is armed again.
    fn disarm(&mut self);
}
