// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error conditions surfaced by the control core.

use crate::types::{Channel, DutyChannel};

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The ADC did not report end-of-conversion within the poll budget.
    #[error("conversion on {channel:?} timed out")]
    ConversionTimeout { channel: Channel },

    /// The ADC driver reported a hardware error.
    #[error("analog input fault on {channel:?}")]
    Sensor { channel: Channel },

    /// A step period of zero ticks was configured.
    #[error("step rate must be a non-zero tick count")]
    InvalidStepRate,

    /// Configuration values are inconsistent with each other.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// The PWM driver rejected a duty update.
    #[error("pwm fault on {channel:?}")]
    Pwm { channel: DutyChannel },
}

impl Error {
    /// Whether the foreground loop can skip this iteration and carry on.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::ConversionTimeout { .. } | Error::Sensor { .. })
    }
}
