// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Counters snapshot for the debug terminal.
//!
//! Formatting goes through `core::fmt`, so the firmware can `writeln!` a snapshot straight into
//! its USART.

use core::fmt;

use crate::engine::Steering;
use crate::shared::SharedState;
use crate::types::{Axis, DutyChannel};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub iterations: u32,
    pub expiries: u32,
    pub toggles: u32,
    pub skipped_toggles: u32,
    pub timeouts: u32,
    pub step_rate: u16,
    pub duties: [u16; 2],
    pub step_levels: [bool; 2],
    pub steering: Steering,
}

impl Snapshot {
    /// Read every counter once. Fields may come from different expiries.
    pub fn capture(shared: &SharedState) -> Self {
        Self {
            iterations: shared.iterations(),
            expiries: shared.expiries(),
            toggles: shared.toggles(),
            skipped_toggles: shared.skipped_toggles(),
            timeouts: shared.timeouts(),
            step_rate: shared.step_rate().ticks(),
            duties: DutyChannel::ALL.map(|ch| shared.duty(ch).value()),
            step_levels: Axis::ALL.map(|axis| shared.step_level(axis)),
            steering: shared.last_steering(),
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steering = match self.steering {
            Steering::Balanced => "bal",
            Steering::StepLeft => "left",
            Steering::StepRight => "right",
        };
        write!(
            f,
            "it={} exp={} tog={} skip={} tmo={} rate={} pwm=0x{:04X}/0x{:04X} step={}{} steer={}",
            self.iterations,
            self.expiries,
            self.toggles,
            self.skipped_toggles,
            self.timeouts,
            self.step_rate,
            self.duties[0],
            self.duties[1],
            self.step_levels[0] as u8,
            self.step_levels[1] as u8,
            steering,
        )
    }
}
