// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Line Tracking Control Core
//!
//! Hardware-independent control core for a differential-drive line follower. Two photo sensors
//! and a speed trimpot are sampled every loop iteration; the result is turned into per-wheel step
//! requests for two stepper motors and active-low PWM duties for two DC motors.
//!
//! The stepper axes are driven from a timer interrupt that toggles each requested step line and
//! rearms itself with the current step period. The foreground loop and the interrupt only talk
//! through the single-word atomics in [`shared::SharedState`].
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`config`] | Named tuning constants and the validated [`ControlConfig`] |
//! | [`types`] | Channels, axes, samples, step rate and duty newtypes |
//! | [`driver`] | Traits for the ADC and step timer collaborators |
//! | [`sampler`] | Bounded single-channel ADC reads |
//! | [`engine`] | Bang-bang steering decision and duty scaling |
//! | [`shared`] | Atomics shared between the foreground loop and the timer interrupt |
//! | [`scheduler`] | Timer-interrupt step scheduler |
//! | [`follower`] | Foreground loop tying sampler, engine and PWM outputs together |
//! | [`telemetry`] | Printable counters snapshot for the debug terminal |
//!
//! The MCU binding lives in the `firmware/` crate.
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod follower;
pub mod sampler;
pub mod scheduler;
pub mod shared;
pub mod telemetry;
pub mod types;

pub use config::ControlConfig;
pub use error::Error;
pub use follower::LineFollower;
pub use scheduler::StepScheduler;
pub use shared::SharedState;
