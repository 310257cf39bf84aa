// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Line-Tracking Firmware
//!
//! Board support for the `linetrack` control core on an STM32F777 MCU: two phototransistor
//! sensors and a speed trimpot on ADC1, two stepper drivers clocked from TIM3, and two DC motors on
//! TIM4 PWM.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around ADC, timers, PWM, GPIO and USART |
//!
//! The control algorithm itself lives in the host-testable `linetrack` crate; this crate only
//! implements its `AnalogInput`, `StepTimer`, `StatefulOutputPin` and `SetDutyCycle` seams.
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![no_std]

pub mod hw;
