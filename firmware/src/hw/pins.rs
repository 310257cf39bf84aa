// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 line-tracking board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, Alternate, Analog, Output, PushPull},
    pac,
    prelude::*,
};

use crate::hw::adc::ChannelMap;

/// ADC1 channels of the analog inputs below.
pub const ADC_CHANNELS: ChannelMap = ChannelMap {
    setpoint: 0,
    left: 4,
    right: 5,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub sensors: SensorPins,
    pub steppers: StepperPins,
    pub motors: MotorPins,
    pub usart1: Usart1Pins,
}

/// Analog inputs
pub struct SensorPins {
    pub setpoint: gpioa::PA0<Analog>, // ADC1_IN0, speed trimpot
    pub left: gpioa::PA4<Analog>,     // ADC1_IN4, left phototransistor
    pub right: gpioa::PA5<Analog>,    // ADC1_IN5, right phototransistor
}

/// Stepper driver step/direction lines
pub struct StepperPins {
    pub right_step: gpioa::PA2<Output<PushPull>>,
    pub right_dir: gpioa::PA3<Output<PushPull>>,
    pub left_step: gpiob::PB4<Output<PushPull>>,
    pub left_dir: gpiob::PB5<Output<PushPull>>,
}

/// DC motor PWM outputs
pub struct MotorPins {
    pub pwm1: gpiod::PD12<Alternate<2>>, // TIM4_CH1
    pub pwm2: gpiod::PD13<Alternate<2>>, // TIM4_CH2
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();

        Self {
            sensors: SensorPins {
                setpoint: gpioa.pa0.into_analog(),
                left: gpioa.pa4.into_analog(),
                right: gpioa.pa5.into_analog(),
            },

            steppers: StepperPins {
                right_step: gpioa.pa2.into_push_pull_output(),
                right_dir: gpioa.pa3.into_push_pull_output(),
                left_step: gpiob.pb4.into_push_pull_output(),
                left_dir: gpiob.pb5.into_push_pull_output(),
            },

            motors: MotorPins {
                pwm1: gpiod.pd12.into_alternate::<2>(),
                pwm2: gpiod.pd13.into_alternate::<2>(),
            },

            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },
        }
    }
}
