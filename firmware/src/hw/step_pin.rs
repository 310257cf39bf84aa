// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Push-pull step line exposed through the embedded-hal 1.0 digital traits.
//!
//! The scheduler reads the output latch (ODR), not the input register, so the level it inverts is
//! always the one it last drove.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin, StatefulOutputPin};
use stm32f7xx_hal::gpio::{self, Output, PushPull};

pub struct StepPin<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> StepPin<P, N> {
    /// Wrap a push-pull output, starting low.
    pub fn new(mut pin: gpio::Pin<P, N, Output<PushPull>>) -> Self {
        pin.set_low();
        Self { pin }
    }

    pub fn free(self) -> gpio::Pin<P, N, Output<PushPull>> {
        self.pin
    }
}

impl<const P: char, const N: u8> ErrorType for StepPin<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> OutputPin for StepPin<P, N> {
    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.pin.set_low();
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.pin.set_high();
        Ok(())
    }
}

impl<const P: char, const N: u8> StatefulOutputPin for StepPin<P, N> {
    #[inline]
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.pin.is_set_high())
    }

    #[inline]
    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(self.pin.is_set_low())
    }
}
