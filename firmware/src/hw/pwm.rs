// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TIM4 CH1/CH2 PWM for the two DC motors.
//!
//! 16-bit period (ARR = 0xFFFF), PWM mode 1 with compare preload. The motor stage is active-low,
//! so a compare value of 0xFFFF keeps the motor off.

use core::convert::Infallible;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use stm32f7xx_hal::pac;

const PERIOD: u16 = 0xFFFF;

/// CCMR1: OC1M = OC2M = 0b110 (PWM mode 1), OC1PE = OC2PE = 1, CC1S = CC2S = 0b00 (output).
const CCMR1_PWM1_PRELOAD: u32 = (0b110 << 4) | (1 << 3) | (0b110 << 12) | (1 << 11);

/// One compare channel of TIM4. `C` is the channel number (1 or 2).
pub struct PwmChannel<const C: u8> {
    _private: (),
}

/// Configure TIM4 for two-channel PWM and split it into channel handles.
///
/// Both channels start at full scale (motor off).
pub fn tim4(tim4: pac::TIM4) -> (PwmChannel<1>, PwmChannel<2>) {
    let rcc = unsafe { &*pac::RCC::ptr() };
    rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

    let tim = tim4;

    tim.cr1.modify(|_, w| w.cen().clear_bit());

    // Prescaler 1:1, period 0xFFFF
    tim.psc.write(|w| w.psc().bits(0));
    tim.arr.write(|w| unsafe { w.bits(PERIOD as u32) });

    tim.ccmr1_output()
        .write(|w| unsafe { w.bits(CCMR1_PWM1_PRELOAD) });

    tim.ccr1.write(|w| unsafe { w.bits(PERIOD as u32) });
    tim.ccr2.write(|w| unsafe { w.bits(PERIOD as u32) });

    tim.ccer.modify(|_, w| w.cc1e().set_bit().cc2e().set_bit());

    // Auto-reload preload, latch everything, start
    tim.cr1.modify(|_, w| w.arpe().set_bit());
    tim.egr.write(|w| w.ug().set_bit());
    tim.cr1.modify(|_, w| w.cen().set_bit());

    (PwmChannel { _private: () }, PwmChannel { _private: () })
}

impl<const C: u8> ErrorType for PwmChannel<C> {
    type Error = Infallible;
}

impl<const C: u8> SetDutyCycle for PwmChannel<C> {
    #[inline]
    fn max_duty_cycle(&self) -> u16 {
        PERIOD
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        // Each handle only touches its own CCR
        let tim = unsafe { &*pac::TIM4::ptr() };
        match C {
            1 => tim.ccr1.write(|w| unsafe { w.bits(duty as u32) }),
            _ => tim.ccr2.write(|w| unsafe { w.bits(duty as u32) }),
        }
        Ok(())
    }
}
