// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! TIM3 as the step scheduler time base.
//!
//! Upcounting from zero with the update interrupt as the expiry. Arming loads `ARR = ticks - 1`
//! and clears the counter, so the next update fires exactly `ticks` timer ticks later.

use linetrack::driver::StepTimer;
use stm32f7xx_hal::pac;

pub struct StepTimer3 {
    tim: pac::TIM3,
}

impl StepTimer3 {
    /// Configure TIM3 with `prescaler` (tick = timer clock / (prescaler + 1)). Counter stopped,
    /// interrupt masked.
    pub fn tim3(tim3: pac::TIM3, prescaler: u16) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim3en().set_bit());

        let tim = tim3;

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());
        tim.dier.modify(|_, w| w.uie().clear_bit());

        tim.psc.write(|w| w.psc().bits(prescaler));

        // Load PSC now; URS keeps the forced update from raising UIF
        tim.cr1.modify(|_, w| w.urs().set_bit());
        tim.egr.write(|w| w.ug().set_bit());

        tim.cnt.write(|w| unsafe { w.bits(0) });
        tim.sr.modify(|_, w| w.uif().clear_bit());

        Self { tim }
    }

    /// Consume the wrapper and return the underlying timer peripheral.
    #[inline]
    pub fn free(self) -> pac::TIM3 {
        self.tim
    }
}

impl StepTimer for StepTimer3 {
    fn arm(&mut self, ticks: u16) {
        // ARR = 0 blocks the counter
        let arr = ticks.max(2) - 1;
        self.tim.arr.write(|w| unsafe { w.bits(arr as u32) });
        self.tim.cnt.write(|w| unsafe { w.bits(0) });
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
    }

    #[inline]
    fn disable_expiry(&mut self) {
        self.tim.dier.modify(|_, w| w.uie().clear_bit());
    }

    #[inline]
    fn enable_expiry(&mut self) {
        self.tim.dier.modify(|_, w| w.uie().set_bit());
    }

    #[inline]
    fn acknowledge(&mut self) {
        self.tim.sr.modify(|_, w| w.uif().clear_bit());
    }

    fn disarm(&mut self) {
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
    }
}
