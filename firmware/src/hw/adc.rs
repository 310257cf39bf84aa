// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! ADC1 line-sensor input using direct PAC register access.
//!
//! Single conversions, software triggered, 12-bit right aligned. A conversion is started with
//! [`AnalogInput::start`] and collected with [`AnalogInput::poll`], which returns `WouldBlock` until
//! EOC is set. The bounded wait around it lives in `linetrack::sampler`, which stops a conversion
//! it gives up on through [`AnalogInput::abort`].

use core::convert::Infallible;

use linetrack::driver::AnalogInput;
use linetrack::types::Channel;
use stm32f7xx_hal::pac;

/// Wait after ADON before the next conversion (tSTAB is 3 µs, 1000 cycles covers 216 MHz).
const STAB_CYCLES: u32 = 1_000;

/// Hardware channel number behind each logical channel.
#[derive(Copy, Clone, Debug)]
pub struct ChannelMap {
    pub setpoint: u8,
    pub left: u8,
    pub right: u8,
}

impl ChannelMap {
    #[inline]
    fn hw(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Setpoint => self.setpoint,
            Channel::LeftSensor => self.left,
            Channel::RightSensor => self.right,
        }
    }
}

pub struct Adc {
    adc: pac::ADC1,
    map: ChannelMap,
}

impl Adc {
    /// Enable and initialize ADC1.
    pub fn adc1(adc1: pac::ADC1, map: ChannelMap) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adc1en().set_bit());

        let common = unsafe { &*pac::ADC_COMMON::ptr() };
        // ADC prescaler: PCLK2 / 4
        common.ccr.modify(|_, w| w.adcpre().div4());

        // Power off to configure
        adc1.cr2.modify(|_, w| w.adon().clear_bit());

        // 12-bit, right-aligned, software trigger
        adc1.cr1.modify(|_, w| w.res().bits(0b00));
        adc1.cr2.modify(|_, w| {
            w.cont().clear_bit();
            w.align().right();
            w.exten().disabled();
            w
        });

        // Sequence length = 1 conversion
        adc1.sqr1.modify(|_, w| w.l().bits(0));

        adc1.cr2.modify(|_, w| w.adon().set_bit());

        Self { adc: adc1, map }
    }

    #[inline]
    pub fn free(self) -> pac::ADC1 {
        self.adc
    }

    /// Longest sample time (480 cycles) for the phototransistor's source impedance.
    fn set_long_sample_time(&mut self, ch: u8) {
        match ch {
            0..=9 => self.adc.smpr2.modify(|r, w| unsafe {
                w.bits(r.bits() | (0b111 << (3 * ch as u32)))
            }),
            10..=18 => self.adc.smpr1.modify(|r, w| unsafe {
                w.bits(r.bits() | (0b111 << (3 * (ch as u32 - 10))))
            }),
            _ => {}
        }
    }
}

impl AnalogInput for Adc {
    type Error = Infallible;

    fn configure(&mut self, channel: Channel) {
        let ch = self.map.hw(channel);
        self.set_long_sample_time(ch);
    }

    fn start(&mut self, channel: Channel) {
        // drop a result nobody collected
        if self.adc.sr.read().eoc().bit_is_set() {
            let _ = self.adc.dr.read();
        }

        let ch = self.map.hw(channel);
        self.adc
            .sqr3
            .modify(|_, w| unsafe { w.sq1().bits(ch & 0x1F) });
        self.adc.cr2.modify(|_, w| w.swstart().set_bit());
    }

    fn poll(&mut self) -> nb::Result<u16, Infallible> {
        if self.adc.sr.read().eoc().bit_is_clear() {
            return Err(nb::Error::WouldBlock);
        }
        // reading DR clears EOC
        Ok(self.adc.dr.read().data().bits())
    }

    fn abort(&mut self) {
        // clearing ADON stops a running conversion
        self.adc.cr2.modify(|_, w| w.adon().clear_bit());
        self.adc
            .sr
            .modify(|_, w| w.eoc().clear_bit().strt().clear_bit().ovr().clear_bit());
        self.adc.cr2.modify(|_, w| w.adon().set_bit());
        cortex_m::asm::delay(STAB_CYCLES);
    }
}
