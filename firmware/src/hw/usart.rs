// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART debug terminal and line logger.
//!
//! Every log line is prefixed with its level and terminated with CRLF, so the terminal shows e.g.
//!
//! ```text
//! [INFO] linetrack up, step period 65535
//! [WARN] ADC conversion timed out on left sensor
//! ```
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt::{self, Write as _};
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "[INFO] ",
            Level::Warn => "[WARN] ",
            Level::Error => "[ERROR] ",
        }
    }
}

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }

    /// Write one formatted line tagged with `level`.
    pub fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        self.write_str(level.tag());
        let _ = self.write_fmt(args);
        self.write_str("\r\n");
    }

    #[inline]
    pub fn info(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    #[inline]
    pub fn warn(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    /// Error lines are flushed before returning, the caller is usually about to halt.
    pub fn error(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
        self.flush();
    }
}

// Implement `core::fmt::Write` so we can use `write!` / `writeln!` on `Usart`.
impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}
