//! embedded-hal views over the raw GPIOs configured by [`hw_init`].
//!
//! The sensor drivers are generic over `embedded_hal::digital` and
//! `embedded_hal::delay`, so they run unchanged against mocks on the host.
//! These thin wrappers plug the board pins into them.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::drivers::hw_init;

/// A GPIO already configured by `hw_init::init_peripherals()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioPin(i32);

impl GpioPin {
    pub const fn new(gpio: i32) -> Self {
        Self(gpio)
    }
}

impl ErrorType for GpioPin {
    type Error = Infallible;
}

impl InputPin for GpioPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(hw_init::gpio_read(self.0))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!hw_init::gpio_read(self.0))
    }
}

impl OutputPin for GpioPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.0, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.0, true);
        Ok(())
    }
}

// ── Busy-wait delay ───────────────────────────────────────────

/// Microsecond busy-wait for bit-banged protocols.
#[derive(Debug, Default, Clone, Copy)]
pub struct BusyDelay;

#[cfg(target_os = "espidf")]
impl DelayNs for BusyDelay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        esp_idf_hal::delay::Ets::delay_us(us);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for BusyDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}
