//! Fan relay driver (active-HIGH relay modules).
//!
//! One instance per relay. Tracks the commanded state so callers can query
//! it and so repeated commands do not re-touch the pin.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO via hw_init helpers.
//! On host/test: hw_init records the level in a simulated pin bank.

use crate::drivers::hw_init;

pub struct RelayDriver {
    gpio: i32,
    energised: bool,
}

impl RelayDriver {
    /// Create the driver and force the relay open.
    pub fn new(gpio: i32) -> Self {
        hw_init::gpio_write(gpio, false);
        Self {
            gpio,
            energised: false,
        }
    }

    pub fn set(&mut self, on: bool) {
        if on == self.energised {
            return;
        }
        hw_init::gpio_write(self.gpio, on);
        self.energised = on;
    }

    pub fn off(&mut self) {
        self.set(false);
    }

    pub fn is_on(&self) -> bool {
        self.energised
    }
}
