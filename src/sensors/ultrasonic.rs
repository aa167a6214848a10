//! HC-SR04 ultrasonic range finder (water surface distance).
//!
//! A 10 µs trigger pulse starts a ping; the sensor then holds ECHO high
//! for the round-trip time of flight. Distance is half the round trip at
//! 0.034 cm/µs, truncated to whole centimetres.
//!
//! No echo inside the timeout means nothing was measured. That is
//! reported as [`SensorError::NoEcho`], never as a zero distance.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::MicrosClock;
use crate::error::SensorError;

/// Speed of sound, centimetres per microsecond.
const SOUND_CM_PER_US: f32 = 0.034;
const TRIGGER_SETTLE_US: u32 = 2;
const TRIGGER_PULSE_US: u32 = 10;

/// Convert an echo pulse width to whole centimetres.
pub fn echo_to_cm(echo_us: u64) -> f32 {
    let cm = echo_us as f32 * SOUND_CM_PER_US / 2.0;
    cm.trunc()
}

pub struct Ultrasonic<T, E, D, C> {
    trig: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u64,
}

impl<T, E, D, C> Ultrasonic<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    pub fn new(trig: T, echo: E, delay: D, clock: C, timeout_us: u32) -> Self {
        Self {
            trig,
            echo,
            delay,
            clock,
            timeout_us: u64::from(timeout_us),
        }
    }

    /// Fire one ping and return the distance in whole centimetres.
    pub fn measure_cm(&mut self) -> Result<f32, SensorError> {
        self.trig.set_low().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(TRIGGER_SETTLE_US);
        self.trig.set_high().map_err(|_| SensorError::Pin)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trig.set_low().map_err(|_| SensorError::Pin)?;

        let width = self.pulse_width_us()?;
        Ok(echo_to_cm(width))
    }

    /// Width of the next HIGH pulse on ECHO. The whole wait, including a
    /// pulse already in progress, shares one timeout budget.
    fn pulse_width_us(&mut self) -> Result<u64, SensorError> {
        let start = self.clock.now_us();

        self.wait_for(false, start)?;
        self.wait_for(true, start)?;
        let rise = self.clock.now_us();
        self.wait_for(false, start)?;
        let fall = self.clock.now_us();

        Ok(fall.saturating_sub(rise))
    }

    fn wait_for(&mut self, high: bool, start: u64) -> Result<(), SensorError> {
        loop {
            if self.echo.is_high().map_err(|_| SensorError::Pin)? == high {
                return Ok(());
            }
            if self.clock.now_us().saturating_sub(start) >= self.timeout_us {
                return Err(SensorError::NoEcho);
            }
        }
    }
}
