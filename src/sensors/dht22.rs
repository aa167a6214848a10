//! DHT22 (AM2302) temperature / humidity sensor on a single-wire bus.
//!
//! The wire protocol is handled by `dht_sensor`; this module adds what the
//! controller needs on top of it: a plausibility check on every sample and
//! a rate limit, since the part cannot be sampled faster than every two
//! seconds.  Inside that window the last good reading is reused.

use dht_sensor::{dht22, DhtError};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::SensorError;

/// Minimum spacing between bus transactions (ms).
pub const MIN_INTERVAL_MS: u32 = 2_000;

const HUMIDITY_MIN_PCT: f32 = 0.0;
const HUMIDITY_MAX_PCT: f32 = 100.0;
const TEMP_MIN_C: f32 = -40.0;
const TEMP_MAX_C: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Reject values outside the sensor's rated range (including NaN).
pub fn check_plausible(reading: ClimateReading) -> Result<ClimateReading, SensorError> {
    let humidity_ok = (HUMIDITY_MIN_PCT..=HUMIDITY_MAX_PCT).contains(&reading.humidity_pct);
    let temp_ok = (TEMP_MIN_C..=TEMP_MAX_C).contains(&reading.temperature_c);
    if humidity_ok && temp_ok {
        Ok(reading)
    } else {
        Err(SensorError::OutOfRange)
    }
}

/// One raw bus transaction.
pub trait DhtBus {
    fn sample(&mut self) -> Result<ClimateReading, SensorError>;
}

/// Open-drain data line with a pull-up, read through `dht_sensor`.
pub struct DhtLine<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> DhtLine<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }
}

impl<P, D> DhtBus for DhtLine<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn sample(&mut self) -> Result<ClimateReading, SensorError> {
        // Idle level before the start pulse.
        self.pin.set_high().map_err(|_| SensorError::Pin)?;

        let (pin, delay) = (&mut self.pin, &mut self.delay);
        let reading = critical_section::with(|_cs| dht22::blocking::read(delay, pin))
            .map_err(|e| match e {
                DhtError::Timeout => SensorError::Timeout,
                DhtError::ChecksumMismatch => SensorError::ChecksumMismatch,
                _ => SensorError::Pin,
            })?;

        Ok(ClimateReading {
            temperature_c: reading.temperature,
            humidity_pct: reading.relative_humidity,
        })
    }
}

pub struct Dht22<B> {
    bus: B,
    last_access_ms: Option<u32>,
    last_good: Option<ClimateReading>,
    last_error: Option<SensorError>,
}

impl<B: DhtBus> Dht22<B> {
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            last_access_ms: None,
            last_good: None,
            last_error: None,
        }
    }

    /// Read the sensor. Within [`MIN_INTERVAL_MS`] of the previous bus
    /// transaction the bus is left alone: the last good reading is
    /// returned, or the last error if there never was one.
    pub fn read(&mut self, now_ms: u32) -> Result<ClimateReading, SensorError> {
        if let Some(at) = self.last_access_ms {
            if now_ms.wrapping_sub(at) < MIN_INTERVAL_MS {
                return match (self.last_good, self.last_error) {
                    (Some(good), _) => Ok(good),
                    (None, Some(err)) => Err(err),
                    (None, None) => Err(SensorError::Timeout),
                };
            }
        }

        self.last_access_ms = Some(now_ms);
        let result = self.bus.sample().and_then(check_plausible);
        match result {
            Ok(reading) => self.last_good = Some(reading),
            Err(err) => self.last_error = Some(err),
        }
        result
    }
}
