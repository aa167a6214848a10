//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and produces a [`SensorSample`] each
//! cycle. Driver faults are typed ([`SensorError`]) and logged here once per
//! onset, then folded into the sample: `NaN` climate values, `None`
//! distance. The control loop never sees an error.

pub mod dht22;
pub mod ultrasonic;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{info, warn};

use crate::app::decision::SensorSample;
use crate::error::SensorError;
use dht22::{ClimateReading, Dht22, DhtBus};
use ultrasonic::Ultrasonic;

/// Monotonic microsecond time source.
pub trait MicrosClock {
    fn now_us(&mut self) -> u64;
}

/// Anything that yields a temperature/humidity pair.
pub trait ClimateSensor {
    fn read_climate(&mut self, now_ms: u32) -> Result<ClimateReading, SensorError>;
}

/// Anything that yields a distance in centimetres.
pub trait RangeSensor {
    fn measure_cm(&mut self) -> Result<f32, SensorError>;
}

impl<B: DhtBus> ClimateSensor for Dht22<B> {
    fn read_climate(&mut self, now_ms: u32) -> Result<ClimateReading, SensorError> {
        self.read(now_ms)
    }
}

impl<T, E, D, C> RangeSensor for Ultrasonic<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MicrosClock,
{
    fn measure_cm(&mut self) -> Result<f32, SensorError> {
        Ultrasonic::measure_cm(self)
    }
}

/// Aggregates all sensor drivers and produces a unified sample.
pub struct SensorHub<C, R, K> {
    climate: C,
    range: R,
    clock: K,
    climate_fault: Option<SensorError>,
    range_fault: Option<SensorError>,
}

impl<C, R, K> SensorHub<C, R, K>
where
    C: ClimateSensor,
    R: RangeSensor,
    K: MicrosClock,
{
    pub fn new(climate: C, range: R, clock: K) -> Self {
        Self {
            climate,
            range,
            clock,
            climate_fault: None,
            range_fault: None,
        }
    }

    /// Read every sensor once.
    pub fn read_all(&mut self) -> SensorSample {
        let now_ms = (self.clock.now_us() / 1_000) as u32;

        let (temperature_c, humidity_pct) = match self.climate.read_climate(now_ms) {
            Ok(r) => {
                if self.climate_fault.take().is_some() {
                    info!("sensors: DHT22 recovered");
                }
                (r.temperature_c, r.humidity_pct)
            }
            Err(e) => {
                if self.climate_fault != Some(e) {
                    warn!("sensors: DHT22 read failed: {}", e);
                    self.climate_fault = Some(e);
                }
                (f32::NAN, f32::NAN)
            }
        };

        let distance_cm = match self.range.measure_cm() {
            Ok(cm) => {
                if self.range_fault.take().is_some() {
                    info!("sensors: ultrasonic echo restored");
                }
                Some(cm)
            }
            Err(e) => {
                if self.range_fault != Some(e) {
                    warn!("sensors: ultrasonic read failed: {}", e);
                    self.range_fault = Some(e);
                }
                None
            }
        };

        SensorSample {
            temperature_c,
            humidity_pct,
            distance_cm,
        }
    }

    pub fn climate_fault(&self) -> Option<SensorError> {
        self.climate_fault
    }

    pub fn range_fault(&self) -> Option<SensorError> {
        self.range_fault
    }

    pub fn climate_mut(&mut self) -> &mut C {
        &mut self.climate
    }

    pub fn range_mut(&mut self) -> &mut R {
        &mut self.range
    }
}
