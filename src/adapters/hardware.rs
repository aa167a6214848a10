//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and all actuator drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  On non-espidf targets,
//! the underlying drivers use cfg-gated simulation stubs.

use log::warn;

use crate::app::decision::SensorSample;
use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::relay::RelayDriver;
use crate::sensors::{ClimateSensor, MicrosClock, RangeSensor, SensorHub};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<C, R, K> {
    sensor_hub: SensorHub<C, R, K>,
    temp_fan: RelayDriver,
    humidity_fan: RelayDriver,
    buzzer: BuzzerDriver,
}

impl<C, R, K> HardwareAdapter<C, R, K>
where
    C: ClimateSensor,
    R: RangeSensor,
    K: MicrosClock,
{
    pub fn new(
        sensor_hub: SensorHub<C, R, K>,
        temp_fan: RelayDriver,
        humidity_fan: RelayDriver,
        buzzer: BuzzerDriver,
    ) -> Self {
        Self {
            sensor_hub,
            temp_fan,
            humidity_fan,
            buzzer,
        }
    }

    pub fn temp_fan_on(&self) -> bool {
        self.temp_fan.is_on()
    }

    pub fn humidity_fan_on(&self) -> bool {
        self.humidity_fan.is_on()
    }

    pub fn buzzer_hz(&self) -> Option<u32> {
        self.buzzer.current()
    }

    pub fn sensor_hub(&self) -> &SensorHub<C, R, K> {
        &self.sensor_hub
    }

    pub fn sensor_hub_mut(&mut self) -> &mut SensorHub<C, R, K> {
        &mut self.sensor_hub
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<C, R, K> SensorPort for HardwareAdapter<C, R, K>
where
    C: ClimateSensor,
    R: RangeSensor,
    K: MicrosClock,
{
    fn read_all(&mut self) -> SensorSample {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<C, R, K> ActuatorPort for HardwareAdapter<C, R, K>
where
    C: ClimateSensor,
    R: RangeSensor,
    K: MicrosClock,
{
    fn set_temp_fan(&mut self, on: bool) {
        self.temp_fan.set(on);
    }

    fn set_humidity_fan(&mut self, on: bool) {
        self.humidity_fan.set(on);
    }

    fn set_buzzer(&mut self, hz: Option<u32>) {
        if let Err(e) = self.buzzer.set(hz) {
            warn!("hardware: buzzer {:?} failed: {}", hz, e);
        }
    }

    fn all_off(&mut self) {
        self.temp_fan.off();
        self.humidity_fan.off();
        if let Err(e) = self.buzzer.silence() {
            warn!("hardware: buzzer silence failed: {}", e);
        }
    }
}
