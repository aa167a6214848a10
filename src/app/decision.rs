//! Decision engine: sensor readings + overrides → fans and alarm.
//!
//! Pure and total: no I/O, no state, no error paths. Non-finite readings
//! (a faulted DHT22 reports `NaN`) fail every IEEE comparison, so they
//! never switch a fan or raise an alarm on their own; an override still
//! forces its fan on.

use crate::config::Thresholds;

/// One cycle's worth of readings. Not retained between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSample {
    /// Air temperature (°C). `NaN` when the DHT22 read failed.
    pub temperature_c: f32,
    /// Relative humidity (%). `NaN` when the DHT22 read failed.
    pub humidity_pct: f32,
    /// Distance to the water surface (cm). `None` when no echo returned.
    pub distance_cm: Option<f32>,
}

/// Manual fan overrides received from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverrideState {
    pub fan_by_temp: bool,
    pub fan_by_humidity: bool,
}

/// Relay outputs for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorState {
    pub temp_fan_on: bool,
    pub humidity_fan_on: bool,
}

/// The single highest-priority abnormal condition this cycle.
///
/// Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmCondition {
    Hot,
    Dry,
    WaterLow,
    #[default]
    None,
}

impl AlarmCondition {
    pub fn is_active(self) -> bool {
        self != Self::None
    }
}

/// Full output of the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    pub actuators: ActuatorState,
    pub alarm: AlarmCondition,
}

pub fn temp_fan_on(temperature_c: f32, overridden: bool, t: &Thresholds) -> bool {
    temperature_c > t.fan_temp_above_c || overridden
}

pub fn humidity_fan_on(humidity_pct: f32, overridden: bool, t: &Thresholds) -> bool {
    humidity_pct < t.fan_humidity_below_pct || overridden
}

pub fn is_hot(temperature_c: f32, t: &Thresholds) -> bool {
    temperature_c > t.hot_above_c
}

pub fn is_dry(humidity_pct: f32, t: &Thresholds) -> bool {
    humidity_pct < t.dry_below_pct
}

/// Water is low when the surface sits inside the open window
/// `(water_low_min_cm, water_low_max_cm)`. Closer readings mean a full
/// tank; farther ones (and timeouts) are treated as spurious.
pub fn is_water_low(distance_cm: Option<f32>, t: &Thresholds) -> bool {
    distance_cm.is_some_and(|d| d > t.water_low_min_cm && d < t.water_low_max_cm)
}

/// First match wins: Hot, Dry, WaterLow, else None.
pub fn classify(sample: &SensorSample, t: &Thresholds) -> AlarmCondition {
    if is_hot(sample.temperature_c, t) {
        AlarmCondition::Hot
    } else if is_dry(sample.humidity_pct, t) {
        AlarmCondition::Dry
    } else if is_water_low(sample.distance_cm, t) {
        AlarmCondition::WaterLow
    } else {
        AlarmCondition::None
    }
}

/// Map one sample and the current overrides to outputs.
pub fn decide(sample: &SensorSample, overrides: &OverrideState, t: &Thresholds) -> Decision {
    Decision {
        actuators: ActuatorState {
            temp_fan_on: temp_fan_on(sample.temperature_c, overrides.fan_by_temp, t),
            humidity_fan_on: humidity_fan_on(sample.humidity_pct, overrides.fan_by_humidity, t),
        },
        alarm: classify(sample, t),
    }
}
