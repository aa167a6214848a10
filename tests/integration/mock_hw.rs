//! Mock adapters for integration tests.
//!
//! Records every actuator, display, telemetry and event call so tests can
//! assert on the full history without touching real peripherals.

use walet::app::decision::SensorSample;
use walet::app::events::AppEvent;
use walet::app::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort, TelemetryPort};
use walet::app::status::StatusLines;
use walet::error::CommsError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    TempFan(bool),
    HumidityFan(bool),
    Buzzer(Option<u32>),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

/// Returns `sample` on every read; tests mutate it between cycles.
pub struct MockHardware {
    pub sample: SensorSample,
    pub calls: Vec<ActuatorCall>,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(sample: SensorSample) -> Self {
        Self {
            sample,
            calls: Vec::new(),
            reads: 0,
        }
    }

    /// Newest state selected by `pick`; an `AllOff` after it means `off`.
    fn last<T>(&self, pick: impl Fn(&ActuatorCall) -> Option<T>, off: T) -> T {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::AllOff => Some(None),
                other => pick(other).map(Some),
            })
            .flatten()
            .unwrap_or(off)
    }

    pub fn temp_fan_on(&self) -> bool {
        self.last(
            |c| match c {
                ActuatorCall::TempFan(on) => Some(*on),
                _ => None,
            },
            false,
        )
    }

    pub fn humidity_fan_on(&self) -> bool {
        self.last(
            |c| match c {
                ActuatorCall::HumidityFan(on) => Some(*on),
                _ => None,
            },
            false,
        )
    }

    pub fn buzzer(&self) -> Option<u32> {
        self.last(
            |c| match c {
                ActuatorCall::Buzzer(hz) => Some(*hz),
                _ => None,
            },
            None,
        )
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSample {
        self.reads += 1;
        self.sample
    }
}

impl ActuatorPort for MockHardware {
    fn set_temp_fan(&mut self, on: bool) {
        self.calls.push(ActuatorCall::TempFan(on));
    }

    fn set_humidity_fan(&mut self, on: bool) {
        self.calls.push(ActuatorCall::HumidityFan(on));
    }

    fn set_buzzer(&mut self, hz: Option<u32>) {
        self.calls.push(ActuatorCall::Buzzer(hz));
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub frames: Vec<StatusLines>,
}

#[allow(dead_code)]
impl MockDisplay {
    pub fn bottom(&self) -> &str {
        self.frames.last().map_or("", |f| f.bottom.as_str())
    }

    pub fn top(&self) -> &str {
        self.frames.last().map_or("", |f| f.top.as_str())
    }
}

impl DisplayPort for MockDisplay {
    fn show(&mut self, lines: &StatusLines) {
        self.frames.push(lines.clone());
    }
}

// ── MockTelemetry ─────────────────────────────────────────────

#[derive(Default)]
pub struct MockTelemetry {
    pub published: Vec<(String, String)>,
    /// Topics whose publish fails.
    pub failing: Vec<&'static str>,
}

#[allow(dead_code)]
impl MockTelemetry {
    pub fn last_on(&self, topic: &str) -> Option<&str> {
        self.published
            .iter()
            .rev()
            .find(|(t, _)| t == topic)
            .map(|(_, p)| p.as_str())
    }
}

impl TelemetryPort for MockTelemetry {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        if self.failing.contains(&topic) {
            return Err(CommsError::MqttPublishFailed);
        }
        self.published.push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
