//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production). The per-cycle
//! diagnostic line is rendered here.

use log::{info, warn};

use crate::app::events::{AppEvent, CycleReport};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

fn log_cycle(r: &CycleReport) {
    match r.sample.distance_cm {
        Some(cm) => info!(
            "CYCLE {} | Temp: {:.1}\u{00b0}C | Hum: {:.1}% | Dist: {:.0} cm | \
             fan_t={} fan_h={} | {:?} buzzer={:?}",
            r.cycle,
            r.sample.temperature_c,
            r.sample.humidity_pct,
            cm,
            on_off(r.actuators.temp_fan_on),
            on_off(r.actuators.humidity_fan_on),
            r.alarm,
            r.buzzer_hz,
        ),
        None => info!(
            "CYCLE {} | Temp: {:.1}\u{00b0}C | Hum: {:.1}% | Dist: -- cm | \
             fan_t={} fan_h={} | {:?} buzzer={:?}",
            r.cycle,
            r.sample.temperature_c,
            r.sample.humidity_pct,
            on_off(r.actuators.temp_fan_on),
            on_off(r.actuators.humidity_fan_on),
            r.alarm,
            r.buzzer_hz,
        ),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Cycle(report) => log_cycle(report),
            AppEvent::AlarmChanged { from, to } => {
                info!("ALARM | {:?} -> {:?} ({})", from, to, to.banner());
            }
            AppEvent::OverrideChanged { key, on } => {
                info!("OVERRIDE | {} = {}", key.label(), on_off(*on));
            }
            AppEvent::PublishFailed { topic } => {
                warn!("MQTT | publish to {} failed", topic);
            }
            AppEvent::Started => {
                info!("START | controller running");
            }
        }
    }
}
