//! Controller service, the hexagonal core.
//!
//! [`ControllerService`] owns the override flags and the tone scheduler
//! and runs one control cycle per [`tick`](ControllerService::tick).  All
//! I/O flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │   ControllerService     │ ──▶ TelemetryPort
//! ActuatorPort ◀──│  decide · tone · status │ ──▶ DisplayPort
//!                 └────────────────────────┘
//! ```
//!
//! Overrides are written only by [`handle_command`](ControllerService::handle_command),
//! which the main loop calls from its message-servicing step, never from
//! inside a cycle.

use core::fmt::Write;

use log::info;

use crate::config::{SystemConfig, Thresholds, Topics};

use super::commands::AppCommand;
use super::decision::{decide, AlarmCondition, Decision, OverrideState, SensorSample};
use super::events::{AppEvent, CycleReport};
use super::overrides;
use super::ports::{ActuatorPort, DisplayPort, EventSink, SensorPort, TelemetryPort};
use super::status;
use super::tone::ToneScheduler;

// Wide enough for `f32::MAX` at two decimals.
type Payload = heapless::String<48>;

// ───────────────────────────────────────────────────────────────
// ControllerService
// ───────────────────────────────────────────────────────────────

pub struct ControllerService {
    thresholds: Thresholds,
    topics: Topics,
    overrides: OverrideState,
    tone: ToneScheduler,
    last_sample: SensorSample,
    last_decision: Decision,
    cycle_count: u64,
}

impl ControllerService {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            thresholds: config.thresholds,
            topics: config.topics.clone(),
            overrides: OverrideState::default(),
            tone: ToneScheduler::new(),
            last_sample: SensorSample::default(),
            last_decision: Decision::default(),
            cycle_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!("ControllerService started");
    }

    // ── Inbound ───────────────────────────────────────────────

    /// Apply an external command. The only write path for overrides.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        match cmd {
            AppCommand::SetOverride { key, on } => {
                if self.overrides.apply(key, on) {
                    sink.emit(&AppEvent::OverrideChanged { key, on });
                }
            }
        }
    }

    /// Decode a raw broker message and apply it. Returns `false` for
    /// unknown topics or unrecognised payloads, which change nothing.
    pub fn handle_message(
        &mut self,
        topic: &str,
        payload: &[u8],
        sink: &mut impl EventSink,
    ) -> bool {
        match overrides::decode(topic, payload, &self.topics) {
            Some(cmd) => {
                self.handle_command(cmd, sink);
                true
            }
            None => false,
        }
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one control cycle: read → decide → relays → buzzer → display
    /// → log → publish.
    ///
    /// `hw` satisfies both [`SensorPort`] and [`ActuatorPort`] so the
    /// sensor hub and the output drivers can live in one adapter.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        display: &mut impl DisplayPort,
        telemetry: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
    ) -> Decision {
        self.cycle_count += 1;
        let prev_alarm = self.last_decision.alarm;

        // 1. Sensors
        let sample = hw.read_all();

        // 2. Decide
        let decision = decide(&sample, &self.overrides, &self.thresholds);

        // 3. Relays
        hw.set_temp_fan(decision.actuators.temp_fan_on);
        hw.set_humidity_fan(decision.actuators.humidity_fan_on);

        // 4. Buzzer
        let buzzer_hz = self.tone.tick(decision.alarm, now_ms);
        hw.set_buzzer(buzzer_hz);

        // 5. Display
        display.show(&status::render(&sample, decision.alarm));

        // 6. Events
        if decision.alarm != prev_alarm {
            sink.emit(&AppEvent::AlarmChanged {
                from: prev_alarm,
                to: decision.alarm,
            });
        }
        sink.emit(&AppEvent::Cycle(CycleReport {
            cycle: self.cycle_count,
            sample,
            actuators: decision.actuators,
            alarm: decision.alarm,
            buzzer_hz,
        }));

        // 7. Telemetry
        self.publish_readings(&sample, telemetry, sink);

        self.last_sample = sample;
        self.last_decision = decision;
        decision
    }

    fn publish_readings(
        &self,
        sample: &SensorSample,
        telemetry: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
    ) {
        let readings = [
            (self.topics.temperature, format_reading(sample.temperature_c, 2)),
            (self.topics.humidity, format_reading(sample.humidity_pct, 2)),
            (
                self.topics.distance,
                format_reading(sample.distance_cm.unwrap_or(0.0), 0),
            ),
        ];
        for (topic, payload) in &readings {
            if telemetry.publish(topic, payload).is_err() {
                sink.emit(&AppEvent::PublishFailed { topic: *topic });
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn overrides(&self) -> OverrideState {
        self.overrides
    }

    pub fn last_decision(&self) -> Decision {
        self.last_decision
    }

    pub fn last_sample(&self) -> SensorSample {
        self.last_sample
    }

    pub fn alarm(&self) -> AlarmCondition {
        self.last_decision.alarm
    }

    /// Total control cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn tone(&self) -> &ToneScheduler {
        &self.tone
    }
}

fn format_reading(value: f32, decimals: usize) -> Payload {
    let mut out = Payload::new();
    let _ = write!(out, "{:.*}", decimals, value);
    out
}
