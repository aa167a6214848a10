//! Integration tests: ControllerService → ports, with every adapter mocked.

use walet::app::commands::AppCommand;
use walet::app::decision::{AlarmCondition, OverrideState, SensorSample};
use walet::app::events::AppEvent;
use walet::app::overrides::OverrideKey;
use walet::app::ports::ActuatorPort;
use walet::app::service::ControllerService;
use walet::config::SystemConfig;

use crate::mock_hw::{ActuatorCall, MockDisplay, MockHardware, MockTelemetry, RecordingSink};

// ── Rig ───────────────────────────────────────────────────────

struct Rig {
    svc: ControllerService,
    hw: MockHardware,
    display: MockDisplay,
    telemetry: MockTelemetry,
    sink: RecordingSink,
}

impl Rig {
    fn new(t: f32, h: f32, d: Option<f32>) -> Self {
        let mut rig = Self {
            svc: ControllerService::new(&SystemConfig::default()),
            hw: MockHardware::new(sample(t, h, d)),
            display: MockDisplay::default(),
            telemetry: MockTelemetry::default(),
            sink: RecordingSink::default(),
        };
        rig.svc.start(&mut rig.sink);
        rig
    }

    fn cycle(&mut self, now_ms: u32) {
        self.svc.tick(
            now_ms,
            &mut self.hw,
            &mut self.display,
            &mut self.telemetry,
            &mut self.sink,
        );
    }

    fn message(&mut self, topic: &str, payload: &[u8]) -> bool {
        self.svc.handle_message(topic, payload, &mut self.sink)
    }

    fn override_events(&self) -> usize {
        self.sink
            .events
            .iter()
            .filter(|e| matches!(e, AppEvent::OverrideChanged { .. }))
            .count()
    }
}

fn sample(t: f32, h: f32, d: Option<f32>) -> SensorSample {
    SensorSample {
        temperature_c: t,
        humidity_pct: h,
        distance_cm: d,
    }
}

// ── Decision → outputs ────────────────────────────────────────

#[test]
fn hot_and_dry_sample_drives_both_fans_and_hot_banner() {
    let mut rig = Rig::new(33.0, 50.0, Some(100.0));
    rig.cycle(0);

    assert!(rig.hw.temp_fan_on());
    assert!(rig.hw.humidity_fan_on());
    assert_eq!(rig.svc.alarm(), AlarmCondition::Hot);
    assert_eq!(rig.display.bottom(), "ALARM: PANAS!   ");
    assert_eq!(rig.display.top(), "T:33.0C H:50%   ");
}

#[test]
fn all_off_after_alarm_releases_every_output() {
    let mut rig = Rig::new(33.0, 50.0, Some(100.0));
    rig.cycle(0);
    rig.cycle(150);
    assert!(rig.hw.temp_fan_on());
    assert_eq!(rig.hw.buzzer(), Some(3_500));

    rig.hw.all_off();
    assert!(!rig.hw.temp_fan_on());
    assert!(!rig.hw.humidity_fan_on());
    assert_eq!(rig.hw.buzzer(), None);

    // The next cycle drives the outputs again.
    rig.cycle(200);
    assert!(rig.hw.temp_fan_on());
}

#[test]
fn comfortable_sample_is_safe_and_quiet() {
    let mut rig = Rig::new(27.0, 75.0, Some(50.0));
    for i in 0..10 {
        rig.cycle(i * 200);
    }
    assert!(!rig.hw.temp_fan_on());
    assert!(!rig.hw.humidity_fan_on());
    assert_eq!(rig.hw.buzzer(), None);
    assert_eq!(rig.display.bottom(), "Sistem: Aman    ");
    assert_eq!(rig.svc.cycle_count(), 10);
    assert_eq!(rig.hw.reads, 10);
}

#[test]
fn water_low_band_raises_alarm() {
    let mut rig = Rig::new(27.0, 75.0, Some(81.0));
    rig.cycle(0);
    assert_eq!(rig.svc.alarm(), AlarmCondition::WaterLow);
    assert_eq!(rig.display.bottom(), "ALARM: AIR LOW  ");

    rig.hw.sample.distance_cm = Some(400.0);
    rig.cycle(200);
    assert_eq!(rig.svc.alarm(), AlarmCondition::None);
}

#[test]
fn failed_sensor_reads_drive_nothing() {
    let mut rig = Rig::new(f32::NAN, f32::NAN, None);
    rig.cycle(0);
    assert!(!rig.hw.temp_fan_on());
    assert!(!rig.hw.humidity_fan_on());
    assert_eq!(rig.svc.alarm(), AlarmCondition::None);
    assert_eq!(rig.display.top(), "T:--.-C H:--%   ");
    assert_eq!(rig.telemetry.last_on("walet/jarak"), Some("0"));
}

// ── Overrides ─────────────────────────────────────────────────

#[test]
fn temp_override_persists_until_off() {
    let mut rig = Rig::new(25.0, 70.0, None);
    assert!(rig.message("walet/kipas_suhu", b"ON"));

    for i in 0..25 {
        rig.cycle(i * 200);
        assert!(rig.hw.temp_fan_on(), "override lost at cycle {i}");
        assert!(!rig.hw.humidity_fan_on());
    }

    assert!(rig.message("walet/kipas_suhu", b"OFF"));
    rig.cycle(5_000);
    assert!(!rig.hw.temp_fan_on());
}

#[test]
fn humidity_override_forces_fan() {
    let mut rig = Rig::new(25.0, 90.0, None);
    rig.message("walet/kipas_air", b"ON");
    rig.cycle(0);
    assert!(rig.hw.humidity_fan_on());
    assert_eq!(
        rig.svc.overrides(),
        OverrideState {
            fan_by_temp: false,
            fan_by_humidity: true,
        }
    );
}

#[test]
fn override_cannot_switch_fan_off_above_threshold() {
    let mut rig = Rig::new(31.0, 70.0, None);
    rig.message("walet/kipas_suhu", b"OFF");
    rig.cycle(0);
    assert!(rig.hw.temp_fan_on());
}

#[test]
fn unrecognised_payloads_leave_state_unchanged() {
    let mut rig = Rig::new(25.0, 70.0, None);
    rig.message("walet/kipas_suhu", b"ON");
    let before = rig.svc.overrides();
    let events_before = rig.override_events();

    let payloads: [&[u8]; 6] = [b"on", b"1", b"", b"Off", b"ONN", b"\xff\xfe"];
    for payload in payloads {
        assert!(!rig.message("walet/kipas_suhu", payload));
        assert!(!rig.message("walet/kipas_air", payload));
    }
    assert!(!rig.message("walet/unknown", b"OFF"));

    assert_eq!(rig.svc.overrides(), before);
    assert_eq!(rig.override_events(), events_before);
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let mut rig = Rig::new(25.0, 70.0, None);
    assert!(rig.message("walet/kipas_suhu", b"  ON\r\n"));
    assert!(rig.svc.overrides().fan_by_temp);
}

#[test]
fn repeated_override_emits_one_event() {
    let mut rig = Rig::new(25.0, 70.0, None);
    rig.svc.handle_command(
        AppCommand::SetOverride {
            key: OverrideKey::TempFan,
            on: true,
        },
        &mut rig.sink,
    );
    rig.message("walet/kipas_suhu", b"ON");
    assert_eq!(rig.override_events(), 1);
}

// ── Buzzer ────────────────────────────────────────────────────

#[test]
fn hot_alarm_buzzer_alternates_every_150ms() {
    let mut rig = Rig::new(35.0, 70.0, None);
    let mut toggles = 0;
    let mut prev = None;
    for t in (0..=1_500).step_by(50) {
        rig.cycle(t);
        let now = rig.hw.buzzer();
        if now != prev {
            toggles += 1;
            assert!(matches!(now, Some(3_500) | None));
        }
        prev = now;
    }
    assert_eq!(toggles, 10);
}

#[test]
fn alarm_clearing_silences_immediately() {
    let mut rig = Rig::new(35.0, 70.0, None);
    rig.cycle(0);
    rig.cycle(150);
    assert_eq!(rig.hw.buzzer(), Some(3_500));

    rig.hw.sample.temperature_c = 25.0;
    rig.cycle(200);
    assert_eq!(rig.hw.buzzer(), None);
    assert!(!rig.hw.calls.contains(&ActuatorCall::AllOff));
}

#[test]
fn alarm_changes_are_reported() {
    let mut rig = Rig::new(35.0, 70.0, None);
    rig.cycle(0);
    rig.cycle(200);
    rig.hw.sample.temperature_c = 25.0;
    rig.cycle(400);

    let changes: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::AlarmChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (AlarmCondition::None, AlarmCondition::Hot),
            (AlarmCondition::Hot, AlarmCondition::None),
        ]
    );
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn every_cycle_publishes_three_readings() {
    let mut rig = Rig::new(28.456, 65.0, Some(123.0));
    rig.cycle(0);
    rig.cycle(200);

    assert_eq!(rig.telemetry.published.len(), 6);
    assert_eq!(rig.telemetry.last_on("walet/suhu"), Some("28.46"));
    assert_eq!(rig.telemetry.last_on("walet/kelembapan"), Some("65.00"));
    assert_eq!(rig.telemetry.last_on("walet/jarak"), Some("123"));
}

#[test]
fn publish_failure_is_reported_and_cycle_continues() {
    let mut rig = Rig::new(33.0, 50.0, Some(100.0));
    rig.telemetry.failing.push("walet/kelembapan");
    rig.cycle(0);

    assert!(rig.sink.events.contains(&AppEvent::PublishFailed {
        topic: "walet/kelembapan"
    }));
    assert_eq!(rig.telemetry.last_on("walet/suhu"), Some("33.00"));
    assert_eq!(rig.telemetry.last_on("walet/jarak"), Some("100"));
    assert!(rig.hw.temp_fan_on());
    assert!(
        rig.sink
            .events
            .iter()
            .any(|e| matches!(e, AppEvent::Cycle(r) if r.cycle == 1))
    );
}

#[test]
fn started_is_first_event() {
    let rig = Rig::new(25.0, 70.0, None);
    assert_eq!(rig.sink.events.first(), Some(&AppEvent::Started));
}
