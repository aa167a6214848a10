//! Integration tests: ControllerService against the real adapters, with
//! sensors faked at the driver trait and GPIO/LEDC/MQTT on the host sim.

use walet::adapters::hardware::HardwareAdapter;
use walet::adapters::mqtt::MqttAdapter;
use walet::adapters::time::Esp32TimeAdapter;
use walet::app::events::AppEvent;
use walet::app::service::ControllerService;
use walet::config::SystemConfig;
use walet::drivers::buzzer::BuzzerDriver;
use walet::drivers::hw_init;
use walet::drivers::relay::RelayDriver;
use walet::error::SensorError;
use walet::sensors::dht22::ClimateReading;
use walet::sensors::{ClimateSensor, RangeSensor, SensorHub};

use crate::mock_hw::{MockDisplay, MockHardware, MockTelemetry, RecordingSink};

const TEMP_FAN_PIN: i32 = 32;
const HUMIDITY_FAN_PIN: i32 = 33;

struct FakeDht {
    next: Result<ClimateReading, SensorError>,
}

impl ClimateSensor for FakeDht {
    fn read_climate(&mut self, _now_ms: u32) -> Result<ClimateReading, SensorError> {
        self.next
    }
}

struct FakeSonar {
    next: Result<f32, SensorError>,
}

impl RangeSensor for FakeSonar {
    fn measure_cm(&mut self) -> Result<f32, SensorError> {
        self.next
    }
}

fn climate(t: f32, h: f32) -> Result<ClimateReading, SensorError> {
    Ok(ClimateReading {
        temperature_c: t,
        humidity_pct: h,
    })
}

// LEDC and the GPIO bank are process-wide in the sim, so this is the only
// test in the binary that drives them.
#[test]
fn relays_and_buzzer_follow_the_decision() {
    let config = SystemConfig::default();
    let hub = SensorHub::new(
        FakeDht {
            next: climate(33.0, 70.0),
        },
        FakeSonar { next: Ok(50.0) },
        Esp32TimeAdapter::new(),
    );
    let mut hw = HardwareAdapter::new(
        hub,
        RelayDriver::new(TEMP_FAN_PIN),
        RelayDriver::new(HUMIDITY_FAN_PIN),
        BuzzerDriver::new(),
    );
    let mut svc = ControllerService::new(&config);
    let mut display = MockDisplay::default();
    let mut telemetry = MockTelemetry::default();
    let mut sink = RecordingSink::default();

    // Hot: temperature relay closes, buzzer starts on the first toggle.
    svc.tick(0, &mut hw, &mut display, &mut telemetry, &mut sink);
    assert!(hw.temp_fan_on());
    assert!(hw_init::gpio_read(TEMP_FAN_PIN));
    assert!(!hw_init::gpio_read(HUMIDITY_FAN_PIN));
    assert_eq!(hw.buzzer_hz(), None);

    svc.tick(150, &mut hw, &mut display, &mut telemetry, &mut sink);
    assert_eq!(hw.buzzer_hz(), Some(3_500));
    assert_eq!(hw_init::sim_buzzer().0, 3_500);
    assert!(hw_init::sim_buzzer().1 > 0);

    // DHT fault: NaN in, both fans released, buzzer silenced.
    svc.tick(300, &mut hw, &mut display, &mut telemetry, &mut sink);
    assert_eq!(hw.buzzer_hz(), None);
    hw_sensor_fault(&mut hw);
    svc.tick(450, &mut hw, &mut display, &mut telemetry, &mut sink);
    assert!(!hw.temp_fan_on());
    assert!(!hw_init::gpio_read(TEMP_FAN_PIN));
    assert_eq!(hw_init::sim_buzzer().1, 0);
    assert_eq!(
        hw.sensor_hub().climate_fault(),
        Some(SensorError::ChecksumMismatch)
    );
    assert_eq!(hw.sensor_hub().range_fault(), Some(SensorError::NoEcho));
    assert!(svc.last_sample().temperature_c.is_nan());
    assert_eq!(svc.last_sample().distance_cm, None);
    assert_eq!(telemetry.last_on("walet/suhu"), Some("NaN"));
    assert_eq!(telemetry.last_on("walet/jarak"), Some("0"));
}

fn hw_sensor_fault<K: walet::sensors::MicrosClock>(
    hw: &mut HardwareAdapter<FakeDht, FakeSonar, K>,
) {
    let hub = hw.sensor_hub_mut();
    hub.climate_mut().next = Err(SensorError::ChecksumMismatch);
    hub.range_mut().next = Err(SensorError::NoEcho);
}

// The MQTT session flags and inbound queue are process-wide too.
#[test]
fn broker_overrides_and_outage_flow_through_one_loop() {
    let config = SystemConfig::default();
    let mut mqtt =
        MqttAdapter::start(&config.network, &config.topics, 1).expect("sim client starts");
    let mut svc = ControllerService::new(&config);
    let mut hw = MockHardware::new(walet::app::decision::SensorSample {
        temperature_c: 25.0,
        humidity_pct: 70.0,
        distance_cm: Some(20.0),
    });
    let mut display = MockDisplay::default();
    let mut sink = RecordingSink::default();

    mqtt.ensure_connected();
    assert_eq!(mqtt.sim_subscriptions().len(), 2);

    // Dashboard switches the temperature fan on; drained before the cycle.
    assert!(MqttAdapter::sim_inject("walet/kipas_suhu", b"ON"));
    assert!(MqttAdapter::sim_inject("walet/kipas_air", b"maybe"));
    let drained = mqtt.poll_inbound(|topic, payload| {
        svc.handle_message(topic, payload, &mut sink);
    });
    assert_eq!(drained, 2);
    svc.tick(0, &mut hw, &mut display, &mut mqtt, &mut sink);

    assert!(hw.temp_fan_on());
    assert!(!hw.humidity_fan_on());
    let published: Vec<_> = mqtt
        .sim_published()
        .iter()
        .map(|(t, p)| (t.as_str(), p.as_str()))
        .collect();
    assert_eq!(
        published,
        vec![
            ("walet/suhu", "25.00"),
            ("walet/kelembapan", "70.00"),
            ("walet/jarak", "20"),
        ]
    );

    // Broker drops: the cycle still runs and reports each lost publish.
    MqttAdapter::sim_drop_session();
    svc.tick(200, &mut hw, &mut display, &mut mqtt, &mut sink);
    let failed = sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::PublishFailed { .. }))
        .count();
    assert_eq!(failed, 3);
    assert!(hw.temp_fan_on());
    assert_eq!(svc.cycle_count(), 2);

    // Back up: subscriptions are renewed and the override survived.
    mqtt.ensure_connected();
    assert_eq!(mqtt.sim_subscriptions().len(), 4);
    svc.tick(400, &mut hw, &mut display, &mut mqtt, &mut sink);
    assert!(hw.temp_fan_on());
    assert_eq!(mqtt.sim_published().len(), 6);
}
