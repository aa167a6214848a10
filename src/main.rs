//! Walet firmware entry point
//!
//! Hexagonal architecture around a single sequential control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LcdDisplay     MqttAdapter    LogEventSink │
//! │  (Sensor+Actuator)  (Display)      (Telemetry)    (EventSink)  │
//! │  WifiAdapter        Esp32TimeAdapter                           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControllerService (pure logic)              │    │
//! │  │  decide · tone scheduler · overrides · status text     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each iteration: ensure the broker session, drain inbound override
//! messages, run one control cycle, sleep the cycle interval.

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::Ets;
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::units::Hertz;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::info;

use walet::adapters::display::LcdDisplay;
use walet::adapters::hardware::HardwareAdapter;
use walet::adapters::log_sink::LogEventSink;
use walet::adapters::mqtt::MqttAdapter;
use walet::adapters::time::Esp32TimeAdapter;
use walet::adapters::wifi::WifiAdapter;
use walet::app::ports::{ActuatorPort, DisplayPort};
use walet::app::service::ControllerService;
use walet::app::status;
use walet::config::SystemConfig;
use walet::drivers::buzzer::BuzzerDriver;
use walet::drivers::gpio::{BusyDelay, GpioPin};
use walet::drivers::hw_init;
use walet::drivers::relay::RelayDriver;
use walet::error::Error;
use walet::pins;
use walet::sensors::dht22::{Dht22, DhtLine};
use walet::sensors::ultrasonic::Ultrasonic;
use walet::sensors::SensorHub;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Walet climate node v{}           ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = SystemConfig::default();

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals().map_err(Error::from)?;

    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // SDA/SCL must match pins::I2C_SDA_GPIO / pins::I2C_SCL_GPIO.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let mut display = LcdDisplay::new(i2c, Ets, pins::LCD_I2C_ADDR).map_err(Error::from)?;
    display.show(&status::splash());

    // ── 3. Network ────────────────────────────────────────────
    let mut wifi = WifiAdapter::new(
        peripherals.modem,
        sys_loop,
        Some(nvs),
        &config.network,
        config.wifi_retry_ms,
    )
    .map_err(Error::from)?;
    wifi.connect_blocking().map_err(Error::from)?;

    let mut mqtt = MqttAdapter::start(&config.network, &config.topics, config.mqtt_retry_ms)?;

    // ── 4. Sensors and actuators ──────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let sensor_hub = SensorHub::new(
        Dht22::new(DhtLine::new(GpioPin::new(pins::DHT_GPIO), BusyDelay)),
        Ultrasonic::new(
            GpioPin::new(pins::ULTRASONIC_TRIG_GPIO),
            GpioPin::new(pins::ULTRASONIC_ECHO_GPIO),
            BusyDelay,
            clock,
            config.echo_timeout_us,
        ),
        clock,
    );
    let mut hw = HardwareAdapter::new(
        sensor_hub,
        RelayDriver::new(pins::RELAY_TEMP_FAN_GPIO),
        RelayDriver::new(pins::RELAY_HUMIDITY_FAN_GPIO),
        BuzzerDriver::new(),
    );
    hw.all_off();

    // ── 5. Controller ─────────────────────────────────────────
    let mut log_sink = LogEventSink::new();
    let mut controller = ControllerService::new(&config);
    controller.start(&mut log_sink);
    display.clear();

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    let cycle = std::time::Duration::from_millis(u64::from(config.cycle_interval_ms));
    loop {
        mqtt.ensure_connected();

        mqtt.poll_inbound(|topic, payload| {
            controller.handle_message(topic, payload, &mut log_sink);
        });

        controller.tick(
            clock.uptime_ms(),
            &mut hw,
            &mut display,
            &mut mqtt,
            &mut log_sink,
        );

        std::thread::sleep(cycle);
    }
}
