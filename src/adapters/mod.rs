//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                  |
//! |-------------|--------------------|------------------------------|
//! | `display`   | DisplayPort        | HD44780 LCD over I²C         |
//! | `hardware`  | SensorPort         | DHT22, HC-SR04               |
//! |             | ActuatorPort       | Fan relays, LEDC buzzer      |
//! | `log_sink`  | EventSink          | Serial log output            |
//! | `mqtt`      | TelemetryPort      | ESP-IDF MQTT client          |
//! | `time`      | MicrosClock        | ESP32 high-resolution timer  |
//! | `wifi`      | -                  | ESP-IDF WiFi STA             |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
