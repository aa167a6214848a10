//! System configuration parameters
//!
//! All tunable parameters for the Walet climate node. Thresholds are
//! compiled in; network credentials accept build-time overrides through
//! `WALET_*` environment variables.

/// Fixed decision thresholds.
///
/// These describe one particular swiftlet house (fan sizing, tank
/// geometry) and are not adjustable at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Temperature fan switches on strictly above this (°C).
    pub fan_temp_above_c: f32,
    /// Humidity fan switches on strictly below this (%RH).
    pub fan_humidity_below_pct: f32,
    /// "Hot" alarm strictly above this (°C).
    pub hot_above_c: f32,
    /// "Dry" alarm strictly below this (%RH).
    pub dry_below_pct: f32,
    /// Lower exclusive bound of the water-low window (cm).
    pub water_low_min_cm: f32,
    /// Upper exclusive bound of the water-low window (cm).
    pub water_low_max_cm: f32,
}

impl Thresholds {
    pub const DEFAULT: Self = Self {
        fan_temp_above_c: 30.0,
        fan_humidity_below_pct: 60.0,
        hot_above_c: 32.0,
        dry_below_pct: 60.0,
        water_low_min_cm: 80.0,
        water_low_max_cm: 400.0,
    };
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// MQTT topic names, inbound and outbound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    /// Inbound: manual override for the temperature fan.
    pub fan_temp_override: &'static str,
    /// Inbound: manual override for the humidity fan.
    pub fan_humidity_override: &'static str,
    /// Outbound: temperature reading.
    pub temperature: &'static str,
    /// Outbound: humidity reading.
    pub humidity: &'static str,
    /// Outbound: tank distance reading.
    pub distance: &'static str,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            fan_temp_override: "walet/kipas_suhu",
            fan_humidity_override: "walet/kipas_air",
            temperature: "walet/suhu",
            humidity: "walet/kelembapan",
            distance: "walet/jarak",
        }
    }
}

/// Wi-Fi and broker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub wifi_ssid: &'static str,
    pub wifi_password: &'static str,
    /// Full broker URL, e.g. `mqtt://broker.emqx.io:1883`.
    pub mqtt_url: &'static str,
    pub mqtt_client_id: &'static str,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: match option_env!("WALET_WIFI_SSID") {
                Some(s) => s,
                None => "Wokwi-GUEST",
            },
            wifi_password: match option_env!("WALET_WIFI_PASS") {
                Some(s) => s,
                None => "",
            },
            mqtt_url: match option_env!("WALET_MQTT_URL") {
                Some(s) => s,
                None => "mqtt://broker.emqx.io:1883",
            },
            mqtt_client_id: match option_env!("WALET_MQTT_CLIENT_ID") {
                Some(s) => s,
                None => "ESP32_Walet_Final_Sopia",
            },
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SystemConfig {
    pub thresholds: Thresholds,
    pub topics: Topics,
    pub network: NetworkConfig,

    // --- Timing ---
    /// Sleep between control cycles (milliseconds)
    pub cycle_interval_ms: u32,
    /// Delay between Wi-Fi association attempts at boot (milliseconds)
    pub wifi_retry_ms: u32,
    /// Delay between broker reconnect attempts (milliseconds)
    pub mqtt_retry_ms: u32,
    /// Ultrasonic echo timeout (microseconds)
    pub echo_timeout_us: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            topics: Topics::default(),
            network: NetworkConfig::default(),

            cycle_interval_ms: 200,
            wifi_retry_ms: 500,
            mqtt_retry_ms: 2000,
            echo_timeout_us: 1_000_000,
        }
    }
}
