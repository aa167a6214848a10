//! GPIO / peripheral pin assignments for the Walet node (ESP32 DevKit).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Relays (active HIGH)
// ---------------------------------------------------------------------------

/// Relay for the temperature fan.
pub const RELAY_TEMP_FAN_GPIO: i32 = 26;
/// Relay for the humidity fan / mister.
pub const RELAY_HUMIDITY_FAN_GPIO: i32 = 25;

// ---------------------------------------------------------------------------
// Buzzer
// ---------------------------------------------------------------------------

/// Passive piezo buzzer driven by an LEDC channel.
pub const BUZZER_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT22 single-wire data line (open-drain, external pull-up).
pub const DHT_GPIO: i32 = 4;

/// HC-SR04 trigger (output).
pub const ULTRASONIC_TRIG_GPIO: i32 = 18;
/// HC-SR04 echo (input).
pub const ULTRASONIC_ECHO_GPIO: i32 = 19;

// ---------------------------------------------------------------------------
// I²C bus (16x2 LCD with PCF8574 backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 21;
pub const I2C_SCL_GPIO: i32 = 22;
/// 7-bit address of the PCF8574 backpack.
pub const LCD_I2C_ADDR: u8 = 0x27;
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// Initial LEDC frequency for the buzzer timer; retuned per tone.
pub const BUZZER_BASE_FREQ_HZ: u32 = 2_000;
/// Square-wave duty while a tone is sounding (50 %).
pub const BUZZER_TONE_DUTY: u8 = 128;
