//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions and the buzzer LEDC timer/channel using raw
//! ESP-IDF sys calls. Called once from `main()` before the control loop
//! starts. The I²C bus for the display is owned by esp-idf-hal and set up
//! separately in `main()`.
//!
//! On host builds every helper is backed by static atomics so drivers and
//! tests can observe and inject pin levels.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_gpio_open_drain()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO config helper ────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn configure(pin: i32, mode: gpio_mode_t, pull_up: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode,
        pull_up_en: if pull_up {
            gpio_pullup_t_GPIO_PULLUP_ENABLE
        } else {
            gpio_pullup_t_GPIO_PULLUP_DISABLE
        },
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    unsafe { configure(pins::ULTRASONIC_ECHO_GPIO, gpio_mode_t_GPIO_MODE_INPUT, false)? };
    info!("hw_init: GPIO inputs configured (echo={})", pins::ULTRASONIC_ECHO_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [
        pins::RELAY_TEMP_FAN_GPIO,
        pins::RELAY_HUMIDITY_FAN_GPIO,
        pins::ULTRASONIC_TRIG_GPIO,
    ];

    for &pin in &output_pins {
        unsafe {
            configure(pin, gpio_mode_t_GPIO_MODE_OUTPUT, false)?;
            gpio_set_level(pin, 0);
        }
    }

    info!("hw_init: GPIO outputs configured (relays off)");
    Ok(())
}

/// The DHT22 data line is driven low by either side and released to the
/// pull-up, so it is configured as open-drain input/output.
#[cfg(target_os = "espidf")]
unsafe fn init_gpio_open_drain() -> Result<(), HwInitError> {
    unsafe {
        configure(pins::DHT_GPIO, gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD, true)?;
        gpio_set_level(pins::DHT_GPIO, 1);
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was configured during init_peripherals(). Main-loop only.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

// ── LEDC PWM (buzzer) ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
const BUZZER_TIMER: ledc_timer_t = ledc_timer_t_LEDC_TIMER_0;

pub const LEDC_CH_BUZZER: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: BUZZER_TIMER,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::BUZZER_BASE_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: Called from single main-task context via init_peripherals().
    let ret = unsafe { ledc_timer_config(&timer) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_BUZZER,
        timer_sel: BUZZER_TIMER,
        gpio_num: pins::BUZZER_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 { return Err(HwInitError::LedcInitFailed(ret)); }

    info!(
        "hw_init: LEDC configured (buzzer=CH{} on GPIO{}, {}-bit)",
        LEDC_CH_BUZZER,
        pins::BUZZER_GPIO,
        pins::PWM_RESOLUTION_BITS
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) -> bool {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32) == ESP_OK as i32
            && ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) == ESP_OK as i32
    }
}

/// Retune the buzzer timer. Returns `false` if the driver rejected `hz`.
#[cfg(target_os = "espidf")]
pub fn ledc_set_freq(hz: u32) -> bool {
    // SAFETY: timer configured in init_ledc(); main loop is the only caller.
    unsafe { esp_idf_svc::sys::ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, BUZZER_TIMER, hz) == ESP_OK as i32 }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU8, AtomicU32, AtomicU64, Ordering};

    /// One bit per GPIO number.
    static LEVELS: AtomicU64 = AtomicU64::new(0);
    static LEDC_FREQ_HZ: AtomicU32 = AtomicU32::new(crate::pins::BUZZER_BASE_FREQ_HZ);
    static LEDC_DUTY: AtomicU8 = AtomicU8::new(0);

    pub fn set_level(pin: i32, high: bool) {
        let bit = 1u64 << pin;
        if high {
            LEVELS.fetch_or(bit, Ordering::Relaxed);
        } else {
            LEVELS.fetch_and(!bit, Ordering::Relaxed);
        }
    }

    pub fn level(pin: i32) -> bool {
        LEVELS.load(Ordering::Relaxed) & (1u64 << pin) != 0
    }

    pub fn set_freq(hz: u32) {
        LEDC_FREQ_HZ.store(hz, Ordering::Relaxed);
    }

    pub fn freq() -> u32 {
        LEDC_FREQ_HZ.load(Ordering::Relaxed)
    }

    pub fn set_duty(duty: u8) {
        LEDC_DUTY.store(duty, Ordering::Relaxed);
    }

    pub fn duty() -> u8 {
        LEDC_DUTY.load(Ordering::Relaxed)
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::level(pin)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set_level(pin, high);
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, duty: u8) -> bool {
    sim::set_duty(duty);
    true
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_freq(hz: u32) -> bool {
    if hz == 0 {
        return false;
    }
    sim::set_freq(hz);
    true
}

/// Inject an input level (e.g. the echo line) for host tests.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_level(pin: i32, high: bool) {
    sim::set_level(pin, high);
}

/// Current simulated buzzer output as `(freq_hz, duty)`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_buzzer() -> (u32, u8) {
    (sim::freq(), sim::duty())
}
