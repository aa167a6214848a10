//! Status text for the 16x2 character display.
//!
//! Line 1 carries the climate reading, line 2 the active alarm or the
//! "aman" banner. Both lines are always exactly [`LCD_COLS`] characters,
//! space padded, so a shorter line fully overwrites a longer one.

use core::fmt::Write;

use super::decision::{AlarmCondition, SensorSample};

pub const LCD_COLS: usize = 16;

pub type LcdLine = heapless::String<LCD_COLS>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLines {
    pub top: LcdLine,
    pub bottom: LcdLine,
}

impl AlarmCondition {
    /// Second-line banner.
    pub fn banner(self) -> &'static str {
        match self {
            Self::Hot => "ALARM: PANAS!",
            Self::Dry => "ALARM: KERING!",
            Self::WaterLow => "ALARM: AIR LOW",
            Self::None => "Sistem: Aman",
        }
    }
}

/// Shown while Wi-Fi and the broker come up.
pub fn splash() -> StatusLines {
    StatusLines {
        top: fit("Sistem Starting"),
        bottom: fit(""),
    }
}

pub fn render(sample: &SensorSample, alarm: AlarmCondition) -> StatusLines {
    StatusLines {
        top: climate_line(sample.temperature_c, sample.humidity_pct),
        bottom: fit(alarm.banner()),
    }
}

fn climate_line(temperature_c: f32, humidity_pct: f32) -> LcdLine {
    let mut buf: heapless::String<32> = heapless::String::new();
    // Overflow only loses the tail, which `fit` would cut anyway.
    let _ = match (temperature_c.is_finite(), humidity_pct.is_finite()) {
        (true, true) => write!(buf, "T:{:.1}C H:{:.0}%", temperature_c, humidity_pct),
        (true, false) => write!(buf, "T:{:.1}C H:--%", temperature_c),
        (false, true) => write!(buf, "T:--.-C H:{:.0}%", humidity_pct),
        (false, false) => write!(buf, "T:--.-C H:--%"),
    };
    fit(&buf)
}

/// Truncate to the display width and pad with spaces.
fn fit(text: &str) -> LcdLine {
    let mut line = LcdLine::new();
    for ch in text.chars() {
        if line.push(ch).is_err() {
            break;
        }
    }
    while line.push(' ').is_ok() {}
    line
}
