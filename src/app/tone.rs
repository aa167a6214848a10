//! Non-blocking alarm tone scheduler.
//!
//! The main loop calls [`ToneScheduler::tick`] once per cycle with the
//! active [`AlarmCondition`] and a monotonic millisecond clock. The
//! scheduler toggles the buzzer between "sounding" and "silent" every
//! half-period of the active condition and returns the frequency the
//! buzzer should be playing (`None` = silent).
//!
//! | Condition | Pitch   | Half-period |
//! |-----------|---------|-------------|
//! | Hot       | 3500 Hz | 150 ms      |
//! | Dry       | 2000 Hz | 500 ms      |
//! | WaterLow  | 1000 Hz | 1000 ms     |
//! | None      | silent  | -           |
//!
//! Switching between active conditions does not reset the phase, so the
//! first period after a change may be short or carry the previous pitch
//! until the next toggle. While the condition is `None` the output is
//! forced silent and the toggle timer is frozen.

use super::decision::AlarmCondition;

/// Pitch and half-period for one alarm condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSpec {
    pub pitch_hz: u32,
    pub half_period_ms: u32,
}

/// Condition → tone. `None` for the quiet condition.
pub const fn tone_for(condition: AlarmCondition) -> Option<ToneSpec> {
    match condition {
        AlarmCondition::Hot => Some(ToneSpec {
            pitch_hz: 3500,
            half_period_ms: 150,
        }),
        AlarmCondition::Dry => Some(ToneSpec {
            pitch_hz: 2000,
            half_period_ms: 500,
        }),
        AlarmCondition::WaterLow => Some(ToneSpec {
            pitch_hz: 1000,
            half_period_ms: 1000,
        }),
        AlarmCondition::None => None,
    }
}

pub struct ToneScheduler {
    last_toggle_ms: u32,
    tone_on: bool,
    output: Option<u32>,
}

impl Default for ToneScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneScheduler {
    pub fn new() -> Self {
        Self {
            last_toggle_ms: 0,
            tone_on: false,
            output: None,
        }
    }

    /// Advance the scheduler and return the buzzer frequency to drive.
    ///
    /// `now_ms` wraps like a 32-bit `millis()` counter.
    pub fn tick(&mut self, condition: AlarmCondition, now_ms: u32) -> Option<u32> {
        match tone_for(condition) {
            Some(spec) => {
                if now_ms.wrapping_sub(self.last_toggle_ms) >= spec.half_period_ms {
                    self.last_toggle_ms = now_ms;
                    self.tone_on = !self.tone_on;
                    self.output = self.tone_on.then_some(spec.pitch_hz);
                }
            }
            None => self.output = None,
        }
        self.output
    }

    /// Phase bit: `true` during the sounding half of the period.
    pub fn is_tone_on(&self) -> bool {
        self.tone_on
    }

    pub fn last_toggle_ms(&self) -> u32 {
        self.last_toggle_ms
    }

    /// Frequency returned by the most recent `tick`.
    pub fn output(&self) -> Option<u32> {
        self.output
    }
}
