//! Passive piezo buzzer on an LEDC channel.
//!
//! A tone is a 50 % square wave at the requested pitch; silence is duty 0.
//! The timer is only retuned when the pitch actually changes, since the
//! alarm scheduler asks for the same state on most cycles.

use log::warn;

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

pub struct BuzzerDriver {
    current_hz: Option<u32>,
    tuned_hz: u32,
}

impl BuzzerDriver {
    pub fn new() -> Self {
        hw_init::ledc_set(hw_init::LEDC_CH_BUZZER, 0);
        Self {
            current_hz: None,
            tuned_hz: pins::BUZZER_BASE_FREQ_HZ,
        }
    }

    /// Sound `hz`, or go quiet with `None`.
    pub fn set(&mut self, hz: Option<u32>) -> Result<(), ActuatorError> {
        if hz == self.current_hz {
            return Ok(());
        }
        match hz {
            Some(freq) => {
                if freq != self.tuned_hz {
                    if !hw_init::ledc_set_freq(freq) {
                        warn!("buzzer: cannot tune to {} Hz", freq);
                        return Err(ActuatorError::PwmWriteFailed);
                    }
                    self.tuned_hz = freq;
                }
                if !hw_init::ledc_set(hw_init::LEDC_CH_BUZZER, pins::BUZZER_TONE_DUTY) {
                    return Err(ActuatorError::PwmWriteFailed);
                }
            }
            None => {
                if !hw_init::ledc_set(hw_init::LEDC_CH_BUZZER, 0) {
                    return Err(ActuatorError::PwmWriteFailed);
                }
            }
        }
        self.current_hz = hz;
        Ok(())
    }

    pub fn silence(&mut self) -> Result<(), ActuatorError> {
        self.set(None)
    }

    pub fn current(&self) -> Option<u32> {
        self.current_hz
    }
}

impl Default for BuzzerDriver {
    fn default() -> Self {
        Self::new()
    }
}
