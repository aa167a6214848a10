//! Manual fan overrides: wire decoding and the single write path.
//!
//! The dashboard publishes `"ON"` / `"OFF"` on one topic per fan. This
//! module turns a raw `(topic, payload)` pair into an
//! [`AppCommand::SetOverride`], and [`OverrideState::apply`] is the only
//! place an override flag is ever written.

use log::debug;

use crate::config::Topics;

use super::commands::AppCommand;
use super::decision::OverrideState;

/// Which fan an override targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKey {
    TempFan,
    HumidityFan,
}

impl OverrideKey {
    pub fn from_topic(topic: &str, topics: &Topics) -> Option<Self> {
        if topic == topics.fan_temp_override {
            Some(Self::TempFan)
        } else if topic == topics.fan_humidity_override {
            Some(Self::HumidityFan)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TempFan => "temp_fan",
            Self::HumidityFan => "humidity_fan",
        }
    }
}

/// `"ON"` → `true`, `"OFF"` → `false` after trimming surrounding
/// whitespace. Case-sensitive; anything else is `None`.
pub fn parse_switch(payload: &[u8]) -> Option<bool> {
    let text = core::str::from_utf8(payload).ok()?;
    match text.trim() {
        "ON" => Some(true),
        "OFF" => Some(false),
        _ => None,
    }
}

/// Decode an inbound broker message. Unknown topics and unrecognised
/// payloads yield `None` and are meant to be dropped silently.
pub fn decode(topic: &str, payload: &[u8], topics: &Topics) -> Option<AppCommand> {
    let key = OverrideKey::from_topic(topic, topics)?;
    let Some(on) = parse_switch(payload) else {
        debug!("override: ignoring payload {:?} on '{}'", payload, topic);
        return None;
    };
    Some(AppCommand::SetOverride { key, on })
}

impl OverrideState {
    /// Set one flag. Returns `true` if the value changed.
    pub fn apply(&mut self, key: OverrideKey, on: bool) -> bool {
        let slot = match key {
            OverrideKey::TempFan => &mut self.fan_by_temp,
            OverrideKey::HumidityFan => &mut self.fan_by_humidity,
        };
        let changed = *slot != on;
        *slot = on;
        changed
    }

    pub fn get(&self, key: OverrideKey) -> bool {
        match key {
            OverrideKey::TempFan => self.fan_by_temp,
            OverrideKey::HumidityFan => self.fan_by_humidity,
        }
    }
}
