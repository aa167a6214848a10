//! Outbound application events.
//!
//! The [`ControllerService`](super::service::ControllerService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them: log to serial, forward to a
//! dashboard, etc.

use super::decision::{ActuatorState, AlarmCondition, SensorSample};
use super::overrides::OverrideKey;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// One control cycle completed.
    Cycle(CycleReport),

    /// The active alarm condition changed.
    AlarmChanged {
        from: AlarmCondition,
        to: AlarmCondition,
    },

    /// A manual override flag changed value.
    OverrideChanged { key: OverrideKey, on: bool },

    /// A telemetry publish failed; the cycle carried on.
    PublishFailed { topic: &'static str },

    /// The service has started.
    Started,
}

/// Everything one cycle read and decided, for the diagnostic log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub sample: SensorSample,
    pub actuators: ActuatorState,
    pub alarm: AlarmCondition,
    /// Buzzer frequency driven this cycle (`None` = silent).
    pub buzzer_hz: Option<u32>,
}
