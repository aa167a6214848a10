//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerService (domain)
//! ```
//!
//! Driven adapters (sensors, relays, buzzer, display, broker, log) implement
//! these traits.  The [`ControllerService`](super::service::ControllerService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::CommsError;

use super::decision::SensorSample;
use super::events::AppEvent;
use super::status::StatusLines;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Read every sensor once. Individual failures are encoded in the
    /// sample (`NaN` climate values, `None` distance), never returned.
    fn read_all(&mut self) -> SensorSample;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    fn set_temp_fan(&mut self, on: bool);

    fn set_humidity_fan(&mut self, on: bool);

    /// Drive the buzzer at `hz`, or silence it with `None`.
    fn set_buzzer(&mut self, hz: Option<u32>);

    /// Both relays open and the buzzer silent.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

pub trait DisplayPort {
    fn show(&mut self, lines: &StatusLines);
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (domain → broker)
// ───────────────────────────────────────────────────────────────

/// Outbound readings. Failures are reported, never retried here.
pub trait TelemetryPort {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
