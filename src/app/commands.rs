//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (currently the
//! MQTT dashboard) that the [`ControllerService`](super::service::ControllerService)
//! applies between control cycles.

use super::overrides::OverrideKey;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Force a fan on (`on = true`) or hand it back to its threshold.
    SetOverride { key: OverrideKey, on: bool },
}
