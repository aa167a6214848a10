//! Application core. Pure domain logic, zero I/O.
//!
//! This module contains the business rules for the Walet node: the
//! threshold decision engine, the alarm tone scheduler, override handling
//! and status rendering.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod decision;
pub mod events;
pub mod overrides;
pub mod ports;
pub mod service;
pub mod status;
pub mod tone;
