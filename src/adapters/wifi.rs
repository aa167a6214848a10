//! WiFi station-mode adapter.
//!
//! Brings the station link up before the broker session is attempted.
//! Association is retried at a fixed interval with no upper bound; the
//! node has nothing useful to do offline.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **all other targets**: simulation stubs for host-side tests.

use core::fmt;
use log::{error, info, warn};

use crate::config::NetworkConfig;
use crate::error::{CommsError, Error};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    /// The driver rejected the configuration or failed to start.
    DriverFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::DriverFailed => write!(f, "WiFi driver failed"),
        }
    }
}

impl From<ConnectivityError> for Error {
    fn from(e: ConnectivityError) -> Self {
        error!("WiFi: {}", e);
        Self::Comms(CommsError::WifiConnectFailed)
    }
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting { attempt: u32 },
    Connected,
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    state: WifiState,
    retry_ms: u32,
    /// Simulation: refuse this many association attempts.
    #[cfg(not(target_os = "espidf"))]
    sim_refuse: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sys_loop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        network: &NetworkConfig,
        retry_ms: u32,
    ) -> Result<Self, ConnectivityError> {
        let (ssid, password) = credentials(network)?;
        let esp_wifi = EspWifi::new(modem, sys_loop.clone(), nvs).map_err(|e| {
            error!("WiFi: driver init failed: {}", e);
            ConnectivityError::DriverFailed
        })?;
        let wifi = BlockingWifi::wrap(esp_wifi, sys_loop).map_err(|e| {
            error!("WiFi: event loop wrap failed: {}", e);
            ConnectivityError::DriverFailed
        })?;
        Ok(Self {
            wifi,
            ssid,
            password,
            state: WifiState::Disconnected,
            retry_ms,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(network: &NetworkConfig, retry_ms: u32) -> Result<Self, ConnectivityError> {
        let (ssid, password) = credentials(network)?;
        Ok(Self {
            ssid,
            password,
            state: WifiState::Disconnected,
            retry_ms,
            sim_refuse: 0,
        })
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }

    /// Configure the station and block until it associates. Only a driver
    /// failure returns; an absent AP is retried forever.
    pub fn connect_blocking(&mut self) -> Result<(), ConnectivityError> {
        self.platform_start()?;
        info!("WiFi: connecting to '{}'", self.ssid);

        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.wrapping_add(1);
            self.state = WifiState::Connecting { attempt };
            if self.platform_try_connect() {
                break;
            }
            if attempt == 1 || attempt % 20 == 0 {
                warn!("WiFi: not associated yet (attempt {}), retrying every {} ms", attempt, self.retry_ms);
            }
            std::thread::sleep(std::time::Duration::from_millis(u64::from(self.retry_ms)));
        }

        self.state = WifiState::Connected;
        info!("WiFi: connected after {} attempt(s)", attempt);
        Ok(())
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let conf = Configuration::Client(ClientConfiguration {
            ssid: self.ssid.as_str().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|_| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        });
        self.wifi.set_configuration(&conf).map_err(|e| {
            error!("WiFi: set_configuration failed: {}", e);
            ConnectivityError::DriverFailed
        })?;
        self.wifi.start().map_err(|e| {
            error!("WiFi: start failed: {}", e);
            ConnectivityError::DriverFailed
        })
    }

    #[cfg(target_os = "espidf")]
    fn platform_try_connect(&mut self) -> bool {
        match self.wifi.connect().and_then(|()| self.wifi.wait_netif_up()) {
            Ok(()) => true,
            Err(_) => {
                let _ = self.wifi.disconnect();
                false
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): station started");
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_try_connect(&mut self) -> bool {
        if self.sim_refuse > 0 {
            self.sim_refuse -= 1;
            return false;
        }
        true
    }

    /// Refuse the next `n` association attempts.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_refuse(&mut self, n: u32) {
        self.sim_refuse = n;
    }
}

type Credentials = (heapless::String<32>, heapless::String<64>);

fn credentials(network: &NetworkConfig) -> Result<Credentials, ConnectivityError> {
    validate_ssid(network.wifi_ssid)?;
    validate_password(network.wifi_password)?;
    let mut ssid = heapless::String::new();
    ssid.push_str(network.wifi_ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
    let mut password = heapless::String::new();
    password.push_str(network.wifi_password).map_err(|_| ConnectivityError::InvalidPassword)?;
    Ok((ssid, password))
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
