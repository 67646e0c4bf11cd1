use heapless::String;

use crate::error::ConfigError;

pub const SSID_MAX_LEN: usize = 32;
pub const PASSPHRASE_MAX_LEN: usize = 64;

pub const MODE_QUEUE_DEPTH: usize = 4;
pub const LINK_QUEUE_DEPTH: usize = 8;

// Radio stacks do not finish teardown synchronously; give them time to drain.
pub const MODE_SETTLE_MS: u32 = 1_000;
pub const INJECT_STABILIZE_MS: u32 = 100;

pub const AP_INACTIVITY_TIMEOUT_MS: u64 = 60_000;
pub const AP_MAX_CLIENTS: u8 = 5;
pub const STA_MAX_ATTEMPTS: u8 = 5;

/// Stand-in for an empty SSID handed to [`AccessPointSettings::clamped`].
pub const FALLBACK_AP_SSID: &str = "badge";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Open,
    WpaWpa2Personal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessPointSettings {
    ssid: String<SSID_MAX_LEN>,
    passphrase: String<PASSPHRASE_MAX_LEN>,
    max_clients: u8,
}

impl AccessPointSettings {
    pub fn new(ssid: &str, passphrase: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            ssid: checked_ssid(ssid)?,
            passphrase: checked_passphrase(passphrase)?,
            max_clients: AP_MAX_CLIENTS,
        })
    }

    /// Never fails: over-long values are cut at the last char boundary that
    /// fits and an empty SSID becomes [`FALLBACK_AP_SSID`].
    pub fn clamped(ssid: &str, passphrase: &str) -> Self {
        let ssid = if ssid.is_empty() { FALLBACK_AP_SSID } else { ssid };
        Self {
            ssid: truncated(ssid),
            passphrase: truncated(passphrase),
            max_clients: AP_MAX_CLIENTS,
        }
    }

    pub fn with_max_clients(mut self, max_clients: u8) -> Self {
        self.max_clients = max_clients.max(1);
        self
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn max_clients(&self) -> u8 {
        self.max_clients
    }

    /// An empty passphrase is an operator choice for an open network.
    pub fn auth_mode(&self) -> AuthMode {
        auth_mode_for(&self.passphrase)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationSettings {
    ssid: String<SSID_MAX_LEN>,
    passphrase: String<PASSPHRASE_MAX_LEN>,
}

impl StationSettings {
    pub fn new(ssid: &str, passphrase: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            ssid: checked_ssid(ssid)?,
            passphrase: checked_passphrase(passphrase)?,
        })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn auth_mode(&self) -> AuthMode {
        auth_mode_for(&self.passphrase)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WirelessTiming {
    pub settle_ms: u32,
    pub inject_stabilize_ms: u32,
    pub inactivity_timeout_ms: u64,
    pub max_attempts: u8,
}

impl WirelessTiming {
    pub const fn defaults() -> Self {
        Self {
            settle_ms: MODE_SETTLE_MS,
            inject_stabilize_ms: INJECT_STABILIZE_MS,
            inactivity_timeout_ms: AP_INACTIVITY_TIMEOUT_MS,
            max_attempts: STA_MAX_ATTEMPTS,
        }
    }
}

impl Default for WirelessTiming {
    fn default() -> Self {
        Self::defaults()
    }
}

fn auth_mode_for(passphrase: &str) -> AuthMode {
    if passphrase.is_empty() {
        AuthMode::Open
    } else {
        AuthMode::WpaWpa2Personal
    }
}

fn checked_ssid(ssid: &str) -> Result<String<SSID_MAX_LEN>, ConfigError> {
    if ssid.is_empty() {
        return Err(ConfigError::SsidEmpty);
    }
    let mut out = String::new();
    out.push_str(ssid).map_err(|_| ConfigError::SsidTooLong)?;
    Ok(out)
}

fn checked_passphrase(passphrase: &str) -> Result<String<PASSPHRASE_MAX_LEN>, ConfigError> {
    let mut out = String::new();
    out.push_str(passphrase)
        .map_err(|_| ConfigError::PassphraseTooLong)?;
    Ok(out)
}

fn truncated<const N: usize>(value: &str) -> String<N> {
    let mut out = String::new();
    for ch in value.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
