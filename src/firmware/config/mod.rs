mod channels;

pub(crate) use channels::*;

pub(crate) const HEAP_SIZE: usize = 72 * 1024;

pub(crate) const UI_NOTICE_DEPTH: usize = 8;

pub(crate) const BUTTON_DEBOUNCE_MS: u64 = 30;
pub(crate) const BUTTON_HOLD_MS: u64 = 800;

pub(crate) const TELEMETRY_INTERVAL_SECONDS: u64 = 30;

/// Hidden, open network the radio runs while injecting raw beacons.
pub(crate) const INJECT_CARRIER_SSID: &str = "badge-inject";

pub(crate) const CREDENTIAL_STORE_MAGIC: u32 = 0x4244_4743;
pub(crate) const CREDENTIAL_STORE_VERSION: u8 = 1;
pub(crate) const CREDENTIAL_RECORD_LEN: usize = 4 + 1 + 2 * (1 + 32 + 1 + 64) + 1;

pub(crate) const DEFAULT_AP_SSID: &str = "badge-admin";
pub(crate) const DEFAULT_AP_PASSWORD: &str = "badge1234";
