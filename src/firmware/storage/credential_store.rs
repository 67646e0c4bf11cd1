use badge_wireless::{
    config::{PASSPHRASE_MAX_LEN, SSID_MAX_LEN},
    AccessPointSettings, CredentialSource, StationSettings,
};
use embedded_storage::ReadStorage;
use esp_storage::FlashStorage;
use log::{info, warn};

use super::super::config::{
    CREDENTIAL_RECORD_LEN, CREDENTIAL_STORE_MAGIC, CREDENTIAL_STORE_VERSION, DEFAULT_AP_PASSWORD,
    DEFAULT_AP_SSID,
};

const AP_OFFSET: usize = 5;
const STA_OFFSET: usize = AP_OFFSET + PAIR_LEN;
const PAIR_LEN: usize = 1 + SSID_MAX_LEN + 1 + PASSPHRASE_MAX_LEN;

/// Network credentials provisioned into the last flash sector.
///
/// Record: magic, version, then an access point and a station pair, each
/// `ssid_len, ssid[32], pass_len, pass[64]`, then a checksum byte. A zero
/// station SSID length means no station network. Missing or corrupt
/// records fall back to build-time values, clamped to fit when rejected.
pub(crate) struct CredentialStore<'d> {
    flash: FlashStorage<'d>,
    offset: u32,
}

impl<'d> CredentialStore<'d> {
    pub(crate) fn new(flash_peripheral: esp_hal::peripherals::FLASH<'d>) -> Self {
        let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
        let capacity = flash.capacity() as u32;
        let offset = capacity.saturating_sub(FlashStorage::SECTOR_SIZE);
        Self { flash, offset }
    }

    fn load_record(&mut self) -> Option<[u8; CREDENTIAL_RECORD_LEN]> {
        let mut record = [0u8; CREDENTIAL_RECORD_LEN];
        self.flash.read(self.offset, &mut record).ok()?;
        if record.iter().all(|&byte| byte == 0xFF) {
            return None;
        }
        if u32::from_le_bytes([record[0], record[1], record[2], record[3]])
            != CREDENTIAL_STORE_MAGIC
        {
            return None;
        }
        if record[4] != CREDENTIAL_STORE_VERSION {
            warn!("wifi: credential record version {} unsupported", record[4]);
            return None;
        }
        let expected = checksum8(&record[..CREDENTIAL_RECORD_LEN - 1]);
        if record[CREDENTIAL_RECORD_LEN - 1] != expected {
            warn!("wifi: credential record checksum mismatch");
            return None;
        }
        Some(record)
    }
}

impl CredentialSource for CredentialStore<'_> {
    fn access_point(&mut self) -> AccessPointSettings {
        let stored = self.load_record().and_then(|record| {
            let (ssid, passphrase) = pair_at(&record, AP_OFFSET)?;
            AccessPointSettings::new(ssid, passphrase).ok()
        });
        if let Some(settings) = stored {
            return settings;
        }
        let ssid = option_env!("BADGE_AP_SSID").unwrap_or(DEFAULT_AP_SSID);
        let passphrase = option_env!("BADGE_AP_PASSWORD").unwrap_or(DEFAULT_AP_PASSWORD);
        match AccessPointSettings::new(ssid, passphrase) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("wifi: build-time ap settings rejected: {}", err);
                AccessPointSettings::clamped(ssid, passphrase)
            }
        }
    }

    fn station(&mut self) -> Option<StationSettings> {
        let stored = self.load_record().and_then(|record| {
            let (ssid, passphrase) = pair_at(&record, STA_OFFSET)?;
            StationSettings::new(ssid, passphrase).ok()
        });
        if stored.is_some() {
            return stored;
        }
        let ssid = option_env!("BADGE_STA_SSID")?;
        let passphrase = option_env!("BADGE_STA_PASSWORD").unwrap_or("");
        match StationSettings::new(ssid, passphrase) {
            Ok(settings) => {
                info!("wifi: using build-time station network");
                Some(settings)
            }
            Err(err) => {
                warn!("wifi: build-time station settings rejected: {}", err);
                None
            }
        }
    }
}

fn pair_at(record: &[u8; CREDENTIAL_RECORD_LEN], offset: usize) -> Option<(&str, &str)> {
    let ssid_len = usize::from(record[offset]);
    if ssid_len == 0 || ssid_len > SSID_MAX_LEN {
        return None;
    }
    let ssid_start = offset + 1;
    let pass_len_at = ssid_start + SSID_MAX_LEN;
    let pass_len = usize::from(record[pass_len_at]);
    if pass_len > PASSPHRASE_MAX_LEN {
        return None;
    }
    let pass_start = pass_len_at + 1;
    let ssid = core::str::from_utf8(&record[ssid_start..ssid_start + ssid_len]).ok()?;
    let passphrase = core::str::from_utf8(&record[pass_start..pass_start + pass_len]).ok()?;
    Some((ssid, passphrase))
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}
