//! 802.11 beacon synthesis for the raw transmit path.
//!
//! Layout (all multi-byte fields little-endian):
//!
//! | offset | field                                   |
//! |--------|-----------------------------------------|
//! | 0      | frame control `80 00` (mgmt / beacon)   |
//! | 2      | duration                                |
//! | 4      | destination, broadcast                  |
//! | 10     | source                                  |
//! | 16     | BSSID (same as source)                  |
//! | 22     | sequence control                        |
//! | 24     | timestamp (us)                          |
//! | 32     | beacon interval (TU)                    |
//! | 34     | capability information                  |
//! | 36     | SSID, supported rates, DS, RSN elements |

use core::fmt;

use rand_core::RngCore;

use crate::{config::SSID_MAX_LEN, error::FrameError};


pub const BEACON_FRAME_MAX: usize = 128;
pub const BEACON_INTERVAL_TU: u16 = 100;
pub const CAPABILITY_ESS: u16 = 0x0001;
pub const CAPABILITY_PRIVACY: u16 = 0x0010;
pub const SUPPORTED_RATES: [u8; 8] = [0x82, 0x84, 0x8b, 0x96, 0x24, 0x30, 0x48, 0x6c];

pub(crate) const HEADER_LEN: usize = 24;
pub(crate) const FIXED_PARAMS_LEN: usize = 12;
pub(crate) const ELEMENT_SSID: u8 = 0;
pub(crate) const ELEMENT_SUPPORTED_RATES: u8 = 1;
pub(crate) const ELEMENT_DS_PARAMETER: u8 = 3;
pub(crate) const ELEMENT_RSN: u8 = 48;

const FRAME_CONTROL_BEACON: [u8; 2] = [0x80, 0x00];
const OUI_IEEE: [u8; 3] = [0x00, 0x0f, 0xac];
const CIPHER_CCMP: u8 = 4;
const AKM_PSK: u8 = 2;

// RSN version 1, CCMP group, one CCMP pairwise, one PSK AKM, no capabilities.
pub(crate) const RSN_BODY: [u8; 20] = [
    0x01, 0x00,
    OUI_IEEE[0], OUI_IEEE[1], OUI_IEEE[2], CIPHER_CCMP,
    0x01, 0x00,
    OUI_IEEE[0], OUI_IEEE[1], OUI_IEEE[2], CIPHER_CCMP,
    0x01, 0x00,
    OUI_IEEE[0], OUI_IEEE[1], OUI_IEEE[2], AKM_PSK,
    0x00, 0x00,
];

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub const BROADCAST: MacAddress = MacAddress([0xFF; 6]);

    /// Random unicast address with the locally-administered bit set.
    pub fn random_local<R: RngCore>(rng: &mut R) -> Self {
        let mut octets = [0u8; 6];
        rng.fill_bytes(&mut octets);
        octets[0] = (octets[0] & !0x01) | 0x02;
        Self(octets)
    }

    pub const fn octets(self) -> [u8; 6] {
        self.0
    }

    pub const fn is_group(self) -> bool {
        self.0[0] & 0x01 != 0
    }

    pub const fn is_locally_administered(self) -> bool {
        self.0[0] & 0x02 != 0
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({})", self)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

#[derive(Clone)]
pub struct BeaconFrame {
    buf: [u8; BEACON_FRAME_MAX],
    len: usize,
}

impl BeaconFrame {
    fn new() -> Self {
        Self {
            buf: [0; BEACON_FRAME_MAX],
            len: 0,
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.len + bytes.len();
        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
    }

    fn put_element(&mut self, id: u8, body: &[u8]) {
        self.put(&[id, body.len() as u8]);
        self.put(body);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Exact encoded length of a beacon advertising an `ssid_len`-byte name.
pub const fn beacon_len(ssid_len: usize) -> usize {
    HEADER_LEN
        + FIXED_PARAMS_LEN
        + 2
        + ssid_len
        + 2
        + SUPPORTED_RATES.len()
        + 3
        + 2
        + RSN_BODY.len()
}

/// Build a beacon frame for one forged network.
///
/// `sender` is used for both the source address and the BSSID.
pub fn build_beacon(
    ssid: &[u8],
    sender: MacAddress,
    channel: u8,
    timestamp_us: u64,
) -> Result<BeaconFrame, FrameError> {
    if ssid.len() > SSID_MAX_LEN {
        return Err(FrameError::SsidTooLong { len: ssid.len() });
    }
    if !(1..=14).contains(&channel) {
        return Err(FrameError::InvalidChannel(channel));
    }

    let mut frame = BeaconFrame::new();
    frame.put(&FRAME_CONTROL_BEACON);
    frame.put(&[0x00, 0x00]);
    frame.put(&MacAddress::BROADCAST.0);
    frame.put(&sender.0);
    frame.put(&sender.0);
    frame.put(&[0x00, 0x00]);

    frame.put(&timestamp_us.to_le_bytes());
    frame.put(&BEACON_INTERVAL_TU.to_le_bytes());
    frame.put(&(CAPABILITY_ESS | CAPABILITY_PRIVACY).to_le_bytes());

    frame.put_element(ELEMENT_SSID, ssid);
    frame.put_element(ELEMENT_SUPPORTED_RATES, &SUPPORTED_RATES);
    frame.put_element(ELEMENT_DS_PARAMETER, &[channel]);
    frame.put_element(ELEMENT_RSN, &RSN_BODY);

    debug_assert_eq!(frame.len(), beacon_len(ssid.len()));
    Ok(frame)
}
