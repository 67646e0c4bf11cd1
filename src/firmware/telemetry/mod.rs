use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use badge_wireless::{beacon::BurstSummary, RadioMode};

static MODE_TRANSITIONS: AtomicU32 = AtomicU32::new(0);
static MODE_FAULTS: AtomicU32 = AtomicU32::new(0);
static CURRENT_MODE: AtomicU8 = AtomicU8::new(0);
static BEACON_FRAMES_SENT: AtomicU32 = AtomicU32::new(0);
static BEACON_NO_MEMORY: AtomicU32 = AtomicU32::new(0);
static BEACON_TX_ERRORS: AtomicU32 = AtomicU32::new(0);
static BEACON_CHANNEL_HOPS: AtomicU32 = AtomicU32::new(0);
static BEACON_LAST_RATE: AtomicU32 = AtomicU32::new(0);
static STATION_ATTEMPTS: AtomicU32 = AtomicU32::new(0);
static STATION_FAILURES: AtomicU32 = AtomicU32::new(0);
static STATION_IPV4: AtomicU32 = AtomicU32::new(0);
static STATION_CONNECTED: AtomicBool = AtomicBool::new(false);
static AP_CLIENTS: AtomicU8 = AtomicU8::new(0);
static LINK_INPUTS_DROPPED: AtomicU32 = AtomicU32::new(0);
static UI_NOTICES_DROPPED: AtomicU32 = AtomicU32::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Snapshot {
    pub(crate) mode: RadioMode,
    pub(crate) mode_transitions: u32,
    pub(crate) mode_faults: u32,
    pub(crate) beacon_frames_sent: u32,
    pub(crate) beacon_no_memory: u32,
    pub(crate) beacon_tx_errors: u32,
    pub(crate) beacon_channel_hops: u32,
    pub(crate) beacon_last_rate: u32,
    pub(crate) station_attempts: u32,
    pub(crate) station_failures: u32,
    pub(crate) station_connected: bool,
    pub(crate) station_ipv4: Option<[u8; 4]>,
    pub(crate) ap_clients: u8,
    pub(crate) link_inputs_dropped: u32,
    pub(crate) ui_notices_dropped: u32,
}

pub(crate) fn snapshot() -> Snapshot {
    let station_ipv4_raw = STATION_IPV4.load(Ordering::Relaxed);
    let station_ipv4 = if station_ipv4_raw == 0 {
        None
    } else {
        Some(station_ipv4_raw.to_be_bytes())
    };
    Snapshot {
        mode: RadioMode::from_code(CURRENT_MODE.load(Ordering::Relaxed)),
        mode_transitions: MODE_TRANSITIONS.load(Ordering::Relaxed),
        mode_faults: MODE_FAULTS.load(Ordering::Relaxed),
        beacon_frames_sent: BEACON_FRAMES_SENT.load(Ordering::Relaxed),
        beacon_no_memory: BEACON_NO_MEMORY.load(Ordering::Relaxed),
        beacon_tx_errors: BEACON_TX_ERRORS.load(Ordering::Relaxed),
        beacon_channel_hops: BEACON_CHANNEL_HOPS.load(Ordering::Relaxed),
        beacon_last_rate: BEACON_LAST_RATE.load(Ordering::Relaxed),
        station_attempts: STATION_ATTEMPTS.load(Ordering::Relaxed),
        station_failures: STATION_FAILURES.load(Ordering::Relaxed),
        station_connected: STATION_CONNECTED.load(Ordering::Relaxed),
        station_ipv4,
        ap_clients: AP_CLIENTS.load(Ordering::Relaxed),
        link_inputs_dropped: LINK_INPUTS_DROPPED.load(Ordering::Relaxed),
        ui_notices_dropped: UI_NOTICES_DROPPED.load(Ordering::Relaxed),
    }
}

pub(crate) fn record_mode_transition(to: RadioMode, faulted: bool) {
    MODE_TRANSITIONS.fetch_add(1, Ordering::Relaxed);
    if faulted {
        MODE_FAULTS.fetch_add(1, Ordering::Relaxed);
    }
    CURRENT_MODE.store(to.code(), Ordering::Relaxed);
    if to != RadioMode::Station {
        STATION_CONNECTED.store(false, Ordering::Relaxed);
        STATION_IPV4.store(0, Ordering::Relaxed);
    }
    if to != RadioMode::AccessPoint {
        AP_CLIENTS.store(0, Ordering::Relaxed);
    }
}

pub(crate) fn record_beacon_burst(burst: &BurstSummary) {
    BEACON_FRAMES_SENT.fetch_add(u32::from(burst.sent), Ordering::Relaxed);
    BEACON_NO_MEMORY.fetch_add(u32::from(burst.no_memory), Ordering::Relaxed);
    BEACON_TX_ERRORS.fetch_add(u32::from(burst.transient), Ordering::Relaxed);
}

pub(crate) fn record_beacon_channel_hop() {
    BEACON_CHANNEL_HOPS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_beacon_rate(frames: u32) {
    BEACON_LAST_RATE.store(frames, Ordering::Relaxed);
}

pub(crate) fn record_station_attempt() {
    STATION_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_station_failure() {
    STATION_FAILURES.fetch_add(1, Ordering::Relaxed);
    STATION_CONNECTED.store(false, Ordering::Relaxed);
}

pub(crate) fn record_station_connected(ipv4: [u8; 4]) {
    STATION_CONNECTED.store(true, Ordering::Relaxed);
    STATION_IPV4.store(u32::from_be_bytes(ipv4), Ordering::Relaxed);
}

pub(crate) fn record_station_disconnected() {
    STATION_CONNECTED.store(false, Ordering::Relaxed);
    STATION_IPV4.store(0, Ordering::Relaxed);
}

pub(crate) fn record_ap_clients(count: u8) {
    AP_CLIENTS.store(count, Ordering::Relaxed);
}

pub(crate) fn record_link_input_dropped() {
    LINK_INPUTS_DROPPED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_ui_notice_dropped() {
    UI_NOTICES_DROPPED.fetch_add(1, Ordering::Relaxed);
}
