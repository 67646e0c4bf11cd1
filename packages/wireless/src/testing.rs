//! Host fakes shared by the unit tests.

use core::{
    cell::Cell,
    sync::atomic::{AtomicBool, Ordering},
};

use embedded_hal_async::delay::DelayNs;
use rand_core::RngCore;

use crate::{
    config::{AccessPointSettings, StationSettings},
    driver::{Clock, CredentialSource, FrameTransmitter, InjectionWorker, RadioDriver, WirelessUi},
    error::{RadioError, RadioOp, TxError},
    lifecycle::RadioMode,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverCall {
    Shutdown,
    StartAccessPoint(String),
    StartStation(String),
    Connect,
    StartInjection(u8),
}

/// Radio fake that panics if a second mode is started without a shutdown.
#[derive(Default)]
pub struct FakeDriver {
    pub calls: Vec<DriverCall>,
    pub active: Option<RadioMode>,
    pub fail_start: Option<RadioError>,
    pub fail_connect: Option<RadioError>,
    pub fail_shutdown: Option<RadioError>,
}

impl FakeDriver {
    fn bring_up(&mut self, mode: RadioMode) -> Result<(), RadioError> {
        assert!(
            self.active.is_none(),
            "{} started while {:?} active",
            mode.as_str(),
            self.active
        );
        if let Some(err) = self.fail_start {
            return Err(err);
        }
        self.active = Some(mode);
        Ok(())
    }

    pub fn count(&self, call: &DriverCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl RadioDriver for FakeDriver {
    async fn shutdown(&mut self) -> Result<(), RadioError> {
        self.calls.push(DriverCall::Shutdown);
        self.active = None;
        match self.fail_shutdown {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn start_access_point(
        &mut self,
        settings: &AccessPointSettings,
    ) -> Result<(), RadioError> {
        self.calls
            .push(DriverCall::StartAccessPoint(settings.ssid().into()));
        self.bring_up(RadioMode::AccessPoint)
    }

    async fn start_station(&mut self, settings: &StationSettings) -> Result<(), RadioError> {
        self.calls.push(DriverCall::StartStation(settings.ssid().into()));
        self.bring_up(RadioMode::Station)
    }

    async fn connect(&mut self) -> Result<(), RadioError> {
        self.calls.push(DriverCall::Connect);
        assert_eq!(self.active, Some(RadioMode::Station));
        match self.fail_connect {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn start_injection(&mut self, channel: u8) -> Result<(), RadioError> {
        self.calls.push(DriverCall::StartInjection(channel));
        self.bring_up(RadioMode::BeaconInject)
    }
}

#[derive(Default)]
pub struct FakeWorker {
    pub running: bool,
    pub launches: usize,
    pub halts: usize,
    pub ignore_halt: bool,
    pub fail_launch: bool,
}

impl InjectionWorker for FakeWorker {
    fn launch(&mut self) -> Result<(), RadioError> {
        if self.fail_launch {
            return Err(RadioError::new(RadioOp::Start, -1));
        }
        self.launches += 1;
        self.running = true;
        Ok(())
    }

    async fn halt(&mut self) -> bool {
        self.halts += 1;
        if self.ignore_halt {
            return false;
        }
        self.running = false;
        true
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Delay that returns immediately and keeps a running total.
#[derive(Default)]
pub struct NoopDelay {
    pub total_ns: u64,
    pub pauses: Vec<u32>,
}

impl NoopDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for NoopDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
        self.pauses.push(ns / 1_000_000);
    }
}

#[derive(Default)]
pub struct ManualClock {
    now_us: Cell<u64>,
}

impl ManualClock {
    pub fn advance_ns(&self, ns: u64) {
        self.now_us.set(self.now_us.get() + ns / 1_000);
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_us.set(ms * 1_000);
    }
}

impl Clock for ManualClock {
    fn now_us(&self) -> u64 {
        self.now_us.get()
    }
}

/// Delay that moves a [`ManualClock`] forward and optionally clears a
/// running flag once a deadline is reached.
pub struct TickingDelay<'a> {
    pub clock: &'a ManualClock,
    pub stop: Option<(u64, &'a AtomicBool)>,
}

impl DelayNs for TickingDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
        if let Some((deadline_ms, flag)) = self.stop {
            if self.clock.now_ms() >= deadline_ms {
                flag.store(false, Ordering::Release);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiNotice {
    Progress(u8, u8),
    Failed,
    Connected([u8; 4]),
    Disconnected,
    Clients(u8),
    Mode(RadioMode),
}

#[derive(Default)]
pub struct RecordingUi {
    pub notices: Vec<UiNotice>,
}

impl RecordingUi {
    pub fn count(&self, notice: &UiNotice) -> usize {
        self.notices.iter().filter(|n| *n == notice).count()
    }
}

impl WirelessUi for RecordingUi {
    fn on_connection_progress(&mut self, attempt: u8, max: u8) {
        self.notices.push(UiNotice::Progress(attempt, max));
    }

    fn on_connection_failed(&mut self) {
        self.notices.push(UiNotice::Failed);
    }

    fn on_connected(&mut self, ipv4: [u8; 4]) {
        self.notices.push(UiNotice::Connected(ipv4));
    }

    fn on_disconnected(&mut self) {
        self.notices.push(UiNotice::Disconnected);
    }

    fn on_client_count_changed(&mut self, count: u8) {
        self.notices.push(UiNotice::Clients(count));
    }

    fn on_mode_changed(&mut self, mode: RadioMode) {
        self.notices.push(UiNotice::Mode(mode));
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxScript {
    Ok,
    NoMemory,
    Transient,
}

/// Transmitter that records every frame and replays scripted outcomes.
#[derive(Default)]
pub struct FakeTransmitter {
    pub frames: Vec<Vec<u8>>,
    pub channels: Vec<u8>,
    pub script: Vec<TxScript>,
}

impl FrameTransmitter for FakeTransmitter {
    fn transmit(&mut self, frame: &[u8]) -> Result<(), TxError> {
        self.frames.push(frame.to_vec());
        let outcome = if self.script.is_empty() {
            TxScript::Ok
        } else {
            self.script.remove(0)
        };
        match outcome {
            TxScript::Ok => Ok(()),
            TxScript::NoMemory => Err(TxError::NoMemory),
            TxScript::Transient => Err(TxError::Transient(-3)),
        }
    }

    fn set_channel(&mut self, channel: u8) -> Result<(), RadioError> {
        self.channels.push(channel);
        Ok(())
    }
}

/// Linear congruential generator; deterministic across runs.
pub struct StepRng(pub u64);

impl RngCore for StepRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

pub fn ap_settings() -> AccessPointSettings {
    AccessPointSettings::new("badge-admin", "badge1234").unwrap()
}

pub fn sta_settings() -> StationSettings {
    StationSettings::new("venue-wifi", "conference").unwrap()
}

pub struct FixedCredentials {
    pub access_point: AccessPointSettings,
    pub station: Option<StationSettings>,
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self {
            access_point: ap_settings(),
            station: Some(sta_settings()),
        }
    }
}

impl CredentialSource for FixedCredentials {
    fn access_point(&mut self) -> AccessPointSettings {
        self.access_point.clone()
    }

    fn station(&mut self) -> Option<StationSettings> {
        self.station.clone()
    }
}
