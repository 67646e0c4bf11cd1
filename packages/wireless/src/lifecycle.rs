use log::{debug, error, info, warn};

use crate::{
    config::{AccessPointSettings, StationSettings},
    driver::{InjectionWorker, RadioDriver},
    error::RadioError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RadioMode {
    #[default]
    Off,
    AccessPoint,
    Station,
    BeaconInject,
}

impl RadioMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::AccessPoint => "access_point",
            Self::Station => "station",
            Self::BeaconInject => "beacon_inject",
        }
    }

    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// Compact form for atomics and status lines.
    pub const fn code(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::AccessPoint => 1,
            Self::Station => 2,
            Self::BeaconInject => 3,
        }
    }

    /// Unknown codes read as `Off`.
    pub const fn from_code(code: u8) -> Self {
        match code {
            1 => Self::AccessPoint,
            2 => Self::Station,
            3 => Self::BeaconInject,
            _ => Self::Off,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ModeRequest<'a> {
    AccessPoint(&'a AccessPointSettings),
    Station(&'a StationSettings),
    BeaconInject { channel: u8 },
}

impl ModeRequest<'_> {
    pub const fn mode(&self) -> RadioMode {
        match self {
            Self::AccessPoint(_) => RadioMode::AccessPoint,
            Self::Station(_) => RadioMode::Station,
            Self::BeaconInject { .. } => RadioMode::BeaconInject,
        }
    }
}

/// Exclusive owner of the radio. Brings it into exactly one mode at a time
/// and always passes through `Off` between two active modes.
pub struct RadioLifecycle<D, W> {
    driver: D,
    worker: W,
    mode: RadioMode,
}

impl<D, W> RadioLifecycle<D, W>
where
    D: RadioDriver,
    W: InjectionWorker,
{
    pub fn new(driver: D, worker: W) -> Self {
        Self {
            driver,
            worker,
            mode: RadioMode::Off,
        }
    }

    pub fn mode(&self) -> RadioMode {
        self.mode
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn worker(&self) -> &W {
        &self.worker
    }

    /// Bring the radio into the requested mode.
    ///
    /// Requesting the mode that is already configured is a no-op. Any other
    /// active mode is torn down first. On a driver fault the radio is torn
    /// down again and left `Off`.
    pub async fn configure(&mut self, request: ModeRequest<'_>) -> Result<(), RadioError> {
        let target = request.mode();
        if self.mode == target {
            debug!("wifi: {} already configured", target.as_str());
            return Ok(());
        }
        if self.mode.is_active() {
            self.teardown().await;
        }

        match self.bring_up(request).await {
            Ok(()) => {
                self.mode = target;
                info!("wifi: mode={}", target.as_str());
                Ok(())
            }
            Err(err) => {
                error!("wifi: {} bring-up failed: {}", target.as_str(), err);
                self.teardown().await;
                Err(err)
            }
        }
    }

    async fn bring_up(&mut self, request: ModeRequest<'_>) -> Result<(), RadioError> {
        match request {
            ModeRequest::AccessPoint(settings) => {
                self.driver.start_access_point(settings).await
            }
            ModeRequest::Station(settings) => {
                self.driver.start_station(settings).await?;
                self.driver.connect().await
            }
            ModeRequest::BeaconInject { channel } => {
                self.driver.start_injection(channel).await?;
                self.worker.launch()
            }
        }
    }

    /// Return the radio to `Off`. Safe in every mode, including `Off`.
    ///
    /// The beacon worker is stopped before the driver so no frame is queued
    /// against a radio that is going down. A worker that misses the halt
    /// grace period is cut off by the driver shutdown.
    pub async fn teardown(&mut self) {
        if self.worker.is_running() && !self.worker.halt().await {
            warn!("wifi: beacon worker missed halt deadline");
        }
        if let Err(err) = self.driver.shutdown().await {
            warn!("wifi: shutdown reported {}", err);
        }
        if self.mode.is_active() {
            info!("wifi: mode={} -> off", self.mode.as_str());
        }
        self.mode = RadioMode::Off;
    }

    /// Issue another association attempt. Returns `false` when the radio
    /// is not in station mode.
    pub async fn reconnect(&mut self) -> Result<bool, RadioError> {
        if self.mode != RadioMode::Station {
            return Ok(false);
        }
        self.driver.connect().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::{
        error::RadioOp,
        testing::{ap_settings, sta_settings, DriverCall, FakeDriver, FakeWorker},
    };

    fn lifecycle() -> RadioLifecycle<FakeDriver, FakeWorker> {
        RadioLifecycle::new(FakeDriver::default(), FakeWorker::default())
    }

    #[test]
    fn teardown_twice_is_off_without_error() {
        let mut radio = lifecycle();
        block_on(async {
            radio
                .configure(ModeRequest::AccessPoint(&ap_settings()))
                .await
                .unwrap();
            radio.teardown().await;
            assert_eq!(radio.mode(), RadioMode::Off);
            radio.teardown().await;
        });
        assert_eq!(radio.mode(), RadioMode::Off);
        assert_eq!(radio.driver().count(&DriverCall::Shutdown), 2);
        assert_eq!(radio.driver().active, None);
    }

    #[test]
    fn switching_modes_passes_through_off() {
        let mut radio = lifecycle();
        block_on(async {
            radio
                .configure(ModeRequest::AccessPoint(&ap_settings()))
                .await
                .unwrap();
            radio
                .configure(ModeRequest::BeaconInject { channel: 1 })
                .await
                .unwrap();
        });
        assert_eq!(radio.mode(), RadioMode::BeaconInject);
        assert_eq!(
            radio.driver().calls,
            vec![
                DriverCall::StartAccessPoint("badge-admin".into()),
                DriverCall::Shutdown,
                DriverCall::StartInjection(1),
            ]
        );
        assert!(radio.worker().running);
    }

    #[test]
    fn configuring_current_mode_is_idempotent() {
        let mut radio = lifecycle();
        block_on(async {
            let settings = sta_settings();
            radio.configure(ModeRequest::Station(&settings)).await.unwrap();
            radio.configure(ModeRequest::Station(&settings)).await.unwrap();
        });
        assert_eq!(radio.driver().count(&DriverCall::StartStation("venue-wifi".into())), 1);
        assert_eq!(radio.driver().count(&DriverCall::Connect), 1);
    }

    #[test]
    fn driver_fault_leaves_radio_off() {
        let mut radio = lifecycle();
        radio.driver_mut().fail_start = Some(RadioError::new(RadioOp::Start, 0x3001));
        let result = block_on(radio.configure(ModeRequest::AccessPoint(&ap_settings())));
        assert_eq!(result, Err(RadioError::new(RadioOp::Start, 0x3001)));
        assert_eq!(radio.mode(), RadioMode::Off);
        assert_eq!(radio.driver().calls.last(), Some(&DriverCall::Shutdown));
    }

    #[test]
    fn worker_launch_failure_shuts_injection_down() {
        let mut radio = RadioLifecycle::new(
            FakeDriver::default(),
            FakeWorker {
                fail_launch: true,
                ..FakeWorker::default()
            },
        );
        let result = block_on(radio.configure(ModeRequest::BeaconInject { channel: 1 }));
        assert!(result.is_err());
        assert_eq!(radio.mode(), RadioMode::Off);
        assert_eq!(radio.driver().active, None);
    }

    #[test]
    fn teardown_halts_worker_before_driver() {
        let mut radio = RadioLifecycle::new(
            FakeDriver::default(),
            FakeWorker {
                ignore_halt: true,
                ..FakeWorker::default()
            },
        );
        block_on(async {
            radio
                .configure(ModeRequest::BeaconInject { channel: 6 })
                .await
                .unwrap();
            radio.teardown().await;
        });
        assert_eq!(radio.worker().halts, 1);
        assert_eq!(radio.mode(), RadioMode::Off);
        assert_eq!(radio.driver().active, None);
    }

    #[test]
    fn shutdown_error_still_ends_off() {
        let mut radio = lifecycle();
        radio.driver_mut().fail_shutdown = Some(RadioError::new(RadioOp::Stop, 12));
        block_on(async {
            radio
                .configure(ModeRequest::AccessPoint(&ap_settings()))
                .await
                .unwrap();
            radio.teardown().await;
        });
        assert_eq!(radio.mode(), RadioMode::Off);
    }

    #[test]
    fn reconnect_only_in_station_mode() {
        let mut radio = lifecycle();
        block_on(async {
            assert_eq!(radio.reconnect().await, Ok(false));
            radio
                .configure(ModeRequest::Station(&sta_settings()))
                .await
                .unwrap();
            assert_eq!(radio.reconnect().await, Ok(true));
        });
        assert_eq!(radio.driver().count(&DriverCall::Connect), 2);
    }

    #[test]
    fn mode_codes_are_distinct_and_unknown_reads_off() {
        let modes = [
            RadioMode::Off,
            RadioMode::AccessPoint,
            RadioMode::Station,
            RadioMode::BeaconInject,
        ];
        for mode in modes {
            assert_eq!(RadioMode::from_code(mode.code()), mode);
        }
        for (idx, mode) in modes.iter().enumerate() {
            for other in &modes[idx + 1..] {
                assert_ne!(mode.code(), other.code());
            }
        }
        assert_eq!(RadioMode::from_code(0xFF), RadioMode::Off);
    }
}
