use badge_wireless::{AccessPointSettings, RadioDriver, RadioError, RadioOp, StationSettings};
use esp_radio::wifi::{AccessPointConfig, ClientConfig, ModeConfig};
use log::debug;

use super::{auth_method, carrier_config, fault, SharedController, SharedSniffer};

pub(crate) struct EspRadio {
    controller: &'static SharedController,
    sniffer: &'static SharedSniffer,
}

impl EspRadio {
    pub(super) fn new(
        controller: &'static SharedController,
        sniffer: &'static SharedSniffer,
    ) -> Self {
        Self { controller, sniffer }
    }

    async fn apply_and_start(&mut self, mode: ModeConfig) -> Result<(), RadioError> {
        let mut controller = self.controller.lock().await;
        controller
            .set_config(&mode)
            .map_err(|err| fault(RadioOp::SetConfig, &err))?;
        controller
            .start_async()
            .await
            .map_err(|err| fault(RadioOp::Start, &err))
    }
}

impl RadioDriver for EspRadio {
    async fn shutdown(&mut self) -> Result<(), RadioError> {
        if let Err(err) = self.sniffer.lock().await.set_promiscuous_mode(false) {
            debug!("wifi: promiscuous off skipped err={:?}", err);
        }
        let mut controller = self.controller.lock().await;
        if !matches!(controller.is_started(), Ok(true)) {
            return Ok(());
        }
        if let Err(err) = controller.disconnect_async().await {
            debug!("wifi: disconnect skipped err={:?}", err);
        }
        controller
            .stop_async()
            .await
            .map_err(|err| fault(RadioOp::Stop, &err))
    }

    async fn start_access_point(
        &mut self,
        settings: &AccessPointSettings,
    ) -> Result<(), RadioError> {
        let config = AccessPointConfig::default()
            .with_ssid(settings.ssid().into())
            .with_password(settings.passphrase().into())
            .with_auth_method(auth_method(settings.auth_mode()))
            .with_max_connections(u16::from(settings.max_clients()));
        self.apply_and_start(ModeConfig::AccessPoint(config)).await
    }

    async fn start_station(&mut self, settings: &StationSettings) -> Result<(), RadioError> {
        let config = ClientConfig::default()
            .with_ssid(settings.ssid().into())
            .with_password(settings.passphrase().into())
            .with_auth_method(auth_method(settings.auth_mode()));
        self.apply_and_start(ModeConfig::Client(config)).await
    }

    async fn connect(&mut self) -> Result<(), RadioError> {
        self.controller
            .lock()
            .await
            .connect()
            .map_err(|err| fault(RadioOp::Connect, &err))
    }

    async fn start_injection(&mut self, channel: u8) -> Result<(), RadioError> {
        self.apply_and_start(ModeConfig::AccessPoint(carrier_config(channel)))
            .await?;
        self.sniffer
            .lock()
            .await
            .set_promiscuous_mode(true)
            .map_err(|err| fault(RadioOp::Promiscuous, &err))
    }
}
