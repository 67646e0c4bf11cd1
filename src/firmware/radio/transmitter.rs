use badge_wireless::{FrameTransmitter, RadioError, RadioOp, TxError};
use esp_radio::wifi::{InternalWifiError, ModeConfig, WifiError};

use super::{carrier_config, error_code, fault, SharedController, SharedSniffer, RADIO_BUSY};

/// Raw beacon path. Called from the worker's synchronous burst loop, so the
/// shared handles are only ever tried, never awaited.
pub(crate) struct EspTransmitter {
    controller: &'static SharedController,
    sniffer: &'static SharedSniffer,
}

impl EspTransmitter {
    pub(super) fn new(
        controller: &'static SharedController,
        sniffer: &'static SharedSniffer,
    ) -> Self {
        Self { controller, sniffer }
    }
}

impl FrameTransmitter for EspTransmitter {
    fn transmit(&mut self, frame: &[u8]) -> Result<(), TxError> {
        let Ok(mut sniffer) = self.sniffer.try_lock() else {
            return Err(TxError::Transient(RADIO_BUSY));
        };
        sniffer
            .send_raw_frame(false, frame, false)
            .map_err(|err| match err {
                WifiError::InternalError(InternalWifiError::NoMem) => TxError::NoMemory,
                other => TxError::Transient(error_code(&other)),
            })
    }

    fn set_channel(&mut self, channel: u8) -> Result<(), RadioError> {
        let Ok(mut controller) = self.controller.try_lock() else {
            return Err(RadioError::new(RadioOp::SetChannel, RADIO_BUSY));
        };
        controller
            .set_config(&ModeConfig::AccessPoint(carrier_config(channel)))
            .map_err(|err| fault(RadioOp::SetChannel, &err))
    }
}
