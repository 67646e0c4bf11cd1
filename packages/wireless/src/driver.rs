//! Seams between the wireless core and the platform.
//!
//! The firmware implements these on top of `esp-radio`; host tests use
//! scripted fakes.

use crate::{
    config::{AccessPointSettings, StationSettings},
    error::{RadioError, TxError},
    lifecycle::RadioMode,
};

/// Blocking, non re-entrant radio hardware calls. Only `RadioLifecycle`
/// holds one.
pub trait RadioDriver {
    /// Disconnect, leave promiscuous mode and stop the radio. Must succeed
    /// on a radio that is already stopped.
    async fn shutdown(&mut self) -> Result<(), RadioError>;

    async fn start_access_point(&mut self, settings: &AccessPointSettings)
        -> Result<(), RadioError>;

    async fn start_station(&mut self, settings: &StationSettings) -> Result<(), RadioError>;

    /// Issue one association attempt. Outcome arrives later as a hardware
    /// notification.
    async fn connect(&mut self) -> Result<(), RadioError>;

    /// Bring the radio up with raw transmit enabled on `channel`.
    async fn start_injection(&mut self, channel: u8) -> Result<(), RadioError>;
}

/// Raw link-layer transmit capability used by the beacon worker.
pub trait FrameTransmitter {
    fn transmit(&mut self, frame: &[u8]) -> Result<(), TxError>;

    fn set_channel(&mut self, channel: u8) -> Result<(), RadioError>;
}

/// Controller-side handle on the beacon worker.
pub trait InjectionWorker {
    fn launch(&mut self) -> Result<(), RadioError>;

    /// Clear the running flag and wait for the worker to acknowledge.
    /// Returns `false` if the acknowledgement did not arrive in time.
    async fn halt(&mut self) -> bool;

    fn is_running(&self) -> bool;
}

pub trait Clock {
    fn now_us(&self) -> u64;

    fn now_ms(&self) -> u64 {
        self.now_us() / 1_000
    }
}

/// Callbacks into the graphical shell. Implementations must not block.
pub trait WirelessUi {
    fn on_connection_progress(&mut self, attempt: u8, max: u8);

    fn on_connection_failed(&mut self);

    fn on_connected(&mut self, ipv4: [u8; 4]);

    fn on_disconnected(&mut self);

    fn on_client_count_changed(&mut self, count: u8);

    fn on_mode_changed(&mut self, _mode: RadioMode) {}
}

impl<T: WirelessUi + ?Sized> WirelessUi for &mut T {
    fn on_connection_progress(&mut self, attempt: u8, max: u8) {
        (**self).on_connection_progress(attempt, max)
    }

    fn on_connection_failed(&mut self) {
        (**self).on_connection_failed()
    }

    fn on_connected(&mut self, ipv4: [u8; 4]) {
        (**self).on_connected(ipv4)
    }

    fn on_disconnected(&mut self) {
        (**self).on_disconnected()
    }

    fn on_client_count_changed(&mut self, count: u8) {
        (**self).on_client_count_changed(count)
    }

    fn on_mode_changed(&mut self, mode: RadioMode) {
        (**self).on_mode_changed(mode)
    }
}

/// Externally owned access point / station credentials.
pub trait CredentialSource {
    fn access_point(&mut self) -> AccessPointSettings;

    fn station(&mut self) -> Option<StationSettings>;
}
