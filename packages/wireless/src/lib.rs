#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

pub mod beacon;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod frame;
pub mod identity;
pub mod inactivity;
pub mod lifecycle;
pub mod panel;
pub mod retry;
pub mod supervisor;
pub mod worker;

#[cfg(test)]
mod testing;

pub use beacon::{BeaconEngine, StepReport};
pub use config::{AccessPointSettings, AuthMode, StationSettings, WirelessTiming};
pub use controller::{ModeTransition, WirelessEvent, WirelessModeController};
pub use driver::{
    Clock, CredentialSource, FrameTransmitter, InjectionWorker, RadioDriver, WirelessUi,
};
pub use error::{ConfigError, FrameError, RadioError, RadioOp, TxError};
pub use frame::{build_beacon, BeaconFrame, MacAddress};
pub use inactivity::ApInactivityMonitor;
pub use lifecycle::{ModeRequest, RadioLifecycle, RadioMode};
pub use panel::{AdminPanel, PanelButton, Press};
pub use retry::{ConnectionRetryPolicy, RetryPhase};
pub use supervisor::{
    run_idle_timer, IdleTimerCommand, LinkAction, LinkInput, LinkRequest, LinkSupervisor,
};
pub use worker::{serve, InjectorControl, InjectorHandle};
