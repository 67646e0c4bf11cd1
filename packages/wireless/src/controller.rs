use embassy_futures::select::{select, Either};
use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, Sender},
    signal::Signal,
};
use embedded_hal_async::delay::DelayNs;
use log::{error, info, warn};

use crate::{
    beacon::BEACON_CHANNELS,
    config::WirelessTiming,
    driver::{CredentialSource, InjectionWorker, RadioDriver},
    error::RadioError,
    lifecycle::{ModeRequest, RadioLifecycle, RadioMode},
    supervisor::{LinkInput, LinkRequest},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WirelessEvent {
    StartAp,
    StopAp,
    StartInject,
    StopInject,
    StartStation,
    StopStation,
}

impl WirelessEvent {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartAp => "start_ap",
            Self::StopAp => "stop_ap",
            Self::StartInject => "start_inject",
            Self::StopInject => "stop_inject",
            Self::StartStation => "start_station",
            Self::StopStation => "stop_station",
        }
    }

    /// Mode the radio should be in once the event has been applied.
    pub const fn target(self) -> RadioMode {
        match self {
            Self::StartAp => RadioMode::AccessPoint,
            Self::StartInject => RadioMode::BeaconInject,
            Self::StartStation => RadioMode::Station,
            Self::StopAp | Self::StopInject | Self::StopStation => RadioMode::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: RadioMode,
    pub to: RadioMode,
    pub trigger: &'static str,
    pub error: Option<RadioError>,
}

/// Serialises every radio mode change.
///
/// Each event tears the radio down, waits out the settle interval and then
/// builds the requested mode. Session start/stop notices go to the link
/// supervisor so client and retry bookkeeping follow the radio. Every
/// transition opens a new session; link requests raised for an earlier one
/// are dropped.
pub struct WirelessModeController<'a, D, W, C, Dl, M: RawMutex, const L: usize> {
    radio: RadioLifecycle<D, W>,
    credentials: C,
    delay: Dl,
    timing: WirelessTiming,
    link: Sender<'a, M, LinkInput, L>,
    session: u32,
}

impl<'a, D, W, C, Dl, M, const L: usize> WirelessModeController<'a, D, W, C, Dl, M, L>
where
    D: RadioDriver,
    W: InjectionWorker,
    C: CredentialSource,
    Dl: DelayNs,
    M: RawMutex,
{
    pub fn new(
        radio: RadioLifecycle<D, W>,
        credentials: C,
        delay: Dl,
        timing: WirelessTiming,
        link: Sender<'a, M, LinkInput, L>,
    ) -> Self {
        Self {
            radio,
            credentials,
            delay,
            timing,
            link,
            session: 0,
        }
    }

    pub fn mode(&self) -> RadioMode {
        self.radio.mode()
    }

    pub fn session(&self) -> u32 {
        self.session
    }

    pub fn radio(&self) -> &RadioLifecycle<D, W> {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut RadioLifecycle<D, W> {
        &mut self.radio
    }

    pub async fn apply(&mut self, event: WirelessEvent) -> ModeTransition {
        self.transition(event, event.as_str()).await
    }

    async fn transition(&mut self, event: WirelessEvent, trigger: &'static str) -> ModeTransition {
        let from = self.radio.mode();
        if let Some(notice) = session_end(from) {
            self.link.send(notice).await;
        }
        self.radio.teardown().await;
        self.session = self.session.wrapping_add(1);
        self.delay.delay_ms(self.timing.settle_ms).await;

        let result = match event {
            WirelessEvent::StartAp => self.start_access_point().await,
            WirelessEvent::StartStation => self.start_station().await,
            WirelessEvent::StartInject => self.start_injection().await,
            WirelessEvent::StopAp | WirelessEvent::StopInject | WirelessEvent::StopStation => {
                Ok(())
            }
        };

        let error = result.err();
        if let Some(err) = error {
            error!("wifi: {} failed: {}", trigger, err);
        }
        let to = self.radio.mode();
        info!("wifi: {} {} -> {}", trigger, from.as_str(), to.as_str());
        ModeTransition {
            from,
            to,
            trigger,
            error,
        }
    }

    async fn start_access_point(&mut self) -> Result<(), RadioError> {
        let settings = self.credentials.access_point();
        self.link
            .send(LinkInput::AccessPointStarted {
                session: self.session,
            })
            .await;
        let result = self
            .radio
            .configure(ModeRequest::AccessPoint(&settings))
            .await;
        if result.is_err() {
            self.link.send(LinkInput::AccessPointStopped).await;
        }
        result
    }

    async fn start_station(&mut self) -> Result<(), RadioError> {
        let Some(settings) = self.credentials.station() else {
            warn!("wifi: no station credentials configured");
            return Ok(());
        };
        self.link
            .send(LinkInput::StationStarted {
                session: self.session,
            })
            .await;
        let result = self.radio.configure(ModeRequest::Station(&settings)).await;
        if result.is_err() {
            self.link.send(LinkInput::StationStopped).await;
        }
        result
    }

    async fn start_injection(&mut self) -> Result<(), RadioError> {
        self.radio
            .configure(ModeRequest::BeaconInject {
                channel: BEACON_CHANNELS[0],
            })
            .await?;
        self.delay.delay_ms(self.timing.inject_stabilize_ms).await;
        Ok(())
    }

    /// Act on a request raised by the link supervisor. Requests raised for
    /// a session or mode the radio has since left are dropped.
    pub async fn handle_request(&mut self, request: LinkRequest) -> Option<ModeTransition> {
        let (LinkRequest::Reconnect { session } | LinkRequest::IdleShutdown { session }) = request;
        if session != self.session {
            info!(
                "wifi: {:?} from session {} dropped, current session {}",
                request, session, self.session
            );
            return None;
        }
        match request {
            LinkRequest::Reconnect { .. } => {
                if self.radio.mode() != RadioMode::Station {
                    info!("wifi: reconnect ignored in {}", self.radio.mode().as_str());
                    return None;
                }
                match self.radio.reconnect().await {
                    Ok(_) => None,
                    Err(err) => {
                        let mut transition =
                            self.transition(WirelessEvent::StopStation, "reconnect").await;
                        transition.error = Some(err);
                        error!("wifi: reconnect failed: {}", err);
                        Some(transition)
                    }
                }
            }
            LinkRequest::IdleShutdown { .. } => {
                if self.radio.mode() != RadioMode::AccessPoint {
                    info!(
                        "wifi: idle shutdown ignored in {}",
                        self.radio.mode().as_str()
                    );
                    return None;
                }
                Some(self.transition(WirelessEvent::StopAp, "idle_shutdown").await)
            }
        }
    }

    /// Single consumer of mode events and link requests.
    pub async fn run<const Q: usize, F>(
        &mut self,
        events: &Channel<M, WirelessEvent, Q>,
        requests: &Signal<M, LinkRequest>,
        mut observe: F,
    ) where
        F: FnMut(&ModeTransition),
    {
        loop {
            let transition = match select(events.receive(), requests.wait()).await {
                Either::First(event) => Some(self.apply(event).await),
                Either::Second(request) => self.handle_request(request).await,
            };
            if let Some(transition) = transition {
                observe(&transition);
            }
        }
    }
}

fn session_end(mode: RadioMode) -> Option<LinkInput> {
    match mode {
        RadioMode::AccessPoint => Some(LinkInput::AccessPointStopped),
        RadioMode::Station => Some(LinkInput::StationStopped),
        RadioMode::Off | RadioMode::BeaconInject => None,
    }
}

#[cfg(test)]
mod tests;
