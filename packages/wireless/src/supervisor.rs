//! Single owner of the hardware notification stream.
//!
//! Radio callbacks, controller session notices and idle timer expiries all
//! arrive as [`LinkInput`] on one queue. The supervisor folds them into the
//! retry policy and the inactivity monitor, talks to the UI, and hands timer
//! work and radio work back out without ever blocking on the radio itself.

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel, signal::Signal};
use embedded_hal_async::delay::DelayNs;
use log::{debug, info};

use crate::{
    config::WirelessTiming,
    driver::WirelessUi,
    inactivity::{ApInactivityMonitor, Expiry, TimerAction},
    retry::{ConnectionRetryPolicy, RetryEvent, RetryNotice, RetryPhase},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkInput {
    ClientJoined,
    ClientLeft,
    StationDisconnected,
    StationGotIp([u8; 4]),
    /// `session` identifies the controller bring-up that raised it.
    AccessPointStarted { session: u32 },
    AccessPointStopped,
    StationStarted { session: u32 },
    StationStopped,
    IdleTimerExpired { generation: u32 },
}

impl LinkInput {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClientJoined => "client_joined",
            Self::ClientLeft => "client_left",
            Self::StationDisconnected => "sta_disconnected",
            Self::StationGotIp(_) => "sta_got_ip",
            Self::AccessPointStarted { .. } => "ap_started",
            Self::AccessPointStopped => "ap_stopped",
            Self::StationStarted { .. } => "sta_started",
            Self::StationStopped => "sta_stopped",
            Self::IdleTimerExpired { .. } => "idle_expired",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkAction {
    ArmIdleTimer { generation: u32, after_ms: u64 },
    CancelIdleTimer,
    Reconnect { session: u32 },
    IdleShutdown { session: u32 },
}

/// Radio work the supervisor asks of the mode controller, tagged with the
/// session it was raised for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkRequest {
    Reconnect { session: u32 },
    IdleShutdown { session: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdleTimerCommand {
    Arm { generation: u32, after_ms: u64 },
    Cancel,
}

pub struct LinkSupervisor<U> {
    ui: U,
    retry: ConnectionRetryPolicy,
    monitor: ApInactivityMonitor,
    ap_session: u32,
    station_session: u32,
}

impl<U: WirelessUi> LinkSupervisor<U> {
    pub fn new(ui: U, timing: WirelessTiming) -> Self {
        Self {
            ui,
            retry: ConnectionRetryPolicy::new(timing.max_attempts),
            monitor: ApInactivityMonitor::new(timing.inactivity_timeout_ms),
            ap_session: 0,
            station_session: 0,
        }
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn station_phase(&self) -> RetryPhase {
        self.retry.phase()
    }

    pub fn client_count(&self) -> u8 {
        self.monitor.client_count()
    }

    pub fn handle(&mut self, input: LinkInput) -> Option<LinkAction> {
        debug!("link: input={}", input.as_str());
        match input {
            LinkInput::AccessPointStarted { session } => {
                self.ap_session = session;
                let action = self.monitor.session_started();
                self.ui.on_client_count_changed(0);
                timer_action(action)
            }
            LinkInput::AccessPointStopped => timer_action(self.monitor.session_ended()),
            LinkInput::ClientJoined => {
                let action = self.monitor.client_joined();
                self.report_clients();
                timer_action(action)
            }
            LinkInput::ClientLeft => {
                let action = self.monitor.client_left();
                self.report_clients();
                timer_action(action)
            }
            LinkInput::IdleTimerExpired { generation } => {
                match self.monitor.timer_expired(generation) {
                    Expiry::Shutdown => Some(LinkAction::IdleShutdown {
                        session: self.ap_session,
                    }),
                    Expiry::Stale | Expiry::ClientsPresent(_) => None,
                }
            }
            LinkInput::StationStarted { session } => {
                self.station_session = session;
                self.retry_event(RetryEvent::Begin)
            }
            LinkInput::StationStopped => self.retry_event(RetryEvent::End),
            LinkInput::StationDisconnected => self.retry_event(RetryEvent::Disconnected),
            LinkInput::StationGotIp(ipv4) => self.retry_event(RetryEvent::GotIp(ipv4)),
        }
    }

    fn report_clients(&mut self) {
        if self.monitor.is_active() {
            self.ui.on_client_count_changed(self.monitor.client_count());
        }
    }

    fn retry_event(&mut self, event: RetryEvent) -> Option<LinkAction> {
        let outcome = self.retry.handle(event);
        for notice in outcome.notices {
            match notice {
                RetryNotice::Progress { attempt, max } => {
                    self.ui.on_connection_progress(attempt, max)
                }
                RetryNotice::Failed => self.ui.on_connection_failed(),
                RetryNotice::Connected(ipv4) => {
                    info!(
                        "link: station address {}.{}.{}.{}",
                        ipv4[0], ipv4[1], ipv4[2], ipv4[3]
                    );
                    self.ui.on_connected(ipv4)
                }
                RetryNotice::Disconnected => self.ui.on_disconnected(),
            }
        }
        outcome.reconnect.then_some(LinkAction::Reconnect {
            session: self.station_session,
        })
    }

    /// Consume link inputs forever, forwarding actions to the idle timer
    /// service and the mode controller.
    pub async fn run<M: RawMutex, const N: usize>(
        &mut self,
        inputs: &Channel<M, LinkInput, N>,
        timer: &Signal<M, IdleTimerCommand>,
        requests: &Signal<M, LinkRequest>,
    ) {
        loop {
            let input = inputs.receive().await;
            if let Some(action) = self.handle(input) {
                dispatch(action, timer, requests);
            }
        }
    }
}

fn timer_action(action: TimerAction) -> Option<LinkAction> {
    match action {
        TimerAction::None => None,
        TimerAction::Arm {
            generation,
            after_ms,
        } => Some(LinkAction::ArmIdleTimer {
            generation,
            after_ms,
        }),
        TimerAction::Cancel => Some(LinkAction::CancelIdleTimer),
    }
}

pub fn dispatch<M: RawMutex>(
    action: LinkAction,
    timer: &Signal<M, IdleTimerCommand>,
    requests: &Signal<M, LinkRequest>,
) {
    match action {
        LinkAction::ArmIdleTimer {
            generation,
            after_ms,
        } => timer.signal(IdleTimerCommand::Arm {
            generation,
            after_ms,
        }),
        LinkAction::CancelIdleTimer => timer.signal(IdleTimerCommand::Cancel),
        LinkAction::Reconnect { session } => requests.signal(LinkRequest::Reconnect { session }),
        LinkAction::IdleShutdown { session } => {
            requests.signal(LinkRequest::IdleShutdown { session })
        }
    }
}

/// One-shot idle timer service. A new `Arm` restarts the countdown; expiry
/// is delivered back to the supervisor as a link input.
pub async fn run_idle_timer<M: RawMutex, const N: usize, D: DelayNs>(
    commands: &Signal<M, IdleTimerCommand>,
    inputs: &Channel<M, LinkInput, N>,
    mut delay: D,
) {
    let mut pending: Option<(u32, u64)> = None;
    loop {
        let command = match pending {
            None => commands.wait().await,
            Some((generation, after_ms)) => {
                let window = u32::try_from(after_ms).unwrap_or(u32::MAX);
                match select(delay.delay_ms(window), commands.wait()).await {
                    Either::First(()) => {
                        pending = None;
                        inputs.send(LinkInput::IdleTimerExpired { generation }).await;
                        continue;
                    }
                    Either::Second(command) => command,
                }
            }
        };
        pending = match command {
            IdleTimerCommand::Arm {
                generation,
                after_ms,
            } => Some((generation, after_ms)),
            IdleTimerCommand::Cancel => None,
        };
    }
}
