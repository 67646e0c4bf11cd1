use heapless::Vec;
use statig::prelude::*;

use super::types::{RetryEvent, RetryNotice, RetryPhase};

#[derive(Clone, Copy, Debug)]
pub(super) struct RetryMachine {
    pub(super) attempts: u8,
    pub(super) max_attempts: u8,
    pub(super) phase: RetryPhase,
}

#[derive(Debug, Default)]
pub(super) struct DispatchContext {
    pub(super) reconnect: bool,
    pub(super) notices: Vec<RetryNotice, 2>,
}

impl DispatchContext {
    fn notify(&mut self, notice: RetryNotice) {
        // Capacity covers the longest sequence a single event produces.
        let _ = self.notices.push(notice);
    }
}

impl RetryMachine {
    pub(super) fn new(max_attempts: u8) -> Self {
        Self {
            attempts: 0,
            max_attempts: max_attempts.max(1),
            phase: RetryPhase::Idle,
        }
    }

    fn start_connecting(&mut self) -> Outcome<State> {
        self.attempts = 0;
        self.phase = RetryPhase::Connecting;
        Transition(State::connecting())
    }

    fn mark_connected(&mut self, context: &mut DispatchContext, ipv4: [u8; 4]) -> Outcome<State> {
        self.attempts = 0;
        self.phase = RetryPhase::Connected;
        context.notify(RetryNotice::Connected(ipv4));
        Transition(State::connected())
    }

    fn go_idle(&mut self) -> Outcome<State> {
        self.attempts = 0;
        self.phase = RetryPhase::Idle;
        Transition(State::idle())
    }

    /// Count one failed association and either retry or give up.
    fn count_failure(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        self.attempts = self.attempts.saturating_add(1);
        if self.attempts >= self.max_attempts {
            self.phase = RetryPhase::Failed;
            context.notify(RetryNotice::Failed);
            return Transition(State::failed());
        }
        context.notify(RetryNotice::Progress {
            attempt: self.attempts,
            max: self.max_attempts,
        });
        context.reconnect = true;
        self.phase = RetryPhase::Connecting;
        Transition(State::connecting())
    }
}

#[state_machine(initial = "State::idle()")]
impl RetryMachine {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &RetryEvent) -> Outcome<State> {
        match event {
            RetryEvent::Begin => self.start_connecting(),
            RetryEvent::GotIp(ipv4) => self.mark_connected(context, *ipv4),
            RetryEvent::Disconnected | RetryEvent::End => Handled,
        }
    }

    #[state]
    fn connecting(
        &mut self,
        context: &mut DispatchContext,
        event: &RetryEvent,
    ) -> Outcome<State> {
        match event {
            RetryEvent::Begin => self.start_connecting(),
            RetryEvent::Disconnected => self.count_failure(context),
            RetryEvent::GotIp(ipv4) => self.mark_connected(context, *ipv4),
            RetryEvent::End => self.go_idle(),
        }
    }

    #[state]
    fn connected(
        &mut self,
        context: &mut DispatchContext,
        event: &RetryEvent,
    ) -> Outcome<State> {
        match event {
            RetryEvent::Begin => self.start_connecting(),
            RetryEvent::Disconnected => {
                context.notify(RetryNotice::Disconnected);
                self.attempts = 0;
                self.count_failure(context)
            }
            // Lease renewal.
            RetryEvent::GotIp(_) => Handled,
            RetryEvent::End => {
                context.notify(RetryNotice::Disconnected);
                self.go_idle()
            }
        }
    }

    #[state]
    fn failed(&mut self, context: &mut DispatchContext, event: &RetryEvent) -> Outcome<State> {
        match event {
            RetryEvent::Begin => self.start_connecting(),
            RetryEvent::GotIp(ipv4) => self.mark_connected(context, *ipv4),
            RetryEvent::Disconnected => Handled,
            RetryEvent::End => self.go_idle(),
        }
    }
}
