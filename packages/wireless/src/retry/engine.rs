use heapless::Vec;
use log::{info, warn};
use statig::blocking::IntoStateMachineExt as _;

use super::machine::{DispatchContext, RetryMachine};
use super::types::{RetryEvent, RetryNotice, RetryPhase};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RetryOutcome {
    /// Issue another association attempt.
    pub reconnect: bool,
    pub notices: Vec<RetryNotice, 2>,
}

/// Bounded station association retries.
///
/// Only counts and decides; the caller owns the radio and the UI.
pub struct ConnectionRetryPolicy {
    machine: statig::blocking::StateMachine<RetryMachine>,
}

impl ConnectionRetryPolicy {
    pub fn new(max_attempts: u8) -> Self {
        Self {
            machine: RetryMachine::new(max_attempts).state_machine(),
        }
    }

    pub fn phase(&self) -> RetryPhase {
        self.machine.inner().phase
    }

    pub fn attempts(&self) -> u8 {
        self.machine.inner().attempts
    }

    pub fn max_attempts(&self) -> u8 {
        self.machine.inner().max_attempts
    }

    pub fn handle(&mut self, event: RetryEvent) -> RetryOutcome {
        let before = self.phase();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let after = self.phase();

        if before != after {
            info!(
                "link: station {} -> {} attempts={}",
                before.as_str(),
                after.as_str(),
                self.attempts()
            );
        }
        if after == RetryPhase::Failed && before != RetryPhase::Failed {
            warn!(
                "link: station gave up after {} attempts",
                self.max_attempts()
            );
        }

        RetryOutcome {
            reconnect: context.reconnect,
            notices: context.notices,
        }
    }
}
