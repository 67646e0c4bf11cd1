use log::{debug, error, info, warn};

/// Timer work requested by the monitor. The caller owns the actual timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    None,
    Arm { generation: u32, after_ms: u64 },
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Idle window elapsed with no clients; shut the access point down.
    Shutdown,
    /// Expiry of a timer that was cancelled or re-armed since.
    Stale,
    /// Armed timer fired while clients are attached. Logged only.
    ClientsPresent(u8),
}

/// Access point client bookkeeping and idle shutdown scheduling.
///
/// Every arm bumps a generation. Only an expiry carrying the generation
/// that is currently armed may shut the access point down.
#[derive(Clone, Debug)]
pub struct ApInactivityMonitor {
    timeout_ms: u64,
    active: bool,
    clients: u8,
    generation: u32,
    armed: Option<u32>,
}

impl ApInactivityMonitor {
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            active: false,
            clients: 0,
            generation: 0,
            armed: None,
        }
    }

    pub fn client_count(&self) -> u8 {
        self.clients
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Access point came up with no clients; start the idle window.
    pub fn session_started(&mut self) -> TimerAction {
        self.active = true;
        self.clients = 0;
        self.arm()
    }

    pub fn session_ended(&mut self) -> TimerAction {
        self.active = false;
        self.clients = 0;
        self.cancel()
    }

    pub fn client_joined(&mut self) -> TimerAction {
        if !self.active {
            debug!("wifi: client join outside ap session");
            return TimerAction::None;
        }
        self.clients = self.clients.saturating_add(1);
        info!("wifi: ap clients={}", self.clients);
        self.cancel()
    }

    pub fn client_left(&mut self) -> TimerAction {
        if !self.active {
            return TimerAction::None;
        }
        if self.clients == 0 {
            warn!("wifi: client leave with zero clients");
            return TimerAction::None;
        }
        self.clients -= 1;
        info!("wifi: ap clients={}", self.clients);
        if self.clients == 0 {
            self.arm()
        } else {
            TimerAction::None
        }
    }

    pub fn timer_expired(&mut self, generation: u32) -> Expiry {
        if !self.active || self.armed != Some(generation) {
            warn!(
                "wifi: stale idle timer gen={} armed={:?}",
                generation, self.armed
            );
            return Expiry::Stale;
        }
        self.armed = None;
        if self.clients != 0 {
            error!(
                "wifi: idle timer fired with clients={}, ignoring",
                self.clients
            );
            return Expiry::ClientsPresent(self.clients);
        }
        info!("wifi: ap idle for {} ms, shutting down", self.timeout_ms);
        Expiry::Shutdown
    }

    fn arm(&mut self) -> TimerAction {
        self.generation = self.generation.wrapping_add(1);
        self.armed = Some(self.generation);
        TimerAction::Arm {
            generation: self.generation,
            after_ms: self.timeout_ms,
        }
    }

    fn cancel(&mut self) -> TimerAction {
        match self.armed.take() {
            Some(_) => TimerAction::Cancel,
            None => TimerAction::None,
        }
    }
}
