#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RetryPhase {
    #[default]
    Idle,
    Connecting,
    Connected,
    Failed,
}

impl RetryPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryEvent {
    /// Station mode entered; the first association attempt is in flight.
    Begin,
    Disconnected,
    GotIp([u8; 4]),
    /// Station mode left.
    End,
}

/// What the UI collaborator should be told after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryNotice {
    Progress { attempt: u8, max: u8 },
    Failed,
    Connected([u8; 4]),
    Disconnected,
}
