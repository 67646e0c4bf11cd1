use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RadioOp {
    Init,
    SetMode,
    SetConfig,
    Start,
    Stop,
    Connect,
    SetChannel,
    Promiscuous,
}

impl RadioOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::SetMode => "set_mode",
            Self::SetConfig => "set_config",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Connect => "connect",
            Self::SetChannel => "set_channel",
            Self::Promiscuous => "promiscuous",
        }
    }
}

/// A radio driver call that failed. Fatal to the transition in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioError {
    pub op: RadioOp,
    pub code: i32,
}

impl RadioError {
    pub const fn new(op: RadioOp, code: i32) -> Self {
        Self { op, code }
    }
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "radio {} failed code={}", self.op.as_str(), self.code)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxError {
    /// Driver ran out of transmit buffers.
    NoMemory,
    Transient(i32),
}

impl TxError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMemory => "no_mem",
            Self::Transient(_) => "transient",
        }
    }
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMemory => f.write_str("tx buffers exhausted"),
            Self::Transient(code) => write!(f, "tx failed code={}", code),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    SsidTooLong { len: usize },
    InvalidChannel(u8),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SsidTooLong { len } => write!(f, "ssid too long len={}", len),
            Self::InvalidChannel(channel) => write!(f, "invalid channel {}", channel),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    SsidEmpty,
    SsidTooLong,
    PassphraseTooLong,
}

impl ConfigError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SsidEmpty => "ssid_empty",
            Self::SsidTooLong => "ssid_too_long",
            Self::PassphraseTooLong => "passphrase_too_long",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
