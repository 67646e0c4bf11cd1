//! Beacon injection engine.
//!
//! Every [`BURST_INTERVAL_MS`] the engine sends one forged beacon per
//! identity, each from a freshly randomised locally-administered address.
//! The radio hops across [`BEACON_CHANNELS`] every [`CHANNEL_DWELL_MS`] and
//! the packet counter is reported and cleared every
//! [`RATE_REPORT_INTERVAL_MS`].

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal_async::delay::DelayNs;
use log::{debug, info, warn};
use rand_core::RngCore;

use crate::{
    config::SSID_MAX_LEN,
    driver::{Clock, FrameTransmitter},
    error::{RadioError, TxError},
    frame::{build_beacon, MacAddress},
    identity::BEACON_IDENTITIES,
};


pub const BEACON_CHANNELS: [u8; 3] = [1, 6, 11];
pub const CYCLE_PERIOD_MS: u32 = 20;
pub const BURST_INTERVAL_MS: u64 = 100;
pub const CHANNEL_DWELL_MS: u64 = 2_000;
pub const RATE_REPORT_INTERVAL_MS: u64 = 5_000;
pub const NO_MEMORY_BACKOFF_MS: u32 = 50;
pub const INTER_FRAME_GAP_MS: u32 = 1;

/// Per-activation counters and timers. Rebuilt on every activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransmissionState {
    pub channel_index: usize,
    pub packets_sent: u32,
    /// `None` until the first burst of the activation.
    pub last_burst_ms: Option<u64>,
    pub last_channel_switch_ms: u64,
    pub last_report_ms: u64,
}

impl TransmissionState {
    const fn fresh(now_ms: u64) -> Self {
        Self {
            channel_index: 0,
            packets_sent: 0,
            last_burst_ms: None,
            last_channel_switch_ms: now_ms,
            last_report_ms: now_ms,
        }
    }

    pub const fn current_channel(&self) -> u8 {
        BEACON_CHANNELS[self.channel_index]
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BurstSummary {
    pub attempted: u16,
    pub sent: u16,
    pub no_memory: u16,
    pub transient: u16,
    pub skipped: u16,
}

/// What one scheduler step did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub burst: Option<BurstSummary>,
    pub channel: Option<u8>,
    /// Frames sent over the last report window.
    pub rate: Option<u32>,
}

pub struct BeaconEngine<T, R> {
    tx: T,
    rng: R,
    identities: &'static [&'static str],
    state: TransmissionState,
}

impl<T, R> BeaconEngine<T, R>
where
    T: FrameTransmitter,
    R: RngCore,
{
    pub fn new(tx: T, rng: R) -> Self {
        Self::with_identities(tx, rng, &BEACON_IDENTITIES)
    }

    pub fn with_identities(tx: T, rng: R, identities: &'static [&'static str]) -> Self {
        Self {
            tx,
            rng,
            identities,
            state: TransmissionState::fresh(0),
        }
    }

    pub fn state(&self) -> &TransmissionState {
        &self.state
    }

    pub fn current_channel(&self) -> u8 {
        self.state.current_channel()
    }

    pub fn transmitter(&self) -> &T {
        &self.tx
    }

    pub fn transmitter_mut(&mut self) -> &mut T {
        &mut self.tx
    }

    /// Reset all transmission state and tune to the first channel.
    pub fn activate(&mut self, now_ms: u64) -> Result<(), RadioError> {
        self.state = TransmissionState::fresh(now_ms);
        self.tx.set_channel(self.state.current_channel())
    }

    /// One scheduler iteration at `now_ms`.
    pub async fn step<C, D>(
        &mut self,
        now_ms: u64,
        clock: &C,
        delay: &mut D,
        running: &AtomicBool,
    ) -> StepReport
    where
        C: Clock,
        D: DelayNs,
    {
        let mut report = StepReport::default();
        if !running.load(Ordering::Acquire) {
            return report;
        }

        let burst_due = self
            .state
            .last_burst_ms
            .map_or(true, |last| now_ms.saturating_sub(last) >= BURST_INTERVAL_MS);
        if burst_due {
            self.state.last_burst_ms = Some(now_ms);
            report.burst = Some(self.burst(clock, delay, running).await);
        }

        if now_ms.saturating_sub(self.state.last_channel_switch_ms) >= CHANNEL_DWELL_MS {
            self.state.last_channel_switch_ms = now_ms;
            report.channel = self.advance_channel();
        }

        if now_ms.saturating_sub(self.state.last_report_ms) >= RATE_REPORT_INTERVAL_MS {
            let window_ms = now_ms - self.state.last_report_ms;
            let sent = self.state.packets_sent;
            info!(
                "beacon: rate sent={} window_ms={} channel={}",
                sent,
                window_ms,
                self.state.current_channel()
            );
            self.state.packets_sent = 0;
            self.state.last_report_ms = now_ms;
            report.rate = Some(sent);
        }

        report
    }

    async fn burst<C, D>(&mut self, clock: &C, delay: &mut D, running: &AtomicBool) -> BurstSummary
    where
        C: Clock,
        D: DelayNs,
    {
        let mut summary = BurstSummary::default();
        let channel = self.state.current_channel();

        for &name in self.identities {
            if !running.load(Ordering::Acquire) {
                break;
            }
            let ssid = name.as_bytes();
            if ssid.len() > SSID_MAX_LEN {
                warn!("beacon: skipping identity len={}", ssid.len());
                summary.skipped += 1;
                continue;
            }

            let sender = MacAddress::random_local(&mut self.rng);
            let frame = match build_beacon(ssid, sender, channel, clock.now_us()) {
                Ok(frame) => frame,
                Err(err) => {
                    warn!("beacon: frame build failed: {}", err);
                    summary.skipped += 1;
                    continue;
                }
            };

            summary.attempted += 1;
            match self.tx.transmit(frame.as_bytes()) {
                Ok(()) => {
                    summary.sent += 1;
                    self.state.packets_sent = self.state.packets_sent.wrapping_add(1);
                    debug!("beacon: tx ssid_len={} src={} ch={}", ssid.len(), sender, channel);
                }
                Err(TxError::NoMemory) => {
                    summary.no_memory += 1;
                    delay.delay_ms(NO_MEMORY_BACKOFF_MS).await;
                }
                Err(err) => {
                    summary.transient += 1;
                    debug!("beacon: tx {}", err);
                }
            }
            delay.delay_ms(INTER_FRAME_GAP_MS).await;
        }

        summary
    }

    fn advance_channel(&mut self) -> Option<u8> {
        let next = (self.state.channel_index + 1) % BEACON_CHANNELS.len();
        let channel = BEACON_CHANNELS[next];
        match self.tx.set_channel(channel) {
            Ok(()) => {
                self.state.channel_index = next;
                debug!("beacon: channel={}", channel);
                Some(channel)
            }
            Err(err) => {
                warn!("beacon: channel {} switch failed: {}", channel, err);
                None
            }
        }
    }

    /// Run one activation until `running` is cleared.
    pub async fn run<C, D, F>(
        &mut self,
        clock: &C,
        delay: &mut D,
        running: &AtomicBool,
        mut observe: F,
    ) where
        C: Clock,
        D: DelayNs,
        F: FnMut(&StepReport),
    {
        if let Err(err) = self.activate(clock.now_ms()) {
            warn!("beacon: initial channel failed: {}", err);
        }
        info!(
            "beacon: started identities={} channel={}",
            self.identities.len(),
            self.current_channel()
        );

        while running.load(Ordering::Acquire) {
            let report = self.step(clock.now_ms(), clock, delay, running).await;
            observe(&report);
            delay.delay_ms(CYCLE_PERIOD_MS).await;
        }

        info!("beacon: stopped");
    }
}
