//! Hand-off between the mode controller and the beacon worker task.
//!
//! The worker task parks on `start`, runs one engine activation while the
//! running flag holds, then raises `finished`. The controller side only ever
//! touches the flag and the two signals.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, signal::Signal};
use embedded_hal_async::delay::DelayNs;
use log::{info, warn};
use rand_core::RngCore;

use crate::{
    beacon::{BeaconEngine, StepReport},
    driver::{Clock, FrameTransmitter, InjectionWorker},
    error::RadioError,
};

pub const WORKER_HALT_GRACE_MS: u32 = 500;

pub struct InjectorControl<M: RawMutex> {
    running: AtomicBool,
    start: Signal<M, ()>,
    finished: Signal<M, ()>,
}

impl<M: RawMutex> InjectorControl<M> {
    pub const fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            start: Signal::new(),
            finished: Signal::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn running_flag(&self) -> &AtomicBool {
        &self.running
    }
}

impl<M: RawMutex> Default for InjectorControl<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Controller-side view of the worker.
pub struct InjectorHandle<'a, M: RawMutex, D> {
    control: &'a InjectorControl<M>,
    delay: D,
    grace_ms: u32,
}

impl<'a, M: RawMutex, D: DelayNs> InjectorHandle<'a, M, D> {
    pub fn new(control: &'a InjectorControl<M>, delay: D) -> Self {
        Self {
            control,
            delay,
            grace_ms: WORKER_HALT_GRACE_MS,
        }
    }

    pub fn with_grace_ms(mut self, grace_ms: u32) -> Self {
        self.grace_ms = grace_ms;
        self
    }
}

impl<M: RawMutex, D: DelayNs> InjectionWorker for InjectorHandle<'_, M, D> {
    fn launch(&mut self) -> Result<(), RadioError> {
        self.control.finished.reset();
        self.control.running.store(true, Ordering::Release);
        self.control.start.signal(());
        Ok(())
    }

    async fn halt(&mut self) -> bool {
        self.control.running.store(false, Ordering::Release);
        match select(
            self.control.finished.wait(),
            self.delay.delay_ms(self.grace_ms),
        )
        .await
        {
            Either::First(()) => true,
            Either::Second(()) => {
                warn!("beacon: worker silent for {} ms after halt", self.grace_ms);
                false
            }
        }
    }

    fn is_running(&self) -> bool {
        self.control.is_running()
    }
}

/// Worker loop: one engine activation per launch.
pub async fn serve<M, T, R, C, D, F>(
    control: &InjectorControl<M>,
    engine: &mut BeaconEngine<T, R>,
    clock: &C,
    delay: &mut D,
    mut observe: F,
) where
    M: RawMutex,
    T: FrameTransmitter,
    R: RngCore,
    C: Clock,
    D: DelayNs,
    F: FnMut(&StepReport),
{
    loop {
        control.start.wait().await;
        info!("beacon: worker activation");
        engine.run(clock, delay, &control.running, &mut observe).await;
        control.finished.signal(());
    }
}
