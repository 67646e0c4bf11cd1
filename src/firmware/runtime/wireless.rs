use badge_wireless::{
    run_idle_timer, serve, BeaconEngine, InjectorHandle, LinkSupervisor, ModeTransition,
    RadioLifecycle, WirelessModeController, WirelessTiming, WirelessUi,
};
use embassy_time::{Delay, Instant};
use esp_println::println;

use super::ui_bridge::UiBridge;
use crate::firmware::{
    config::{IDLE_TIMER, INJECTOR, LINK_INPUTS, LINK_REQUESTS, MODE_EVENTS, PANEL_MODE},
    platform::{EmbassyClock, HardwareRng},
    radio::{EspRadio, EspTransmitter},
    storage::CredentialStore,
    telemetry,
};

#[embassy_executor::task]
pub(super) async fn mode_task(driver: EspRadio, credentials: CredentialStore<'static>) {
    let started_at = Instant::now();
    let worker = InjectorHandle::new(&INJECTOR, Delay);
    let mut controller = WirelessModeController::new(
        RadioLifecycle::new(driver, worker),
        credentials,
        Delay,
        WirelessTiming::defaults(),
        LINK_INPUTS.sender(),
    );
    let mut ui = UiBridge;

    controller
        .run(&MODE_EVENTS, &LINK_REQUESTS, |transition| {
            emit_wifi_event(transition, started_at);
            telemetry::record_mode_transition(transition.to, transition.error.is_some());
            PANEL_MODE.signal(transition.to);
            ui.on_mode_changed(transition.to);
        })
        .await;
}

#[embassy_executor::task]
pub(super) async fn link_task() {
    let mut supervisor = LinkSupervisor::new(UiBridge, WirelessTiming::defaults());
    supervisor
        .run(&LINK_INPUTS, &IDLE_TIMER, &LINK_REQUESTS)
        .await;
}

#[embassy_executor::task]
pub(super) async fn idle_timer_task() {
    run_idle_timer(&IDLE_TIMER, &LINK_INPUTS, Delay).await;
}

#[embassy_executor::task]
pub(super) async fn beacon_task(transmitter: EspTransmitter) {
    let mut engine = BeaconEngine::new(transmitter, HardwareRng::new());
    let mut delay = Delay;
    serve(&INJECTOR, &mut engine, &EmbassyClock, &mut delay, |report| {
        if let Some(burst) = &report.burst {
            telemetry::record_beacon_burst(burst);
        }
        if report.channel.is_some() {
            telemetry::record_beacon_channel_hop();
        }
        if let Some(rate) = report.rate {
            telemetry::record_beacon_rate(rate);
        }
    })
    .await;
}

fn emit_wifi_event(transition: &ModeTransition, started_at: Instant) {
    let at_ms = started_at.elapsed().as_millis() as u32;
    println!(
        "WIFI_EVENT {{\"from\":\"{}\",\"to\":\"{}\",\"trigger\":\"{}\",\"ok\":{},\"at_ms\":{}}}",
        transition.from.as_str(),
        transition.to.as_str(),
        transition.trigger,
        transition.error.is_none(),
        at_ms
    );
}
