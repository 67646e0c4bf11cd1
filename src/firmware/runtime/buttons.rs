use badge_wireless::{AdminPanel, PanelButton, Press};
use embassy_futures::select::{select, Either};
use embassy_time::{with_timeout, Duration, Timer};
use esp_hal::gpio::Input;
use log::info;

use crate::firmware::config::{
    BUTTON_DEBOUNCE_MS, BUTTON_HOLD_MS, MODE_EVENTS, PANEL_MODE, STATION_FAILED,
};

/// Admin screen buttons, active low.
#[embassy_executor::task]
pub(super) async fn button_task(mut up: Input<'static>, mut down: Input<'static>) {
    let mut panel = AdminPanel::new();
    loop {
        let button = match select(up.wait_for_falling_edge(), down.wait_for_falling_edge()).await
        {
            Either::First(()) => PanelButton::Up,
            Either::Second(()) => PanelButton::Down,
        };
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        let pin = match button {
            PanelButton::Up => &mut up,
            PanelButton::Down => &mut down,
        };
        if pin.is_high() {
            continue;
        }
        let press = match with_timeout(
            Duration::from_millis(BUTTON_HOLD_MS),
            pin.wait_for_rising_edge(),
        )
        .await
        {
            Ok(()) => Press::Short,
            Err(_) => Press::Held,
        };

        sync_panel(&mut panel);
        if let Some(event) = panel.press(button, press) {
            info!("panel: {:?}/{:?} -> {}", button, press, event.as_str());
            MODE_EVENTS.send(event).await;
        }
    }
}

fn sync_panel(panel: &mut AdminPanel) {
    if let Some(mode) = PANEL_MODE.try_take() {
        panel.mode_changed(mode);
    }
    if STATION_FAILED.try_take().is_some() {
        panel.connection_failed();
    }
}
