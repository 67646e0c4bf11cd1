use badge_wireless::{RadioMode, WirelessUi};
use esp_println::println;

use crate::firmware::{
    config::{STATION_FAILED, UI_NOTICES},
    telemetry,
};

/// What the graphical shell is told about the radio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UiNotice {
    ConnectionProgress { attempt: u8, max: u8 },
    ConnectionFailed,
    Connected([u8; 4]),
    Disconnected,
    ClientCount(u8),
    ModeChanged(RadioMode),
}

/// Callbacks never wait; a full notice queue drops the notice.
pub(crate) struct UiBridge;

impl UiBridge {
    fn post(&mut self, notice: UiNotice) {
        if UI_NOTICES.try_send(notice).is_err() {
            telemetry::record_ui_notice_dropped();
        }
    }
}

impl WirelessUi for UiBridge {
    fn on_connection_progress(&mut self, attempt: u8, max: u8) {
        telemetry::record_station_attempt();
        self.post(UiNotice::ConnectionProgress { attempt, max });
    }

    fn on_connection_failed(&mut self) {
        telemetry::record_station_failure();
        self.post(UiNotice::ConnectionFailed);
    }

    fn on_connected(&mut self, ipv4: [u8; 4]) {
        telemetry::record_station_connected(ipv4);
        self.post(UiNotice::Connected(ipv4));
    }

    fn on_disconnected(&mut self) {
        telemetry::record_station_disconnected();
        self.post(UiNotice::Disconnected);
    }

    fn on_client_count_changed(&mut self, count: u8) {
        telemetry::record_ap_clients(count);
        self.post(UiNotice::ClientCount(count));
    }

    fn on_mode_changed(&mut self, mode: RadioMode) {
        self.post(UiNotice::ModeChanged(mode));
    }
}

/// Stand-in for the shell: renders notices on the console and tells the
/// button panel when station retries are exhausted.
#[embassy_executor::task]
pub(super) async fn ui_task() {
    loop {
        match UI_NOTICES.receive().await {
            UiNotice::ConnectionProgress { attempt, max } => {
                println!("ui: connecting attempt {}/{}", attempt, max)
            }
            UiNotice::ConnectionFailed => {
                println!("ui: connection failed");
                STATION_FAILED.signal(());
            }
            UiNotice::Connected(ip) => {
                println!("ui: connected {}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3])
            }
            UiNotice::Disconnected => println!("ui: disconnected, reconnecting"),
            UiNotice::ClientCount(count) => println!("ui: ap clients={}", count),
            UiNotice::ModeChanged(mode) => println!("ui: mode={}", mode.as_str()),
        }
    }
}
