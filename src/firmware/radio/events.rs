use core::sync::atomic::{AtomicBool, Ordering};

use badge_wireless::LinkInput;
use esp_radio::wifi::event::{self, EventExt};
use log::{debug, warn};

use crate::firmware::{config::LINK_INPUTS, telemetry};

static EVENT_HANDLERS_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Route the radio notifications the link supervisor cares about onto its
/// queue. Handlers run in the driver's context and never wait.
pub(crate) fn install_event_handlers() {
    if EVENT_HANDLERS_INSTALLED.swap(true, Ordering::Relaxed) {
        return;
    }

    event::ApStaConnected::update_handler(|_| forward(LinkInput::ClientJoined));

    event::ApStaDisconnected::update_handler(|_| forward(LinkInput::ClientLeft));

    event::StaDisconnected::update_handler(|event| {
        let reason = event.reason();
        debug!(
            "wifi: sta_disconnected reason={} ({})",
            reason,
            disconnect_reason_label(reason)
        );
        forward(LinkInput::StationDisconnected);
    });
}

pub(crate) fn forward(input: LinkInput) {
    if LINK_INPUTS.try_send(input).is_err() {
        telemetry::record_link_input_dropped();
        warn!("link: queue full, dropped {}", input.as_str());
    }
}

fn disconnect_reason_label(reason: u8) -> &'static str {
    match reason {
        200 => "beacon_timeout",
        201 => "no_ap_found",
        202 => "auth_fail",
        203 => "assoc_fail",
        204 => "handshake_timeout",
        205 => "connection_fail",
        _ => "other",
    }
}
