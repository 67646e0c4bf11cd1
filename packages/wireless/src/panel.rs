use log::debug;

use crate::{controller::WirelessEvent, lifecycle::RadioMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelButton {
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Press {
    Short,
    Held,
}

/// Admin screen button mapping.
///
/// Tracks the mode the operator believes the radio is in and turns button
/// presses into mode events. Mode changes made elsewhere (idle shutdown,
/// driver faults) are fed back through [`AdminPanel::mode_changed`].
#[derive(Clone, Copy, Debug, Default)]
pub struct AdminPanel {
    mode: RadioMode,
}

impl AdminPanel {
    pub const fn new() -> Self {
        Self {
            mode: RadioMode::Off,
        }
    }

    pub fn mode(&self) -> RadioMode {
        self.mode
    }

    pub fn press(&mut self, button: PanelButton, press: Press) -> Option<WirelessEvent> {
        let event = match (self.mode, button, press) {
            (RadioMode::Off, PanelButton::Up, Press::Short) => WirelessEvent::StartAp,
            (RadioMode::Off, PanelButton::Up, Press::Held) => WirelessEvent::StartStation,
            (RadioMode::Off, PanelButton::Down, Press::Short) => WirelessEvent::StartInject,
            (RadioMode::AccessPoint, PanelButton::Up, _) => WirelessEvent::StopAp,
            (RadioMode::Station, PanelButton::Up, _) => WirelessEvent::StopStation,
            (RadioMode::BeaconInject, PanelButton::Up, _) => WirelessEvent::StopInject,
            _ => {
                debug!(
                    "panel: {:?}/{:?} has no action in {}",
                    button,
                    press,
                    self.mode.as_str()
                );
                return None;
            }
        };
        self.mode = event.target();
        Some(event)
    }

    pub fn mode_changed(&mut self, mode: RadioMode) {
        self.mode = mode;
    }

    /// Station retries are exhausted; offer the start options again. A drop
    /// from a connected station is not reported here since the radio stays
    /// in station mode and keeps reconnecting.
    pub fn connection_failed(&mut self) {
        if self.mode == RadioMode::Station {
            self.mode = RadioMode::Off;
        }
    }
}
