use badge_wireless::{
    config::{LINK_QUEUE_DEPTH, MODE_QUEUE_DEPTH},
    IdleTimerCommand, InjectorControl, LinkInput, LinkRequest, RadioMode, WirelessEvent,
};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel, signal::Signal};

use super::UI_NOTICE_DEPTH;
use crate::firmware::runtime::UiNotice;

pub(crate) static MODE_EVENTS: Channel<CriticalSectionRawMutex, WirelessEvent, MODE_QUEUE_DEPTH> =
    Channel::new();
pub(crate) static LINK_INPUTS: Channel<CriticalSectionRawMutex, LinkInput, LINK_QUEUE_DEPTH> =
    Channel::new();
pub(crate) static LINK_REQUESTS: Signal<CriticalSectionRawMutex, LinkRequest> = Signal::new();
pub(crate) static IDLE_TIMER: Signal<CriticalSectionRawMutex, IdleTimerCommand> = Signal::new();
pub(crate) static UI_NOTICES: Channel<CriticalSectionRawMutex, UiNotice, UI_NOTICE_DEPTH> =
    Channel::new();
pub(crate) static PANEL_MODE: Signal<CriticalSectionRawMutex, RadioMode> = Signal::new();
pub(crate) static STATION_FAILED: Signal<CriticalSectionRawMutex, ()> = Signal::new();
pub(crate) static INJECTOR: InjectorControl<CriticalSectionRawMutex> = InjectorControl::new();
