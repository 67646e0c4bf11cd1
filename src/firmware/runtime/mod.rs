mod bootstrap;
mod buttons;
mod net;
mod ui_bridge;
mod wireless;

pub(crate) use bootstrap::run;
pub(crate) use ui_bridge::UiNotice;
