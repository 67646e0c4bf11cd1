pub(crate) mod config;
mod platform;
mod radio;
mod runtime;
mod storage;
pub(crate) mod telemetry;

pub(crate) use runtime::run;
