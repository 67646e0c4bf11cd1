//! `esp-radio` backing for the wireless core.
//!
//! One `WifiController` and one `Sniffer` exist for the whole firmware. The
//! mode controller task drives them through [`EspRadio`], the beacon worker
//! transmits through [`EspTransmitter`]; both share the handles behind
//! mutexes.

mod driver;
mod events;
mod transmitter;

use badge_wireless::{config::AuthMode, RadioError, RadioOp};
use embassy_net::{Runner, Stack, StackResources};
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, mutex::Mutex};
use esp_hal::rng::Rng;
use esp_println::println;
use esp_radio::wifi::{
    AccessPointConfig, AuthMethod, Config as WifiRuntimeConfig, InternalWifiError, Sniffer,
    WifiController, WifiDevice, WifiError,
};
use static_cell::StaticCell;

pub(crate) use driver::EspRadio;
pub(crate) use events::{forward, install_event_handlers};
pub(crate) use transmitter::EspTransmitter;

use super::config::INJECT_CARRIER_SSID;

const WIFI_RX_QUEUE_SIZE: usize = 3;
const WIFI_TX_QUEUE_SIZE: usize = 4;
const WIFI_STATIC_RX_BUF_NUM: u8 = 4;
const WIFI_DYNAMIC_RX_BUF_NUM: u16 = 8;
const WIFI_DYNAMIC_TX_BUF_NUM: u16 = 16;

const ESP_FAIL: i32 = -1;
const ESP_ERR_INVALID_ARG: i32 = 0x102;
const ESP_ERR_NOT_SUPPORTED: i32 = 0x106;
const ESP_ERR_WIFI_NOT_INIT: i32 = 0x3001;
/// Handle held by the other task; not a driver code.
pub(crate) const RADIO_BUSY: i32 = -2;

pub(crate) type SharedController = Mutex<CriticalSectionRawMutex, WifiController<'static>>;
pub(crate) type SharedSniffer = Mutex<CriticalSectionRawMutex, Sniffer<'static>>;

pub(crate) struct RadioRuntime {
    pub(crate) driver: EspRadio,
    pub(crate) transmitter: EspTransmitter,
    pub(crate) net_runner: Runner<'static, WifiDevice<'static>>,
    pub(crate) stack: Stack<'static>,
}

pub(crate) fn setup(
    wifi: esp_hal::peripherals::WIFI<'static>,
) -> Result<RadioRuntime, &'static str> {
    static RADIO_CTRL: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
    static STACK_RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    static CONTROLLER: StaticCell<SharedController> = StaticCell::new();
    static SNIFFER: StaticCell<SharedSniffer> = StaticCell::new();

    let radio_ctrl = esp_radio::init().map_err(|err| {
        println!("wifi: esp_radio::init err={:?}", err);
        "wifi: esp_radio::init failed"
    })?;
    let radio_ctrl = RADIO_CTRL.init(radio_ctrl);
    let (controller, ifaces) = esp_radio::wifi::new(radio_ctrl, wifi, runtime_config())
        .map_err(|err| match err {
            WifiError::InvalidArguments => "wifi: init failed invalid_args",
            WifiError::Unsupported => "wifi: init failed unsupported",
            WifiError::NotInitialized => "wifi: init failed not_initialized",
            WifiError::InternalError(InternalWifiError::NoMem) => "wifi: init failed no_mem",
            _ => "wifi: init failed other",
        })?;

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;
    let (stack, net_runner) = embassy_net::new(
        ifaces.sta,
        embassy_net::Config::dhcpv4(Default::default()),
        STACK_RESOURCES.init(StackResources::<3>::new()),
        seed,
    );

    let controller: &'static SharedController = CONTROLLER.init(Mutex::new(controller));
    let sniffer: &'static SharedSniffer = SNIFFER.init(Mutex::new(ifaces.sniffer));

    Ok(RadioRuntime {
        driver: EspRadio::new(controller, sniffer),
        transmitter: EspTransmitter::new(controller, sniffer),
        net_runner,
        stack,
    })
}

fn runtime_config() -> WifiRuntimeConfig {
    WifiRuntimeConfig::default()
        .with_rx_queue_size(WIFI_RX_QUEUE_SIZE)
        .with_tx_queue_size(WIFI_TX_QUEUE_SIZE)
        .with_static_rx_buf_num(WIFI_STATIC_RX_BUF_NUM)
        .with_dynamic_rx_buf_num(WIFI_DYNAMIC_RX_BUF_NUM)
        .with_dynamic_tx_buf_num(WIFI_DYNAMIC_TX_BUF_NUM)
        .with_ampdu_rx_enable(false)
        .with_ampdu_tx_enable(false)
}

/// Hidden open network that keeps the radio on `channel` for raw transmit.
fn carrier_config(channel: u8) -> AccessPointConfig {
    AccessPointConfig::default()
        .with_ssid(INJECT_CARRIER_SSID.into())
        .with_ssid_hidden(true)
        .with_channel(channel)
        .with_auth_method(AuthMethod::None)
        .with_max_connections(1)
}

fn auth_method(mode: AuthMode) -> AuthMethod {
    match mode {
        AuthMode::Open => AuthMethod::None,
        AuthMode::WpaWpa2Personal => AuthMethod::WpaWpa2Personal,
    }
}

fn error_code(err: &WifiError) -> i32 {
    match err {
        WifiError::InternalError(internal) => *internal as i32,
        WifiError::InvalidArguments => ESP_ERR_INVALID_ARG,
        WifiError::Unsupported => ESP_ERR_NOT_SUPPORTED,
        WifiError::NotInitialized => ESP_ERR_WIFI_NOT_INIT,
        _ => ESP_FAIL,
    }
}

fn fault(op: RadioOp, err: &WifiError) -> RadioError {
    log::debug!("wifi: {} err={:?}", op.as_str(), err);
    RadioError::new(op, error_code(err))
}
