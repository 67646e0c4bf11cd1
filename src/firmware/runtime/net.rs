use badge_wireless::LinkInput;
use embassy_net::{Runner, Stack};
use esp_radio::wifi::WifiDevice;
use log::info;

use crate::firmware::radio;

#[embassy_executor::task]
pub(super) async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await
}

/// Reports each DHCP lease on the station interface to the link supervisor.
#[embassy_executor::task]
pub(super) async fn dhcp_watch_task(stack: Stack<'static>) {
    loop {
        stack.wait_config_up().await;
        if let Some(config) = stack.config_v4() {
            let ipv4 = config.address.address().octets();
            info!(
                "wifi: dhcp lease {}.{}.{}.{}",
                ipv4[0], ipv4[1], ipv4[2], ipv4[3]
            );
            radio::forward(LinkInput::StationGotIp(ipv4));
        }
        stack.wait_config_down().await;
    }
}
