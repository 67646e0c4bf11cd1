use embassy_time::{Duration, Ticker};
use esp_hal::{
    gpio::{Input, InputConfig, Pull},
    timer::timg::TimerGroup,
};
use esp_println::println;

use super::{buttons, net, ui_bridge, wireless};
use crate::firmware::{
    config::{HEAP_SIZE, TELEMETRY_INTERVAL_SECONDS},
    radio,
    storage::CredentialStore,
    telemetry,
};

pub(crate) fn run() -> ! {
    esp_println::logger::init_logger_from_env();
    let peripherals = esp_hal::init(esp_hal::Config::default());
    esp_alloc::heap_allocator!(size: HEAP_SIZE);
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    let credentials = CredentialStore::new(peripherals.FLASH);
    let runtime = match radio::setup(peripherals.WIFI) {
        Ok(runtime) => runtime,
        Err(reason) => {
            println!("{}", reason);
            halt_forever();
        }
    };
    radio::install_event_handlers();

    // Boot button doubles as UP.
    let up = Input::new(
        peripherals.GPIO0,
        InputConfig::default().with_pull(Pull::Up),
    );
    let down = Input::new(
        peripherals.GPIO13,
        InputConfig::default().with_pull(Pull::Up),
    );

    let mut executor = esp_rtos::embassy::Executor::new();
    let executor = unsafe { make_static(&mut executor) };
    executor.run(move |spawner| {
        spawner.must_spawn(wireless::mode_task(runtime.driver, credentials));
        spawner.must_spawn(wireless::link_task());
        spawner.must_spawn(wireless::idle_timer_task());
        spawner.must_spawn(wireless::beacon_task(runtime.transmitter));
        spawner.must_spawn(net::net_task(runtime.net_runner));
        spawner.must_spawn(net::dhcp_watch_task(runtime.stack));
        spawner.must_spawn(buttons::button_task(up, down));
        spawner.must_spawn(ui_bridge::ui_task());
        spawner.must_spawn(telemetry_task());
    });
}

#[embassy_executor::task]
async fn telemetry_task() {
    let mut ticker = Ticker::every(Duration::from_secs(TELEMETRY_INTERVAL_SECONDS));
    loop {
        ticker.next().await;
        let snapshot = telemetry::snapshot();
        let ip = snapshot.station_ipv4.unwrap_or([0; 4]);
        println!(
            "TELEMETRY {{\"mode\":\"{}\",\"transitions\":{},\"faults\":{},\"beacons\":{},\"beacon_rate\":{},\"beacon_no_mem\":{},\"beacon_tx_err\":{},\"hops\":{},\"sta_attempts\":{},\"sta_failures\":{},\"sta_connected\":{},\"sta_ip\":\"{}.{}.{}.{}\",\"ap_clients\":{},\"link_dropped\":{},\"ui_dropped\":{}}}",
            snapshot.mode.as_str(),
            snapshot.mode_transitions,
            snapshot.mode_faults,
            snapshot.beacon_frames_sent,
            snapshot.beacon_last_rate,
            snapshot.beacon_no_memory,
            snapshot.beacon_tx_errors,
            snapshot.beacon_channel_hops,
            snapshot.station_attempts,
            snapshot.station_failures,
            snapshot.station_connected,
            ip[0],
            ip[1],
            ip[2],
            ip[3],
            snapshot.ap_clients,
            snapshot.link_inputs_dropped,
            snapshot.ui_notices_dropped,
        );
    }
}

unsafe fn make_static<T>(value: &mut T) -> &'static mut T {
    unsafe { core::mem::transmute(value) }
}

fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
