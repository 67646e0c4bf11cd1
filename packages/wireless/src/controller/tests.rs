use embassy_futures::{block_on, yield_now};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

use super::*;
use crate::{
    error::RadioOp,
    testing::{DriverCall, FakeDriver, FakeWorker, FixedCredentials, NoopDelay},
};

type LinkQueue = Channel<NoopRawMutex, LinkInput, 8>;
type TestController<'a, Dl> =
    WirelessModeController<'a, FakeDriver, FakeWorker, FixedCredentials, Dl, NoopRawMutex, 8>;

fn controller<'a, Dl: DelayNs>(link: &'a LinkQueue, delay: Dl) -> TestController<'a, Dl> {
    controller_with(link, delay, FixedCredentials::default())
}

fn controller_with<'a, Dl: DelayNs>(
    link: &'a LinkQueue,
    delay: Dl,
    credentials: FixedCredentials,
) -> TestController<'a, Dl> {
    WirelessModeController::new(
        RadioLifecycle::new(FakeDriver::default(), FakeWorker::default()),
        credentials,
        delay,
        WirelessTiming::defaults(),
        link.sender(),
    )
}

fn drain(link: &LinkQueue) -> Vec<LinkInput> {
    let mut out = Vec::new();
    while let Ok(input) = link.try_receive() {
        out.push(input);
    }
    out
}

#[test]
fn start_ap_tears_down_settles_and_announces_session() {
    let link = LinkQueue::new();
    let mut delay = NoopDelay::default();
    {
        let mut wifi = controller(&link, &mut delay);
        let transition = block_on(wifi.apply(WirelessEvent::StartAp));
        assert_eq!(
            transition,
            ModeTransition {
                from: RadioMode::Off,
                to: RadioMode::AccessPoint,
                trigger: "start_ap",
                error: None,
            }
        );
        assert_eq!(
            wifi.radio().driver().calls,
            vec![
                DriverCall::Shutdown,
                DriverCall::StartAccessPoint("badge-admin".into()),
            ]
        );
    }
    assert_eq!(delay.pauses, vec![1_000]);
    assert_eq!(
        drain(&link),
        vec![LinkInput::AccessPointStarted { session: 1 }]
    );
}

#[test]
fn start_inject_after_ap_closes_the_ap_session_and_stabilises() {
    let link = LinkQueue::new();
    let mut delay = NoopDelay::default();
    {
        let mut wifi = controller(&link, &mut delay);
        block_on(async {
            wifi.apply(WirelessEvent::StartAp).await;
            let transition = wifi.apply(WirelessEvent::StartInject).await;
            assert_eq!(transition.from, RadioMode::AccessPoint);
            assert_eq!(transition.to, RadioMode::BeaconInject);
        });
        assert!(wifi.radio().worker().running);
        assert_eq!(
            wifi.radio().driver().calls.last(),
            Some(&DriverCall::StartInjection(1))
        );
    }
    assert_eq!(delay.pauses, vec![1_000, 1_000, 100]);
    assert_eq!(
        drain(&link),
        vec![
            LinkInput::AccessPointStarted { session: 1 },
            LinkInput::AccessPointStopped,
        ]
    );
}

#[test]
fn stop_inject_halts_worker_and_leaves_radio_off() {
    let link = LinkQueue::new();
    let mut wifi = controller(&link, NoopDelay::default());
    block_on(async {
        wifi.apply(WirelessEvent::StartInject).await;
        let transition = wifi.apply(WirelessEvent::StopInject).await;
        assert_eq!(transition.to, RadioMode::Off);
    });
    assert_eq!(wifi.radio().worker().halts, 1);
    assert!(!wifi.radio().worker().running);
    assert_eq!(wifi.radio().driver().active, None);
}

#[test]
fn driver_fault_reverts_to_off_and_retracts_session() {
    let link = LinkQueue::new();
    let mut wifi = controller(&link, NoopDelay::default());
    let fault = RadioError::new(RadioOp::SetConfig, 0x300a);
    wifi.radio_mut().driver_mut().fail_start = Some(fault);

    let transition = block_on(wifi.apply(WirelessEvent::StartStation));
    assert_eq!(transition.to, RadioMode::Off);
    assert_eq!(transition.error, Some(fault));
    assert_eq!(
        drain(&link),
        vec![
            LinkInput::StationStarted { session: 1 },
            LinkInput::StationStopped,
        ]
    );
}

#[test]
fn station_without_credentials_stays_off() {
    let link = LinkQueue::new();
    let credentials = FixedCredentials {
        station: None,
        ..FixedCredentials::default()
    };
    let mut wifi = controller_with(&link, NoopDelay::default(), credentials);
    let transition = block_on(wifi.apply(WirelessEvent::StartStation));
    assert_eq!(transition.to, RadioMode::Off);
    assert_eq!(transition.error, None);
    assert!(drain(&link).is_empty());
}

#[test]
fn every_event_sequence_keeps_at_most_one_mode() {
    use WirelessEvent::*;
    let events = [
        StartAp, StartInject, StartStation, StopAp, StartInject, StartInject, StopInject,
        StartStation, StartAp, StopStation, StartAp, StartAp, StopInject, StartStation,
        StartInject, StopStation,
    ];

    let link = LinkQueue::new();
    let mut wifi = controller(&link, NoopDelay::default());
    block_on(async {
        for event in events {
            let transition = wifi.apply(event).await;
            drain(&link);
            assert_eq!(transition.to, event.target(), "after {}", event.as_str());
            assert_eq!(wifi.mode(), event.target());
            let driver = wifi.radio().driver();
            let expected = event.target().is_active().then_some(event.target());
            assert_eq!(driver.active, expected);
        }
    });
}

#[test]
fn idle_shutdown_only_applies_to_access_point() {
    let link = LinkQueue::new();
    let mut wifi = controller(&link, NoopDelay::default());
    block_on(async {
        wifi.apply(WirelessEvent::StartInject).await;
        let session = wifi.session();
        assert_eq!(
            wifi.handle_request(LinkRequest::IdleShutdown { session }).await,
            None
        );
        assert_eq!(wifi.mode(), RadioMode::BeaconInject);

        wifi.apply(WirelessEvent::StartAp).await;
        let session = wifi.session();
        let transition = wifi
            .handle_request(LinkRequest::IdleShutdown { session })
            .await
            .unwrap();
        assert_eq!(transition.trigger, "idle_shutdown");
        assert_eq!(transition.to, RadioMode::Off);
    });
    assert_eq!(drain(&link).last(), Some(&LinkInput::AccessPointStopped));
}

#[test]
fn reconnect_reissues_association_in_station_mode() {
    let link = LinkQueue::new();
    let mut wifi = controller(&link, NoopDelay::default());
    block_on(async {
        let session = wifi.session();
        assert_eq!(wifi.handle_request(LinkRequest::Reconnect { session }).await, None);
        wifi.apply(WirelessEvent::StartStation).await;
        let session = wifi.session();
        assert_eq!(wifi.handle_request(LinkRequest::Reconnect { session }).await, None);
    });
    assert_eq!(wifi.radio().driver().count(&DriverCall::Connect), 2);
}

#[test]
fn failed_reconnect_is_fatal_to_station_mode() {
    let link = LinkQueue::new();
    let mut wifi = controller(&link, NoopDelay::default());
    block_on(wifi.apply(WirelessEvent::StartStation));
    let fault = RadioError::new(RadioOp::Connect, 0x3007);
    wifi.radio_mut().driver_mut().fail_connect = Some(fault);

    let session = wifi.session();
    let transition = block_on(wifi.handle_request(LinkRequest::Reconnect { session })).unwrap();
    assert_eq!(transition.to, RadioMode::Off);
    assert_eq!(transition.error, Some(fault));
    assert_eq!(drain(&link).last(), Some(&LinkInput::StationStopped));
}

#[test]
fn run_consumes_queued_events() {
    let link = LinkQueue::new();
    let events = Channel::<NoopRawMutex, WirelessEvent, 4>::new();
    let requests = Signal::<NoopRawMutex, LinkRequest>::new();
    let mut wifi = controller(&link, NoopDelay::default());
    let mut observed = Vec::new();

    events.try_send(WirelessEvent::StartAp).unwrap();
    let first = block_on(async {
        match select(
            wifi.run(&events, &requests, |t| observed.push(*t)),
            link.receive(),
        )
        .await
        {
            Either::First(()) => unreachable!(),
            Either::Second(input) => input,
        }
    });
    assert_eq!(first, LinkInput::AccessPointStarted { session: 1 });
    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].to, RadioMode::AccessPoint);
}

#[test]
fn idle_shutdown_from_an_earlier_session_keeps_restarted_ap_up() {
    let link = LinkQueue::new();
    let mut wifi = controller(&link, NoopDelay::default());
    block_on(async {
        wifi.apply(WirelessEvent::StartAp).await;
        let first = wifi.session();
        wifi.apply(WirelessEvent::StartAp).await;
        assert_ne!(wifi.session(), first);
        assert_eq!(
            wifi.handle_request(LinkRequest::IdleShutdown { session: first }).await,
            None
        );
    });
    assert_eq!(wifi.mode(), RadioMode::AccessPoint);
    assert_eq!(wifi.radio().driver().active, Some(RadioMode::AccessPoint));
}

#[test]
fn reconnect_from_an_earlier_station_session_is_dropped() {
    let link = LinkQueue::new();
    let mut wifi = controller(&link, NoopDelay::default());
    block_on(async {
        wifi.apply(WirelessEvent::StartStation).await;
        let first = wifi.session();
        wifi.apply(WirelessEvent::StartStation).await;
        assert_eq!(
            wifi.handle_request(LinkRequest::Reconnect { session: first }).await,
            None
        );
    });
    assert_eq!(wifi.radio().driver().count(&DriverCall::Connect), 2);
    assert_eq!(wifi.mode(), RadioMode::Station);
}

#[test]
fn pending_idle_shutdown_does_not_outlive_a_queued_ap_restart() {
    let link = LinkQueue::new();
    let events = Channel::<NoopRawMutex, WirelessEvent, 4>::new();
    let requests = Signal::<NoopRawMutex, LinkRequest>::new();
    let mut wifi = controller(&link, NoopDelay::default());
    let mut observed = Vec::new();

    block_on(wifi.apply(WirelessEvent::StartAp));
    let stale = wifi.session();
    drain(&link);

    events.try_send(WirelessEvent::StartAp).unwrap();
    requests.signal(LinkRequest::IdleShutdown { session: stale });
    block_on(async {
        let settle = async {
            for _ in 0..4 {
                yield_now().await;
            }
        };
        match select(wifi.run(&events, &requests, |t| observed.push(*t)), settle).await {
            Either::First(()) => unreachable!(),
            Either::Second(()) => {}
        }
    });

    assert_eq!(observed.len(), 1);
    assert_eq!(observed[0].trigger, "start_ap");
    assert!(!requests.signaled());
    assert_eq!(wifi.mode(), RadioMode::AccessPoint);
    assert_eq!(
        drain(&link),
        vec![
            LinkInput::AccessPointStopped,
            LinkInput::AccessPointStarted { session: stale + 1 },
        ]
    );
}
