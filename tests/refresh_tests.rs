mod common;

use common::{Call, Recorder};
use qlog_dashboard::routing::{SessionState, View};
use qlog_dashboard::AutoRefresh;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_tick_follows_active_view() {
    let state = SessionState::default();
    let recorder = Arc::new(Recorder::default());
    let driver = AutoRefresh::new(state.clone(), recorder.clone());

    assert!(driver.start());
    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(recorder.calls(), vec![Call::FetchDashboard]);

    state.write().view.current_view = View::Logs;
    tokio::time::sleep(Duration::from_millis(2000)).await;
    state.write().view.current_view = View::Settings;
    tokio::time::sleep(Duration::from_millis(4000)).await;

    assert_eq!(recorder.calls(), vec![Call::FetchDashboard, Call::FetchLogs]);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_start_keeps_one_timer() {
    let state = SessionState::default();
    state.write().view.current_view = View::Logs;
    let recorder = Arc::new(Recorder::default());
    let driver = AutoRefresh::new(state, recorder.clone());

    for _ in 0..5 {
        driver.start();
    }
    tokio::time::sleep(Duration::from_millis(6500)).await;
    assert_eq!(recorder.count(&Call::FetchLogs), 3);

    driver.stop();
    tokio::time::sleep(Duration::from_millis(6500)).await;
    assert_eq!(recorder.count(&Call::FetchLogs), 3);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_driver_stops_timer() {
    let recorder = Arc::new(Recorder::default());
    {
        let driver = AutoRefresh::new(SessionState::default(), recorder.clone());
        driver.start();
        tokio::time::sleep(Duration::from_millis(2500)).await;
    }
    tokio::time::sleep(Duration::from_millis(10_000)).await;
    assert_eq!(recorder.count(&Call::FetchDashboard), 1);
}
