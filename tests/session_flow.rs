use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use sonarview::gauge::{GaugeState, OUT_OF_RANGE_MARKER};
use sonarview::sensor::ScriptedSensorLink;
use sonarview::{
    channel_surface, HardwareLinkError, SessionFlow, SonarConfig, SonarSession, SurfaceSink,
    SurfaceState, UserCommand,
};

const TRIAL_CSV: &str = "Ensaio,Hora,Medir,Real\n(ignored secondary header line)\n0,10:00:00,12.5,12.0\n1,10:00:01,13.0,12.8\n";

fn live_session(
    queued: Vec<f64>,
) -> (
    SonarSession<SurfaceSink>,
    std::sync::mpsc::Receiver<sonarview::SurfaceUpdate>,
    sonarview::sensor::ScriptHandle,
) {
    let (sink, rx) = channel_surface();
    let mut session = SonarSession::new(SonarConfig::default(), sink);
    let (link, handle) = ScriptedSensorLink::new(queued);
    session
        .start_acquisition(Box::new(link), Instant::now())
        .unwrap();
    (session, rx, handle)
}

fn reading(state: &GaugeState) -> &sonarview::GaugeUpdate {
    match state {
        GaugeState::Reading(update) => update,
        other => panic!("expected a reading, got {other:?}"),
    }
}

#[test]
fn gauge_waits_for_first_reading() {
    let (mut session, rx, _handle) = live_session(vec![]);
    assert_eq!(session.refresh_tick(), GaugeState::NoDataYet);

    let mut view = SurfaceState::default();
    view.drain(&rx);
    assert_eq!(view.gauge, GaugeState::NoDataYet);
    assert_eq!(view.gauge.text(), "Waiting for sensor data…");
}

#[test]
fn only_the_latest_reading_is_shown() {
    let (mut session, _rx, handle) = live_session(vec![10.0, 20.0]);
    let state = session.refresh_tick();
    assert_eq!(reading(&state).text, "Distance: 20.00 cm");

    assert!(handle.emit(30.0));
    assert!(handle.emit(31.5));
    let state = session.refresh_tick();
    assert_eq!(reading(&state).text, "Distance: 31.50 cm");
}

#[test]
fn unchanged_reading_is_pushed_again() {
    let (mut session, rx, _handle) = live_session(vec![42.0]);
    let first = session.refresh_tick();
    let second = session.refresh_tick();
    assert_eq!(first, second);
    assert_eq!(rx.try_iter().count(), 2);
}

#[test]
fn far_reading_fills_the_bar_and_is_marked() {
    let (mut session, _rx, _handle) = live_session(vec![500.0]);
    let state = session.refresh_tick();
    let update = reading(&state);
    assert_relative_eq!(update.bar_width, 280.0);
    assert!(update.out_of_range);
    assert!(update.text.ends_with(OUT_OF_RANGE_MARKER));
    assert_eq!(update.numeric_label, "500.00 cm");
}

#[test]
fn mid_range_reading_is_half_the_bar() {
    let (mut session, _rx, _handle) = live_session(vec![200.0]);
    let state = session.refresh_tick();
    let update = reading(&state);
    assert_relative_eq!(update.bar_width, 140.0);
    assert!(!update.out_of_range);
    assert_eq!(update.text, "Distance: 200.00 cm");
}

#[test]
fn refresh_follows_the_configured_period() {
    let (mut session, rx, _handle) = live_session(vec![100.0]);
    let t0 = Instant::now();
    // Acquisition was armed a moment before t0, so the first tick is due.
    assert_eq!(session.refresh_task().ticks(), 0);
    session.poll(t0);
    assert_eq!(session.refresh_task().ticks(), 1);
    session.poll(t0 + Duration::from_millis(200));
    assert_eq!(session.refresh_task().ticks(), 1);
    session.poll(t0 + Duration::from_millis(1100));
    assert_eq!(session.refresh_task().ticks(), 2);
    assert_eq!(rx.try_iter().count(), 2);
}

#[test]
fn exit_releases_the_link_exactly_once() {
    let (mut session, _rx, handle) = live_session(vec![]);
    assert_eq!(
        session.handle_command(UserCommand::ExitRequested),
        SessionFlow::Exit
    );
    assert_eq!(handle.shutdown_calls(), 1);
    assert!(handle.is_shut_down());
    assert!(!session.is_acquiring());
    assert!(!handle.emit(10.0));

    session.shutdown();
    drop(session);
    assert_eq!(handle.shutdown_calls(), 1);
}

#[test]
fn dropping_the_session_releases_the_link() {
    let (session, _rx, handle) = live_session(vec![]);
    drop(session);
    assert_eq!(handle.shutdown_calls(), 1);
}

#[test]
fn no_refresh_after_exit() {
    let (mut session, rx, _handle) = live_session(vec![5.0]);
    session.shutdown();
    assert_eq!(session.poll(Instant::now() + Duration::from_secs(5)), None);
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn open_failure_is_returned_and_shown() {
    let (sink, rx) = channel_surface();
    let mut session = SonarSession::new(SonarConfig::default(), sink);
    let (link, handle) = ScriptedSensorLink::new(vec![1.0]);
    let err = session
        .start_acquisition(Box::new(link.failing_open()), Instant::now())
        .unwrap_err();
    assert!(matches!(err, HardwareLinkError::NoPortFound));
    assert_eq!(handle.open_calls(), 1);
    assert_eq!(handle.shutdown_calls(), 1);
    assert!(!session.is_acquiring());

    let mut view = SurfaceState::default();
    view.drain(&rx);
    assert!(matches!(view.gauge, GaugeState::LinkLost(_)));

    // Trial viewing keeps working without a board.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trial.csv");
    std::fs::write(&path, TRIAL_CSV).unwrap();
    session.load_trials(&path).unwrap();
    view.drain(&rx);
    assert_eq!(view.table_rows.len(), 2);

    drop(session);
    assert_eq!(handle.shutdown_calls(), 1);
}

#[test]
fn lost_link_is_reported_and_released() {
    let (mut session, rx, handle) = live_session(vec![50.0]);
    session.refresh_tick();
    assert!(handle.lose_link("usb unplugged"));

    let state = session.refresh_tick();
    assert_eq!(state, GaugeState::LinkLost("usb unplugged".into()));
    assert!(state.text().contains("usb unplugged"));
    assert_eq!(handle.shutdown_calls(), 1);
    assert!(!session.is_acquiring());
    assert_eq!(session.poll(Instant::now()), None);

    let mut view = SurfaceState::default();
    view.drain(&rx);
    assert_eq!(view.gauge, state);
}

#[test]
fn load_requested_resolves_against_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("LeituraSubidaSonar1.csv"), TRIAL_CSV).unwrap();
    let mut cfg = SonarConfig::default();
    cfg.trials.data_dir = dir.path().to_path_buf();

    let (sink, rx) = channel_surface();
    let mut session = SonarSession::new(cfg, sink);
    let flow = session.handle_command(UserCommand::LoadRequested(
        "LeituraSubidaSonar1.csv".into(),
    ));
    assert_eq!(flow, SessionFlow::Continue);

    let mut view = SurfaceState::default();
    view.drain(&rx);
    assert_eq!(view.header_banner(), "Ensaio | Hora | Medir | Real");
    assert_eq!(view.table_rows.len(), view.chart_series.measured.len());
    assert_eq!(view.chart_series.real, vec![[0.0, 12.0], [1.0, 12.8]]);
    assert_eq!(view.error, None);
}

#[test]
fn failed_load_keeps_what_is_on_screen() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.csv");
    let bad = dir.path().join("bad.csv");
    std::fs::write(&good, TRIAL_CSV).unwrap();
    std::fs::write(&bad, "a,b,c,d\nx\n0,t,1.0\n").unwrap();

    let (sink, rx) = channel_surface();
    let mut session = SonarSession::new(SonarConfig::default(), sink);
    let mut view = SurfaceState::default();

    session.handle_command(UserCommand::LoadPath(good));
    view.drain(&rx);
    let before = view.clone();

    session.handle_command(UserCommand::LoadPath(bad));
    view.drain(&rx);
    assert_eq!(view.table_rows, before.table_rows);
    assert_eq!(view.chart_series, before.chart_series);
    assert_eq!(view.dataset_version, before.dataset_version);
    let msg = view.error.as_deref().unwrap();
    assert!(msg.starts_with("Error reading file: "), "{msg}");

    session.handle_command(UserCommand::LoadPath(dir.path().join("missing.csv")));
    view.drain(&rx);
    assert_eq!(view.table_rows, before.table_rows);
}

#[test]
fn help_is_forwarded_to_the_surface() {
    let (sink, _rx) = channel_surface();
    let mut session = SonarSession::new(SonarConfig::default(), sink);
    assert_eq!(
        session.handle_command(UserCommand::HelpRequested),
        SessionFlow::ShowHelp
    );
}
