use httpmock::prelude::*;
use slotwatch::adapters::fetch::DEFAULT_USER_AGENT;
use slotwatch::config::MonitorConfig;
use slotwatch::{ConsulateSweep, HttpPageFetcher, JsonStateFile, MailjetNotifier, MonitorEngine};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const OPEN_PAGE: &str = "<html><body>Select a date to continue.</body></html>";
const CLOSED_PAGE: &str =
    "<html><body>There are no appointments available at this time.</body></html>";

fn monitor_config(page_url: String, state_file: String) -> MonitorConfig {
    MonitorConfig {
        urls: vec![page_url],
        state_file,
        interval_minutes: 30,
        timeout_seconds: 5,
        user_agent: DEFAULT_USER_AGENT.to_string(),
        sender_name: "Visa Monitor".to_string(),
        mailjet: None,
        extra_negative_markers: vec![],
    }
}

fn engine_for(
    server: &MockServer,
    state_path: &Path,
) -> MonitorEngine<ConsulateSweep<HttpPageFetcher, JsonStateFile, MailjetNotifier, MonitorConfig>> {
    let fetcher = HttpPageFetcher::new(Duration::from_secs(5), DEFAULT_USER_AGENT).unwrap();
    let store = JsonStateFile::new(state_path);
    let notifier = MailjetNotifier::new(
        "public-key",
        "private-key",
        "alerts@example.com",
        "me@example.com",
    )
    .with_api_base(server.base_url());
    let config = monitor_config(
        server.url("/appointments"),
        state_path.to_str().unwrap().to_string(),
    );

    MonitorEngine::new(ConsulateSweep::new(fetcher, store, Some(notifier), config))
}

#[tokio::test]
async fn test_first_sweep_alerts_and_writes_state() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("last_status.json");

    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/appointments");
        then.status(200).body(OPEN_PAGE);
    });
    let mail_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v3.1/send")
            .body_contains("now:      possible_slots");
        then.status(200);
    });

    let engine = engine_for(&server, &state_path);
    let summary = engine.run().await.unwrap();

    page_mock.assert();
    mail_mock.assert();
    assert_eq!(summary.urls_checked, 1);
    assert_eq!(summary.changes, 1);
    assert!(summary.alert_sent);

    let state = std::fs::read_to_string(&state_path).unwrap();
    assert!(state.contains("possible_slots"));
    assert!(state.contains(&server.url("/appointments")));
}

#[tokio::test]
async fn test_unchanged_status_sends_no_duplicate_alert() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("last_status.json");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/appointments");
        then.status(200).body(CLOSED_PAGE);
    });
    let mail_mock = server.mock(|when, then| {
        when.method(POST).path("/v3.1/send");
        then.status(200);
    });

    let engine = engine_for(&server, &state_path);

    let first = engine.run().await.unwrap();
    assert!(first.alert_sent);

    let second = engine.run().await.unwrap();
    assert!(!second.alert_sent);
    assert_eq!(second.changes, 0);

    assert_eq!(mail_mock.hits(), 1);
}

#[tokio::test]
async fn test_status_flip_alerts_with_before_and_after() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("last_status.json");

    let server = MockServer::start();
    let mut open_mock = server.mock(|when, then| {
        when.method(GET).path("/appointments");
        then.status(200).body(OPEN_PAGE);
    });
    let mut mail_mock = server.mock(|when, then| {
        when.method(POST).path("/v3.1/send");
        then.status(200);
    });

    let engine = engine_for(&server, &state_path);
    engine.run().await.unwrap();
    assert_eq!(mail_mock.hits(), 1);
    mail_mock.delete();

    // The page flips to "no appointments".
    open_mock.delete();
    server.mock(|when, then| {
        when.method(GET).path("/appointments");
        then.status(200).body(CLOSED_PAGE);
    });
    let flip_mail_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v3.1/send")
            .body_contains("previous: possible_slots")
            .body_contains("now:      no_slots");
        then.status(200);
    });

    let summary = engine.run().await.unwrap();

    flip_mail_mock.assert();
    assert!(summary.alert_sent);

    let state = std::fs::read_to_string(&state_path).unwrap();
    assert!(state.contains("no_slots"));
}

#[tokio::test]
async fn test_unreachable_page_is_unknown_and_sends_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("last_status.json");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/appointments");
        then.status(503);
    });
    let mail_mock = server.mock(|when, then| {
        when.method(POST).path("/v3.1/send");
        then.status(200);
    });

    let engine = engine_for(&server, &state_path);
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.urls_checked, 1);
    assert_eq!(summary.changes, 0);
    assert!(!summary.alert_sent);
    assert_eq!(mail_mock.hits(), 0);
    // Nothing changed, so nothing was persisted.
    assert!(!state_path.exists());
}

#[tokio::test]
async fn test_state_written_by_older_monitor_versions_is_honored() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("last_status.json");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/appointments");
        then.status(200).body(OPEN_PAGE);
    });
    let mail_mock = server.mock(|when, then| {
        when.method(POST).path("/v3.1/send");
        then.status(200);
    });

    // Legacy format: bare status strings keyed by url.
    std::fs::write(
        &state_path,
        format!(
            r#"{{"{}": "possible_slots"}}"#,
            server.url("/appointments")
        ),
    )
    .unwrap();

    let engine = engine_for(&server, &state_path);
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.changes, 0);
    assert_eq!(mail_mock.hits(), 0);
}

#[tokio::test]
async fn test_sweep_without_notifier_still_tracks_state() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("last_status.json");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/appointments");
        then.status(200).body(CLOSED_PAGE);
    });

    let fetcher = HttpPageFetcher::new(Duration::from_secs(5), DEFAULT_USER_AGENT).unwrap();
    let store = JsonStateFile::new(&state_path);
    let config = monitor_config(
        server.url("/appointments"),
        state_path.to_str().unwrap().to_string(),
    );
    let engine = MonitorEngine::new(ConsulateSweep::new(
        fetcher,
        store,
        None::<MailjetNotifier>,
        config,
    ));

    let summary = engine.run().await.unwrap();

    assert_eq!(summary.changes, 1);
    assert!(!summary.alert_sent);
    assert!(state_path.exists());
}
