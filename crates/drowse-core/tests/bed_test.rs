#![allow(clippy::unwrap_used)]
// Integration tests for the `Bed` facade using wiremock.

use std::time::Duration;

use serde_json::json;
use tokio::time::timeout;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drowse_core::{Bed, BedConfig, CoreError, MomentaryCommandSpec};

const CONTROLS_PATH: &str = "/processor/adjustableBaseControls";
const ENVIRONMENT_PATH: &str = "/processor/latestEnvironmentSensorData";

// ── Helpers ─────────────────────────────────────────────────────────

fn commands() -> Vec<MomentaryCommandSpec> {
    vec![
        MomentaryCommandSpec {
            name: "head-up".into(),
            command: 36,
            massage_adjustment: None,
            request_status: None,
        },
        MomentaryCommandSpec {
            name: "massage-step".into(),
            command: 6,
            massage_adjustment: Some(1),
            request_status: None,
        },
    ]
}

fn offline_config() -> BedConfig {
    BedConfig {
        email: "user@example.com".into(),
        password: "hunter2".to_string().into(),
        commands: commands(),
        ..BedConfig::default()
    }
}

fn server_config(server: &MockServer) -> BedConfig {
    BedConfig {
        auth_base: server.uri(),
        control_base: server.uri(),
        processor_id: Some(7),
        ..offline_config()
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/user/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "expirationTimeSecs": chrono::Utc::now().timestamp() + 3_600,
        })))
        .mount(server)
        .await;
}

async fn mount_command(server: &MockServer, body: serde_json::Value, expect: u64) {
    Mock::given(method("POST"))
        .and(path(CONTROLS_PATH))
        .and(body_partial_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"body": {}})))
        .expect(expect)
        .mount(server)
        .await;
}

// ── Command resolution tests ────────────────────────────────────────

#[tokio::test]
async fn test_press_with_unknown_name_fails() {
    let bed = Bed::new(&offline_config()).unwrap();
    let result = bed.press("warp-drive").await;
    assert!(
        matches!(result, Err(CoreError::UnknownCommand { ref name }) if name == "warp-drive"),
        "expected UnknownCommand error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_press_rejects_the_safety_light_code() {
    let mut config = offline_config();
    config.commands.push(MomentaryCommandSpec {
        name: "light".into(),
        command: 230,
        massage_adjustment: None,
        request_status: None,
    });
    let bed = Bed::new(&config).unwrap();

    for target in ["230", "light"] {
        let result = bed.press(target).await;
        match result {
            Err(CoreError::Config { ref message }) => {
                assert!(
                    message.contains("safety light"),
                    "unexpected message: {message}"
                );
            }
            other => panic!("expected Config error, got: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_press_named_command_uses_configured_spec() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_command(
        &server,
        json!({"bedControlCommand": 6, "massageAdjustment": 1}),
        1,
    )
    .await;

    let bed = Bed::new(&server_config(&server)).unwrap();
    bed.press("massage-step").await.unwrap();
}

#[tokio::test]
async fn test_press_raw_code_fires_one_off_command() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_command(&server, json!({"bedControlCommand": 77}), 1).await;

    let bed = Bed::new(&server_config(&server)).unwrap();
    bed.press("77").await.unwrap();
}

#[tokio::test]
async fn test_safety_light_code_never_becomes_a_switch() {
    let mut config = offline_config();
    config.commands.push(MomentaryCommandSpec {
        name: "light".into(),
        command: 230,
        massage_adjustment: None,
        request_status: None,
    });
    let bed = Bed::new(&config).unwrap();

    assert_eq!(bed.commands().len(), 3);
    assert_eq!(bed.switches().len(), 2);
    assert!(bed.switches().iter().all(|s| s.spec().command != 230));
}

// ── Facade delegation tests ─────────────────────────────────────────

#[tokio::test]
async fn test_status_reports_primary_snapshot() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path(CONTROLS_PATH))
        .and(body_partial_json(json!({"bedControlCommand": 500})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": {"snapshots": [
                {"side": 1, "safetyLightOn": false},
                {"side": 0, "safetyLightOn": true},
            ]},
        })))
        .mount(&server)
        .await;

    let bed = Bed::new(&server_config(&server)).unwrap();
    let snapshot = bed.status().await.unwrap().unwrap();
    assert_eq!(snapshot.side, Some(0));
    assert_eq!(bed.light().await.unwrap(), Some(true));
}

#[tokio::test]
async fn test_set_light_confirms_final_state() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    // Reconciling read sees "off"; the confirming read sees "on".
    Mock::given(method("POST"))
        .and(path(CONTROLS_PATH))
        .and(body_partial_json(json!({"bedControlCommand": 500})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": {"snapshots": [{"side": 0, "safetyLightOn": false}]},
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CONTROLS_PATH))
        .and(body_partial_json(json!({"bedControlCommand": 500})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": {"snapshots": [{"side": 0, "safetyLightOn": true}]},
        })))
        .mount(&server)
        .await;
    mount_command(&server, json!({"bedControlCommand": 230}), 1).await;

    let bed = Bed::new(&server_config(&server)).unwrap();
    assert_eq!(bed.set_light(true).await.unwrap(), Some(true));
}

// ── Environment monitor wiring ──────────────────────────────────────

#[tokio::test]
async fn test_watch_environment_disabled_by_zero_interval() {
    let mut config = offline_config();
    config.env_poll_interval_secs = 0;
    let bed = Bed::new(&config).unwrap();

    let result = bed.watch_environment().await;
    match result {
        Err(CoreError::Config { ref message }) => {
            assert!(message.contains("polling"), "unexpected message: {message}");
        }
        other => panic!("expected Config error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_watch_environment_starts_one_monitor() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path(ENVIRONMENT_PATH))
        .and(body_partial_json(json!({"sleeptrackerProcessorID": 7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "degreesCelsius": {"value": 21.0},
        })))
        .mount(&server)
        .await;

    // A long interval means exactly one (immediate) poll.
    let mut config = server_config(&server);
    config.env_poll_interval_secs = 3_600;
    let bed = Bed::new(&config).unwrap();

    let mut rx = bed.watch_environment().await.unwrap();
    timeout(Duration::from_secs(2), rx.wait_for(|s| s.is_some()))
        .await
        .unwrap()
        .unwrap();

    // A second subscription shares the running monitor.
    let rx2 = bed.watch_environment().await.unwrap();
    assert!(rx2.borrow().is_some());

    bed.shutdown().await;
    let env_polls = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == ENVIRONMENT_PATH)
        .count();
    assert_eq!(env_polls, 1, "one monitor, one immediate poll");
}
