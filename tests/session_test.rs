// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-acremote project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Tests for the panel session emulator
//!
//! These tests validate the protocol behavior by standing up a mock panel
//! and driving a real session against it: token carry-forward, state
//! decoding, the temperature bound semantics and the pending-action reset.

use rust_acremote::config::RemoteConfig;
use rust_acremote::remote::{OperationMode, PanelAction, PanelSession, RemoteError, WindAngle, WindSpeed};

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A remote controller page with the given tokens and indicator values.
fn remote_page(
    viewstate: &str,
    generator: &str,
    validation: &str,
    mode: u32,
    current: i32,
    target: i32,
    speed: u32,
    angle: u32,
) -> String {
    format!(
        r#"<html><body><form method="post">
            <input type="hidden" id="__VIEWSTATE" value="{viewstate}" />
            <input type="hidden" id="__VIEWSTATEGENERATOR" value="{generator}" />
            <input type="hidden" id="__EVENTVALIDATION" value="{validation}" />
            <img id="Image_1" src="images/nn_{mode}.gif" />
            <img id="Image_2" src="images/Tem_{current}.gif" />
            <img id="Image_3" src="images/Tem_{target}.gif" />
            <img id="Image_4" src="images/mm_{speed}.gif" />
            <img id="Image_5" src="images/kk_{angle}.gif" />
        </form></body></html>"#
    )
}

fn page_v1() -> String {
    remote_page("A1", "B1", "C1", 1, 24, 26, 0, 1)
}

fn session_for(server: &MockServer) -> PanelSession {
    let cfg = RemoteConfig {
        host: server.address().to_string(),
        login_id: "user".to_string(),
        password: "hunter2".to_string(),
        ..RemoteConfig::default()
    };
    PanelSession::new(&cfg).unwrap()
}

#[tokio::test]
async fn refresh_decodes_state_and_stores_tokens_for_the_next_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let state = session.refresh().await.unwrap();

    assert_eq!(state.operation_mode, OperationMode::Cooling);
    assert_eq!(state.current_temp, 24);
    assert_eq!(state.target_temp, 26);
    assert_eq!(state.wind_speed, WindSpeed::Auto);
    assert_eq!(state.wind_angle, WindAngle::Horizontal);

    let tokens = session.tokens().await;
    assert_eq!(tokens["__VIEWSTATE"], "A1");
    assert_eq!(tokens["__VIEWSTATEGENERATOR"], "B1");
    assert_eq!(tokens["__EVENTVALIDATION"], "C1");

    // the local target follows the panel's reported one
    assert_eq!(session.target_temp().await, 26);

    // the stored tokens are echoed on the next outgoing command
    let command = Mock::given(method("POST"))
        .and(path("/webremo"))
        .and(body_string_contains("__VIEWSTATE=A1"))
        .and(body_string_contains("__VIEWSTATEGENERATOR=B1"))
        .and(body_string_contains("__EVENTVALIDATION=C1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .expect(1)
        .mount_as_scoped(&server)
        .await;

    session.power_on().await.unwrap();
    drop(command);
}

#[tokio::test]
async fn login_posts_credentials_with_the_landing_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .mount(&server)
        .await;

    // the login post must carry the tokens seeded from the landing page
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_string_contains("txtId=user"))
        .and(body_string_contains("txtPwd=hunter2"))
        .and(body_string_contains("__VIEWSTATE=A1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(remote_page("A2", "B2", "C2", 1, 23, 27, 0, 1)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let state = session.login().await.unwrap();

    // login performs an implicit full state refresh from its response
    assert_eq!(state.current_temp, 23);
    assert_eq!(state.target_temp, 27);
    assert_eq!(session.target_temp().await, 27);

    // and adopts the response's fresh token set
    let tokens = session.tokens().await;
    assert_eq!(tokens["__VIEWSTATE"], "A2");
}

#[tokio::test]
async fn rejected_login_is_an_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let err = session.login().await.unwrap_err();

    assert!(matches!(err, RemoteError::Authentication(_)));
}

#[tokio::test]
async fn set_temp_within_bounds_sends_the_command() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webremo"))
        .and(body_string_contains("hdnNo_4=27"))
        .and(body_string_contains("btnSubmit.x=55"))
        .and(body_string_contains("btnSubmit.y=16"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    session.set_temp(27).await.unwrap();

    assert_eq!(session.target_temp().await, 27);
}

#[tokio::test]
async fn set_temp_outside_bounds_fails_without_a_request() {
    let server = MockServer::start().await;

    // no POST mock mounted: any request would 404 and fail differently
    let session = session_for(&server);

    // the upper bound itself is excluded
    let err = session.set_temp(29).await.unwrap_err();
    assert!(matches!(err, RemoteError::TemperatureOutOfBounds { target: 29, .. }));
    assert_eq!(session.target_temp().await, 26);

    // below the lower bound
    let err = session.set_temp(24).await.unwrap_err();
    assert!(matches!(err, RemoteError::TemperatureOutOfBounds { target: 24, .. }));
    assert_eq!(session.target_temp().await, 26);

    // the lower bound itself is accepted by set_temp
    Mock::given(method("POST"))
        .and(path("/webremo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .mount(&server)
        .await;
    session.set_temp(25).await.unwrap();
    assert_eq!(session.target_temp().await, 25);
}

#[tokio::test]
async fn temp_down_keeps_the_asymmetric_floor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webremo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(remote_page(
            "A1", "B1", "C1", 1, 24, 26, 0, 1,
        )))
        .mount(&server)
        .await;

    let session = session_for(&server);

    // default target is lower_bound + 1: the decrement is refused
    assert_eq!(session.target_temp().await, 26);
    let err = session.temp_down().await.unwrap_err();
    assert!(matches!(err, RemoteError::TemperatureOutOfBounds { .. }));
    assert_eq!(session.target_temp().await, 26);

    // from lower_bound + 2 it decrements by exactly one
    session.set_temp(27).await.unwrap();
    session.temp_down().await.unwrap();
    assert_eq!(session.target_temp().await, 26);
}

#[tokio::test]
async fn temp_up_stops_at_the_upper_bound() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/webremo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .mount(&server)
        .await;

    let session = session_for(&server);

    // 26 -> 27 -> 28 -> 29; the unit's own check permits reaching the bound
    session.temp_up().await.unwrap();
    session.temp_up().await.unwrap();
    session.temp_up().await.unwrap();
    assert_eq!(session.target_temp().await, 29);

    // one more step is refused and leaves the target unchanged
    let err = session.temp_up().await.unwrap_err();
    assert!(matches!(err, RemoteError::TemperatureOutOfBounds { .. }));
    assert_eq!(session.target_temp().await, 29);
}

#[tokio::test]
async fn power_commands_click_their_own_button() {
    let server = MockServer::start().await;

    let on = Mock::given(method("POST"))
        .and(path("/webremo"))
        .and(body_string_contains("hdnNo_1=1"))
        .and(body_string_contains("btnSubmit.x=94"))
        .and(body_string_contains("btnSubmit.y=40"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .expect(1)
        .mount_as_scoped(&server)
        .await;

    let session = session_for(&server);
    session.power_on().await.unwrap();
    assert!(session.is_powered().await);
    drop(on);

    Mock::given(method("POST"))
        .and(path("/webremo"))
        .and(body_string_contains("hdnNo_1=0"))
        .and(body_string_contains("btnSubmit.x=108"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .expect(1)
        .mount(&server)
        .await;

    session.power_off().await.unwrap();
    assert!(!session.is_powered().await);
}

#[tokio::test]
async fn pending_action_is_reset_after_success_and_failure() {
    let server = MockServer::start().await;

    let ok = Mock::given(method("POST"))
        .and(path("/webremo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .mount_as_scoped(&server)
        .await;

    let session = session_for(&server);
    session.power_on().await.unwrap();
    assert_eq!(session.pending_action().await, PanelAction::Idle);
    drop(ok);

    // server-side rejection: the command fails but the marker still resets
    Mock::given(method("POST"))
        .and(path("/webremo"))
        .respond_with(ResponseTemplate::new(500).set_body_string("session expired"))
        .mount(&server)
        .await;

    let err = session.power_off().await.unwrap_err();
    assert!(matches!(err, RemoteError::CommandRejected(_)));
    assert_eq!(session.pending_action().await, PanelAction::Idle);
}

#[tokio::test]
async fn successful_command_adopts_the_response_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_v1()))
        .mount(&server)
        .await;

    // the command response carries a rotated token set
    Mock::given(method("POST"))
        .and(path("/webremo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(remote_page(
            "A9", "B9", "C9", 1, 24, 26, 0, 1,
        )))
        .mount(&server)
        .await;

    let session = session_for(&server);
    session.refresh().await.unwrap();
    assert_eq!(session.tokens().await["__VIEWSTATE"], "A1");

    session.power_on().await.unwrap();
    assert_eq!(session.tokens().await["__VIEWSTATE"], "A9");
}
