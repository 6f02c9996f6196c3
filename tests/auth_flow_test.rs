mod common;

use std::time::Duration;

use common::{REDIRECT_URI, spotify_settings};
use mockito::Matcher;
use podcastify::{
    errors::Error,
    spotify::SpotifyAuth,
    types::{AuthPhase, CallbackParams},
};
use reqwest::{StatusCode, Url, redirect::Policy};
use serde_json::{Value, json};

fn callback(code: &str, state: &str) -> CallbackParams {
    CallbackParams {
        code: Some(code.to_string()),
        state: Some(state.to_string()),
        error: None,
    }
}

fn token_exchange_body() -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
        Matcher::UrlEncoded("code".into(), "auth-code".into()),
        Matcher::UrlEncoded("redirect_uri".into(), REDIRECT_URI.into()),
        Matcher::UrlEncoded("client_id".into(), "test_id".into()),
        Matcher::UrlEncoded("client_secret".into(), "test_secret".into()),
    ])
}

async fn wait_for_phase(auth: &SpotifyAuth, phase: AuthPhase) {
    for _ in 0..200 {
        if auth.phase().await == phase {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("auth flow never reached {}", phase);
}

#[tokio::test]
async fn mismatched_state_fails_before_exchange() {
    let mut server = mockito::Server::new_async().await;
    let exchange = server
        .mock("POST", "/api/token")
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let pending = auth.start_session().await;

    let err = auth
        .complete_login(&callback("auth-code", "forged-state"))
        .await
        .unwrap_err();

    assert_eq!(err, Error::StateMismatch);
    assert_eq!(
        pending.wait(Some(Duration::from_secs(1))).await,
        Err(Error::StateMismatch)
    );
    assert_eq!(auth.token_state().await.access_token, None);
    assert_eq!(auth.phase().await, AuthPhase::Failed);
    exchange.assert_async().await;
}

#[tokio::test]
async fn missing_state_is_a_mismatch() {
    let mut server = mockito::Server::new_async().await;
    let exchange = server
        .mock("POST", "/api/token")
        .expect(0)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let _pending = auth.start_session().await;

    let params = CallbackParams {
        code: Some("auth-code".to_string()),
        ..Default::default()
    };
    assert_eq!(auth.complete_login(&params).await, Err(Error::StateMismatch));
    exchange.assert_async().await;
}

#[tokio::test]
async fn matching_state_exchanges_code_and_stores_token() {
    let mut server = mockito::Server::new_async().await;
    let exchange = server
        .mock("POST", "/api/token")
        .match_body(token_exchange_body())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"access_token": "fresh-token", "token_type": "Bearer", "expires_in": 3600})
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let pending = auth.start_session().await;
    let state = pending.session.state.clone();

    auth.complete_login(&callback("auth-code", &state))
        .await
        .unwrap();
    pending.wait(Some(Duration::from_secs(1))).await.unwrap();

    let tokens = auth.token_state().await;
    assert_eq!(tokens.access_token.as_deref(), Some("fresh-token"));
    assert_eq!(tokens.last_verified_at, None);
    let remaining = tokens.expires_at - chrono::Utc::now();
    assert!(remaining > chrono::Duration::seconds(3500));
    exchange.assert_async().await;
}

#[tokio::test]
async fn failed_exchange_is_authentication_failure() {
    let mut server = mockito::Server::new_async().await;
    let _exchange = server
        .mock("POST", "/api/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let pending = auth.start_session().await;
    let state = pending.session.state.clone();

    let err = auth
        .complete_login(&callback("auth-code", &state))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthenticationFailed(ref msg) if msg.contains("invalid_grant")));
    assert!(matches!(
        pending.wait(None).await,
        Err(Error::AuthenticationFailed(_))
    ));
    assert_eq!(auth.token_state().await.access_token, None);
}

#[tokio::test]
async fn out_of_range_lifetime_fails_login_cleanly() {
    let mut server = mockito::Server::new_async().await;
    let _exchange = server
        .mock("POST", "/api/token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"access_token": "forever", "token_type": "Bearer", "expires_in": i64::MAX})
                .to_string(),
        )
        .create_async()
        .await;

    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let pending = auth.start_session().await;
    let state = pending.session.state.clone();

    let err = auth
        .complete_login(&callback("auth-code", &state))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::AuthenticationFailed(ref msg) if msg.contains("out of range")));
    assert_eq!(pending.wait(Some(Duration::from_secs(1))).await, Err(err));
    assert_eq!(auth.token_state().await.access_token, None);
    assert_eq!(auth.phase().await, AuthPhase::Failed);
}

#[tokio::test]
async fn denied_authorization_is_authentication_failure() {
    let server = mockito::Server::new_async().await;
    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let pending = auth.start_session().await;

    let params = CallbackParams {
        code: None,
        state: Some(pending.session.state.clone()),
        error: Some("access_denied".to_string()),
    };

    let err = auth.complete_login(&params).await.unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed(ref msg) if msg.contains("access_denied")));
}

#[tokio::test]
async fn callback_without_session_is_rejected() {
    let server = mockito::Server::new_async().await;
    let auth = SpotifyAuth::new(spotify_settings(&server.url()));

    let err = auth
        .complete_login(&callback("auth-code", "anything"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AuthenticationFailed(_)));
}

#[tokio::test]
async fn new_session_supersedes_the_old_one() {
    let server = mockito::Server::new_async().await;
    let auth = SpotifyAuth::new(spotify_settings(&server.url()));

    let first = auth.start_session().await;
    let second = auth.start_session().await;

    assert_ne!(first.session.state, second.session.state);
    let first_state = first.session.state.clone();
    assert!(matches!(
        first.wait(Some(Duration::from_secs(1))).await,
        Err(Error::AuthenticationFailed(_))
    ));

    // the old state is no longer accepted
    let err = auth
        .complete_login(&callback("auth-code", &first_state))
        .await
        .unwrap_err();
    assert_eq!(err, Error::StateMismatch);
}

#[tokio::test]
async fn wait_times_out_without_callback() {
    let server = mockito::Server::new_async().await;
    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let pending = auth.start_session().await;

    let result = pending.wait(Some(Duration::from_millis(50))).await;
    assert!(matches!(result, Err(Error::AuthenticationFailed(_))));
}

#[tokio::test]
async fn authorize_url_carries_client_scope_and_state() {
    let server = mockito::Server::new_async().await;
    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let pending = auth.start_session().await;

    let url = Url::parse(&auth.login_url().await.unwrap()).unwrap();
    let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    assert_eq!(url.path(), "/authorize");
    assert_eq!(get("client_id").as_deref(), Some("test_id"));
    assert_eq!(get("response_type").as_deref(), Some("code"));
    assert_eq!(get("redirect_uri").as_deref(), Some(REDIRECT_URI));
    assert_eq!(
        get("scope").as_deref(),
        Some("user-read-private playlist-modify-private playlist-modify-public")
    );
    assert_eq!(get("state"), Some(pending.session.state.clone()));
}

#[tokio::test]
async fn login_without_session_is_conflict() {
    let server = mockito::Server::new_async().await;
    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let addr = auth.ensure_listener().await.unwrap();

    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();
    let res = client
        .get(format!("http://{}/login", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let health: Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["auth"], "idle");

    // bound once per process
    assert_eq!(auth.ensure_listener().await.unwrap(), addr);
}

#[tokio::test]
async fn full_login_round_trip_through_loopback_listener() {
    let mut server = mockito::Server::new_async().await;
    let exchange = server
        .mock("POST", "/api/token")
        .match_body(token_exchange_body())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"access_token": "fresh-token", "expires_in": 3600}).to_string())
        .expect(1)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/v1/me")
        .match_header("authorization", "Bearer fresh-token")
        .with_status(200)
        .with_body(r#"{"id":"user-1"}"#)
        .expect(1)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let flow = tokio::spawn({
        let auth = auth.clone();
        async move { auth.ensure_access_token().await }
    });

    wait_for_phase(&auth, AuthPhase::AwaitingCallback).await;
    let addr = auth.listening_addr().unwrap();
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();

    let login = client
        .get(format!("http://{}/login", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::TEMPORARY_REDIRECT);
    let location = login.headers()["location"].to_str().unwrap().to_string();
    let state = Url::parse(&location)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    let res = client
        .get(format!("http://{}/callback", addr))
        .query(&[("code", "auth-code"), ("state", state.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    flow.await.unwrap().unwrap();
    assert_eq!(auth.phase().await, AuthPhase::Authenticated);
    assert_eq!(auth.bearer().await.unwrap(), "fresh-token");
    exchange.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn forged_callback_over_http_aborts_the_flow() {
    let mut server = mockito::Server::new_async().await;
    let exchange = server
        .mock("POST", "/api/token")
        .expect(0)
        .create_async()
        .await;

    let auth = SpotifyAuth::new(spotify_settings(&server.url()));
    let flow = tokio::spawn({
        let auth = auth.clone();
        async move { auth.ensure_access_token().await }
    });

    wait_for_phase(&auth, AuthPhase::AwaitingCallback).await;
    let addr = auth.listening_addr().unwrap();

    let res = reqwest::Client::new()
        .get(format!("http://{}/callback", addr))
        .query(&[("code", "auth-code"), ("state", "forged-state")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(flow.await.unwrap(), Err(Error::StateMismatch));
    assert_eq!(auth.phase().await, AuthPhase::Failed);
    exchange.assert_async().await;
}
