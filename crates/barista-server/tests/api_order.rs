mod common;

use axum::http::StatusCode;
use barista_server::app;
use barista_types::VARIETY_SEED_RANGE;
use common::{body_json, build_state, post_json, FakeConnector, FakeGenerator, Speaker, MUTT_REPLY};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

async fn next_outcome(
    rx: &mut tokio::sync::broadcast::Receiver<barista_types::AnnouncementOutcome>,
) -> barista_types::AnnouncementOutcome {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("no announcement outcome within 5s")
        .unwrap()
}

#[tokio::test]
async fn order_response_ignores_announcement_outcome() {
    let broken = build_state(FakeGenerator::replying(MUTT_REPLY), FakeConnector::broken());
    let mut broken_outcomes = broken.announcer.subscribe();

    let speaker = Arc::new(Speaker::default());
    let working = build_state(
        FakeGenerator::replying(MUTT_REPLY),
        FakeConnector::working(speaker.clone()),
    );
    let mut working_outcomes = working.announcer.subscribe();

    let failed = post_json(app(broken), "/api/misspell", r#"{"name":"Matt"}"#).await;
    assert_eq!(failed.status(), StatusCode::OK);
    let failed_body = body_json(failed).await;

    let spoken = post_json(app(working), "/api/misspell", r#"{"name":"Matt"}"#).await;
    assert_eq!(spoken.status(), StatusCode::OK);
    let spoken_body = body_json(spoken).await;

    let expected = json!({
        "original": "Matt",
        "misspelled": "Mutt",
        "pronunciation": "MUTT",
        "chaos": "medium",
        "strategy": "mishearing",
    });
    assert_eq!(failed_body, expected);
    assert_eq!(spoken_body, expected);

    let outcome = next_outcome(&mut broken_outcomes).await;
    assert!(!outcome.success);
    assert_eq!(outcome.phrase, "Order ready for MUTT");
    assert!(outcome.error.unwrap().contains("invalid api key"));

    let outcome = next_outcome(&mut working_outcomes).await;
    assert!(outcome.success);
    assert_eq!(
        speaker.said.lock().unwrap().as_slice(),
        ["Order ready for MUTT".to_string()]
    );
}

#[tokio::test]
async fn hung_device_does_not_delay_the_response() {
    let hung_handshake = build_state(FakeGenerator::replying(MUTT_REPLY), FakeConnector::hung());
    let hung_speak = build_state(
        FakeGenerator::replying(MUTT_REPLY),
        FakeConnector::working(Speaker::hung()),
    );

    for state in [hung_handshake, hung_speak] {
        // Two orders: the second queues behind the stuck one.
        for _ in 0..2 {
            let response = tokio::time::timeout(
                Duration::from_millis(500),
                post_json(app(state.clone()), "/api/misspell", r#"{"name":"Matt"}"#),
            )
            .await
            .expect("order response waited on the device");
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await["misspelled"], "Mutt");
        }
    }
}

#[tokio::test]
async fn blank_names_are_rejected_before_generation() {
    let generator = FakeGenerator::replying(MUTT_REPLY);
    let connector = FakeConnector::broken();
    let state = build_state(generator.clone(), connector.clone());

    for body in [r#"{"name":""}"#, r#"{"name":"   "}"#, r#"{"name":"\t\n"}"#] {
        let response = post_json(app(state.clone()), "/api/misspell", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Please provide a name" })
        );
    }

    assert_eq!(generator.calls(), 0);
    assert_eq!(connector.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let generator = FakeGenerator::replying(MUTT_REPLY);
    let state = build_state(generator.clone(), FakeConnector::broken());

    for body in [
        "{}",
        r#"{"name":null}"#,
        r#"{"name":42}"#,
        r#"{"name":{"first":"Matt"}}"#,
        "not json at all",
        "",
    ] {
        let response = post_json(app(state.clone()), "/api/misspell", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Please provide a name" })
        );
    }

    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn unparseable_generation_is_a_server_error_without_announcement() {
    let connector = FakeConnector::broken();
    let state = build_state(
        FakeGenerator::replying("Sure! How about \"Mutt\"?"),
        connector.clone(),
    );

    let response = post_json(app(state.clone()), "/api/misspell", r#"{"name":"Matt"}"#).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Failed to generate misspelling" })
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(connector.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn partial_generation_is_a_server_error() {
    let state = build_state(
        FakeGenerator::replying(r#"{"misspelled":"Mutt","pronunciation":"MUTT","chaos":"medium"}"#),
        FakeConnector::broken(),
    );

    let response = post_json(app(state), "/api/misspell", r#"{"name":"Matt"}"#).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Failed to generate misspelling" })
    );
}

#[tokio::test]
async fn unreachable_provider_is_a_server_error() {
    let state = build_state(FakeGenerator::unavailable(), FakeConnector::broken());

    let response = post_json(app(state), "/api/misspell", r#"{"name":"Nick"}"#).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Failed to generate misspelling" })
    );
}

#[tokio::test]
async fn long_names_are_trimmed_and_truncated_before_generation() {
    let generator = FakeGenerator::replying(MUTT_REPLY);
    let state = build_state(generator.clone(), FakeConnector::broken());

    let long = format!("  {}  ", "Bartholomew".repeat(8));
    let body = json!({ "name": long }).to_string();
    let response = post_json(app(state), "/api/misspell", &body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let expected: String = "Bartholomew".repeat(8).chars().take(50).collect();
    assert_eq!(body_json(response).await["original"], json!(expected));

    let requests = generator.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name.as_str(), expected);
    assert!(requests[0].variety_seed < VARIETY_SEED_RANGE);
}

#[tokio::test]
async fn each_order_draws_a_seed_in_range() {
    let generator = FakeGenerator::replying(MUTT_REPLY);
    let state = build_state(generator.clone(), FakeConnector::broken());

    for _ in 0..20 {
        let response = post_json(app(state.clone()), "/api/misspell", r#"{"name":"Sarah"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let requests = generator.requests.lock().unwrap();
    assert_eq!(requests.len(), 20);
    assert!(requests
        .iter()
        .all(|r| r.variety_seed < VARIETY_SEED_RANGE && r.name.as_str() == "Sarah"));
}
