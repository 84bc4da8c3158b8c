//! HTTP behavior of the quiz router: catalog, scoring, share restore, and photo intake.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use soullink::quiz::{
    quiz_router, QuestionBank, QuizService, ScoringEngine, SizeHeuristicIngest, TrustPolicy,
};

fn router() -> Router {
    let service = QuizService::new(
        Arc::new(QuestionBank::standard()),
        ScoringEngine::default(),
        TrustPolicy::standard(),
        Arc::new(SizeHeuristicIngest::new(16)),
        "https://soullink.example",
    );
    quiz_router(Arc::new(service))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router dispatch");
    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload = serde_json::from_slice(&body).expect("json");
    (status, payload)
}

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
        .expect("request")
}

#[tokio::test]
async fn questions_route_lists_the_bank() {
    let (status, payload) = send(
        router(),
        Request::builder()
            .uri("/api/v1/quiz/questions")
            .body(Body::empty())
            .expect("request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["questions"].as_array().map(Vec::len), Some(15));
    assert_eq!(payload["pillars"][0]["pillar"], json!("Honesty"));
    assert_eq!(payload["pillars"][0]["question_count"], json!(3));
    assert_eq!(payload["questions"][0]["hint"], json!("Truth over harmony"));
}

#[tokio::test]
async fn score_route_returns_summary_and_link() {
    let (status, payload) = send(
        router(),
        post_json(
            "/api/v1/quiz/score",
            json!({
                "display_name": "Alex",
                "answers": { "q1": 5, "q3": 2 },
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["share_query"], json!("u=Alex&q1=5&q3=2"));
    assert_eq!(
        payload["share_url"],
        json!("https://soullink.example/?u=Alex&q1=5&q3=2")
    );
    assert_eq!(payload["summary"]["complete"], json!(false));
    assert_eq!(payload["summary"]["trust_percent"], json!(30));
    assert_eq!(payload["summary"]["pillars"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn score_route_rejects_unknown_questions() {
    let (status, payload) = send(
        router(),
        post_json("/api/v1/quiz/score", json!({ "answers": { "q42": 3 } })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("q42"));
}

#[tokio::test]
async fn share_route_restores_and_clamps() {
    let (status, payload) = send(
        router(),
        Request::builder()
            .uri("/api/v1/quiz/share?u=Sam+Lee&q1=9&q2=abc&q5=0")
            .body(Body::empty())
            .expect("request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["display_name"], json!("Sam Lee"));
    assert_eq!(payload["answers"], json!({ "q1": 5, "q5": 1 }));
    assert_eq!(payload["share_query"], json!("u=Sam+Lee&q1=5&q5=1"));
}

#[tokio::test]
async fn share_route_without_query_is_an_empty_session() {
    let (status, payload) = send(
        router(),
        Request::builder()
            .uri("/api/v1/quiz/share")
            .body(Body::empty())
            .expect("request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["summary"]["answered"], json!(0));
    assert_eq!(payload["share_url"], json!("https://soullink.example/"));
}

#[tokio::test]
async fn photo_route_grades_uploads_and_feeds_trust() {
    let app = router();
    let (status, payload) = send(
        app.clone(),
        Request::builder()
            .method("POST")
            .uri("/api/v1/quiz/photos/front")
            .header(header::CONTENT_TYPE, "image/jpeg")
            .body(Body::from(vec![7u8; 32]))
            .expect("request"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["photo"]["slot"], json!("front"));
    assert_eq!(payload["photo"]["quality"], json!("clear"));
    assert_eq!(payload["photo"]["byte_len"], json!(32));

    let (status, scored) = send(
        app,
        post_json(
            "/api/v1/quiz/score",
            json!({ "answers": {}, "photos": [payload["photo"]["slot"].clone()] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(scored["summary"]["photo_count"], json!(1));
    assert_eq!(scored["summary"]["trust_percent"], json!(50));
}

#[tokio::test]
async fn photo_route_rejects_bad_slots_and_media() {
    let (status, _) = send(
        router(),
        Request::builder()
            .method("POST")
            .uri("/api/v1/quiz/photos/back")
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(vec![1u8; 32]))
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, payload) = send(
        router(),
        Request::builder()
            .method("POST")
            .uri("/api/v1/quiz/photos/side")
            .header(header::CONTENT_TYPE, "application/pdf")
            .body(Body::from(vec![1u8; 32]))
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("application/pdf"));
}

#[tokio::test]
async fn score_route_counts_each_photo_slot_once() {
    let (status, payload) = send(
        router(),
        post_json(
            "/api/v1/quiz/score",
            json!({ "answers": { "q1": 5 }, "photos": ["front", "front"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["summary"]["photo_count"], json!(1));

    let (status, payload) = send(
        router(),
        post_json(
            "/api/v1/quiz/score",
            json!({ "answers": { "q1": 5 }, "photos": ["front", "side"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["summary"]["photo_count"], json!(2));
    assert_eq!(payload["summary"]["trust_percent"], json!(70));
}

#[tokio::test]
async fn photo_route_rejects_empty_and_untyped_uploads() {
    let (status, payload) = send(
        router(),
        Request::builder()
            .method("POST")
            .uri("/api/v1/quiz/photos/front")
            .header(header::CONTENT_TYPE, "image/jpeg")
            .body(Body::empty())
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(payload["error"].as_str().unwrap_or_default().contains("empty"));

    let (status, _) = send(
        router(),
        Request::builder()
            .method("POST")
            .uri("/api/v1/quiz/photos/front")
            .body(Body::from(vec![1u8; 32]))
            .expect("request"),
    )
    .await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}
