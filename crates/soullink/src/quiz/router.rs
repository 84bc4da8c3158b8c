use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::photos::{PhotoIngest, PhotoSlot};
use super::service::{QuizService, ScoreRequest};
use crate::error::AppError;

/// Router builder exposing the quiz catalog, scoring, share restore, and photo intake.
/// Service errors are rendered through [`AppError`].
pub fn quiz_router<I>(service: Arc<QuizService<I>>) -> Router
where
    I: PhotoIngest + 'static,
{
    Router::new()
        .route("/api/v1/quiz/questions", get(questions_handler::<I>))
        .route("/api/v1/quiz/score", post(score_handler::<I>))
        .route("/api/v1/quiz/share", get(share_handler::<I>))
        .route("/api/v1/quiz/photos/:slot", post(photo_handler::<I>))
        .with_state(service)
}

pub(crate) async fn questions_handler<I>(State(service): State<Arc<QuizService<I>>>) -> Response
where
    I: PhotoIngest + 'static,
{
    (StatusCode::OK, axum::Json(service.catalog())).into_response()
}

pub(crate) async fn score_handler<I>(
    State(service): State<Arc<QuizService<I>>>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response
where
    I: PhotoIngest + 'static,
{
    match service.score(request) {
        Ok(response) => (StatusCode::OK, axum::Json(response)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn share_handler<I>(
    State(service): State<Arc<QuizService<I>>>,
    RawQuery(query): RawQuery,
) -> Response
where
    I: PhotoIngest + 'static,
{
    let response = service.restore(query.as_deref().unwrap_or_default());
    (StatusCode::OK, axum::Json(response)).into_response()
}

pub(crate) async fn photo_handler<I>(
    State(service): State<Arc<QuizService<I>>>,
    Path(slot): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    I: PhotoIngest + 'static,
{
    let Some(slot) = PhotoSlot::parse(&slot) else {
        let payload = json!({
            "error": format!("unknown photo slot '{slot}'"),
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    match service.ingest_photo(slot, content_type, &body) {
        Ok(photo) => {
            let payload = json!({
                "photo": photo,
                "message": photo.quality.message(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}
