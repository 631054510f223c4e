/*
 * Responsibility
 * - axum リクエスト → Request (RawRequest を包む) への変換
 * - middleware が extensions に積んだ app context を set_app_context で適用する
 */
use axum::{
    extract::{FromRequest, Request as HttpRequest},
    http::Extensions,
};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::state::AppState;

use super::core::Request;
use super::raw::RawRequest;

/// Context data queued by middleware, applied in order once the Request exists.
#[derive(Debug, Clone, Default)]
pub struct PendingContext(pub Vec<Map<String, Value>>);

/// Queues `data` for the Request built later in the pipeline.
pub fn push_app_context(extensions: &mut Extensions, data: Map<String, Value>) {
    match extensions.get_mut::<PendingContext>() {
        Some(pending) => pending.0.push(data),
        None => {
            extensions.insert(PendingContext(vec![data]));
        }
    }
}

impl FromRequest<AppState> for Request {
    type Rejection = AppError;

    async fn from_request(mut req: HttpRequest, state: &AppState) -> Result<Self, Self::Rejection> {
        let pending = req.extensions_mut().remove::<PendingContext>();

        let raw = RawRequest::from_http(req, state.max_body_bytes).await?;
        let mut request = Request::new(raw, state.logger.clone());

        for data in pending.map(|p| p.0).unwrap_or_default() {
            request.set_app_context(data);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use serde_json::json;

    use super::*;
    use crate::logging::testing::RecordingLogger;
    use crate::services::auth::AuthBackends;

    fn state() -> AppState {
        AppState::new(RecordingLogger::shared(), AuthBackends::default(), 1024)
    }

    fn object(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn applies_pending_context_in_order() {
        let mut req = HttpRequest::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap();
        push_app_context(req.extensions_mut(), object(json!({"user": {"id": 7}, "x": 1})));
        push_app_context(req.extensions_mut(), object(json!({"x": 2})));

        let request = Request::from_request(req, &state()).await.unwrap();

        assert!(request.is_authenticated());
        assert_eq!(request.get_context()["x"], 2);
        assert_eq!(request.get_context()["user"]["id"], 7);
    }

    #[tokio::test]
    async fn anonymous_without_pending_context() {
        let req = HttpRequest::builder()
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from("{\"a\":1}"))
            .unwrap();

        let request = Request::from_request(req, &state()).await.unwrap();

        assert!(!request.is_authenticated());
        assert!(request.get_context().is_empty());
        assert_eq!(request.get_data().unwrap()["a"], 1);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let req = HttpRequest::builder()
            .uri("/")
            .body(Body::from(vec![b'x'; 2048]))
            .unwrap();

        let err = Request::from_request(req, &state()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }
}
