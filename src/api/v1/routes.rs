/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証は middleware で app context に積まれ、必須かどうかは handler 側で判断する
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    context::{context, me},
    data::echo_data,
    files::file_info,
    health::health,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/data", post(echo_data))
        .route("/me", get(me))
        .route("/context", get(context))
        .route("/files/{name}", post(file_info))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        extract::Request,
        http::{StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use tracing::Level;

    use crate::api;
    use crate::config::Config;
    use crate::kernel::Kernel;
    use crate::logging::testing::RecordingLogger;
    use crate::services::auth::{AuthBackends, BearerTokenBackend};
    use crate::state::AppState;

    fn app_with(logger: Arc<RecordingLogger>) -> Router<()> {
        app_with_vars(logger, &[])
    }

    fn app_with_vars(logger: Arc<RecordingLogger>, extra: &[(&str, &str)]) -> Router<()> {
        let mut vars: HashMap<&str, &str> = HashMap::from([("AUTH_TOKENS", "s3cret=7:read")]);
        vars.extend(extra.iter().copied());
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        let auth = AuthBackends::new().with(BearerTokenBackend::new(&config.auth_tokens));
        let state = AppState::new(logger, auth, config.max_body_bytes);

        Kernel::new(api::routes().into_router(), state, &config).into_router()
    }

    fn app() -> Router<()> {
        app_with(RecordingLogger::shared())
    }

    async fn send(req: Request) -> (StatusCode, Value) {
        let res: Response = app().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post(uri: &str, content_type: &str, body: impl Into<Body>) -> Request {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str, token: Option<&str>) -> Request {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn multipart(field: &str, file_name: &str) -> Request {
        let body = format!(
            "--BOUNDARY\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             hello\r\n\
             --BOUNDARY--\r\n"
        );
        post(
            "/api/v1/files/avatar",
            "multipart/form-data; boundary=BOUNDARY",
            body,
        )
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(get("/api/v1/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn data_merges_json_and_form_payloads() {
        let (status, body) = send(post("/api/v1/data", "application/json", r#"{"b": 2}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["format"], "json");
        assert_eq!(body["data"], json!({"b": 2}));
        assert_eq!(body["method"], "POST");

        let (_, body) = send(post(
            "/api/v1/data",
            "application/x-www-form-urlencoded",
            "a=1",
        ))
        .await;
        assert_eq!(body["data"], json!({"a": "1"}));

        let (_, body) = send(post("/api/v1/data?page=2", "text/plain", "a=1")).await;
        assert_eq!(body["format"], "txt");
        assert_eq!(body["data"], json!({}));
        assert_eq!(body["query"], json!({"page": "2"}));
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let (status, body) = send(post("/api/v1/data", "application/json", "{nope")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_PAYLOAD");
    }

    #[tokio::test]
    async fn me_requires_authentication() {
        let (status, _) = send(get("/api/v1/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(get("/api/v1/me", Some("wrong"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_the_context_user() {
        let (status, body) = send(get("/api/v1/me", Some("s3cret"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"], json!({"id": 7}));
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["permissions"], json!(["read"]));
        assert_eq!(body["authExtra"]["scheme"], "bearer");
    }

    #[tokio::test]
    async fn context_exposes_app_context() {
        let (_, body) = send(get("/api/v1/context", Some("s3cret"))).await;
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["context"]["user"]["id"], 7);

        let (_, body) = send(get("/api/v1/context", None)).await;
        assert_eq!(body, json!({"authenticated": false, "context": {}}));
    }

    #[tokio::test]
    async fn file_info_for_multipart_upload() {
        let logger = RecordingLogger::shared();
        let res = app_with(logger.clone())
            .oneshot(multipart("avatar", "me.txt"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["file_name"], "me.txt");
        assert_eq!(body["size"], 5);
        assert_eq!(body["empty"], false);

        let records = logger.records();
        assert!(
            records
                .iter()
                .any(|r| r.level == Level::INFO && r.message == "file received")
        );
    }

    fn large_upload(size: usize) -> Request {
        let mut body = b"--BOUNDARY\r\n\
            Content-Disposition: form-data; name=\"avatar\"; filename=\"big.bin\"\r\n\
            Content-Type: application/octet-stream\r\n\r\n"
            .to_vec();
        body.extend(std::iter::repeat_n(b'x', size));
        body.extend_from_slice(b"\r\n--BOUNDARY--\r\n");

        Request::builder()
            .method("POST")
            .uri("/api/v1/files/avatar")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn uploads_follow_the_configured_body_limit() {
        // above axum's implicit 2 MiB default, below MAX_BODY_BYTES
        let app = app_with_vars(
            RecordingLogger::shared(),
            &[("MAX_BODY_BYTES", "10485760")],
        );
        let res = app.oneshot(large_upload(3 * 1024 * 1024)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["size"], 3 * 1024 * 1024);

        let app = app_with_vars(RecordingLogger::shared(), &[("MAX_BODY_BYTES", "1024")]);
        let res = app.oneshot(large_upload(4 * 1024)).await.unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn file_info_missing_or_wrong_format() {
        let (status, _) = send(multipart("other", "x.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(post("/api/v1/files/avatar", "application/json", "{}")).await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body["error"]["code"], "UNSUPPORTED_MEDIA_TYPE");
    }
}
