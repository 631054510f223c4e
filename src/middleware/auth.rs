//! 認証バックエンドを順に試し、認識できた主体を app context として extensions に積む
//!
//! - ここでは拒否しない (匿名のまま handler に渡す)
//! - 認証必須かどうかは handler が `Request::is_authenticated()` で判断する

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::request::push_app_context;
use crate::state::AppState;

/// Runs the auth backends in front of every route of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, context_middleware))
}

async fn context_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    for backend in state.auth.iter() {
        let outcome = backend.authenticate(req.headers()).await;
        match outcome {
            Ok(Some(data)) => {
                tracing::debug!(backend = backend.name(), "request authenticated");
                push_app_context(req.extensions_mut(), data);
                break;
            }
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(
                    backend = backend.name(),
                    error = %err,
                    "credentials rejected; continuing anonymously"
                );
                break;
            }
        }
    }

    next.run(req).await
}
