/*
 * Responsibility
 * - ルートテーブル + middleware を組み合わせて 1 つの axum Router にする
 * - axum::serve() でリクエストを処理する
 */
use axum::Router;
use tokio::net::TcpListener;

use crate::{config::Config, middleware, state::AppState};

/// Dispatches requests against a route table with the app middleware stack applied.
pub struct Kernel {
    router: Router,
}

impl Kernel {
    pub fn new(routes: Router<AppState>, state: AppState, config: &Config) -> Self {
        let routes = middleware::auth::apply(routes, state.clone());
        let router = middleware::http::apply(routes.with_state(state), config);
        Self { router }
    }

    #[cfg(test)]
    pub fn into_router(self) -> Router {
        self.router
    }

    pub async fn handle(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router).await
    }
}
