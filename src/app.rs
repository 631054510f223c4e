/*
 * Responsibility
 * - tracing 初期化 → Config 読み込み → Logger 生成 → panic hook
 * - 依存生成 (AppState) → ルートテーブル → Kernel 組み立て
 * - axum::serve() で起動
 */
use anyhow::Result;

use crate::{
    api,
    config::Config,
    kernel::Kernel,
    logging::{self, SharedLogger, TracingLogger},
    middleware::panic::install_panic_hook,
    services::auth::{AuthBackends, BearerTokenBackend},
    state::AppState,
};

pub async fn run() -> Result<()> {
    logging::init_tracing();
    let config = Config::from_env()?;

    // Built once; handed to the panic hook, the state and every Request.
    let logger = TracingLogger::shared(config.app_name.clone());
    install_panic_hook(logger.clone());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config, logger);

    let routes = api::routes();
    tracing::debug!(groups = ?routes.groups(), "route table built");

    let kernel = Kernel::new(routes.into_router(), state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    kernel.handle(listener).await?;
    Ok(())
}

fn build_state(config: &Config, logger: SharedLogger) -> AppState {
    let mut auth = AuthBackends::new();

    if !config.auth_tokens.is_empty() {
        let bearer = BearerTokenBackend::new(&config.auth_tokens);
        tracing::info!(tokens = bearer.len(), "bearer token auth enabled");
        auth = auth.with(bearer);
    }

    if auth.is_empty() && config.app_env.is_production() {
        tracing::warn!("no auth backends configured; all requests are anonymous");
    }

    AppState::new(logger, auth, config.max_body_bytes)
}
