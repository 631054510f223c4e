/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - logger: 起動時に一度だけ作り、Request にも注入する
 *   - auth: 認証バックエンド
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::logging::SharedLogger;
use crate::services::auth::AuthBackends;

#[derive(Clone, Debug)]
pub struct AppState {
    pub logger: SharedLogger,
    pub auth: Arc<AuthBackends>,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(logger: SharedLogger, auth: AuthBackends, max_body_bytes: usize) -> Self {
        Self {
            logger,
            auth: Arc::new(auth),
            max_body_bytes,
        }
    }
}
