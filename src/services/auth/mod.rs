/*
 * Responsibility
 * - 認証バックエンドの共通インターフェース (AuthBackend)
 * - 複数バックエンドを順に試す AuthBackends
 */
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod bearer;

pub use bearer::BearerTokenBackend;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed credentials")]
    Malformed,
    #[error("unknown credentials")]
    UnknownCredentials,
}

/// Resolves request credentials into app context data.
///
/// Returns:
/// - `Ok(Some(data))` when this backend recognised the caller; `data` carries
///   `user` and optionally `permissions` / `authExtra`
/// - `Ok(None)` when the request carries nothing this backend understands
/// - `Err(_)` when credentials were presented but rejected
#[async_trait]
pub trait AuthBackend: fmt::Debug + Send + Sync {
    // Backend name (for logging).
    fn name(&self) -> &'static str;

    async fn authenticate(&self, headers: &HeaderMap)
    -> Result<Option<Map<String, Value>>, AuthError>;
}

/// Ordered list of backends; the first one that recognises the caller wins.
#[derive(Debug, Clone, Default)]
pub struct AuthBackends {
    backends: Vec<Arc<dyn AuthBackend>>,
}

impl AuthBackends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, backend: impl AuthBackend + 'static) -> Self {
        self.backends.push(Arc::new(backend));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn AuthBackend> {
        self.backends.iter().map(|b| b.as_ref())
    }
}
