//! Static bearer tokens from configuration (`AUTH_TOKENS`).
use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};

use super::{AuthBackend, AuthError};
use crate::config::TokenGrant;

type TokenDigest = [u8; 32];

#[derive(Debug, Clone)]
struct Grant {
    user: Value,
    permissions: Vec<String>,
}

/// Matches `Authorization: Bearer <token>` against configured tokens.
///
/// Only SHA-256 digests of the tokens are kept in memory.
#[derive(Debug, Clone, Default)]
pub struct BearerTokenBackend {
    grants: HashMap<TokenDigest, Grant>,
}

impl BearerTokenBackend {
    pub fn new(grants: &[TokenGrant]) -> Self {
        let grants = grants
            .iter()
            .map(|g| {
                let user = match g.user.parse::<i64>() {
                    Ok(id) => json!({ "id": id }),
                    Err(_) => json!({ "id": g.user }),
                };
                (
                    digest(&g.token),
                    Grant {
                        user,
                        permissions: g.permissions.clone(),
                    },
                )
            })
            .collect();

        Self { grants }
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }
}

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}

#[async_trait]
impl AuthBackend for BearerTokenBackend {
    fn name(&self) -> &'static str {
        "bearer_token"
    }

    async fn authenticate(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<Map<String, Value>>, AuthError> {
        let Some(auth) = headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };
        let auth = auth.to_str().map_err(|_| AuthError::Malformed)?;

        let Some(token) = auth.strip_prefix("Bearer ") else {
            // some other scheme; leave it to the next backend
            return Ok(None);
        };
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Malformed);
        }

        let grant = self
            .grants
            .get(&digest(token))
            .ok_or(AuthError::UnknownCredentials)?;

        let data = json!({
            "user": grant.user,
            "permissions": grant.permissions,
            "authExtra": {
                "scheme": "bearer",
                "backend": self.name(),
                "authenticated_at": chrono::Utc::now().to_rfc3339(),
            },
        });

        Ok(data.as_object().cloned())
    }
}
