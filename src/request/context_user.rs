/*
 * Responsibility
 * - 「誰がこのリクエストを送っているか」を表す値オブジェクト
 * - user / permissions / authExtra / authenticated フラグ
 */
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::value::is_truthy;

/// Identity attached to a request by the auth layer.
///
/// - `user` is whatever principal the application uses (id, object, ...)
/// - `authenticated` is forced to `true` whenever a non-empty `user` is set
/// - `auth_extra` carries backend metadata (token claims, timestamps)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextUser {
    pub user: Option<Value>,
    pub authenticated: bool,
    pub auth_extra: Option<Map<String, Value>>,
    pub permissions: Option<Vec<String>>,
}

impl ContextUser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the principal. A non-empty user also marks this object authenticated.
    pub fn set_user(&mut self, user: Value) -> &mut Self {
        if is_truthy(&user) {
            self.authenticated = true;
        }
        self.user = Some(user);
        self
    }

    #[cfg(test)]
    pub fn with_user(mut self, user: Value) -> Self {
        self.set_user(user);
        self
    }

    #[cfg(test)]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(permissions.into_iter().map(Into::into).collect());
        self
    }

    #[cfg(test)]
    pub fn with_auth_extra(mut self, extra: Map<String, Value>) -> Self {
        self.auth_extra = Some(extra);
        self
    }

    /// True when `user` holds a non-empty value.
    pub fn has_user(&self) -> bool {
        self.user.as_ref().is_some_and(is_truthy)
    }

    #[cfg(test)]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|perms| perms.iter().any(|p| p == permission))
    }
}
