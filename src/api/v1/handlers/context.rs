/*
 * Responsibility
 * - GET /me: 認証済み主体 (ContextUser) を返す。未認証なら 401
 * - GET /context: app context 全体と認証状態
 */
use axum::Json;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    request::{ContextUser, Request},
};

pub async fn me(req: Request) -> Result<Json<ContextUser>, AppError> {
    if !req.is_authenticated() {
        return Err(AppError::Unauthorized);
    }

    Ok(Json(req.get_auth().cloned().unwrap_or_default()))
}

pub async fn context(req: Request) -> Json<Value> {
    Json(json!({
        "authenticated": req.is_authenticated(),
        "context": req.get_context(),
    }))
}
