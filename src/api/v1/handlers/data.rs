/*
 * Responsibility
 * - POST /data: JSON / form どちらで送られても get_data() でまとめて返す
 */
use axum::Json;
use serde_json::{Value, json};

use crate::{error::AppError, request::Request};

pub async fn echo_data(req: Request) -> Result<Json<Value>, AppError> {
    let data = req.get_data()?;

    Ok(Json(json!({
        "method": req.method().as_str(),
        "query": req.query(),
        "format": req.content_type_format().map(|f| f.as_str()),
        "data": data,
    })))
}
