/*
 * Responsibility
 * - POST /files/{name}: multipart で送られたファイルのメタ情報を返す
 * - form 以外の content type は 415
 */
use axum::{Json, extract::Path};
use serde_json::{Value, json};

use crate::{
    error::AppError,
    request::{ContentTypeFormat, Request},
};

pub async fn file_info(Path(name): Path<String>, req: Request) -> Result<Json<Value>, AppError> {
    if req.content_type_format() != Some(ContentTypeFormat::Form) {
        return Err(AppError::UnsupportedMediaType { expected: "form" });
    }

    let file = req
        .get_file_by_name(&name)
        .ok_or(AppError::not_found("file"))?;

    let info = json!({
        "field": file.field_name,
        "file_name": file.file_name,
        "content_type": file.content_type,
        "size": file.len(),
        "empty": file.is_empty(),
    });
    req.get_logger().info("file received", &info);

    Ok(Json(info))
}
