//! The raw HTTP message a [`Request`](super::Request) is composed over.
//!
//! Wire decoding (headers, urlencoded and multipart bodies) stays with axum and
//! `url`; this module only exposes the decoded pieces through a narrow trait so
//! the request context does not care which HTTP stack produced them.
use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request as HttpRequest},
    http::{HeaderMap, Method, Uri, header},
};
use serde_json::{Map, Value};

use super::error::RequestError;
use super::format::ContentTypeFormat;

/// A file part of a `multipart/form-data` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read-only view of an already-decoded HTTP request.
pub trait RawHttpMessage: Send + Sync {
    fn method(&self) -> &Method;
    fn uri(&self) -> &Uri;
    fn headers(&self) -> &HeaderMap;
    fn query(&self) -> &Map<String, Value>;
    fn body(&self) -> &[u8];
    fn form_fields(&self) -> &Map<String, Value>;
    fn file(&self, name: &str) -> Option<&UploadedFile>;

    fn content_type_format(&self) -> Option<ContentTypeFormat> {
        self.headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(ContentTypeFormat::from_mime)
    }

    /// Decodes the body as a JSON object.
    fn json_object(&self) -> Result<Map<String, Value>, RequestError> {
        let body = self.body();
        if body.is_empty() {
            return Err(RequestError::EmptyBody);
        }

        match serde_json::from_slice::<Value>(body)? {
            Value::Object(map) => Ok(map),
            _ => Err(RequestError::NotAnObject),
        }
    }
}

/// [`RawHttpMessage`] backed by a fully buffered axum request.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    query: Map<String, Value>,
    body: Bytes,
    form: Map<String, Value>,
    files: HashMap<String, UploadedFile>,
}

impl RawRequest {
    /// Builds a raw request from its parts. Urlencoded bodies are decoded into form fields.
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        let query = uri
            .query()
            .map(|q| decode_pairs(q.as_bytes()))
            .unwrap_or_default();

        let is_urlencoded = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| {
                ct.trim_start()
                    .to_ascii_lowercase()
                    .starts_with("application/x-www-form-urlencoded")
            });
        let form = if is_urlencoded {
            decode_pairs(&body)
        } else {
            Map::new()
        };

        Self {
            method,
            uri,
            headers,
            query,
            body,
            form,
            files: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.insert(name.into(), Value::String(value.into()));
        self
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.files.insert(file.field_name.clone(), file);
        self
    }

    /// Buffers an axum request. Multipart bodies are split into fields and files.
    pub async fn from_http(req: HttpRequest, body_limit: usize) -> Result<Self, RequestError> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| {
                ct.trim_start()
                    .to_ascii_lowercase()
                    .starts_with("multipart/form-data")
            });

        if !is_multipart {
            let (parts, body) = req.into_parts();
            let bytes = axum::body::to_bytes(body, body_limit)
                .await
                .map_err(RequestError::Body)?;
            return Ok(Self::new(parts.method, parts.uri, parts.headers, bytes));
        }

        let mut raw = Self::new(
            req.method().clone(),
            req.uri().clone(),
            req.headers().clone(),
            Bytes::new(),
        );

        // Multipart reads are capped by `DefaultBodyLimit` (set from config in
        // `middleware::http`); `body_limit` bounds the decoded parts as well.
        let mut remaining = body_limit;
        let mut multipart = Multipart::from_request(req, &()).await?;
        while let Some(mut field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);

            let mut data = Vec::new();
            while let Some(chunk) = field.chunk().await? {
                remaining = remaining
                    .checked_sub(chunk.len())
                    .ok_or(RequestError::TooLarge { limit: body_limit })?;
                data.extend_from_slice(&chunk);
            }

            match file_name {
                Some(file_name) => {
                    raw = raw.with_file(UploadedFile {
                        field_name: name,
                        file_name,
                        content_type,
                        data: Bytes::from(data),
                    });
                }
                None => {
                    raw = raw.with_field(name, String::from_utf8_lossy(&data));
                }
            }
        }

        Ok(raw)
    }
}

impl RawHttpMessage for RawRequest {
    fn method(&self) -> &Method {
        &self.method
    }

    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn query(&self) -> &Map<String, Value> {
        &self.query
    }

    fn body(&self) -> &[u8] {
        &self.body
    }

    fn form_fields(&self) -> &Map<String, Value> {
        &self.form
    }

    fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}

// Repeated keys: last one wins.
fn decode_pairs(input: &[u8]) -> Map<String, Value> {
    url::form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}
