/*
 * Responsibility
 * - RawHttpMessage を包む Request (継承ではなく合成)
 * - JSON / form payload の統一アクセス (get_data)
 * - 認証コンテキスト (ContextUser) とアプリコンテキストの保持
 * - Logger の参照 (注入されたものを持つだけ)
 */
use axum::http::{HeaderMap, Method, Uri};
use serde_json::{Map, Value};

use crate::logging::SharedLogger;

use super::context_user::ContextUser;
use super::error::RequestError;
use super::format::ContentTypeFormat;
use super::raw::{RawHttpMessage, RawRequest, UploadedFile};
use super::value::is_truthy;

/// Per-request wrapper adding payload accessors and the application context.
///
/// Created once per incoming call (see the axum extractor in `extract`) and
/// dropped with the response. Authentication only ever moves from
/// unauthenticated to authenticated.
#[derive(Debug)]
pub struct Request<R = RawRequest> {
    raw: R,
    authenticated: bool,
    context: Map<String, Value>,
    auth: Option<ContextUser>,
    logger: SharedLogger,
}

impl<R: RawHttpMessage> Request<R> {
    pub fn new(raw: R, logger: SharedLogger) -> Self {
        Self {
            raw,
            authenticated: false,
            context: Map::new(),
            auth: None,
            logger,
        }
    }

    pub fn raw(&self) -> &R {
        &self.raw
    }

    pub fn method(&self) -> &Method {
        self.raw.method()
    }

    pub fn uri(&self) -> &Uri {
        self.raw.uri()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.raw.headers()
    }

    pub fn query(&self) -> &Map<String, Value> {
        self.raw.query()
    }

    pub fn content_type_format(&self) -> Option<ContentTypeFormat> {
        self.raw.content_type_format()
    }

    /// The ContextUser attached by the auth layer, if any.
    pub fn get_auth(&self) -> Option<&ContextUser> {
        self.auth.as_ref()
    }

    /// The whole app context, including the raw `user` data it was built from.
    pub fn get_context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Either the request flag or the attached ContextUser marks the request authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated || self.auth.as_ref().is_some_and(|a| a.authenticated)
    }

    /// Attaches `user`. A non-empty principal authenticates both the object and the request.
    ///
    /// The object is attached even when it carries no user.
    pub fn set_authentication_context(&mut self, mut user: ContextUser) -> &mut Self {
        if user.has_user() {
            user.authenticated = true;
            self.authenticated = true;
        }
        self.auth = Some(user);
        self
    }

    /// Merges `data` into the app context; a truthy `user` key authenticates the request.
    ///
    /// Only framework middleware feeds this (through the extractor).
    pub(crate) fn set_app_context(&mut self, data: Map<String, Value>) -> &mut Self {
        if let Some(user) = data.get("user").filter(|u| is_truthy(u)) {
            let mut context_user = ContextUser::new();
            context_user.set_user(user.clone());

            if let Some(Value::Object(extra)) = data.get("authExtra") {
                context_user.auth_extra = Some(extra.clone());
            }
            if let Some(permissions) = data.get("permissions").and_then(permission_list) {
                context_user.permissions = Some(permissions);
            }

            self.set_authentication_context(context_user);
        }

        // shallow; later keys win
        self.context.extend(data);
        self
    }

    /// The decoded JSON body, or an empty map when the body is not JSON.
    pub fn get_json_data(&self) -> Result<Map<String, Value>, RequestError> {
        match self.content_type_format() {
            Some(ContentTypeFormat::Json) => self.raw.json_object(),
            _ => Ok(Map::new()),
        }
    }

    /// The submitted form fields, or an empty map when the body is not a form.
    pub fn get_form_data(&self) -> Map<String, Value> {
        match self.content_type_format() {
            Some(ContentTypeFormat::Form) => self.raw.form_fields().clone(),
            _ => Map::new(),
        }
    }

    /// JSON and form payloads as one map; form fields win on conflict.
    pub fn get_data(&self) -> Result<Map<String, Value>, RequestError> {
        let mut data = self.get_json_data()?;
        data.extend(self.get_form_data());
        Ok(data)
    }

    /// The uploaded file named `name`. Only form submissions carry files.
    pub fn get_file_by_name(&self, name: &str) -> Option<&UploadedFile> {
        match self.content_type_format() {
            Some(ContentTypeFormat::Form) => self.raw.file(name),
            _ => None,
        }
    }

    pub fn get_logger(&self) -> &SharedLogger {
        &self.logger
    }

    pub fn set_logger(&mut self, logger: SharedLogger) {
        self.logger = logger;
    }
}

fn permission_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) if !s.is_empty() => Some(vec![s.clone()]),
        Value::Array(items) => {
            let permissions: Vec<String> = items
                .iter()
                .filter_map(|p| p.as_str().map(str::to_string))
                .collect();
            (!permissions.is_empty()).then_some(permissions)
        }
        _ => None,
    }
}
