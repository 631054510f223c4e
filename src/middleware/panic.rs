//! Panic reporting.
//!
//! - `install_panic_hook`: process-wide hook. Every panic becomes one `debug`
//!   record (message + backtrace) on the injected logger, then the previous hook
//!   runs as before (stderr, process termination rules unchanged).
//! - `panic_response`: used by the HTTP error boundary (`CatchPanicLayer`) to
//!   turn a handler panic into a 500. The hook already logged it.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{self, PanicHookInfo};

use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::AppError;
use crate::logging::{Logger, SharedLogger};

/// Serialises tests that swap the process-wide panic hook.
#[cfg(test)]
pub(crate) static HOOK_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

pub fn install_panic_hook(logger: SharedLogger) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        report_panic(logger.as_ref(), info);
        default_hook(info);
    }));
}

fn report_panic(logger: &dyn Logger, info: &PanicHookInfo<'_>) {
    let message = panic_message(info.payload());
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()));
    let trace = Backtrace::force_capture().to_string();

    logger.debug(&message, &json!({ "trace": trace, "location": location }));
}

pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Response for a panic caught by the request error boundary.
pub fn panic_response(_payload: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Internal.into_response()
}
