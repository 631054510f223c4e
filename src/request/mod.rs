/*!
 * Request context
 *
 * Responsibility:
 * - RawHttpMessage (デコード済み HTTP) と、それを包む Request
 * - 認証済み主体 (ContextUser) / app context / payload accessor
 *
 * Public API:
 * - Request, ContextUser, ContentTypeFormat, RequestError
 * - push_app_context (middleware → extractor の受け渡し)
 */

mod context_user;
mod core;
mod error;
mod extract;
mod format;
mod raw;
mod value;

pub use context_user::ContextUser;
pub use self::core::Request;
pub use error::RequestError;
pub use extract::push_app_context;
pub use format::ContentTypeFormat;
