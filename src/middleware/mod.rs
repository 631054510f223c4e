/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 認証バックエンド → app context
 * - http: request id / trace / limit / timeout / error boundary
 * - panic: プロセス全体の panic hook
 */
pub mod auth;
pub mod http;
pub mod panic;
