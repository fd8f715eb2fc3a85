/*
 * Responsibility
 * - 認証済み主体 (Identity) と per-request の SecurityContext
 * - middleware が書き込み、handler/extractor が読む
 */
mod context;
mod identity;

pub use context::SecurityContext;
pub use identity::{Identity, PrincipalId};
