/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - bearer middleware は app.rs で v1 全体に掛ける (ここでは掛けない)
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::me::{me, whoami};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/whoami", get(whoami))
}
