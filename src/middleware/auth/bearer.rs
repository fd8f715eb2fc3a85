//! Bearer authentication → SecurityContext を extensions に入れる
//!
//! - Authorization ヘッダが無い / Bearer 以外: 匿名のまま downstream へ
//! - Bearer トークンあり: 検証に成功したら Identity を SecurityContext にセット
//! - 検証失敗: ErrorDelegate が 1 回だけレスポンスを作り、downstream は呼ばない
//!
//! 認可 (Authorization) は handler 側の責務。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::security::SecurityContext;
use crate::services::auth::Authentication;
use crate::state::AppState;

/// `/api/v1/*` に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let v1 = middleware::auth::bearer::apply(api::v1::routes(), state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, bearer_middleware))
}

async fn bearer_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // 上流ですでに context が作られていればそれを使う (再認証しない)
    let (ctx, owned) = match req.extensions().get::<SecurityContext>() {
        Some(ctx) => (ctx.clone(), false),
        None => {
            let ctx = SecurityContext::new();
            req.extensions_mut().insert(ctx.clone());
            (ctx, true)
        }
    };

    match state.auth.authenticate(req.headers(), &ctx).await {
        Ok(outcome) => {
            match &outcome {
                Authentication::NoToken => {
                    tracing::debug!("no bearer token, continuing anonymously")
                }
                Authentication::AlreadyAuthenticated => {
                    tracing::debug!("security context already populated")
                }
                Authentication::Authenticated(identity) => {
                    tracing::debug!(principal = %identity.id, "bearer token accepted")
                }
            }

            let response = next.run(req).await;

            // context の寿命はこのリクエストまで
            if owned {
                ctx.clear();
            }

            response
        }
        Err(err) => {
            tracing::warn!(
                kind = err.kind().as_str(),
                error = %err,
                method = %req.method(),
                path = req.uri().path(),
                "bearer authentication rejected"
            );

            let (parts, _body) = req.into_parts();
            state.auth.error_delegate().handle(&parts, err).await
        }
    }
}
