use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::security::{Identity, SecurityContext};
use crate::state::AppState;

/// Handler で認証済み Identity を受け取るための extractor
/// SecurityContext が空 (匿名リクエスト / middleware 未設定) の場合は 401
pub struct CurrentIdentity(pub Identity);

impl FromRequestParts<AppState> for CurrentIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current(parts).map(CurrentIdentity).ok_or(AppError::Unauthorized)
    }
}

/// 匿名でもよい handler 用
pub struct MaybeIdentity(pub Option<Identity>);

impl FromRequestParts<AppState> for MaybeIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(current(parts)))
    }
}

fn current(parts: &Parts) -> Option<Identity> {
    parts
        .extensions
        .get::<SecurityContext>()
        .and_then(SecurityContext::get)
}
