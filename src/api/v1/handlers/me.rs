/*
 * Responsibility
 * - SecurityContext を読む downstream handler
 * - /me は認証必須 (handler 側の判断), /whoami は匿名でも 200
 */
use axum::Json;

use crate::api::v1::dto::identity::{IdentityResponse, WhoAmIResponse};
use crate::api::v1::extractors::{CurrentIdentity, MaybeIdentity};

pub async fn me(CurrentIdentity(identity): CurrentIdentity) -> Json<IdentityResponse> {
    Json(IdentityResponse::from(&identity))
}

pub async fn whoami(MaybeIdentity(identity): MaybeIdentity) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        authenticated: identity.is_some(),
        principal: identity.as_ref().map(IdentityResponse::from),
    })
}
