/*
 * Responsibility
 * - Identity の response DTO
 */
use serde::Serialize;

use crate::security::{Identity, PrincipalId};

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub id: PrincipalId,
    // BTreeSet order, so the output is stable
    pub authorities: Vec<String>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            authorities: identity.authorities.iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<IdentityResponse>,
}
