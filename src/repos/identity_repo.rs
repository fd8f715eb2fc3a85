/*
 * Responsibility
 * - users / user_authorities テーブルから Identity を引く
 * - principal は userId (UUID 文字列) か email のどちらでも一致させる
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::{IdentityStore, RepoError};
use crate::security::{Identity, PrincipalId};

#[derive(Debug, FromRow)]
pub struct IdentityRow {
    #[sqlx(rename = "principalId")]
    pub principal_id: String,
    #[sqlx(rename = "credentialsChangedAt")]
    pub credentials_changed_at: Option<DateTime<Utc>>,
    pub authorities: Vec<String>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        let identity = Identity::new(row.principal_id).with_authorities(row.authorities);
        match row.credentials_changed_at {
            Some(at) => identity.with_credentials_changed_at(at),
            None => identity,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

pub async fn find(db: &PgPool, principal: &str) -> Result<Option<IdentityRow>, RepoError> {
    // The principal keeps the form the token used (id or email), so
    // `verify` compares `sub` against the same string.
    let row = sqlx::query_as::<_, IdentityRow>(
        r#"
        SELECT
            $1::text AS "principalId",
            u."credentialsChangedAt",
            COALESCE(
                array_agg(a."authority") FILTER (WHERE a."authority" IS NOT NULL),
                '{}'
            ) AS authorities
        FROM users u
        LEFT JOIN user_authorities a ON a."userId" = u."userId"
        WHERE u."userId"::text = $1 OR u."email" = $1
        GROUP BY u."userId", u."credentialsChangedAt"
        LIMIT 1
        "#,
    )
    .bind(principal)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn lookup(&self, id: &PrincipalId) -> Result<Option<Identity>, RepoError> {
        let row = find(&self.db, id.as_str()).await?;
        Ok(row.map(Identity::from))
    }
}
