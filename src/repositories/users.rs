use sqlx::SqlitePool;

use crate::db::models::User;

const COLUMNS: &str = "id, email, given_name, family_name, created_at";

pub(crate) async fn find_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_id_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub email: &'a str,
    pub given_name: Option<&'a str>,
    pub family_name: Option<&'a str>,
    pub created_at: time::PrimitiveDateTime,
}

/// Returns the existing row for the email when present, otherwise inserts a
/// new one. Login is an upsert keyed on email.
pub(crate) async fn find_or_create(
    pool: &SqlitePool,
    params: CreateUser<'_>,
) -> Result<User, sqlx::Error> {
    if let Some(existing) = find_by_email(pool, params.email).await? {
        return Ok(existing);
    }

    let result = sqlx::query(
        "INSERT INTO users (email, given_name, family_name, created_at)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(params.email)
    .bind(params.given_name)
    .bind(params.family_name)
    .bind(params.created_at)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(result.last_insert_rowid())
        .fetch_one(pool)
        .await
}
