use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::db::models::{Document, PageCitation};

const COLUMNS: &str =
    "id, title, storage_path, uploaded_by, extracted_text, page_citations, created_at";

pub(crate) struct CreateDocument<'a> {
    pub title: &'a str,
    pub storage_path: &'a str,
    pub uploaded_by: i64,
    pub extracted_text: &'a str,
    pub page_citations: &'a [PageCitation],
    pub created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateDocument<'_>,
) -> Result<Document, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO documents (
            title, storage_path, uploaded_by, extracted_text, page_citations, created_at
        ) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(params.title)
    .bind(params.storage_path)
    .bind(params.uploaded_by)
    .bind(params.extracted_text)
    .bind(Json(params.page_citations))
    .bind(params.created_at)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, Document>(&format!("SELECT {COLUMNS} FROM documents WHERE id = $1"))
        .bind(result.last_insert_rowid())
        .fetch_one(pool)
        .await
}
