use sqlx::types::Json;
use sqlx::SqlitePool;

use crate::db::models::{Question, Quiz};
use crate::services::question_gen::GeneratedQuestion;

const QUIZ_COLUMNS: &str = "id, document_id, title, created_at";

const QUESTION_COLUMNS: &str = "\
    id, quiz_id, question_text, question_type, options, correct_answer, \
    hint, citation, points";

pub(crate) async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_questions(
    pool: &SqlitePool,
    quiz_id: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = $1 ORDER BY id"
    ))
    .bind(quiz_id)
    .fetch_all(pool)
    .await
}

/// Inserts the quiz row and all of its questions in one transaction, so a
/// quiz is never visible without its questions.
pub(crate) async fn create_with_questions(
    pool: &SqlitePool,
    document_id: i64,
    title: &str,
    questions: &[GeneratedQuestion],
    created_at: time::PrimitiveDateTime,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO quizzes (document_id, title, created_at) VALUES ($1, $2, $3)",
    )
    .bind(document_id)
    .bind(title)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;

    let quiz_id = result.last_insert_rowid();

    for question in questions {
        sqlx::query(
            "INSERT INTO questions (
                quiz_id, question_text, question_type, options,
                correct_answer, hint, citation, points
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(quiz_id)
        .bind(&question.question_text)
        .bind(question.question_type)
        .bind(question.options.as_ref().map(Json))
        .bind(&question.correct_answer)
        .bind(&question.hint)
        .bind(&question.citation)
        .bind(question.points)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(quiz_id)
}
