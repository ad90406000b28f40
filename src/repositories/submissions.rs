use sqlx::SqlitePool;

use crate::db::models::{Answer, Submission};

const COLUMNS: &str = "id, quiz_id, user_id, total_score, max_score, created_at";

const ANSWER_COLUMNS: &str =
    "id, submission_id, question_id, user_answer, is_correct, points_earned";

#[derive(Debug, Clone)]
pub(crate) struct GradedAnswer {
    pub(crate) question_id: i64,
    pub(crate) user_answer: String,
    pub(crate) is_correct: bool,
    pub(crate) points_earned: i64,
}

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_answers(
    pool: &SqlitePool,
    submission_id: i64,
) -> Result<Vec<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(&format!(
        "SELECT {ANSWER_COLUMNS} FROM answers WHERE submission_id = $1 ORDER BY id"
    ))
    .bind(submission_id)
    .fetch_all(pool)
    .await
}

/// Records a graded submission in one transaction. The submission row starts
/// with a zero total, the answer rows are inserted, and the total is written
/// in a single final update.
pub(crate) async fn record(
    pool: &SqlitePool,
    quiz_id: i64,
    user_id: i64,
    max_score: i64,
    answers: &[GradedAnswer],
    created_at: time::PrimitiveDateTime,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO submissions (quiz_id, user_id, total_score, max_score, created_at)
         VALUES ($1, $2, 0, $3, $4)",
    )
    .bind(quiz_id)
    .bind(user_id)
    .bind(max_score)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;

    let submission_id = result.last_insert_rowid();

    let mut total_score = 0i64;
    for answer in answers {
        total_score += answer.points_earned;

        sqlx::query(
            "INSERT INTO answers (
                submission_id, question_id, user_answer, is_correct, points_earned
            ) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(submission_id)
        .bind(answer.question_id)
        .bind(&answer.user_answer)
        .bind(answer.is_correct)
        .bind(answer.points_earned)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE submissions SET total_score = $1 WHERE id = $2")
        .bind(total_score)
        .bind(submission_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(submission_id)
}
