use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::QuestionKind;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) given_name: Option<String>,
    pub(crate) family_name: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

/// One entry per non-empty page, recording where that page's text landed in
/// the concatenated document buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct PageCitation {
    pub(crate) page_number: i64,
    pub(crate) raw_text: String,
    pub(crate) line_start: i64,
    pub(crate) line_end: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Document {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) storage_path: String,
    pub(crate) uploaded_by: i64,
    pub(crate) extracted_text: String,
    pub(crate) page_citations: Json<Vec<PageCitation>>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: i64,
    pub(crate) document_id: i64,
    pub(crate) title: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Question {
    pub(crate) id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) question_text: String,
    pub(crate) question_type: QuestionKind,
    pub(crate) options: Option<Json<Vec<String>>>,
    pub(crate) correct_answer: String,
    pub(crate) hint: String,
    pub(crate) citation: String,
    pub(crate) points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) user_id: i64,
    pub(crate) total_score: i64,
    pub(crate) max_score: i64,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Answer {
    pub(crate) id: i64,
    pub(crate) submission_id: i64,
    pub(crate) question_id: i64,
    pub(crate) user_answer: String,
    pub(crate) is_correct: bool,
    pub(crate) points_earned: i64,
}
