use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::Question;
use crate::db::types::QuestionKind;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PdfUploadRequest {
    #[validate(length(min = 1, max = 255, message = "title must be 1..=255 characters"))]
    pub(crate) title: String,
    /// Base64-encoded PDF bytes.
    #[validate(length(min = 1, message = "file_content must not be empty"))]
    pub(crate) file_content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PdfUploadResponse {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: i64,
    pub(crate) question_text: String,
    pub(crate) question_type: QuestionKind,
    pub(crate) options: Option<Vec<String>>,
    pub(crate) hint: String,
    pub(crate) citation: String,
    pub(crate) points: i64,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text,
            question_type: question.question_type,
            options: question.options.map(|options| options.0),
            hint: question.hint,
            citation: question.citation,
            points: question.points,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: i64,
    pub(crate) document_id: i64,
    pub(crate) title: String,
    pub(crate) questions: Vec<QuestionResponse>,
    pub(crate) created_at: String,
}

/// One answer in a submission. Fields are optional so that malformed
/// entries can be dropped instead of failing the whole request.
#[derive(Debug, Deserialize)]
pub(crate) struct AnswerEntry {
    #[serde(default)]
    pub(crate) question_id: Option<i64>,
    #[serde(default)]
    pub(crate) answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizSubmissionRequest {
    pub(crate) quiz_id: i64,
    #[serde(default)]
    pub(crate) answers: Vec<AnswerEntry>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerResult {
    pub(crate) question_id: i64,
    pub(crate) user_answer: String,
    pub(crate) correct_answer: String,
    pub(crate) is_correct: bool,
    pub(crate) citation: String,
    pub(crate) points_earned: i64,
    pub(crate) total_points: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizSubmissionResponse {
    pub(crate) submission_id: i64,
    pub(crate) results: Vec<AnswerResult>,
    pub(crate) total_score: i64,
    pub(crate) max_score: i64,
    pub(crate) percentage: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizSummary {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) created_at: String,
}
