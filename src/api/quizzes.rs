use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::{format_primitive, primitive_now_utc};
use crate::repositories;
use crate::schemas::quiz::{
    AnswerResult, PdfUploadRequest, PdfUploadResponse, QuestionResponse, QuizResponse,
    QuizSubmissionRequest, QuizSubmissionResponse, QuizSummary,
};
use crate::services::{grading, pdf_extract};


pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_pdf))
        .route("/quiz/:quiz_id", get(get_quiz))
        .route("/quiz/:quiz_id/submit", post(submit_quiz))
        .route("/quizzes", get(list_user_quizzes))
}

/// Full upload pipeline: decode the PDF, store it, extract text and
/// citations, generate questions, and persist the quiz.
async fn upload_pdf(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(payload): Json<PdfUploadRequest>,
) -> Result<(StatusCode, Json<PdfUploadResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let pdf_bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.file_content.as_bytes())
        .map_err(|e| ApiError::internal_with_cause(e, "Failed to decode uploaded file"))?;

    if pdf_bytes.len() as u64 > state.storage().max_upload_size() {
        return Err(ApiError::BadRequest("Uploaded file is too large".to_string()));
    }

    let stored = state
        .storage()
        .save_pdf(&pdf_bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store uploaded file"))?;

    tracing::info!(
        path = %stored.path,
        size = stored.size,
        sha256 = %stored.sha256,
        "Stored uploaded PDF"
    );

    let extracted = pdf_extract::extract(&pdf_bytes)
        .map_err(|e| ApiError::internal_with_cause(e, "Failed to process PDF document"))?;

    let now = primitive_now_utc();
    let document = repositories::documents::create(
        state.db(),
        repositories::documents::CreateDocument {
            title: payload.title.trim(),
            storage_path: &stored.path,
            uploaded_by: user_id,
            extracted_text: &extracted.text,
            page_citations: &extracted.citations,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save document"))?;

    let questions = state.generator().generate(&extracted.text).await;
    if questions.is_empty() {
        return Err(ApiError::Internal("Failed to generate quiz questions".to_string()));
    }

    let quiz_title = format!("Quiz: {}", payload.title.trim());
    let quiz_id = repositories::quizzes::create_with_questions(
        state.db(),
        document.id,
        &quiz_title,
        &questions,
        now,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save quiz"))?;

    let persisted = repositories::quizzes::list_questions(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;
    tracing::info!(quiz_id, questions = persisted.len(), "Quiz generated");

    // The returned id addresses the quiz so the client can fetch it directly.
    let response = PdfUploadResponse {
        id: quiz_id,
        title: quiz_title,
        message: format!("PDF uploaded and quiz generated successfully! Quiz ID: {quiz_id}"),
    };

    Ok((StatusCode::OK, Json(response)))
}

async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    let questions = repositories::quizzes::list_questions(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;

    let response = QuizResponse {
        id: quiz.id,
        document_id: quiz.document_id,
        title: quiz.title,
        questions: questions.into_iter().map(QuestionResponse::from).collect(),
        created_at: format_primitive(quiz.created_at),
    };

    Ok(Json(response))
}

async fn submit_quiz(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<QuizSubmissionRequest>,
) -> Result<Json<QuizSubmissionResponse>, ApiError> {
    if payload.quiz_id != quiz_id {
        return Err(ApiError::BadRequest("Quiz ID mismatch".to_string()));
    }

    let quiz = repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz"))?;

    if quiz.is_none() {
        return Err(ApiError::NotFound("Quiz not found".to_string()));
    }

    let questions = repositories::quizzes::list_questions(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load quiz questions"))?;

    let max_score: i64 = questions.iter().map(|question| question.points).sum();

    let mut graded = Vec::new();
    let mut results = Vec::new();

    // Entries without a question id or answer, and entries pointing at
    // questions from another quiz, are dropped rather than rejected.
    for entry in &payload.answers {
        let (Some(question_id), Some(answer)) = (entry.question_id, entry.answer.as_deref())
        else {
            continue;
        };

        let Some(question) = questions.iter().find(|question| question.id == question_id) else {
            continue;
        };

        let is_correct =
            grading::is_answer_correct(question.question_type, answer, &question.correct_answer);
        let points_earned = if is_correct { question.points } else { 0 };

        graded.push(repositories::submissions::GradedAnswer {
            question_id,
            user_answer: answer.to_string(),
            is_correct,
            points_earned,
        });

        results.push(AnswerResult {
            question_id,
            user_answer: answer.to_string(),
            correct_answer: question.correct_answer.clone(),
            is_correct,
            citation: question.citation.clone(),
            points_earned,
            total_points: question.points,
        });
    }

    let submission_id = repositories::submissions::record(
        state.db(),
        quiz_id,
        user_id,
        max_score,
        &graded,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save submission"))?;

    let total_score: i64 = graded.iter().map(|answer| answer.points_earned).sum();

    Ok(Json(QuizSubmissionResponse {
        submission_id,
        results,
        total_score,
        max_score,
        percentage: grading::percentage(total_score, max_score),
    }))
}

async fn list_user_quizzes(
    CurrentUser(_user_id): CurrentUser,
) -> Result<Json<Vec<QuizSummary>>, ApiError> {
    // Per-user quiz history is not tracked yet, so the list is empty.
    Ok(Json(Vec::new()))
}
