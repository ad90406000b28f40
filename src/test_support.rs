use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, state::AppState, time::primitive_now_utc};
use crate::db::models::User;
use crate::db::types::QuestionKind;
use crate::repositories;
use crate::services::google_auth::GoogleAuthService;
use crate::services::question_gen::{GeneratedQuestion, QuestionGenService};
use crate::services::storage::StorageService;

const TEST_DATABASE_URL: &str = "sqlite::memory:";
// Unroutable base url so generation never leaves the process in tests.
const TEST_OPENAI_BASE_URL: &str = "http://localhost:9";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("PDFQUIZ_ENV", "test");
    std::env::set_var("PDFQUIZ_STRICT_CONFIG", "0");
    std::env::set_var("DATABASE_URL", TEST_DATABASE_URL);
    std::env::set_var("OPENAI_API_KEY", "test-key");
    std::env::set_var("OPENAI_BASE_URL", TEST_OPENAI_BASE_URL);
    std::env::set_var("AI_REQUEST_TIMEOUT", "1");
    std::env::set_var("GOOGLE_CLIENT_ID", "test-client-id");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    std::env::set_var(
        "UPLOAD_DIR",
        std::env::temp_dir().join("pdfquiz-test-uploads").to_str().expect("upload dir"),
    );
}

/// Builds an application over a fresh in-memory database. Callers hold the
/// env lock and call `set_test_env` first.
pub(crate) async fn setup_test_context() -> TestContext {
    let settings = Settings::load().expect("settings");

    let db = crate::db::init_pool(&settings).await.expect("db pool");
    crate::db::run_migrations(&db).await.expect("migrations");

    let storage = StorageService::from_settings(&settings).expect("storage service");
    let generator = QuestionGenService::from_settings(&settings).expect("question generator");
    let google = GoogleAuthService::from_settings(&settings);

    let state = AppState::new(settings, db, storage, generator, google);
    let app = api::router::router(state.clone());

    TestContext { state, app }
}

pub(crate) async fn insert_user(pool: &SqlitePool, email: &str) -> User {
    repositories::users::find_or_create(
        pool,
        repositories::users::CreateUser {
            email,
            given_name: Some("Test"),
            family_name: Some("User"),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert user")
}

pub(crate) async fn insert_document(pool: &SqlitePool, uploaded_by: i64, title: &str) -> i64 {
    let document = repositories::documents::create(
        pool,
        repositories::documents::CreateDocument {
            title,
            storage_path: "uploads/test.pdf",
            uploaded_by,
            extracted_text: "Sample extracted text",
            page_citations: &[],
            created_at: primitive_now_utc(),
        },
    )
    .await
    .expect("insert document");

    document.id
}

pub(crate) fn sample_questions() -> Vec<GeneratedQuestion> {
    vec![
        GeneratedQuestion {
            question_text: "What is the capital of France?".to_string(),
            question_type: QuestionKind::Mcq,
            options: Some(vec![
                "Paris".to_string(),
                "London".to_string(),
                "Berlin".to_string(),
                "Madrid".to_string(),
            ]),
            correct_answer: "Paris".to_string(),
            hint: "It is on the Seine".to_string(),
            citation: "Page 1, Lines 1-3".to_string(),
            points: 1,
        },
        GeneratedQuestion {
            question_text: "Summarize the passage about ownership".to_string(),
            question_type: QuestionKind::ShortAnswer,
            options: None,
            correct_answer: "ownership and borrowing rules".to_string(),
            hint: "Think about who holds the value".to_string(),
            citation: "Page 2, Lines 4-9".to_string(),
            points: 1,
        },
    ]
}

pub(crate) async fn insert_quiz_with_questions(
    pool: &SqlitePool,
    document_id: i64,
    title: &str,
    questions: &[GeneratedQuestion],
) -> i64 {
    repositories::quizzes::create_with_questions(
        pool,
        document_id,
        title,
        questions,
        primitive_now_utc(),
    )
    .await
    .expect("insert quiz")
}

/// Builds a minimal one-page PDF whose content stream draws `text`, suitable
/// for driving the upload pipeline end to end.
pub(crate) fn pdf_with_text(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id =
        doc.add_object(Stream::new(dictionary! {}, content.encode().expect("encode content")));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("serialize pdf");
    bytes
}

pub(crate) fn bearer_token(user_id: i64) -> String {
    user_id.to_string()
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
