use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::config::Settings;
use crate::services::google_auth::GoogleAuthService;
use crate::services::question_gen::QuestionGenService;
use crate::services::storage::StorageService;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: SqlitePool,
    storage: StorageService,
    generator: QuestionGenService,
    google: GoogleAuthService,
}

impl AppState {
    pub(crate) fn new(
        settings: Settings,
        db: SqlitePool,
        storage: StorageService,
        generator: QuestionGenService,
        google: GoogleAuthService,
    ) -> Self {
        Self { inner: Arc::new(InnerState { settings, db, storage, generator, google }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    pub(crate) fn storage(&self) -> &StorageService {
        &self.inner.storage
    }

    pub(crate) fn generator(&self) -> &QuestionGenService {
        &self.inner.generator
    }

    pub(crate) fn google(&self) -> &GoogleAuthService {
        &self.inner.google
    }
}
