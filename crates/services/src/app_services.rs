use std::sync::Arc;

use quest_core::model::LessonLibrary;
use storage::{KeyValueStore, Storage};

use crate::Clock;
use crate::auth_service::AuthService;
use crate::catalog_service::CatalogService;
use crate::effects::Effects;
use crate::error::AppServicesError;
use crate::events::StateEvents;
use crate::lives_service::LivesService;
use crate::sessions::CourseSessionService;

/// Assembles app-facing services over one shared store.
#[derive(Clone)]
pub struct AppServices {
    events: StateEvents,
    lives: Arc<LivesService>,
    catalog: Arc<CatalogService>,
    auth: Arc<AuthService>,
    sessions: Arc<CourseSessionService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        effects: Effects,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(
            &storage,
            clock,
            effects,
            LessonLibrary::default(),
        ))
    }

    /// Build services over an in-memory store.
    #[must_use]
    pub fn in_memory(clock: Clock, effects: Effects) -> Self {
        Self::from_storage(
            &Storage::in_memory(),
            clock,
            effects,
            LessonLibrary::default(),
        )
    }

    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        effects: Effects,
        library: LessonLibrary,
    ) -> Self {
        let events = StateEvents::new();
        let kv: Arc<dyn KeyValueStore> = Arc::clone(&storage.kv);

        let lives = Arc::new(LivesService::new(clock, Arc::clone(&kv), events.clone()));
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&kv),
            events.clone(),
            effects.clone(),
        ));
        let auth = Arc::new(AuthService::new(
            kv,
            Arc::clone(&lives),
            events.clone(),
            effects.clone(),
        ));
        let sessions = Arc::new(CourseSessionService::new(
            Arc::clone(&catalog),
            Arc::clone(&lives),
            Arc::new(library),
            effects,
        ));

        Self {
            events,
            lives,
            catalog,
            auth,
            sessions,
        }
    }

    #[must_use]
    pub fn events(&self) -> &StateEvents {
        &self.events
    }

    #[must_use]
    pub fn lives(&self) -> Arc<LivesService> {
        Arc::clone(&self.lives)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<CourseSessionService> {
        Arc::clone(&self.sessions)
    }
}
