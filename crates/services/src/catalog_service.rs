use std::sync::Arc;

use quest_core::model::catalog::{self, CatalogStats};
use quest_core::model::{Course, CourseId, default_catalog};
use storage::records::save_json;
use storage::{KeyValueStore, StoreKey};

use crate::effects::{Effects, Notice, Route};
use crate::error::CatalogError;
use crate::events::{StateChange, StateEvents};
use crate::stored::load_or_absent;

/// Owns the `courses` slot: loading, seeding, starting and progress.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn KeyValueStore>,
    events: StateEvents,
    effects: Effects,
}

impl CatalogService {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, events: StateEvents, effects: Effects) -> Self {
        Self {
            store,
            events,
            effects,
        }
    }

    /// Load the catalog, seeding the static defaults on first use.
    ///
    /// An empty, malformed, or id-colliding stored catalog is replaced by the
    /// defaults as well.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the store cannot be read or written.
    pub async fn load_courses(&self) -> Result<Vec<Course>, CatalogError> {
        let stored: Option<Vec<Course>> =
            load_or_absent(self.store.as_ref(), StoreKey::Courses).await?;

        match stored {
            Some(courses) if !courses.is_empty() => match catalog::ensure_unique_ids(&courses) {
                Ok(()) => return Ok(courses),
                Err(err) => tracing::warn!(%err, "stored catalog is inconsistent, reseeding"),
            },
            _ => tracing::debug!("seeding default catalog"),
        }

        let defaults = default_catalog();
        self.save_courses(&defaults).await?;
        Ok(defaults)
    }

    /// Persist the full catalog and notify subscribers.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the write fails.
    pub async fn save_courses(&self, courses: &[Course]) -> Result<(), CatalogError> {
        save_json(self.store.as_ref(), StoreKey::Courses, courses).await?;
        self.events
            .publish(StateChange::CoursesChanged(courses.to_vec()));
        Ok(())
    }

    /// Mark `id` started in `courses`. No-op when already started or unknown.
    ///
    /// The caller persists the returned sequence.
    #[must_use]
    pub fn start_course(&self, courses: &[Course], id: &CourseId) -> Vec<Course> {
        catalog::start_course(courses, id)
    }

    /// Set progress on `id` and mark it started, leaving other entries untouched.
    #[must_use]
    pub fn update_progress(&self, courses: &[Course], id: &CourseId, progress: u8) -> Vec<Course> {
        catalog::update_progress(courses, id, progress)
    }

    /// Load, start `id`, and persist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CourseNotFound` for unknown ids, or storage errors.
    pub async fn start_course_persisted(&self, id: &CourseId) -> Result<Vec<Course>, CatalogError> {
        let courses = self.load_courses().await?;
        let course = catalog::find_course(&courses, id)
            .ok_or_else(|| CatalogError::CourseNotFound(id.clone()))?;
        if course.is_started() {
            return Ok(courses);
        }

        let updated = catalog::start_course(&courses, id);
        self.save_courses(&updated).await?;
        tracing::info!(course_id = %id, "course started");
        Ok(updated)
    }

    /// Start `id` and send the user into it.
    ///
    /// An unknown id notifies the user and sends them back to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CourseNotFound` for unknown ids, or storage errors.
    pub async fn play_course(&self, id: &CourseId) -> Result<Vec<Course>, CatalogError> {
        let courses = match self.start_course_persisted(id).await {
            Ok(courses) => courses,
            Err(err @ CatalogError::CourseNotFound(_)) => {
                tracing::warn!(course_id = %id, "course not found");
                self.effects.notify(Notice::course_not_found());
                self.effects.navigate(Route::Courses);
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        self.effects.navigate(Route::Course(id.clone()));
        Ok(courses)
    }

    /// Load, set progress on `id`, and persist.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CourseNotFound` for unknown ids, or storage errors.
    pub async fn record_progress(
        &self,
        id: &CourseId,
        progress: u8,
    ) -> Result<Vec<Course>, CatalogError> {
        let courses = self.load_courses().await?;
        if catalog::find_course(&courses, id).is_none() {
            return Err(CatalogError::CourseNotFound(id.clone()));
        }

        let updated = catalog::update_progress(&courses, id, progress);
        self.save_courses(&updated).await?;
        tracing::debug!(course_id = %id, progress, "progress recorded");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::CourseNotFound` for unknown ids, or storage errors.
    pub async fn find_course(&self, id: &CourseId) -> Result<Course, CatalogError> {
        let courses = self.load_courses().await?;
        catalog::find_course(&courses, id)
            .cloned()
            .ok_or_else(|| CatalogError::CourseNotFound(id.clone()))
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog cannot be loaded.
    pub async fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let courses = self.load_courses().await?;
        Ok(CatalogStats::from_courses(&courses))
    }

    /// Send the user to the started course with the least progress, or to the
    /// catalog with a hint when nothing has been started yet.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the catalog cannot be loaded.
    pub async fn resume(&self) -> Result<Route, CatalogError> {
        let courses = self.load_courses().await?;
        let route = match catalog::resume_candidate(&courses) {
            Some(course) => Route::Course(course.id().clone()),
            None => {
                self.effects.notify(Notice::no_course_started());
                Route::Courses
            }
        };
        self.effects.navigate(route.clone());
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use storage::InMemoryStore;
    use storage::records::load_json;

    fn service(store: &InMemoryStore) -> CatalogService {
        CatalogService::new(
            Arc::new(store.clone()),
            StateEvents::new(),
            Effects::silent(),
        )
    }

    #[tokio::test]
    async fn fresh_load_seeds_and_persists_defaults() {
        let store = InMemoryStore::new();
        let courses = service(&store).load_courses().await.unwrap();
        assert_eq!(courses, default_catalog());

        let persisted: Vec<Course> = load_json(&store, StoreKey::Courses)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(persisted, default_catalog());
    }

    #[tokio::test]
    async fn stored_catalog_is_returned_as_is() {
        let store = InMemoryStore::new();
        let started = catalog::start_course(&default_catalog(), &CourseId::new("2"));
        save_json(&store, StoreKey::Courses, started.as_slice())
            .await
            .unwrap();

        let courses = service(&store).load_courses().await.unwrap();
        assert_eq!(courses, started);
    }

    #[tokio::test]
    async fn empty_or_malformed_catalog_is_reseeded() {
        let store = InMemoryStore::new();
        let svc = service(&store);

        store.set(StoreKey::Courses, "[]".into()).await.unwrap();
        assert_eq!(svc.load_courses().await.unwrap(), default_catalog());

        store
            .set(StoreKey::Courses, "{\"id\":".into())
            .await
            .unwrap();
        assert_eq!(svc.load_courses().await.unwrap(), default_catalog());
    }

    #[tokio::test]
    async fn start_course_persisted_is_idempotent() {
        let store = InMemoryStore::new();
        let svc = service(&store);
        let id = CourseId::new("5");

        let once = svc.start_course_persisted(&id).await.unwrap();
        let twice = svc.start_course_persisted(&id).await.unwrap();
        assert_eq!(once, twice);
        assert!(catalog::find_course(&twice, &id).unwrap().is_started());
    }

    #[tokio::test]
    async fn record_progress_rejects_unknown_course() {
        let store = InMemoryStore::new();
        let err = service(&store)
            .record_progress(&CourseId::new("nope"), 33)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::CourseNotFound(_)));
    }

    #[tokio::test]
    async fn stats_count_started_and_completed() {
        let store = InMemoryStore::new();
        let svc = service(&store);
        svc.record_progress(&CourseId::new("1"), 100).await.unwrap();
        svc.record_progress(&CourseId::new("2"), 33).await.unwrap();

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.total, 6);
        assert_eq!(stats.started, 2);
        assert_eq!(stats.completed, 1);
    }

    #[tokio::test]
    async fn resume_picks_least_progressed_course() {
        let store = InMemoryStore::new();
        let svc = service(&store);
        assert_eq!(svc.resume().await.unwrap(), Route::Courses);

        svc.record_progress(&CourseId::new("1"), 67).await.unwrap();
        svc.record_progress(&CourseId::new("4"), 33).await.unwrap();
        assert_eq!(
            svc.resume().await.unwrap(),
            Route::Course(CourseId::new("4"))
        );
    }
}
