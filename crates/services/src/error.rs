//! Shared error types for the services crate.

use thiserror::Error;

use quest_core::model::{CourseId, LessonError, UserError};
use storage::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `LivesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LivesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Lives(#[from] LivesError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the lesson runner and course sessions.
///
/// The guard variants leave the runner state untouched, so callers can treat
/// them as ignored input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no option selected")]
    NoOptionSelected,
    #[error("option {index} is out of range for {options} options")]
    InvalidOption { index: usize, options: usize },
    #[error("answer already checked for this lesson")]
    AnswerAlreadyChecked,
    #[error("answer has not been checked yet")]
    AnswerNotChecked,
    #[error("no lives remaining")]
    NoLivesRemaining,
    #[error("session already completed")]
    Completed,
    #[error("course {0} not found")]
    CourseNotFound(CourseId),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Lives(#[from] LivesError),
}

impl SessionError {
    /// True for errors that only reject an out-of-order user action.
    #[must_use]
    pub fn is_guard(&self) -> bool {
        matches!(
            self,
            SessionError::NoOptionSelected
                | SessionError::InvalidOption { .. }
                | SessionError::AnswerAlreadyChecked
                | SessionError::AnswerNotChecked
                | SessionError::NoLivesRemaining
                | SessionError::Completed
        )
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
