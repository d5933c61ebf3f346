#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod catalog_service;
pub mod effects;
pub mod error;
pub mod events;
pub mod lives_service;
pub mod sessions;
mod stored;

pub use quest_core::Clock;

pub use app_services::AppServices;
pub use auth_service::{AuthService, Profile};
pub use catalog_service::CatalogService;
pub use effects::{Effects, Navigator, Notice, Notifier, REDIRECT_DELAY, Route, Severity};
pub use error::{AppServicesError, AuthError, CatalogError, LivesError, SessionError};
pub use events::{StateChange, StateEvents};
pub use lives_service::{LivesService, LivesUpdate};
pub use sessions::{
    Advance, AnswerOutcome, CourseSession, CourseSessionService, LessonRunner, LessonState,
    SessionAnswerResult, SessionProgress,
};
