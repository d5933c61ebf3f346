pub mod catalog;
mod course;
mod ids;
mod lesson;
mod lives;
mod user;

pub use catalog::{CatalogStats, default_catalog};
pub use course::{COMPLETE_PROGRESS, Course, CourseError, CourseLevel};
pub use ids::{CourseId, UserId};
pub use lesson::{Lesson, LessonError, LessonLibrary, default_lessons, progress_percent};
pub use lives::{Lives, MAX_LIVES};
pub use user::{User, UserError};
