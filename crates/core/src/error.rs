use thiserror::Error;

use crate::model::{CourseError, LessonError, UserError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    User(#[from] UserError),
}
