use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::CourseId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course id cannot be empty")]
    EmptyId,

    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("progress must be between 0 and 100, got {0}")]
    InvalidProgress(u8),

    #[error("duplicate course id: {0}")]
    DuplicateId(CourseId),
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Difficulty band of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CourseLevel::Beginner => "beginner",
            CourseLevel::Intermediate => "intermediate",
            CourseLevel::Advanced => "advanced",
        }
    }

    /// Human-facing badge text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }

    /// Colour of the level badge.
    #[must_use]
    pub fn badge_tone(self) -> &'static str {
        match self {
            CourseLevel::Beginner => "green",
            CourseLevel::Intermediate => "yellow",
            CourseLevel::Advanced => "red",
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// Largest meaningful progress value; reaching it marks the course completed.
pub const COMPLETE_PROGRESS: u8 = 100;

/// A catalog entry plus the user's start/progress state for it.
///
/// `is_started` and `progress` stay optional so untouched catalog entries
/// round-trip through storage without gaining fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CourseRecord")]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    level: CourseLevel,
    image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_started: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<u8>,
}

/// Persisted shape before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseRecord {
    id: CourseId,
    title: String,
    #[serde(default)]
    description: String,
    level: CourseLevel,
    #[serde(default)]
    image: String,
    is_started: Option<bool>,
    progress: Option<u8>,
}

impl TryFrom<CourseRecord> for Course {
    type Error = CourseError;

    fn try_from(record: CourseRecord) -> Result<Self, Self::Error> {
        let mut course = Course::new(
            record.id,
            record.title,
            record.description,
            record.level,
            record.image,
        )?;
        if let Some(progress) = record.progress {
            if progress > COMPLETE_PROGRESS {
                return Err(CourseError::InvalidProgress(progress));
            }
        }
        course.is_started = record.is_started;
        course.progress = record.progress;
        Ok(course)
    }
}

impl Course {
    /// Creates a catalog entry that has not been started.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyId` or `CourseError::EmptyTitle` for blank input.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        level: CourseLevel,
        image: impl Into<String>,
    ) -> Result<Self, CourseError> {
        if id.as_str().trim().is_empty() {
            return Err(CourseError::EmptyId);
        }
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            level,
            image: image.into(),
            is_started: None,
            progress: None,
        })
    }

    /// Sets the initial progress shown before the course is started.
    #[must_use]
    pub(crate) fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress.min(COMPLETE_PROGRESS));
        self
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn level(&self) -> CourseLevel {
        self.level
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.is_started.unwrap_or(false)
    }

    /// Progress percentage. Only meaningful once the course is started.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress.unwrap_or(0)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_started() && self.progress() == COMPLETE_PROGRESS
    }

    /// Marks the course started at 0%. Returns `false` if it already was.
    pub(crate) fn start(&mut self) -> bool {
        if self.is_started() {
            return false;
        }
        self.is_started = Some(true);
        self.progress = Some(0);
        true
    }

    pub(crate) fn set_progress(&mut self, progress: u8) {
        self.is_started = Some(true);
        self.progress = Some(progress.min(COMPLETE_PROGRESS));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Course {
        Course::new(
            CourseId::new("1"),
            "Intro",
            "desc",
            CourseLevel::Beginner,
            "img.png",
        )
        .unwrap()
    }

    #[test]
    fn new_course_is_not_started() {
        let course = sample();
        assert!(!course.is_started());
        assert_eq!(course.progress(), 0);
        assert!(!course.is_completed());
    }

    #[test]
    fn level_badges() {
        assert_eq!(CourseLevel::Intermediate.to_string(), "Intermediate");
        assert_eq!(CourseLevel::Advanced.badge_tone(), "red");
        assert_eq!(
            serde_json::to_string(&CourseLevel::Beginner).unwrap(),
            "\"beginner\""
        );
    }

    #[test]
    fn rejects_blank_title() {
        let err = Course::new(CourseId::new("1"), "  ", "", CourseLevel::Advanced, "").unwrap_err();
        assert_eq!(err, CourseError::EmptyTitle);
    }

    #[test]
    fn start_only_applies_once() {
        let mut course = sample();
        assert!(course.start());
        course.set_progress(67);
        assert!(!course.start());
        assert_eq!(course.progress(), 67);
    }

    #[test]
    fn progress_is_capped_at_complete() {
        let mut course = sample();
        course.set_progress(140);
        assert_eq!(course.progress(), COMPLETE_PROGRESS);
        assert!(course.is_completed());
    }

    #[test]
    fn untouched_course_serializes_without_state_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["level"], "beginner");
        assert!(json.get("isStarted").is_none());
        assert!(json.get("progress").is_none());
    }

    #[test]
    fn started_course_round_trips_camel_case() {
        let raw = r#"{"id":"2","title":"Web","description":"d","level":"intermediate","image":"i","isStarted":true,"progress":33}"#;
        let course: Course = serde_json::from_str(raw).unwrap();
        assert!(course.is_started());
        assert_eq!(course.progress(), 33);
        assert_eq!(course.level(), CourseLevel::Intermediate);
        assert_eq!(serde_json::to_string(&course).unwrap(), raw);
    }

    #[test]
    fn out_of_range_progress_fails_to_load() {
        let raw = r#"{"id":"2","title":"Web","level":"advanced","progress":101}"#;
        assert!(serde_json::from_str::<Course>(raw).is_err());
    }
}
