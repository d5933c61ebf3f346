use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::model::ids::CourseId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("correct answer index {index} is out of range for {options} options")]
    AnswerOutOfRange { index: usize, options: usize },

    #[error("a course needs at least one lesson")]
    EmptyPlan,
}

/// One quiz step: some reading followed by a single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    title: String,
    content: String,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl Lesson {
    /// # Errors
    ///
    /// Returns `LessonError` if the title is blank, fewer than two options are
    /// given, or `correct_answer` does not index into `options`.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        if options.len() < 2 {
            return Err(LessonError::TooFewOptions(options.len()));
        }
        if correct_answer >= options.len() {
            return Err(LessonError::AnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        Ok(Self {
            title,
            content: content.into(),
            question: question.into(),
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }
}

/// Percentage of `completed` out of `total`, rounded half-up.
///
/// Matches `round((completed / total) * 100)`; `total == 0` reports 100.
#[must_use]
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let completed = completed.min(total);
    // (200k + n) / 2n == floor(100k/n + 1/2)
    let pct = (200 * completed + total) / (2 * total);
    u8::try_from(pct).unwrap_or(100)
}

/// The three-step lesson set every course shares unless overridden.
#[must_use]
pub fn default_lessons() -> Vec<Lesson> {
    let raw: [(&str, &str, &str, [&str; 4], usize); 3] = [
        (
            "Introduction",
            "Welcome to the course! In this lesson we explore the basic concepts.",
            "What is the main goal of this course?",
            [
                "Learn advanced programming",
                "Understand the basic concepts",
                "Build complex applications",
                "None of the above",
            ],
            1,
        ),
        (
            "Core Concepts",
            "Now we dig into the fundamental concepts you need to master.",
            "Which of these is a fundamental concept?",
            [
                "Advanced debugging",
                "Database optimization",
                "Data structures",
                "Microservice development",
            ],
            2,
        ),
        (
            "Hands-on Practice",
            "Let's put what we've learned so far into practice with an exercise.",
            "What is the best way to apply what you have learned?",
            [
                "Read more theory",
                "Do practical exercises",
                "Watch more videos",
                "Discuss with other students",
            ],
            1,
        ),
    ];

    raw.into_iter()
        .filter_map(|(title, content, question, options, answer)| {
            Lesson::new(
                title,
                content,
                question,
                options.iter().map(|o| (*o).to_owned()).collect(),
                answer,
            )
            .ok()
        })
        .collect()
}

/// Lesson content keyed by course, with a shared fallback plan.
#[derive(Debug, Clone)]
pub struct LessonLibrary {
    fallback: Arc<[Lesson]>,
    by_course: HashMap<CourseId, Arc<[Lesson]>>,
}

impl Default for LessonLibrary {
    fn default() -> Self {
        Self {
            fallback: default_lessons().into(),
            by_course: HashMap::new(),
        }
    }
}

impl LessonLibrary {
    /// Builds a library whose fallback plan is `lessons`.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyPlan` if `lessons` is empty.
    pub fn with_fallback(lessons: Vec<Lesson>) -> Result<Self, LessonError> {
        if lessons.is_empty() {
            return Err(LessonError::EmptyPlan);
        }
        Ok(Self {
            fallback: lessons.into(),
            by_course: HashMap::new(),
        })
    }

    /// Registers a course-specific plan, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyPlan` if `lessons` is empty.
    pub fn insert(&mut self, course_id: CourseId, lessons: Vec<Lesson>) -> Result<(), LessonError> {
        if lessons.is_empty() {
            return Err(LessonError::EmptyPlan);
        }
        self.by_course.insert(course_id, lessons.into());
        Ok(())
    }

    /// Lessons for `course_id`, or the shared plan when none were registered.
    #[must_use]
    pub fn for_course(&self, course_id: &CourseId) -> Arc<[Lesson]> {
        self.by_course
            .get(course_id)
            .map_or_else(|| Arc::clone(&self.fallback), Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_matches_rounded_ratio() {
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(3, 3), 100);
        assert_eq!(progress_percent(1, 8), 13);
        assert_eq!(progress_percent(0, 5), 0);
    }

    #[test]
    fn progress_handles_degenerate_totals() {
        assert_eq!(progress_percent(0, 0), 100);
        assert_eq!(progress_percent(5, 3), 100);
    }

    #[test]
    fn default_plan_has_three_valid_lessons() {
        let lessons = default_lessons();
        assert_eq!(lessons.len(), 3);
        assert_eq!(
            lessons.iter().map(Lesson::correct_answer).collect::<Vec<_>>(),
            vec![1, 2, 1]
        );
    }

    #[test]
    fn rejects_out_of_range_answer() {
        let err = Lesson::new("t", "", "q", vec!["a".into(), "b".into()], 2).unwrap_err();
        assert_eq!(err, LessonError::AnswerOutOfRange { index: 2, options: 2 });
    }

    #[test]
    fn library_falls_back_to_shared_plan() {
        let mut library = LessonLibrary::default();
        let custom =
            Lesson::new("Only", "", "Pick b", vec!["a".into(), "b".into()], 1).unwrap();
        library.insert(CourseId::new("9"), vec![custom.clone()]).unwrap();

        assert_eq!(library.for_course(&CourseId::new("9")).as_ref(), &[custom]);
        assert_eq!(library.for_course(&CourseId::new("1")).len(), 3);
        assert_eq!(
            library.insert(CourseId::new("2"), Vec::new()),
            Err(LessonError::EmptyPlan)
        );
    }
}
