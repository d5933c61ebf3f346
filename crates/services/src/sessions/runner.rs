use std::sync::Arc;

use quest_core::model::{CourseId, Lesson, LessonError, progress_percent};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Where the runner is within the lesson sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonState {
    Presenting { lesson: usize },
    AnswerSelected { lesson: usize, option: usize },
    AnswerChecked { lesson: usize, option: usize, correct: bool },
    Completed,
}

/// Outcome of checking the selected option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub lesson: usize,
    pub option: usize,
    pub correct: bool,
}

/// Result of moving past a checked lesson, with the course progress to record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { lesson: usize, progress: u8 },
    Completed { progress: u8 },
}

impl Advance {
    #[must_use]
    pub fn progress(self) -> u8 {
        match self {
            Advance::Next { progress, .. } | Advance::Completed { progress } => progress,
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Advance::Completed { .. })
    }
}

//
// ─── RUNNER ────────────────────────────────────────────────────────────────────
//

/// Linear quiz over a course's lessons.
///
/// Pure in-memory state; persistence of lives and progress is handled by
/// [`super::CourseSessionService`]. Rejected transitions return a guard
/// `SessionError` and leave the state untouched.
#[derive(Debug, Clone)]
pub struct LessonRunner {
    course_id: CourseId,
    lessons: Arc<[Lesson]>,
    state: LessonState,
    locked: bool,
}

impl LessonRunner {
    /// Start at the first lesson.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Lesson(LessonError::EmptyPlan)` for an empty plan.
    pub fn new(course_id: CourseId, lessons: Arc<[Lesson]>) -> Result<Self, SessionError> {
        if lessons.is_empty() {
            return Err(LessonError::EmptyPlan.into());
        }
        Ok(Self {
            course_id,
            lessons,
            state: LessonState::Presenting { lesson: 0 },
            locked: false,
        })
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn state(&self) -> LessonState {
        self.state
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.lessons.len()
    }

    /// Index of the lesson on screen; `None` once completed.
    #[must_use]
    pub fn lesson_index(&self) -> Option<usize> {
        match self.state {
            LessonState::Presenting { lesson }
            | LessonState::AnswerSelected { lesson, .. }
            | LessonState::AnswerChecked { lesson, .. } => Some(lesson),
            LessonState::Completed => None,
        }
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.lesson_index().map(|idx| &self.lessons[idx])
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        match self.state {
            LessonState::AnswerSelected { option, .. }
            | LessonState::AnswerChecked { option, .. } => Some(option),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_last_lesson(&self) -> bool {
        self.lesson_index() == Some(self.lessons.len() - 1)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state == LessonState::Completed
    }

    /// Whether interaction is blocked because no lives remain.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Block every further transition.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.lessons.len();
        let checked = match self.state {
            LessonState::Presenting { lesson } | LessonState::AnswerSelected { lesson, .. } => {
                lesson
            }
            LessonState::AnswerChecked { lesson, .. } => lesson + 1,
            LessonState::Completed => total,
        };
        SessionProgress {
            total,
            answered: checked,
            remaining: total - checked,
            is_complete: self.is_complete(),
        }
    }

    fn guard(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.locked {
            return Err(SessionError::NoLivesRemaining);
        }
        Ok(())
    }

    /// Pick (or change) the option for the current lesson.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AnswerAlreadyChecked` after submission,
    /// `SessionError::InvalidOption` for an index past the options, and
    /// `Completed` / `NoLivesRemaining` when the session no longer accepts input.
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        self.guard()?;
        let lesson = match self.state {
            LessonState::Presenting { lesson } | LessonState::AnswerSelected { lesson, .. } => {
                lesson
            }
            LessonState::AnswerChecked { .. } => return Err(SessionError::AnswerAlreadyChecked),
            LessonState::Completed => return Err(SessionError::Completed),
        };

        let options = self.lessons[lesson].options().len();
        if option >= options {
            return Err(SessionError::InvalidOption {
                index: option,
                options,
            });
        }

        self.state = LessonState::AnswerSelected { lesson, option };
        Ok(())
    }

    /// Check the selected option against the lesson's answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoOptionSelected` with nothing selected,
    /// `SessionError::AnswerAlreadyChecked` on a second submit, and
    /// `Completed` / `NoLivesRemaining` when input is closed.
    pub fn submit_answer(&mut self) -> Result<AnswerOutcome, SessionError> {
        self.guard()?;
        let LessonState::AnswerSelected { lesson, option } = self.state else {
            return Err(match self.state {
                LessonState::AnswerChecked { .. } => SessionError::AnswerAlreadyChecked,
                LessonState::Completed => SessionError::Completed,
                _ => SessionError::NoOptionSelected,
            });
        };

        let correct = self.lessons[lesson].is_correct(option);
        self.state = LessonState::AnswerChecked {
            lesson,
            option,
            correct,
        };
        Ok(AnswerOutcome {
            lesson,
            option,
            correct,
        })
    }

    /// Move past a checked lesson.
    ///
    /// Progress after finishing lesson `i` of `n` is `round((i + 1) / n * 100)`;
    /// the last lesson always yields 100 and completes the runner.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AnswerNotChecked` before submission, and
    /// `Completed` / `NoLivesRemaining` when input is closed.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        self.guard()?;
        let LessonState::AnswerChecked { lesson, .. } = self.state else {
            return Err(SessionError::AnswerNotChecked);
        };

        let total = self.lessons.len();
        let finished = lesson + 1;
        if finished >= total {
            self.state = LessonState::Completed;
            return Ok(Advance::Completed {
                progress: progress_percent(total, total),
            });
        }

        self.state = LessonState::Presenting { lesson: finished };
        Ok(Advance::Next {
            lesson: finished,
            progress: progress_percent(finished, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::model::default_lessons;

    fn runner() -> LessonRunner {
        LessonRunner::new(CourseId::new("1"), default_lessons().into()).unwrap()
    }

    fn answer(runner: &mut LessonRunner, option: usize) -> AnswerOutcome {
        runner.select_option(option).unwrap();
        runner.submit_answer().unwrap()
    }

    #[test]
    fn starts_presenting_first_lesson() {
        let runner = runner();
        assert_eq!(runner.state(), LessonState::Presenting { lesson: 0 });
        assert_eq!(runner.current_lesson().unwrap().title(), "Introduction");
        assert_eq!(runner.total_lessons(), 3);
    }

    #[test]
    fn empty_plan_is_rejected() {
        let err = LessonRunner::new(CourseId::new("1"), Vec::<Lesson>::new().into()).unwrap_err();
        assert!(matches!(err, SessionError::Lesson(LessonError::EmptyPlan)));
    }

    #[test]
    fn submit_without_selection_is_guarded() {
        let mut runner = runner();
        assert!(matches!(
            runner.submit_answer(),
            Err(SessionError::NoOptionSelected)
        ));
        assert_eq!(runner.state(), LessonState::Presenting { lesson: 0 });
    }

    #[test]
    fn reselecting_before_submit_replaces_choice() {
        let mut runner = runner();
        runner.select_option(0).unwrap();
        runner.select_option(1).unwrap();
        assert_eq!(runner.selected_option(), Some(1));
        assert!(runner.submit_answer().unwrap().correct);
    }

    #[test]
    fn selection_after_check_is_ignored() {
        let mut runner = runner();
        let outcome = answer(&mut runner, 3);
        assert!(!outcome.correct);

        assert!(matches!(
            runner.select_option(1),
            Err(SessionError::AnswerAlreadyChecked)
        ));
        assert!(matches!(
            runner.submit_answer(),
            Err(SessionError::AnswerAlreadyChecked)
        ));
        assert_eq!(
            runner.state(),
            LessonState::AnswerChecked {
                lesson: 0,
                option: 3,
                correct: false
            }
        );
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut runner = runner();
        assert!(matches!(
            runner.select_option(4),
            Err(SessionError::InvalidOption {
                index: 4,
                options: 4
            })
        ));
        assert_eq!(runner.selected_option(), None);
    }

    #[test]
    fn advance_requires_checked_answer() {
        let mut runner = runner();
        runner.select_option(1).unwrap();
        assert!(matches!(
            runner.advance(),
            Err(SessionError::AnswerNotChecked)
        ));
    }

    #[test]
    fn progress_steps_through_thirds() {
        let mut runner = runner();
        let mut progress = Vec::new();
        for correct in [1, 2, 1] {
            answer(&mut runner, correct);
            progress.push(runner.advance().unwrap());
        }

        assert_eq!(
            progress,
            vec![
                Advance::Next {
                    lesson: 1,
                    progress: 33
                },
                Advance::Next {
                    lesson: 2,
                    progress: 67
                },
                Advance::Completed { progress: 100 },
            ]
        );
        assert!(runner.is_complete());
        assert!(matches!(runner.advance(), Err(SessionError::Completed)));
        assert!(matches!(runner.select_option(0), Err(SessionError::Completed)));
    }

    #[test]
    fn advancing_resets_selection() {
        let mut runner = runner();
        answer(&mut runner, 1);
        runner.advance().unwrap();
        assert_eq!(runner.selected_option(), None);
        assert!(!runner.is_last_lesson());
    }

    #[test]
    fn lock_blocks_every_transition() {
        let mut runner = runner();
        runner.select_option(0).unwrap();
        runner.lock();

        assert!(matches!(
            runner.submit_answer(),
            Err(SessionError::NoLivesRemaining)
        ));
        assert!(matches!(
            runner.select_option(1),
            Err(SessionError::NoLivesRemaining)
        ));
        assert!(matches!(
            runner.advance(),
            Err(SessionError::NoLivesRemaining)
        ));
        assert_eq!(runner.selected_option(), Some(0));
    }

    #[test]
    fn progress_bar_counts_checked_lessons() {
        let mut runner = runner();
        assert_eq!(runner.progress().answered, 0);
        answer(&mut runner, 1);
        let progress = runner.progress();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert!(!progress.is_complete);
    }
}
