use std::sync::Arc;

use quest_core::model::catalog;
use quest_core::model::{Course, CourseId, Lesson, LessonLibrary, Lives};

use super::runner::{Advance, AnswerOutcome, LessonRunner, LessonState};
use crate::catalog_service::CatalogService;
use crate::effects::{Effects, Notice, REDIRECT_DELAY, Route};
use crate::error::SessionError;
use crate::lives_service::{LivesService, LivesUpdate};

/// Result of submitting an answer within a course session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub outcome: AnswerOutcome,
    pub lives: Lives,
    /// Set when this answer spent the last life.
    pub exhausted: bool,
}

/// An open course: the runner plus the records it last saw.
#[derive(Debug, Clone)]
pub struct CourseSession {
    runner: LessonRunner,
    course: Course,
    lives: Lives,
}

impl CourseSession {
    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn lives(&self) -> Lives {
        self.lives
    }

    #[must_use]
    pub fn runner(&self) -> &LessonRunner {
        &self.runner
    }

    #[must_use]
    pub fn state(&self) -> LessonState {
        self.runner.state()
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.runner.current_lesson()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.runner.is_complete()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.runner.is_locked()
    }

    /// Choose an option for the current lesson. Nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns the runner's guard errors; see [`LessonRunner::select_option`].
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        self.runner.select_option(option)
    }
}

/// Drives a course session against the catalog and lives services.
#[derive(Clone)]
pub struct CourseSessionService {
    catalog: Arc<CatalogService>,
    lives: Arc<LivesService>,
    library: Arc<LessonLibrary>,
    effects: Effects,
}

impl CourseSessionService {
    #[must_use]
    pub fn new(
        catalog: Arc<CatalogService>,
        lives: Arc<LivesService>,
        library: Arc<LessonLibrary>,
        effects: Effects,
    ) -> Self {
        Self {
            catalog,
            lives,
            library,
            effects,
        }
    }

    /// Open `course_id` at its first lesson.
    ///
    /// An unknown course notifies the user and sends them back to the
    /// catalog. Opening with no lives left returns a locked session and
    /// schedules the same redirect used when lives run out mid-session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::CourseNotFound` for unknown ids, or storage errors.
    pub async fn open_course(&self, course_id: &CourseId) -> Result<CourseSession, SessionError> {
        let courses = self.catalog.load_courses().await?;
        let Some(course) = catalog::find_course(&courses, course_id).cloned() else {
            tracing::warn!(%course_id, "course not found");
            self.effects.navigate(Route::Courses);
            self.effects.notify(Notice::course_not_found());
            return Err(SessionError::CourseNotFound(course_id.clone()));
        };

        let lives = self.lives.get_lives().await?;
        let mut runner = LessonRunner::new(course_id.clone(), self.library.for_course(course_id))?;
        if lives.is_exhausted() {
            runner.lock();
            self.leave_without_lives();
        }

        tracing::debug!(%course_id, lives = lives.count(), "course session opened");
        Ok(CourseSession {
            runner,
            course,
            lives,
        })
    }

    /// Check the selected answer, spending a life when it is wrong.
    ///
    /// The life is charged against today's record, so a session left open
    /// across midnight starts from the refilled allowance. Spending the last
    /// life locks the session, notifies the user and schedules a redirect to
    /// the catalog. If the decrement cannot be persisted the runner is left
    /// as it was, so the answer can be submitted again.
    ///
    /// # Errors
    ///
    /// Returns the runner's guard errors, or `SessionError::Lives` when the
    /// decrement cannot be persisted.
    pub async fn submit_answer(
        &self,
        session: &mut CourseSession,
    ) -> Result<SessionAnswerResult, SessionError> {
        let checkpoint = session.runner.clone();
        let outcome = session.runner.submit_answer()?;
        tracing::debug!(
            course_id = %session.course.id(),
            lesson = outcome.lesson,
            correct = outcome.correct,
            "answer checked"
        );

        if outcome.correct {
            self.effects.notify(Notice::correct_answer());
            return Ok(SessionAnswerResult {
                outcome,
                lives: session.lives,
                exhausted: false,
            });
        }

        let update = match self.spend_life().await {
            Ok(update) => update,
            Err(err) => {
                session.runner = checkpoint;
                return Err(err);
            }
        };
        self.effects.notify(Notice::wrong_answer());
        session.lives = update.lives;
        if update.exhausted {
            session.runner.lock();
            self.leave_without_lives();
        }

        Ok(SessionAnswerResult {
            outcome,
            lives: update.lives,
            exhausted: update.exhausted,
        })
    }

    /// Move past a checked lesson and record the course progress.
    ///
    /// Finishing the last lesson records 100%, notifies the user and
    /// schedules a redirect to the catalog.
    ///
    /// # Errors
    ///
    /// Returns the runner's guard errors, or `SessionError::Catalog` when the
    /// progress cannot be persisted. The runner does not move in that case.
    pub async fn advance(&self, session: &mut CourseSession) -> Result<Advance, SessionError> {
        let checkpoint = session.runner.clone();
        let step = session.runner.advance()?;
        let course_id = session.course.id().clone();

        let courses = match self
            .catalog
            .record_progress(&course_id, step.progress())
            .await
        {
            Ok(courses) => courses,
            Err(err) => {
                session.runner = checkpoint;
                return Err(err.into());
            }
        };
        if let Some(course) = catalog::find_course(&courses, &course_id) {
            session.course = course.clone();
        }

        if step.is_completed() {
            tracing::info!(%course_id, "course completed");
            self.effects.notify(Notice::course_completed());
            self.effects.navigate_after(Route::Courses, REDIRECT_DELAY);
        }
        Ok(step)
    }

    async fn spend_life(&self) -> Result<LivesUpdate, SessionError> {
        let current = self.lives.get_lives().await?;
        Ok(self.lives.decrement_lives(current).await?)
    }

    fn leave_without_lives(&self) {
        self.effects.notify(Notice::no_lives_remaining());
        self.effects.navigate_after(Route::Courses, REDIRECT_DELAY);
    }
}
