//! Outbound requests to the presentation layer: navigation and notifications.
//!
//! Services never render anything. They describe where the user should go and
//! what they should be told, and the front-end decides how to show it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use quest_core::model::CourseId;

/// Delay before leaving a session after it ends (completion or no lives).
pub const REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Destinations the engine can send the user to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Courses,
    Course(CourseId),
    Profile,
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_owned(),
            Route::Courses => "/courses".to_owned(),
            Route::Course(id) => format!("/course/{id}"),
            Route::Profile => "/profile".to_owned(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    #[must_use]
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    #[must_use]
    pub fn correct_answer() -> Self {
        Self::info("Correct answer!", "Well done, you got it right!")
    }

    #[must_use]
    pub fn wrong_answer() -> Self {
        Self::destructive("Wrong answer", "Try again on the next question.")
    }

    #[must_use]
    pub fn no_lives_remaining() -> Self {
        Self::destructive(
            "No lives remaining!",
            "You ran out of lives. Come back tomorrow to try again.",
        )
    }

    #[must_use]
    pub fn course_completed() -> Self {
        Self::info("Course completed!", "Congratulations, you finished this course!")
    }

    #[must_use]
    pub fn course_not_found() -> Self {
        Self::info("Course not found", "The requested course could not be found.")
    }

    #[must_use]
    pub fn no_course_started() -> Self {
        Self::info("No course started", "Pick a course to start learning.")
    }

    #[must_use]
    pub fn signed_in() -> Self {
        Self::info("Signed in!", "Welcome back.")
    }

    #[must_use]
    pub fn signed_up() -> Self {
        Self::info("Account created!", "Welcome to QuestLessons.")
    }
}

/// Receives a destination path, optionally after a delay.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route, delay: Duration);
}

/// Shows transient notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Discards every request. Useful for headless tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Navigator for Silent {
    fn navigate(&self, _route: Route, _delay: Duration) {}
}

impl Notifier for Silent {
    fn notify(&self, _notice: Notice) {}
}

/// The pair of collaborators handed to services.
#[derive(Clone)]
pub struct Effects {
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl Effects {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            navigator,
            notifier,
        }
    }

    #[must_use]
    pub fn silent() -> Self {
        Self::new(Arc::new(Silent), Arc::new(Silent))
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route, Duration::ZERO);
    }

    pub fn navigate_after(&self, route: Route, delay: Duration) {
        self.navigator.navigate(route, delay);
    }
}

impl fmt::Debug for Effects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effects").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_render_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Courses.to_string(), "/courses");
        assert_eq!(Route::Course(CourseId::new("3")).path(), "/course/3");
    }

    #[test]
    fn wrong_answer_is_destructive() {
        assert_eq!(Notice::wrong_answer().severity, Severity::Destructive);
        assert_eq!(Notice::correct_answer().severity, Severity::Info);
    }
}
