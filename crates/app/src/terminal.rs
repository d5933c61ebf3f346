use std::sync::Mutex;
use std::time::Duration;

use quest_core::model::catalog::{CatalogStats, partition_started};
use quest_core::model::{Course, Lesson, Lives};
use services::{CourseSession, Navigator, Notice, Notifier, Route, Severity};

/// Prints notices and remembers where the app was last sent.
#[derive(Default)]
pub struct Terminal {
    last_route: Mutex<Option<Route>>,
}

impl Terminal {
    /// Take the most recent navigation request, if any.
    pub fn take_route(&self) -> Option<Route> {
        self.last_route
            .lock()
            .map(|mut route| route.take())
            .unwrap_or_default()
    }
}

impl Navigator for Terminal {
    fn navigate(&self, route: Route, delay: Duration) {
        tracing::debug!(%route, ?delay, "navigate");
        if delay.is_zero() {
            println!("-> {route}");
        } else {
            println!("-> {route} (in {}s)", delay.as_secs());
        }
        if let Ok(mut last) = self.last_route.lock() {
            *last = Some(route);
        }
    }
}

impl Notifier for Terminal {
    fn notify(&self, notice: Notice) {
        let marker = match notice.severity {
            Severity::Info => "*",
            Severity::Destructive => "!",
        };
        println!("{marker} {}: {}", notice.title, notice.description);
    }
}

pub fn hearts(lives: Lives) -> String {
    let (filled, empty) = lives.slots();
    let mut out = "♥".repeat(usize::from(filled));
    out.push_str(&"♡".repeat(usize::from(empty)));
    out
}

fn course_line(course: &Course) -> String {
    let level = course.level();
    let mut line = format!(
        "  [{}] {} ({}, {})",
        course.id(),
        course.title(),
        level.label(),
        level.badge_tone()
    );
    if course.is_started() {
        line.push_str(&format!(" {}%", course.progress()));
    }
    line
}

pub fn print_catalog(courses: &[Course]) {
    let (started, fresh) = partition_started(courses);
    if !started.is_empty() {
        println!("In progress:");
        for course in started {
            println!("{}", course_line(course));
        }
    }
    println!("Available:");
    for course in fresh {
        println!("{}", course_line(course));
    }
}

pub fn print_stats(stats: &CatalogStats) {
    println!(
        "Courses: {} total, {} started, {} completed",
        stats.total, stats.started, stats.completed
    );
}

pub fn print_lesson(session: &CourseSession, lesson: &Lesson) {
    let progress = session.runner().progress();
    let index = session.runner().lesson_index().unwrap_or(0);
    println!();
    println!(
        "{} | lesson {}/{} | {:.0}% | {}",
        session.course().title(),
        index + 1,
        progress.total,
        progress.ratio() * 100.0,
        hearts(session.lives())
    );
    println!("== {} ==", lesson.title());
    println!("{}", lesson.content());
    println!();
    println!("{}", lesson.question());
    for (idx, option) in lesson.options().iter().enumerate() {
        println!("  {}) {option}", idx + 1);
    }
}
