//! Pure operations over the ordered course catalog.
//!
//! Every operation takes the current sequence and returns a new one; the
//! caller decides when to persist it.

use std::collections::HashSet;

use crate::model::course::{Course, CourseError, CourseLevel};
use crate::model::ids::CourseId;

/// Marks the matching course started at 0% progress.
///
/// Courses that are already started, and unknown ids, leave the sequence unchanged.
#[must_use]
pub fn start_course(courses: &[Course], id: &CourseId) -> Vec<Course> {
    courses
        .iter()
        .map(|course| {
            let mut course = course.clone();
            if course.id() == id {
                course.start();
            }
            course
        })
        .collect()
}

/// Sets progress on the matching course and marks it started.
///
/// All other courses are returned untouched.
#[must_use]
pub fn update_progress(courses: &[Course], id: &CourseId, progress: u8) -> Vec<Course> {
    courses
        .iter()
        .map(|course| {
            let mut course = course.clone();
            if course.id() == id {
                course.set_progress(progress);
            }
            course
        })
        .collect()
}

#[must_use]
pub fn find_course<'a>(courses: &'a [Course], id: &CourseId) -> Option<&'a Course> {
    courses.iter().find(|course| course.id() == id)
}

/// Splits the catalog into (started, not started), preserving order.
#[must_use]
pub fn partition_started(courses: &[Course]) -> (Vec<&Course>, Vec<&Course>) {
    courses.iter().partition(|course| course.is_started())
}

/// The started course with the least progress; ties go to the earliest entry.
#[must_use]
pub fn resume_candidate(courses: &[Course]) -> Option<&Course> {
    courses
        .iter()
        .filter(|course| course.is_started())
        .min_by_key(|course| course.progress())
}

/// Checks that no two courses share an id.
///
/// # Errors
///
/// Returns `CourseError::DuplicateId` naming the first repeated id.
pub fn ensure_unique_ids(courses: &[Course]) -> Result<(), CourseError> {
    let mut seen = HashSet::with_capacity(courses.len());
    for course in courses {
        if !seen.insert(course.id()) {
            return Err(CourseError::DuplicateId(course.id().clone()));
        }
    }
    Ok(())
}

/// Aggregate counts shown on the profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogStats {
    pub total: usize,
    pub started: usize,
    pub completed: usize,
}

impl CatalogStats {
    #[must_use]
    pub fn from_courses(courses: &[Course]) -> Self {
        Self {
            total: courses.len(),
            started: courses.iter().filter(|c| c.is_started()).count(),
            completed: courses.iter().filter(|c| c.is_completed()).count(),
        }
    }
}

/// The static catalog written on first use.
#[must_use]
pub fn default_catalog() -> Vec<Course> {
    const ENTRIES: [(&str, &str, &str, CourseLevel, &str); 6] = [
        (
            "1",
            "Introduction to Programming",
            "Learn the fundamentals of programming through practical examples and interactive activities.",
            CourseLevel::Beginner,
            "https://images.unsplash.com/photo-1542831371-29b0f74f9713?q=80&w=500&auto=format&fit=crop",
        ),
        (
            "2",
            "Responsive Web Design",
            "Build sites that adapt to any device, from desktop to mobile.",
            CourseLevel::Intermediate,
            "https://images.unsplash.com/photo-1507238691740-187a5b1d37b8?q=80&w=500&auto=format&fit=crop",
        ),
        (
            "3",
            "Artificial Intelligence",
            "Explore the foundations of AI and build intelligent systems and machine learning algorithms.",
            CourseLevel::Advanced,
            "https://images.unsplash.com/photo-1677442136019-21780ecad495?q=80&w=500&auto=format&fit=crop",
        ),
        (
            "4",
            "Mobile Development",
            "Create iOS and Android applications with modern tooling.",
            CourseLevel::Intermediate,
            "https://images.unsplash.com/photo-1526498460520-4c246339dccb?q=80&w=500&auto=format&fit=crop",
        ),
        (
            "5",
            "SQL Databases",
            "Learn to create and manage relational databases using SQL.",
            CourseLevel::Beginner,
            "https://images.unsplash.com/photo-1544383835-bda2bc66a55d?q=80&w=500&auto=format&fit=crop",
        ),
        (
            "6",
            "DevOps & Cloud Computing",
            "Understand CI/CD pipelines and how to run infrastructure in the cloud.",
            CourseLevel::Advanced,
            "https://images.unsplash.com/photo-1579403124614-197f69d8187b?q=80&w=500&auto=format&fit=crop",
        ),
    ];

    ENTRIES
        .into_iter()
        .filter_map(|(id, title, description, level, image)| {
            Course::new(CourseId::new(id), title, description, level, image).ok()
        })
        .map(|course| course.with_progress(0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> CourseId {
        CourseId::new(raw)
    }

    #[test]
    fn default_catalog_has_six_unique_unstarted_courses() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 6);
        assert!(ensure_unique_ids(&catalog).is_ok());
        assert!(catalog.iter().all(|c| !c.is_started() && c.progress() == 0));
    }

    #[test]
    fn start_course_is_idempotent() {
        let catalog = default_catalog();
        let once = start_course(&catalog, &id("2"));
        let twice = start_course(&once, &id("2"));
        assert_eq!(once, twice);
        assert!(find_course(&once, &id("2")).unwrap().is_started());
    }

    #[test]
    fn start_course_keeps_existing_progress() {
        let catalog = update_progress(&default_catalog(), &id("3"), 67);
        let restarted = start_course(&catalog, &id("3"));
        assert_eq!(find_course(&restarted, &id("3")).unwrap().progress(), 67);
    }

    #[test]
    fn start_course_ignores_unknown_id() {
        let catalog = default_catalog();
        assert_eq!(start_course(&catalog, &id("missing")), catalog);
    }

    #[test]
    fn update_progress_touches_only_the_target() {
        let catalog = default_catalog();
        let updated = update_progress(&catalog, &id("4"), 33);

        for (before, after) in catalog.iter().zip(&updated) {
            if before.id() == &id("4") {
                assert!(after.is_started());
                assert_eq!(after.progress(), 33);
            } else {
                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn partition_and_stats_follow_started_flag() {
        let catalog = update_progress(&default_catalog(), &id("1"), 100);
        let catalog = start_course(&catalog, &id("5"));

        let (started, not_started) = partition_started(&catalog);
        assert_eq!(started.len(), 2);
        assert_eq!(not_started.len(), 4);
        assert_eq!(started[0].id(), &id("1"));

        let stats = CatalogStats::from_courses(&catalog);
        assert_eq!(
            stats,
            CatalogStats {
                total: 6,
                started: 2,
                completed: 1
            }
        );
    }

    #[test]
    fn resume_candidate_prefers_least_progress() {
        assert!(resume_candidate(&default_catalog()).is_none());

        let catalog = update_progress(&default_catalog(), &id("2"), 67);
        let catalog = update_progress(&catalog, &id("3"), 33);
        let catalog = update_progress(&catalog, &id("6"), 33);
        assert_eq!(resume_candidate(&catalog).unwrap().id(), &id("3"));
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let mut catalog = default_catalog();
        catalog.push(catalog[0].clone());
        assert_eq!(
            ensure_unique_ids(&catalog),
            Err(CourseError::DuplicateId(id("1")))
        );
    }
}
