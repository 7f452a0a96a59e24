use uuid::Uuid;

use super::domain::{Course, Criterion, GradeScaleEntry, Semester, SubItem};

/// Blueprint for freshly created courses: the default criteria split and the
/// thirteen-step plus/minus grade scale.
#[derive(Debug, Clone)]
pub struct CourseTemplate {
    pub credits: f64,
    pub criteria: Vec<(&'static str, f64)>,
    pub grade_scale: Vec<(&'static str, f64)>,
}

impl CourseTemplate {
    pub fn standard() -> Self {
        Self {
            credits: 3.0,
            criteria: vec![("Assignments", 30.0), ("Midterm", 30.0), ("Final Exam", 40.0)],
            grade_scale: vec![
                ("A+", 96.0),
                ("A", 93.0),
                ("A-", 90.0),
                ("B+", 87.0),
                ("B", 83.0),
                ("B-", 80.0),
                ("C+", 77.0),
                ("C", 73.0),
                ("C-", 70.0),
                ("D+", 67.0),
                ("D", 63.0),
                ("D-", 60.0),
                ("F", 0.0),
            ],
        }
    }

    /// Materializes a course from the template, minting fresh identifiers.
    pub fn instantiate(&self, name: impl Into<String>) -> Course {
        Course {
            id: new_entity_id(),
            name: name.into(),
            credits: self.credits,
            criteria: self
                .criteria
                .iter()
                .map(|(criterion_name, weight)| Criterion {
                    id: new_entity_id(),
                    name: (*criterion_name).to_string(),
                    weight: *weight,
                    score: 0.0,
                    sub_items: None,
                })
                .collect(),
            grade_scale: self
                .grade_scale
                .iter()
                .map(|(letter, min)| GradeScaleEntry {
                    letter: (*letter).to_string(),
                    min: *min,
                })
                .collect(),
            collapsed: Some(false),
        }
    }
}

/// Collision-resistant identifier for newly created entities. The engine
/// never generates or validates identifiers; creation happens here, in the
/// caller layer.
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn new_criterion() -> Criterion {
    Criterion {
        id: new_entity_id(),
        name: "New Criterion".to_string(),
        weight: 0.0,
        score: 0.0,
        sub_items: None,
    }
}

pub fn new_sub_item() -> SubItem {
    SubItem {
        id: new_entity_id(),
        name: "Assignment".to_string(),
        score: 0.0,
    }
}

pub fn new_scale_entry() -> GradeScaleEntry {
    GradeScaleEntry {
        letter: "A+".to_string(),
        min: 97.0,
    }
}

/// True when the name still matches the generated `prefix N` pattern.
fn is_generated_name(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// A course the user has not touched yet: generated name and every score
/// still zero (sub-item scores included).
pub fn is_default_course(course: &Course) -> bool {
    let untouched_scores = course.criteria.iter().all(|criterion| {
        match criterion.sub_items.as_deref() {
            Some(items) if !items.is_empty() => items.iter().all(|item| item.score == 0.0),
            _ => criterion.score == 0.0,
        }
    });

    is_generated_name(&course.name, "Course ") && untouched_scores
}

/// A semester the user has not touched yet: generated name and no courses.
pub fn is_default_semester(semester: &Semester) -> bool {
    is_generated_name(&semester.name, "Semester ") && semester.courses.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::engine::{calculate_course_grade, get_letter_grade};

    #[test]
    fn standard_template_weights_sum_to_one_hundred() {
        let template = CourseTemplate::standard();
        let total: f64 = template.criteria.iter().map(|(_, weight)| weight).sum();
        assert_eq!(total, 100.0);
        assert_eq!(template.grade_scale.len(), 13);
    }

    #[test]
    fn instantiated_course_starts_at_zero_and_classifies_f() {
        let course = CourseTemplate::standard().instantiate("Course 1");

        assert_eq!(calculate_course_grade(&course.criteria), 0.0);
        assert_eq!(get_letter_grade(0.0, &course.grade_scale), "F");
        assert_eq!(course.collapsed, Some(false));
    }

    #[test]
    fn instantiation_mints_unique_identifiers() {
        let template = CourseTemplate::standard();
        let a = template.instantiate("Course 1");
        let b = template.instantiate("Course 2");

        assert_ne!(a.id, b.id);
        assert_ne!(a.criteria[0].id, b.criteria[0].id);
    }

    #[test]
    fn default_detection_requires_generated_name_and_untouched_scores() {
        let mut course = CourseTemplate::standard().instantiate("Course 3");
        assert!(is_default_course(&course));

        course.criteria[0].score = 85.0;
        assert!(!is_default_course(&course));

        let renamed = CourseTemplate::standard().instantiate("Organic Chemistry");
        assert!(!is_default_course(&renamed));
    }

    #[test]
    fn default_semester_has_generated_name_and_no_courses() {
        let mut semester = Semester {
            id: new_entity_id(),
            name: "Semester 2".to_string(),
            courses: Vec::new(),
        };
        assert!(is_default_semester(&semester));

        semester.courses.push(CourseTemplate::standard().instantiate("Course 1"));
        assert!(!is_default_semester(&semester));
    }
}
