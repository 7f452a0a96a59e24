use serde::{Deserialize, Serialize};

/// One individually graded instance (a single homework, quiz, or lab) whose
/// equal-weight mean substitutes for its parent criterion's own score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubItem {
    pub id: String,
    pub name: String,
    /// Percentage score. The engine accepts any value; range limits are a UI
    /// concern.
    pub score: f64,
}

/// A named, weighted grading component of a course (e.g., "Midterm").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: String,
    pub name: String,
    /// Weight in percentage points. Intended to sum to 100 across a course,
    /// but the engine does not enforce this.
    pub weight: f64,
    /// Percentage score, authoritative only when `sub_items` is absent or
    /// empty.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<SubItem>>,
}

/// One threshold of a course's letter-grade scale: the minimum percentage
/// (inclusive) required to earn `letter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeScaleEntry {
    pub letter: String,
    pub min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    /// Credit hours. Non-negative by convention; may be zero or fractional.
    pub credits: f64,
    pub criteria: Vec<Criterion>,
    pub grade_scale: Vec<GradeScaleEntry>,
    /// Presentation-only card collapse state, carried for round-trip
    /// fidelity. Irrelevant to grade computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl Course {
    /// Sub-items present and non-empty make the criterion's own score inert;
    /// this mirrors the resolver's source-of-truth rule for display code.
    pub fn criterion(&self, criterion_id: &str) -> Option<&Criterion> {
        self.criteria.iter().find(|c| c.id == criterion_id)
    }
}

/// An ordered collection of courses; the unit over which GPA is aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub id: String,
    pub name: String,
    pub courses: Vec<Course>,
}

/// Persisted UI theme preference. Opaque to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_semester() -> Semester {
        Semester {
            id: "sem-1".to_string(),
            name: "Fall 2025".to_string(),
            courses: vec![
                Course {
                    id: "course-1".to_string(),
                    name: "Linear Algebra".to_string(),
                    credits: 3.0,
                    criteria: vec![
                        Criterion {
                            id: "crit-1".to_string(),
                            name: "Homework".to_string(),
                            weight: 40.0,
                            score: 0.0,
                            sub_items: Some(vec![SubItem {
                                id: "sub-1".to_string(),
                                name: "HW 1".to_string(),
                                score: 95.0,
                            }]),
                        },
                        Criterion {
                            id: "crit-2".to_string(),
                            name: "Final".to_string(),
                            weight: 60.0,
                            score: 88.0,
                            sub_items: None,
                        },
                    ],
                    grade_scale: vec![
                        GradeScaleEntry {
                            letter: "A".to_string(),
                            min: 90.0,
                        },
                        GradeScaleEntry {
                            letter: "F".to_string(),
                            min: 0.0,
                        },
                    ],
                    collapsed: Some(false),
                },
                Course {
                    id: "course-2".to_string(),
                    name: "Chemistry".to_string(),
                    credits: 4.0,
                    criteria: Vec::new(),
                    grade_scale: Vec::new(),
                    collapsed: None,
                },
            ],
        }
    }

    #[test]
    fn semester_round_trips_through_json() {
        let semester = sample_semester();
        let encoded = serde_json::to_string(&semester).expect("serializes");
        let decoded: Semester = serde_json::from_str(&encoded).expect("deserializes");
        assert_eq!(decoded, semester);
    }

    #[test]
    fn wire_shape_uses_camel_case_and_omits_absent_optionals() {
        let semester = sample_semester();
        let value = serde_json::to_value(&semester).expect("serializes");

        let course_1 = &value["courses"][0];
        assert!(course_1.get("gradeScale").is_some());
        assert_eq!(course_1["collapsed"], serde_json::json!(false));
        assert!(course_1["criteria"][0].get("subItems").is_some());
        assert!(course_1["criteria"][1].get("subItems").is_none());

        let course_2 = &value["courses"][1];
        assert!(course_2.get("collapsed").is_none());
    }

    #[test]
    fn theme_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Theme::Dark).expect("serializes"),
            "\"dark\""
        );
        let theme: Theme = serde_json::from_str("\"light\"").expect("deserializes");
        assert_eq!(theme, Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }
}
