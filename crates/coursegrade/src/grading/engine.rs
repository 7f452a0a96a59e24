//! The grade computation engine: stateless, synchronous, total functions that
//! turn raw criterion scores into course percentages, letter grades, a
//! semester GPA, and a grade distribution.
//!
//! Degenerate inputs (zero weight totals, empty course lists, empty scales,
//! unknown letters) produce floor values rather than errors so a half-edited
//! gradebook always renders.

use std::collections::HashMap;

use super::domain::{Course, Criterion, GradeScaleEntry};

/// Controls the denominator of the course grade aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightPolicy {
    /// Divide each weighted term by a fixed 100. Criteria weights summing to
    /// less than 100 proportionally lower the result; more than 100 can push
    /// it past 100. This is the historical behavior and the shipping default.
    FixedDenominator,
    /// Divide the weighted sum by the actual weight total, yielding the true
    /// weighted average regardless of how the weights sum.
    Normalized,
}

/// Aggregation policy currently in effect. Switching to
/// [`WeightPolicy::Normalized`] is deliberately a one-line change.
pub const DEFAULT_WEIGHT_POLICY: WeightPolicy = WeightPolicy::FixedDenominator;

/// Reduces a criterion to a single percentage: the unweighted mean of its
/// sub-item scores when any exist, otherwise the criterion's own score.
///
/// An empty sub-item list is treated the same as no sub-items at all, so the
/// fallback is the criterion score and never a mean over zero items.
pub fn resolve_criterion_score(criterion: &Criterion) -> f64 {
    match criterion.sub_items.as_deref() {
        Some(items) if !items.is_empty() => {
            let total: f64 = items.iter().map(|item| item.score).sum();
            total / items.len() as f64
        }
        _ => criterion.score,
    }
}

/// Combines a course's criteria into one overall percentage under the given
/// weight policy. A weight total of exactly zero (including the empty case)
/// yields `0.0`.
pub fn course_grade_with_policy(criteria: &[Criterion], policy: WeightPolicy) -> f64 {
    let total_weight: f64 = criteria.iter().map(|c| c.weight).sum();

    if total_weight == 0.0 {
        return 0.0;
    }

    // Each term carries its own /100, matching the historical computation
    // bit-for-bit under the default policy.
    let weighted_sum: f64 = criteria
        .iter()
        .map(|c| resolve_criterion_score(c) * c.weight / 100.0)
        .sum();

    match policy {
        WeightPolicy::FixedDenominator => weighted_sum,
        WeightPolicy::Normalized => weighted_sum * 100.0 / total_weight,
    }
}

/// Combines a course's criteria into one overall percentage using the default
/// policy. Commutative over the criteria order.
pub fn calculate_course_grade(criteria: &[Criterion]) -> f64 {
    course_grade_with_policy(criteria, DEFAULT_WEIGHT_POLICY)
}

/// Maps a numeric percentage to a letter under the course's scale.
///
/// The scale is sorted by `min` descending (stable, so duplicate thresholds
/// keep their relative input order) and scanned for the first entry whose
/// minimum the grade meets. Grades below every threshold earn the lowest
/// entry's letter; an empty scale earns the literal `"F"`.
pub fn get_letter_grade(numeric_grade: f64, grade_scale: &[GradeScaleEntry]) -> String {
    let mut sorted: Vec<&GradeScaleEntry> = grade_scale.iter().collect();
    sorted.sort_by(|a, b| b.min.total_cmp(&a.min));

    for entry in &sorted {
        if numeric_grade >= entry.min {
            return entry.letter.clone();
        }
    }

    sorted
        .last()
        .map(|entry| entry.letter.clone())
        .unwrap_or_else(|| "F".to_string())
}

/// Maps a letter grade to its point value under the fixed 4.0 table, or
/// `None` for a letter outside the table (e.g., a renamed scale entry).
pub fn grade_points(letter: &str) -> Option<f64> {
    match letter {
        "A+" | "A" => Some(4.0),
        "A-" => Some(3.7),
        "B+" => Some(3.3),
        "B" => Some(3.0),
        "B-" => Some(2.7),
        "C+" => Some(2.3),
        "C" => Some(2.0),
        "C-" => Some(1.7),
        "D+" => Some(1.3),
        "D" => Some(1.0),
        "D-" => Some(0.7),
        "F" => Some(0.0),
        _ => None,
    }
}

/// Maps a letter grade to its point value, collapsing unknown letters to
/// `0.0`. Callers that need to distinguish an earned F from an unmapped
/// letter should use [`grade_points`] instead.
pub fn letter_grade_to_gpa(letter: &str) -> f64 {
    grade_points(letter).unwrap_or(0.0)
}

/// Credit-weighted GPA across a semester's courses, each classified under its
/// own grade scale. Empty course lists and zero total credits yield `0.0`.
pub fn calculate_gpa(courses: &[Course]) -> f64 {
    if courses.is_empty() {
        return 0.0;
    }

    let mut total_points = 0.0;
    let mut total_credits = 0.0;

    for course in courses {
        let numeric_grade = calculate_course_grade(&course.criteria);
        let letter_grade = get_letter_grade(numeric_grade, &course.grade_scale);
        let points = letter_grade_to_gpa(&letter_grade);

        total_points += points * course.credits;
        total_credits += course.credits;
    }

    if total_credits > 0.0 {
        total_points / total_credits
    } else {
        0.0
    }
}

/// Counts courses per achieved letter grade. Letters no course earned do not
/// appear; consumers wanting a canonical A+ through F ordering should re-sort
/// (see the report views).
pub fn calculate_grade_distribution(courses: &[Course]) -> HashMap<String, usize> {
    let mut distribution = HashMap::new();

    for course in courses {
        let numeric_grade = calculate_course_grade(&course.criteria);
        let letter_grade = get_letter_grade(numeric_grade, &course.grade_scale);
        *distribution.entry(letter_grade).or_insert(0) += 1;
    }

    distribution
}
