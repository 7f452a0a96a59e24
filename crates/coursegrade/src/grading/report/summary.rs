use super::views::{letter_color, CourseBreakdown, DistributionEntry, SemesterSummary, LETTER_ORDER};
use crate::grading::domain::Course;
use crate::grading::engine::{
    calculate_course_grade, calculate_gpa, calculate_grade_distribution, get_letter_grade,
    grade_points,
};

/// Builds the semester rollup: GPA, credit and course totals, and one
/// breakdown line per course in sequence order.
pub fn semester_summary(courses: &[Course]) -> SemesterSummary {
    let breakdown = courses
        .iter()
        .map(|course| {
            let percentage = calculate_course_grade(&course.criteria);
            let letter = get_letter_grade(percentage, &course.grade_scale);
            let color = letter_color(&letter);
            CourseBreakdown {
                course_id: course.id.clone(),
                name: course.name.clone(),
                credits: course.credits,
                percentage,
                grade_points: grade_points(&letter),
                letter,
                color,
            }
        })
        .collect();

    SemesterSummary {
        gpa: calculate_gpa(courses),
        total_credits: courses.iter().map(|c| c.credits).sum(),
        total_courses: courses.len(),
        courses: breakdown,
    }
}

/// Orders the raw distribution counts for display: canonical letters A+
/// through F first, then any custom letters alphabetically. Percentages are
/// shares of the course count.
pub fn distribution_entries(courses: &[Course]) -> Vec<DistributionEntry> {
    let mut counts = calculate_grade_distribution(courses);
    let total = courses.len();

    let mut entries = Vec::with_capacity(counts.len());
    for letter in LETTER_ORDER {
        if let Some(count) = counts.remove(letter) {
            entries.push(make_entry(letter.to_string(), count, total));
        }
    }

    let mut custom: Vec<(String, usize)> = counts.into_iter().collect();
    custom.sort_by(|a, b| a.0.cmp(&b.0));
    for (letter, count) in custom {
        entries.push(make_entry(letter, count, total));
    }

    entries
}

fn make_entry(letter: String, count: usize, total: usize) -> DistributionEntry {
    let percentage = if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    let color = letter_color(&letter);
    DistributionEntry {
        letter,
        count,
        percentage,
        color,
    }
}
