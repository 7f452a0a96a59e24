use serde::Serialize;

/// Canonical display ordering for the standard letters, best grade first.
pub const LETTER_ORDER: [&str; 13] = [
    "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
];

/// Chart color for a letter grade; custom letters get the neutral gray.
pub fn letter_color(letter: &str) -> &'static str {
    match letter {
        "A+" => "#10b981",
        "A" => "#22c55e",
        "A-" => "#84cc16",
        "B+" => "#a3e635",
        "B" => "#eab308",
        "B-" => "#f59e0b",
        "C+" => "#f97316",
        "C" => "#fb923c",
        "C-" => "#fdba74",
        "D+" => "#f87171",
        "D" => "#ef4444",
        "D-" => "#dc2626",
        "F" => "#b91c1c",
        _ => "#6b7280",
    }
}

/// Per-course line of the semester summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseBreakdown {
    pub course_id: String,
    pub name: String,
    pub credits: f64,
    /// Overall course percentage under the shipping weight policy.
    pub percentage: f64,
    pub letter: String,
    /// `None` when the letter falls outside the fixed point table, so
    /// callers can tell an unmapped letter from an earned F.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade_points: Option<f64>,
    pub color: &'static str,
}

/// Semester-level rollup mirroring the GPA summary card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterSummary {
    pub gpa: f64,
    pub total_credits: f64,
    pub total_courses: usize,
    pub courses: Vec<CourseBreakdown>,
}

/// One bar of the distribution chart: achieved letters only, canonical
/// ordering, share of the course total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub letter: String,
    pub count: usize,
    pub percentage: f64,
    pub color: &'static str,
}
