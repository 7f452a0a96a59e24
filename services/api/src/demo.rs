use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use coursegrade::config::AppConfig;
use coursegrade::error::AppError;
use coursegrade::grading::persistence::{InMemoryStore, JsonFileStore};
use coursegrade::grading::report::views::{DistributionEntry, SemesterSummary};
use coursegrade::grading::store::{CriterionPatch, GradebookState, SubItemPatch};
use coursegrade::grading::{is_default_course, GradebookService};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the sub-item portion of the scripted session
    #[arg(long)]
    pub(crate) skip_sub_items: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SummaryArgs {
    /// Override the configured gradebook file
    #[arg(long)]
    pub(crate) data_path: Option<PathBuf>,
}

pub(crate) fn run_summary(args: SummaryArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(data_path) = args.data_path {
        config.storage.data_path = data_path;
    }

    let store = Arc::new(JsonFileStore::new(&config.storage.data_path));
    let service = GradebookService::open(store)?;

    let state = service.snapshot()?;
    let Some(semester) = state.active_semester() else {
        println!(
            "No semesters recorded in {}",
            config.storage.data_path.display()
        );
        return Ok(());
    };

    println!("Semester: {}", semester.name);
    let summary = service.active_summary()?;
    let distribution = service.active_distribution()?;
    render_summary(&summary, &distribution);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("CourseGrade editing session demo");

    let service =
        GradebookService::with_state(Arc::new(InMemoryStore::default()), GradebookState::default());

    let semester = service.add_semester()?;
    println!("- Created {}", semester.name);

    let math = service.add_course()?;
    println!(
        "- Added {} ({} criteria, untouched: {})",
        math.name,
        math.criteria.len(),
        is_default_course(&math)
    );
    service.rename_course(&math.id, "Linear Algebra")?;
    for (criterion, score) in math.criteria.iter().zip([94.0, 88.0, 91.0]) {
        service
            .update_criterion(
                &math.id,
                &criterion.id,
                CriterionPatch {
                    score: Some(score),
                    ..CriterionPatch::default()
                },
            )?;
        println!("  - {} scored {:.0}%", criterion.name, score);
    }

    let chem = service.add_course()?;
    service.rename_course(&chem.id, "Chemistry")?;
    if args.skip_sub_items {
        service
            .update_criterion(
                &chem.id,
                &chem.criteria[0].id,
                CriterionPatch {
                    score: Some(82.0),
                    ..CriterionPatch::default()
                },
            )?;
    } else {
        println!("- Tracking Chemistry homework through sub-items");
        for score in [78.0, 84.0, 84.0] {
            let item = service.add_sub_item(&chem.id, &chem.criteria[0].id)?;
            service
                .update_sub_item(
                    &chem.id,
                    &chem.criteria[0].id,
                    &item.id,
                    SubItemPatch {
                        score: Some(score),
                        ..SubItemPatch::default()
                    },
                )?;
            println!("  - {} scored {:.0}%", item.name, score);
        }
    }
    for criterion in &chem.criteria[1..] {
        service
            .update_criterion(
                &chem.id,
                &criterion.id,
                CriterionPatch {
                    score: Some(80.0),
                    ..CriterionPatch::default()
                },
            )?;
    }

    println!();
    let summary = service.active_summary()?;
    let distribution = service.active_distribution()?;
    render_summary(&summary, &distribution);
    Ok(())
}

fn render_summary(summary: &SemesterSummary, distribution: &[DistributionEntry]) {
    println!(
        "GPA {:.2} over {:.1} credits across {} course(s)",
        summary.gpa, summary.total_credits, summary.total_courses
    );
    for line in &summary.courses {
        let points = line
            .grade_points
            .map(|p| format!("{p:.1}"))
            .unwrap_or_else(|| "unmapped".to_string());
        println!(
            "- {}: {:.1}% -> {} ({} grade points, {} credits)",
            line.name, line.percentage, line.letter, points, line.credits
        );
    }
    if !distribution.is_empty() {
        println!("Grade distribution:");
        for entry in distribution {
            println!(
                "  - {}: {} course(s) ({:.0}%)",
                entry.letter, entry.count, entry.percentage
            );
        }
    }
}
