use std::sync::Arc;

use coursegrade::grading::persistence::InMemoryStore;
use coursegrade::grading::store::{CriterionPatch, GradebookState, SubItemPatch};
use coursegrade::grading::{is_default_course, is_default_semester, GradebookService};

fn service_with_store() -> (Arc<InMemoryStore>, GradebookService<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let service = GradebookService::with_state(store.clone(), GradebookState::default());
    (store, service)
}

#[test]
fn full_semester_edit_session_rolls_up_to_gpa_and_distribution() {
    let (_, service) = service_with_store();

    let semester = service.add_semester().expect("semester created");
    assert!(is_default_semester(
        service
            .snapshot()
            .expect("snapshot")
            .semesters
            .iter()
            .find(|s| s.id == semester.id)
            .expect("semester present")
    ));

    // First course: straight criterion scores averaging to an A- band grade.
    let math = service.add_course().expect("course created");
    assert!(is_default_course(&math));
    service
        .rename_course(&math.id, "Linear Algebra")
        .expect("course exists");
    for criterion in &math.criteria {
        service
            .update_criterion(
                &math.id,
                &criterion.id,
                CriterionPatch {
                    score: Some(91.0),
                    ..CriterionPatch::default()
                },
            )
            .expect("criterion exists");
    }

    // Second course: homework tracked through sub-items.
    let chem = service.add_course().expect("course created");
    service
        .rename_course(&chem.id, "Chemistry")
        .expect("course exists");
    let homework = chem.criteria[0].clone();
    for score in [70.0, 80.0, 90.0] {
        let item = service
            .add_sub_item(&chem.id, &homework.id)
            .expect("criterion exists");
        service
            .update_sub_item(
                &chem.id,
                &homework.id,
                &item.id,
                SubItemPatch {
                    score: Some(score),
                    ..SubItemPatch::default()
                },
            )
            .expect("sub-item exists");
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
            )
            .expect("criterion exists");
    }

    let summary = service.active_summary().expect("summary builds");
    assert_eq!(summary.total_courses, 2);
    assert_eq!(summary.total_credits, 6.0);

    let math_line = &summary.courses[0];
    assert_eq!(math_line.name, "Linear Algebra");
    assert!((math_line.percentage - 91.0).abs() < 1e-9);
    assert_eq!(math_line.letter, "A-");

    // Chemistry: homework mean 80 at weight 30, plus 80s at weights 30/40.
    let chem_line = &summary.courses[1];
    assert_eq!(chem_line.percentage, 80.0);
    assert_eq!(chem_line.letter, "B-");

    // A- (3.7) and B- (2.7) at 3 credits each.
    assert!((summary.gpa - 3.2).abs() < 1e-12);

    let distribution = service.active_distribution().expect("distribution builds");
    let letters: Vec<&str> = distribution.iter().map(|e| e.letter.as_str()).collect();
    assert_eq!(letters, vec!["A-", "B-"]);
    assert_eq!(distribution[0].percentage, 50.0);
}

#[test]
fn distinct_semesters_keep_independent_course_lists() {
    let (_, service) = service_with_store();

    let fall = service.add_semester().expect("semester created");
    service.add_course().expect("course created");

    let spring = service.add_semester().expect("semester created");
    assert_eq!(
        service
            .snapshot()
            .expect("snapshot")
            .active_semester_id
            .as_deref(),
        Some(spring.id.as_str())
    );

    // The new semester starts empty even though fall has a course.
    let summary = service.active_summary().expect("summary builds");
    assert_eq!(summary.total_courses, 0);
    assert_eq!(summary.gpa, 0.0);

    service
        .set_active_semester(&fall.id)
        .expect("semester exists");
    let summary = service.active_summary().expect("summary builds");
    assert_eq!(summary.total_courses, 1);
}

#[test]
fn session_survives_a_service_restart() {
    let (store, service) = service_with_store();

    service.add_semester().expect("semester created");
    let course = service.add_course().expect("course created");
    service
        .update_criterion(
            &course.id,
            &course.criteria[0].id,
            CriterionPatch {
                score: Some(100.0),
                ..CriterionPatch::default()
            },
        )
        .expect("criterion exists");
    service.toggle_theme().expect("theme toggles");
    drop(service);

    let restored = GradebookService::open(store).expect("session restores");
    let state = restored.snapshot().expect("snapshot");
    assert_eq!(state.semesters.len(), 1);
    assert_eq!(state.semesters[0].courses[0].criteria[0].score, 100.0);
    assert_eq!(state.theme.label(), "dark");
}
