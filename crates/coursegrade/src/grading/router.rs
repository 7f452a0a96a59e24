use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Course, GradeScaleEntry};
use super::persistence::KeyValueStore;
use super::service::{GradebookService, ServiceError};
use super::store::{CriterionPatch, StoreError};

/// Router builder exposing the gradebook session over JSON endpoints.
pub fn gradebook_router<S>(service: Arc<GradebookService<S>>) -> Router
where
    S: KeyValueStore + 'static,
{
    Router::new()
        .route("/api/v1/gradebook", get(snapshot_handler::<S>))
        .route("/api/v1/semesters", post(add_semester_handler::<S>))
        .route(
            "/api/v1/semesters/:semester_id",
            put(rename_semester_handler::<S>).delete(delete_semester_handler::<S>),
        )
        .route(
            "/api/v1/semesters/:semester_id/activate",
            post(activate_semester_handler::<S>),
        )
        .route("/api/v1/courses", post(add_course_handler::<S>))
        .route(
            "/api/v1/courses/:course_id",
            put(update_course_handler::<S>).delete(delete_course_handler::<S>),
        )
        .route(
            "/api/v1/courses/:course_id/grade-scale",
            put(replace_scale_handler::<S>),
        )
        .route(
            "/api/v1/courses/:course_id/criteria",
            post(add_criterion_handler::<S>),
        )
        .route(
            "/api/v1/courses/:course_id/criteria/:criterion_id",
            patch(update_criterion_handler::<S>).delete(delete_criterion_handler::<S>),
        )
        .route("/api/v1/summary", get(summary_handler::<S>))
        .route("/api/v1/ui/theme/toggle", post(toggle_theme_handler::<S>))
        .route("/api/v1/ui/sidebar", put(sidebar_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct RenameRequest {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SidebarRequest {
    collapsed: bool,
}

fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Store(StoreError::NoActiveSemester) => StatusCode::CONFLICT,
        ServiceError::Store(_) => StatusCode::NOT_FOUND,
        ServiceError::Storage(_) | ServiceError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

async fn snapshot_handler<S>(State(service): State<Arc<GradebookService<S>>>) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.snapshot() {
        Ok(state) => (StatusCode::OK, Json(state)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn add_semester_handler<S>(State(service): State<Arc<GradebookService<S>>>) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.add_semester() {
        Ok(semester) => (StatusCode::CREATED, Json(semester)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn rename_semester_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path(semester_id): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.rename_semester(&semester_id, &request.name) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_semester_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path(semester_id): Path<String>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.delete_semester(&semester_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn activate_semester_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path(semester_id): Path<String>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.set_active_semester(&semester_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn add_course_handler<S>(State(service): State<Arc<GradebookService<S>>>) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.add_course() {
        Ok(course) => (StatusCode::CREATED, Json(course)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_course_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path(course_id): Path<String>,
    Json(course): Json<Course>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.update_course(&course_id, course) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_course_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path(course_id): Path<String>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.delete_course(&course_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn replace_scale_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path(course_id): Path<String>,
    Json(scale): Json<Vec<GradeScaleEntry>>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.replace_grade_scale(&course_id, scale) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn add_criterion_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path(course_id): Path<String>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.add_criterion(&course_id) {
        Ok(criterion) => (StatusCode::CREATED, Json(criterion)).into_response(),
        Err(err) => error_response(err),
    }
}

async fn update_criterion_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path((course_id, criterion_id)): Path<(String, String)>,
    Json(patch): Json<CriterionPatch>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.update_criterion(&course_id, &criterion_id, patch) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn delete_criterion_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Path((course_id, criterion_id)): Path<(String, String)>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.delete_criterion(&course_id, &criterion_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

async fn summary_handler<S>(State(service): State<Arc<GradebookService<S>>>) -> Response
where
    S: KeyValueStore + 'static,
{
    let summary = match service.active_summary() {
        Ok(summary) => summary,
        Err(err) => return error_response(err),
    };
    let distribution = match service.active_distribution() {
        Ok(distribution) => distribution,
        Err(err) => return error_response(err),
    };

    (
        StatusCode::OK,
        Json(json!({
            "summary": summary,
            "distribution": distribution,
        })),
    )
        .into_response()
}

async fn toggle_theme_handler<S>(State(service): State<Arc<GradebookService<S>>>) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.toggle_theme() {
        Ok(theme) => (StatusCode::OK, Json(json!({ "theme": theme.label() }))).into_response(),
        Err(err) => error_response(err),
    }
}

async fn sidebar_handler<S>(
    State(service): State<Arc<GradebookService<S>>>,
    Json(request): Json<SidebarRequest>,
) -> Response
where
    S: KeyValueStore + 'static,
{
    match service.set_sidebar_collapsed(request.collapsed) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::persistence::InMemoryStore;
    use crate::grading::store::GradebookState;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_service() -> Arc<GradebookService<InMemoryStore>> {
        Arc::new(GradebookService::with_state(
            Arc::new(InMemoryStore::default()),
            GradebookState::default(),
        ))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    #[tokio::test]
    async fn semester_and_course_lifecycle_over_http() {
        let service = test_service();
        let app = gradebook_router(service.clone());

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/semesters")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/courses")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::CREATED);
        let course = body_json(response).await;
        assert_eq!(course["name"], "Course 1");

        let response = app
            .oneshot(
                Request::get("/api/v1/summary")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = body_json(response).await;
        assert_eq!(payload["summary"]["totalCourses"], 1);
        assert_eq!(payload["summary"]["courses"][0]["letter"], "F");
    }

    #[tokio::test]
    async fn adding_a_course_without_a_semester_conflicts() {
        let app = gradebook_router(test_service());

        let response = app
            .oneshot(
                Request::post("/api/v1/courses")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let service = test_service();
        service.add_semester().expect("semester added");
        let app = gradebook_router(service);

        let response = app
            .oneshot(
                Request::delete("/api/v1/courses/missing")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
