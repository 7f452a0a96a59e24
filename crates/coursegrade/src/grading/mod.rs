pub mod domain;
pub mod engine;
pub mod persistence;
pub mod report;
mod router;
mod service;
pub mod store;
mod template;

pub use router::gradebook_router;
pub use service::{GradebookService, ServiceError};
pub use template::{
    is_default_course, is_default_semester, new_entity_id, new_scale_entry, CourseTemplate,
};
