mod summary;
pub mod views;

pub use summary::{distribution_entries, semester_summary};
