use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::info;

use super::domain::{Course, Criterion, GradeScaleEntry, Semester, SubItem, Theme};
use super::persistence::{load_state, save_state, KeyValueStore, StorageError};
use super::report::views::{DistributionEntry, SemesterSummary};
use super::report::{distribution_entries, semester_summary};
use super::store::{CriterionPatch, GradebookState, StoreError, SubItemPatch};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("gradebook state mutex poisoned")]
    Poisoned,
}

/// Session orchestrator: applies store commands under a single lock and
/// writes the session back to storage after every mutation, so the persisted
/// gradebook always reflects the last accepted edit.
pub struct GradebookService<S> {
    store: Arc<S>,
    state: Mutex<GradebookState>,
}

impl<S> GradebookService<S>
where
    S: KeyValueStore,
{
    /// Restores the session from storage.
    pub fn open(store: Arc<S>) -> Result<Self, StorageError> {
        let state = load_state(store.as_ref())?;
        info!(
            semesters = state.semesters.len(),
            "gradebook session restored"
        );
        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    /// Starts from the given session without touching storage, for demos and
    /// tests.
    pub fn with_state(store: Arc<S>, state: GradebookState) -> Self {
        Self {
            store,
            state: Mutex::new(state),
        }
    }

    pub fn snapshot(&self) -> Result<GradebookState, ServiceError> {
        let state = self.state.lock().map_err(|_| ServiceError::Poisoned)?;
        Ok(state.clone())
    }

    pub fn add_semester(&self) -> Result<Semester, ServiceError> {
        self.mutate(|state| Ok(state.add_semester()))
    }

    pub fn rename_semester(&self, semester_id: &str, name: &str) -> Result<(), ServiceError> {
        self.mutate(|state| state.rename_semester(semester_id, name).map_err(Into::into))
    }

    pub fn delete_semester(&self, semester_id: &str) -> Result<(), ServiceError> {
        self.mutate(|state| state.delete_semester(semester_id).map_err(Into::into))
    }

    pub fn set_active_semester(&self, semester_id: &str) -> Result<(), ServiceError> {
        self.mutate(|state| state.set_active_semester(semester_id).map_err(Into::into))
    }

    pub fn add_course(&self) -> Result<Course, ServiceError> {
        self.mutate(|state| state.add_course().map_err(Into::into))
    }

    pub fn update_course(&self, course_id: &str, course: Course) -> Result<(), ServiceError> {
        self.mutate(|state| state.update_course(course_id, course).map_err(Into::into))
    }

    pub fn rename_course(&self, course_id: &str, name: &str) -> Result<(), ServiceError> {
        self.mutate(|state| state.rename_course(course_id, name).map_err(Into::into))
    }

    pub fn delete_course(&self, course_id: &str) -> Result<(), ServiceError> {
        self.mutate(|state| state.delete_course(course_id).map_err(Into::into))
    }

    pub fn add_criterion(&self, course_id: &str) -> Result<Criterion, ServiceError> {
        self.mutate(|state| state.add_criterion(course_id).map_err(Into::into))
    }

    pub fn update_criterion(
        &self,
        course_id: &str,
        criterion_id: &str,
        patch: CriterionPatch,
    ) -> Result<(), ServiceError> {
        self.mutate(|state| {
            state
                .update_criterion(course_id, criterion_id, patch)
                .map_err(Into::into)
        })
    }

    pub fn delete_criterion(&self, course_id: &str, criterion_id: &str) -> Result<(), ServiceError> {
        self.mutate(|state| {
            state
                .delete_criterion(course_id, criterion_id)
                .map_err(Into::into)
        })
    }

    pub fn add_sub_item(&self, course_id: &str, criterion_id: &str) -> Result<SubItem, ServiceError> {
        self.mutate(|state| state.add_sub_item(course_id, criterion_id).map_err(Into::into))
    }

    pub fn update_sub_item(
        &self,
        course_id: &str,
        criterion_id: &str,
        sub_item_id: &str,
        patch: SubItemPatch,
    ) -> Result<(), ServiceError> {
        self.mutate(|state| {
            state
                .update_sub_item(course_id, criterion_id, sub_item_id, patch)
                .map_err(Into::into)
        })
    }

    pub fn delete_sub_item(
        &self,
        course_id: &str,
        criterion_id: &str,
        sub_item_id: &str,
    ) -> Result<(), ServiceError> {
        self.mutate(|state| {
            state
                .delete_sub_item(course_id, criterion_id, sub_item_id)
                .map_err(Into::into)
        })
    }

    pub fn replace_grade_scale(
        &self,
        course_id: &str,
        grade_scale: Vec<GradeScaleEntry>,
    ) -> Result<(), ServiceError> {
        self.mutate(|state| {
            state
                .replace_grade_scale(course_id, grade_scale)
                .map_err(Into::into)
        })
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<(), ServiceError> {
        self.mutate(|state| {
            state.set_sidebar_collapsed(collapsed);
            Ok(())
        })
    }

    pub fn toggle_theme(&self) -> Result<Theme, ServiceError> {
        self.mutate(|state| Ok(state.toggle_theme()))
    }

    /// Rollup for the active semester's courses. An empty selection
    /// summarizes to floor values rather than erroring, matching the engine's
    /// policy.
    pub fn active_summary(&self) -> Result<SemesterSummary, ServiceError> {
        let state = self.state.lock().map_err(|_| ServiceError::Poisoned)?;
        Ok(semester_summary(state.active_courses()))
    }

    pub fn active_distribution(&self) -> Result<Vec<DistributionEntry>, ServiceError> {
        let state = self.state.lock().map_err(|_| ServiceError::Poisoned)?;
        Ok(distribution_entries(state.active_courses()))
    }

    fn mutate<T, F>(&self, command: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut GradebookState) -> Result<T, ServiceError>,
    {
        let mut state = self.state.lock().map_err(|_| ServiceError::Poisoned)?;
        let result = command(&mut state)?;
        save_state(self.store.as_ref(), &state)?;
        Ok(result)
    }
}
