//! Mutable-session gradebook state and the commands that edit it.
//!
//! Every edit is modeled as replacement: the addressed entity is rebuilt and
//! its parent's sequence reassembled around it, so sibling entities and their
//! ordering are never disturbed and cloned snapshots never alias live state.
//! The computation engine stays untouched by all of this; it only ever sees
//! read-only snapshots.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::domain::{Course, Criterion, GradeScaleEntry, Semester, SubItem, Theme};
use super::template::{self, CourseTemplate};

/// Lookup failures for identifier-addressed commands. The engine itself never
/// errors; these belong to the editing layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no active semester selected")]
    NoActiveSemester,
    #[error("semester '{0}' not found")]
    SemesterNotFound(String),
    #[error("course '{0}' not found")]
    CourseNotFound(String),
    #[error("criterion '{0}' not found")]
    CriterionNotFound(String),
    #[error("sub-item '{0}' not found")]
    SubItemNotFound(String),
}

/// Partial update for a criterion. Absent fields keep their current value;
/// a present `sub_items` replaces the whole sub-item sequence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionPatch {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub score: Option<f64>,
    pub sub_items: Option<Vec<SubItem>>,
}

/// Partial update for a sub-item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubItemPatch {
    pub name: Option<String>,
    pub score: Option<f64>,
}

/// The full session state: every semester, the active selection, and the two
/// persisted UI booleans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradebookState {
    pub semesters: Vec<Semester>,
    pub active_semester_id: Option<String>,
    pub sidebar_collapsed: bool,
    pub theme: Theme,
}

impl GradebookState {
    pub fn active_semester(&self) -> Option<&Semester> {
        let active_id = self.active_semester_id.as_deref()?;
        self.semesters.iter().find(|s| s.id == active_id)
    }

    /// Courses of the active semester, or an empty slice when nothing is
    /// selected.
    pub fn active_courses(&self) -> &[Course] {
        self.active_semester()
            .map(|semester| semester.courses.as_slice())
            .unwrap_or(&[])
    }

    /// Creates an empty semester with a generated name and makes it active.
    pub fn add_semester(&mut self) -> Semester {
        let semester = Semester {
            id: template::new_entity_id(),
            name: format!("Semester {}", self.semesters.len() + 1),
            courses: Vec::new(),
        };
        self.semesters.push(semester.clone());
        self.active_semester_id = Some(semester.id.clone());
        semester
    }

    pub fn rename_semester(&mut self, semester_id: &str, name: &str) -> Result<(), StoreError> {
        self.ensure_semester(semester_id)?;
        self.semesters = self
            .semesters
            .iter()
            .map(|s| {
                if s.id == semester_id {
                    Semester {
                        name: name.to_string(),
                        ..s.clone()
                    }
                } else {
                    s.clone()
                }
            })
            .collect();
        Ok(())
    }

    /// Removes a semester. Deleting the active one re-activates the first
    /// remaining semester, or clears the selection when none are left.
    pub fn delete_semester(&mut self, semester_id: &str) -> Result<(), StoreError> {
        self.ensure_semester(semester_id)?;
        self.semesters = self
            .semesters
            .iter()
            .filter(|s| s.id != semester_id)
            .cloned()
            .collect();

        if self.active_semester_id.as_deref() == Some(semester_id) {
            self.active_semester_id = self.semesters.first().map(|s| s.id.clone());
        }
        Ok(())
    }

    pub fn set_active_semester(&mut self, semester_id: &str) -> Result<(), StoreError> {
        self.ensure_semester(semester_id)?;
        self.active_semester_id = Some(semester_id.to_string());
        Ok(())
    }

    /// Adds a standard-template course to the active semester.
    pub fn add_course(&mut self) -> Result<Course, StoreError> {
        let name = format!("Course {}", self.active_courses().len() + 1);
        let course = CourseTemplate::standard().instantiate(name);

        let added = course.clone();
        let semester = self.active_semester_mut()?;
        semester.courses.push(course);
        Ok(added)
    }

    /// Wholesale course replacement, the shape every editor-side field tweak
    /// funnels through.
    pub fn update_course(&mut self, course_id: &str, updated: Course) -> Result<(), StoreError> {
        self.transform_course(course_id, |_| Ok(updated))
    }

    pub fn rename_course(&mut self, course_id: &str, name: &str) -> Result<(), StoreError> {
        self.transform_course(course_id, |course| {
            Ok(Course {
                name: name.to_string(),
                ..course.clone()
            })
        })
    }

    pub fn delete_course(&mut self, course_id: &str) -> Result<(), StoreError> {
        let semester = self.active_semester_mut()?;
        if !semester.courses.iter().any(|c| c.id == course_id) {
            return Err(StoreError::CourseNotFound(course_id.to_string()));
        }
        semester.courses = semester
            .courses
            .iter()
            .filter(|c| c.id != course_id)
            .cloned()
            .collect();
        Ok(())
    }

    /// Appends a blank criterion to the course and returns it.
    pub fn add_criterion(&mut self, course_id: &str) -> Result<Criterion, StoreError> {
        let criterion = template::new_criterion();
        let added = criterion.clone();
        self.transform_course(course_id, move |course| {
            let mut criteria = course.criteria.clone();
            criteria.push(criterion);
            Ok(Course {
                criteria,
                ..course.clone()
            })
        })?;
        Ok(added)
    }

    pub fn update_criterion(
        &mut self,
        course_id: &str,
        criterion_id: &str,
        patch: CriterionPatch,
    ) -> Result<(), StoreError> {
        self.transform_course(course_id, |course| {
            if !course.criteria.iter().any(|c| c.id == criterion_id) {
                return Err(StoreError::CriterionNotFound(criterion_id.to_string()));
            }
            let criteria = course
                .criteria
                .iter()
                .map(|c| {
                    if c.id == criterion_id {
                        apply_criterion_patch(c, &patch)
                    } else {
                        c.clone()
                    }
                })
                .collect();
            Ok(Course {
                criteria,
                ..course.clone()
            })
        })
    }

    pub fn delete_criterion(&mut self, course_id: &str, criterion_id: &str) -> Result<(), StoreError> {
        self.transform_course(course_id, |course| {
            if !course.criteria.iter().any(|c| c.id == criterion_id) {
                return Err(StoreError::CriterionNotFound(criterion_id.to_string()));
            }
            let criteria = course
                .criteria
                .iter()
                .filter(|c| c.id != criterion_id)
                .cloned()
                .collect();
            Ok(Course {
                criteria,
                ..course.clone()
            })
        })
    }

    /// Appends a blank sub-item to the criterion, creating the sub-item
    /// sequence when the criterion had none.
    pub fn add_sub_item(
        &mut self,
        course_id: &str,
        criterion_id: &str,
    ) -> Result<SubItem, StoreError> {
        let sub_item = template::new_sub_item();
        let added = sub_item.clone();
        self.transform_criterion(course_id, criterion_id, move |criterion| {
            let mut items = criterion.sub_items.clone().unwrap_or_default();
            items.push(sub_item);
            Ok(Criterion {
                sub_items: Some(items),
                ..criterion.clone()
            })
        })?;
        Ok(added)
    }

    pub fn update_sub_item(
        &mut self,
        course_id: &str,
        criterion_id: &str,
        sub_item_id: &str,
        patch: SubItemPatch,
    ) -> Result<(), StoreError> {
        self.transform_criterion(course_id, criterion_id, |criterion| {
            let items = criterion.sub_items.clone().unwrap_or_default();
            if !items.iter().any(|item| item.id == sub_item_id) {
                return Err(StoreError::SubItemNotFound(sub_item_id.to_string()));
            }
            let items = items
                .iter()
                .map(|item| {
                    if item.id == sub_item_id {
                        SubItem {
                            name: patch.name.clone().unwrap_or_else(|| item.name.clone()),
                            score: patch.score.unwrap_or(item.score),
                            ..item.clone()
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect();
            Ok(Criterion {
                sub_items: Some(items),
                ..criterion.clone()
            })
        })
    }

    pub fn delete_sub_item(
        &mut self,
        course_id: &str,
        criterion_id: &str,
        sub_item_id: &str,
    ) -> Result<(), StoreError> {
        self.transform_criterion(course_id, criterion_id, |criterion| {
            let items = criterion.sub_items.clone().unwrap_or_default();
            if !items.iter().any(|item| item.id == sub_item_id) {
                return Err(StoreError::SubItemNotFound(sub_item_id.to_string()));
            }
            let items: Vec<SubItem> = items
                .iter()
                .filter(|item| item.id != sub_item_id)
                .cloned()
                .collect();
            Ok(Criterion {
                sub_items: Some(items),
                ..criterion.clone()
            })
        })
    }

    /// Replaces a course's entire grade scale, as the scale editor does.
    pub fn replace_grade_scale(
        &mut self,
        course_id: &str,
        grade_scale: Vec<GradeScaleEntry>,
    ) -> Result<(), StoreError> {
        self.transform_course(course_id, |course| {
            Ok(Course {
                grade_scale,
                ..course.clone()
            })
        })
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.sidebar_collapsed = collapsed;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    fn ensure_semester(&self, semester_id: &str) -> Result<(), StoreError> {
        if self.semesters.iter().any(|s| s.id == semester_id) {
            Ok(())
        } else {
            Err(StoreError::SemesterNotFound(semester_id.to_string()))
        }
    }

    fn active_semester_mut(&mut self) -> Result<&mut Semester, StoreError> {
        let active_id = self
            .active_semester_id
            .clone()
            .ok_or(StoreError::NoActiveSemester)?;
        self.semesters
            .iter_mut()
            .find(|s| s.id == active_id)
            .ok_or(StoreError::SemesterNotFound(active_id))
    }

    /// Rebuilds one course of the active semester through `transform` and
    /// reassembles the course sequence around it, leaving siblings and their
    /// order untouched.
    fn transform_course<F>(&mut self, course_id: &str, transform: F) -> Result<(), StoreError>
    where
        F: FnOnce(&Course) -> Result<Course, StoreError>,
    {
        let semester = self.active_semester_mut()?;
        let index = semester
            .courses
            .iter()
            .position(|c| c.id == course_id)
            .ok_or_else(|| StoreError::CourseNotFound(course_id.to_string()))?;

        let replacement = transform(&semester.courses[index])?;
        semester.courses = semester
            .courses
            .iter()
            .enumerate()
            .map(|(i, c)| if i == index { replacement.clone() } else { c.clone() })
            .collect();
        Ok(())
    }

    fn transform_criterion<F>(
        &mut self,
        course_id: &str,
        criterion_id: &str,
        transform: F,
    ) -> Result<(), StoreError>
    where
        F: FnOnce(&Criterion) -> Result<Criterion, StoreError>,
    {
        self.transform_course(course_id, |course| {
            let index = course
                .criteria
                .iter()
                .position(|c| c.id == criterion_id)
                .ok_or_else(|| StoreError::CriterionNotFound(criterion_id.to_string()))?;

            let replacement = transform(&course.criteria[index])?;
            let criteria = course
                .criteria
                .iter()
                .enumerate()
                .map(|(i, c)| if i == index { replacement.clone() } else { c.clone() })
                .collect();
            Ok(Course {
                criteria,
                ..course.clone()
            })
        })
    }
}

fn apply_criterion_patch(criterion: &Criterion, patch: &CriterionPatch) -> Criterion {
    Criterion {
        id: criterion.id.clone(),
        name: patch.name.clone().unwrap_or_else(|| criterion.name.clone()),
        weight: patch.weight.unwrap_or(criterion.weight),
        score: patch.score.unwrap_or(criterion.score),
        sub_items: match &patch.sub_items {
            Some(items) => Some(items.clone()),
            None => criterion.sub_items.clone(),
        },
    }
}
