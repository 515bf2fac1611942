use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::{FlatInventory, Project, ProjectDraft};
use super::repository::ProjectStore;
use crate::workflows::bto::domain::{FlatType, Nric};
use crate::workflows::bto::repository::RepositoryError;

/// Errors raised by project administration.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("a project named {0} already exists")]
    DuplicateName(String),
    #[error("project {0} not found")]
    UnknownProject(String),
    #[error("application window closes before it opens")]
    InvalidWindow,
    #[error("application window overlaps project {0} managed by the same manager")]
    WindowOverlap(String),
    #[error("{} availability {available} exceeds build total {total}", .flat_type.label())]
    InventoryExceedsTotal {
        flat_type: FlatType,
        available: u32,
        total: u32,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Manager-facing administration over the project registry.
pub struct ProjectService<P> {
    projects: Arc<P>,
}

impl<P> ProjectService<P>
where
    P: ProjectStore + 'static,
{
    pub fn new(projects: Arc<P>) -> Self {
        Self { projects }
    }

    /// Register a new launch under the given manager.
    pub fn create(&self, manager: &Nric, draft: ProjectDraft) -> Result<Project, ProjectError> {
        validate_draft(&draft)?;

        if self.projects.fetch(&draft.name)?.is_some() {
            return Err(ProjectError::DuplicateName(draft.name));
        }

        let project = Project {
            name: draft.name,
            neighborhood: draft.neighborhood,
            open_date: draft.open_date,
            close_date: draft.close_date,
            visible: draft.visible,
            manager: manager.clone(),
            officer_slots: draft.officer_slots,
            assigned_officers: Vec::new(),
            flats: draft.flats,
        };

        self.check_manager_overlap(&project, None)?;
        Ok(self.projects.insert(project)?)
    }

    /// Replace the editable fields of an existing project. The manager and
    /// assigned officers carry over untouched.
    pub fn edit(&self, name: &str, draft: ProjectDraft) -> Result<Project, ProjectError> {
        validate_draft(&draft)?;

        let existing = self
            .projects
            .fetch(name)?
            .ok_or_else(|| ProjectError::UnknownProject(name.to_string()))?;

        let updated = Project {
            name: existing.name.clone(),
            neighborhood: draft.neighborhood,
            open_date: draft.open_date,
            close_date: draft.close_date,
            visible: draft.visible,
            manager: existing.manager.clone(),
            officer_slots: draft.officer_slots,
            assigned_officers: existing.assigned_officers.clone(),
            flats: draft.flats,
        };

        self.check_manager_overlap(&updated, Some(name))?;
        self.projects.update(updated.clone())?;
        Ok(updated)
    }

    pub fn set_visibility(&self, name: &str, visible: bool) -> Result<Project, ProjectError> {
        let mut project = self
            .projects
            .fetch(name)?
            .ok_or_else(|| ProjectError::UnknownProject(name.to_string()))?;
        project.visible = visible;
        self.projects.update(project.clone())?;
        Ok(project)
    }

    pub fn delete(&self, name: &str) -> Result<(), ProjectError> {
        match self.projects.remove(name) {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => Err(ProjectError::UnknownProject(name.to_string())),
            Err(other) => Err(other.into()),
        }
    }

    pub fn get(&self, name: &str) -> Result<Project, ProjectError> {
        self.projects
            .fetch(name)?
            .ok_or_else(|| ProjectError::UnknownProject(name.to_string()))
    }

    /// Projects an applicant may currently browse.
    pub fn list_visible(&self, today: NaiveDate) -> Result<Vec<Project>, ProjectError> {
        let mut visible: Vec<Project> = self
            .projects
            .list()?
            .into_iter()
            .filter(|project| project.visible && project.window_open(today))
            .collect();
        visible.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(visible)
    }

    fn check_manager_overlap(
        &self,
        candidate: &Project,
        skip_name: Option<&str>,
    ) -> Result<(), ProjectError> {
        for other in self.projects.list()? {
            if Some(other.name.as_str()) == skip_name {
                continue;
            }
            if other.manager == candidate.manager && other.window_overlaps(candidate) {
                return Err(ProjectError::WindowOverlap(other.name));
            }
        }
        Ok(())
    }
}

fn validate_draft(draft: &ProjectDraft) -> Result<(), ProjectError> {
    if draft.close_date < draft.open_date {
        return Err(ProjectError::InvalidWindow);
    }

    for (flat_type, inventory) in &draft.flats {
        let FlatInventory {
            total_units,
            available_units,
            ..
        } = *inventory;
        if available_units > total_units {
            return Err(ProjectError::InventoryExceedsTotal {
                flat_type: *flat_type,
                available: available_units,
                total: total_units,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::bto::projects::repository::InMemoryProjectStore;
    use std::collections::BTreeMap;

    fn manager() -> Nric {
        Nric::parse("T2000000M").expect("valid nric")
    }

    fn draft(name: &str, open: (i32, u32, u32), close: (i32, u32, u32)) -> ProjectDraft {
        let mut flats = BTreeMap::new();
        flats.insert(FlatType::TwoRoom, FlatInventory::new(20, 120_000));
        flats.insert(FlatType::ThreeRoom, FlatInventory::new(10, 200_000));

        ProjectDraft {
            name: name.to_string(),
            neighborhood: "Tampines".to_string(),
            open_date: NaiveDate::from_ymd_opt(open.0, open.1, open.2).expect("valid"),
            close_date: NaiveDate::from_ymd_opt(close.0, close.1, close.2).expect("valid"),
            visible: true,
            officer_slots: 5,
            flats,
        }
    }

    fn service() -> ProjectService<InMemoryProjectStore> {
        ProjectService::new(Arc::new(InMemoryProjectStore::default()))
    }

    #[test]
    fn create_rejects_duplicate_names() {
        let service = service();
        service
            .create(&manager(), draft("Sunrise Court", (2025, 1, 1), (2025, 1, 31)))
            .expect("first create succeeds");

        match service.create(&manager(), draft("Sunrise Court", (2025, 6, 1), (2025, 6, 30))) {
            Err(ProjectError::DuplicateName(name)) => assert_eq!(name, "Sunrise Court"),
            other => panic!("expected duplicate name error, got {other:?}"),
        }
    }

    #[test]
    fn create_rejects_same_manager_window_overlap() {
        let service = service();
        service
            .create(&manager(), draft("Sunrise Court", (2025, 1, 1), (2025, 1, 31)))
            .expect("first create succeeds");

        match service.create(&manager(), draft("Sunset Rise", (2025, 1, 20), (2025, 2, 20))) {
            Err(ProjectError::WindowOverlap(name)) => assert_eq!(name, "Sunrise Court"),
            other => panic!("expected window overlap error, got {other:?}"),
        }

        // A different manager may run a concurrent window.
        let other_manager = Nric::parse("T3000000P").expect("valid nric");
        service
            .create(&other_manager, draft("Sunset Rise", (2025, 1, 20), (2025, 2, 20)))
            .expect("different manager overlaps freely");
    }

    #[test]
    fn create_rejects_inverted_window() {
        let service = service();
        match service.create(&manager(), draft("Backwards", (2025, 2, 1), (2025, 1, 1))) {
            Err(ProjectError::InvalidWindow) => {}
            other => panic!("expected invalid window error, got {other:?}"),
        }
    }

    #[test]
    fn edit_preserves_manager_and_staff() {
        let service = service();
        service
            .create(&manager(), draft("Sunrise Court", (2025, 1, 1), (2025, 1, 31)))
            .expect("create succeeds");

        let mut edit_draft = draft("Sunrise Court", (2025, 1, 5), (2025, 1, 25));
        edit_draft.neighborhood = "Punggol".to_string();
        let edited = service.edit("Sunrise Court", edit_draft).expect("edit succeeds");

        assert_eq!(edited.manager, manager());
        assert_eq!(edited.neighborhood, "Punggol");
        assert!(edited.assigned_officers.is_empty());
    }

    #[test]
    fn list_visible_filters_hidden_and_closed() {
        let service = service();
        service
            .create(&manager(), draft("Sunrise Court", (2025, 1, 1), (2025, 1, 31)))
            .expect("create succeeds");
        service
            .set_visibility("Sunrise Court", false)
            .expect("hide project");

        let mid_window = NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid");
        assert!(service.list_visible(mid_window).expect("list").is_empty());

        service
            .set_visibility("Sunrise Court", true)
            .expect("show project");
        assert_eq!(service.list_visible(mid_window).expect("list").len(), 1);

        let after_close = NaiveDate::from_ymd_opt(2025, 2, 15).expect("valid");
        assert!(service.list_visible(after_close).expect("list").is_empty());
    }

    #[test]
    fn delete_unknown_project_reports_name() {
        let service = service();
        match service.delete("Ghost Estate") {
            Err(ProjectError::UnknownProject(name)) => assert_eq!(name, "Ghost Estate"),
            other => panic!("expected unknown project error, got {other:?}"),
        }
    }
}
