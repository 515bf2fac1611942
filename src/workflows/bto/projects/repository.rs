use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::domain::Project;
use crate::workflows::bto::repository::RepositoryError;

/// Storage abstraction for the project registry so services can be
/// exercised in isolation.
pub trait ProjectStore: Send + Sync {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError>;
    fn update(&self, project: Project) -> Result<(), RepositoryError>;
    fn fetch(&self, name: &str) -> Result<Option<Project>, RepositoryError>;
    fn remove(&self, name: &str) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<Project>, RepositoryError>;
}

/// Registry keyed by project name, the production store for this system.
#[derive(Default, Clone)]
pub struct InMemoryProjectStore {
    projects: Arc<Mutex<BTreeMap<String, Project>>>,
}

impl ProjectStore for InMemoryProjectStore {
    fn insert(&self, project: Project) -> Result<Project, RepositoryError> {
        let mut guard = self.projects.lock().expect("project registry poisoned");
        if guard.contains_key(&project.name) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(project.name.clone(), project.clone());
        Ok(project)
    }

    fn update(&self, project: Project) -> Result<(), RepositoryError> {
        let mut guard = self.projects.lock().expect("project registry poisoned");
        if !guard.contains_key(&project.name) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(project.name.clone(), project);
        Ok(())
    }

    fn fetch(&self, name: &str) -> Result<Option<Project>, RepositoryError> {
        let guard = self.projects.lock().expect("project registry poisoned");
        Ok(guard.get(name).cloned())
    }

    fn remove(&self, name: &str) -> Result<(), RepositoryError> {
        let mut guard = self.projects.lock().expect("project registry poisoned");
        guard
            .remove(name)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let guard = self.projects.lock().expect("project registry poisoned");
        Ok(guard.values().cloned().collect())
    }
}
