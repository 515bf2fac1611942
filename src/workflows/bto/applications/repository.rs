use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{Application, ApplicationId};
use crate::workflows::bto::domain::Nric;
use crate::workflows::bto::repository::RepositoryError;

/// Storage abstraction for housing applications.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    /// The applicant's active application, if any. At most one exists.
    fn active_for(&self, applicant: &Nric) -> Result<Option<Application>, RepositoryError>;
    fn for_project(&self, project: &str) -> Result<Vec<Application>, RepositoryError>;
}

/// Registry keyed by application id.
#[derive(Default, Clone)]
pub struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("application registry poisoned");
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application registry poisoned");
        if !guard.contains_key(&application.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(application.id.clone(), application);
        Ok(())
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application registry poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active_for(&self, applicant: &Nric) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application registry poisoned");
        Ok(guard
            .values()
            .find(|application| &application.applicant == applicant && application.is_active())
            .cloned())
    }

    fn for_project(&self, project: &str) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application registry poisoned");
        Ok(guard
            .values()
            .filter(|application| application.project == project)
            .cloned()
            .collect())
    }
}
