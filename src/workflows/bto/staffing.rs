use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::applications::repository::ApplicationRepository;
use super::domain::Nric;
use super::projects::repository::ProjectStore;
use super::repository::RepositoryError;

/// Identifier wrapper for officer staffing requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffingRequestId(pub String);

impl fmt::Display for StaffingRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingStatus {
    Pending,
    Approved,
    Rejected,
}

impl StaffingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// An officer's request to join a project's staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingRequest {
    pub id: StaffingRequestId,
    pub officer: Nric,
    pub project: String,
    pub status: StaffingStatus,
}

impl StaffingRequest {
    /// Pending and approved requests both block the officer from applying
    /// to the project as an applicant.
    pub fn is_open(&self) -> bool {
        matches!(self.status, StaffingStatus::Pending | StaffingStatus::Approved)
    }
}

/// Storage abstraction for staffing requests.
pub trait StaffingRepository: Send + Sync {
    fn insert(&self, request: StaffingRequest) -> Result<StaffingRequest, RepositoryError>;
    fn update(&self, request: StaffingRequest) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &StaffingRequestId) -> Result<Option<StaffingRequest>, RepositoryError>;
    /// The officer's pending or approved request for the project, if any.
    fn open_request_for(
        &self,
        officer: &Nric,
        project: &str,
    ) -> Result<Option<StaffingRequest>, RepositoryError>;
    fn for_project(&self, project: &str) -> Result<Vec<StaffingRequest>, RepositoryError>;
}

/// Registry keyed by request id.
#[derive(Default, Clone)]
pub struct InMemoryStaffingRepository {
    records: Arc<Mutex<HashMap<StaffingRequestId, StaffingRequest>>>,
}

impl StaffingRepository for InMemoryStaffingRepository {
    fn insert(&self, request: StaffingRequest) -> Result<StaffingRequest, RepositoryError> {
        let mut guard = self.records.lock().expect("staffing registry poisoned");
        if guard.contains_key(&request.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    fn update(&self, request: StaffingRequest) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("staffing registry poisoned");
        if !guard.contains_key(&request.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(request.id.clone(), request);
        Ok(())
    }

    fn fetch(&self, id: &StaffingRequestId) -> Result<Option<StaffingRequest>, RepositoryError> {
        let guard = self.records.lock().expect("staffing registry poisoned");
        Ok(guard.get(id).cloned())
    }

    fn open_request_for(
        &self,
        officer: &Nric,
        project: &str,
    ) -> Result<Option<StaffingRequest>, RepositoryError> {
        let guard = self.records.lock().expect("staffing registry poisoned");
        Ok(guard
            .values()
            .find(|request| {
                &request.officer == officer && request.project == project && request.is_open()
            })
            .cloned())
    }

    fn for_project(&self, project: &str) -> Result<Vec<StaffingRequest>, RepositoryError> {
        let guard = self.records.lock().expect("staffing registry poisoned");
        Ok(guard
            .values()
            .filter(|request| request.project == project)
            .cloned()
            .collect())
    }
}

/// Errors raised by the staffing workflow.
#[derive(Debug, thiserror::Error)]
pub enum StaffingError {
    #[error("project {0} not found")]
    UnknownProject(String),
    #[error("staffing request {0} not found")]
    UnknownRequest(StaffingRequestId),
    #[error("officer is already assigned to this project")]
    AlreadyAssigned,
    #[error("officer already has an open request for this project")]
    AlreadyRequested,
    #[error("officer holds an active housing application for this project")]
    ApplicantConflict,
    #[error("all {slots} officer slots are filled")]
    SlotsFull { slots: usize },
    #[error("request is {}, only pending requests can be reviewed", .0.label())]
    NotPending(StaffingStatus),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static STAFFING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> StaffingRequestId {
    let id = STAFFING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    StaffingRequestId(format!("staff-{id:06}"))
}

/// Officer assignment workflow over the project, application, and staffing
/// registries.
pub struct StaffingService<P, A, S> {
    projects: Arc<P>,
    applications: Arc<A>,
    requests: Arc<S>,
}

impl<P, A, S> StaffingService<P, A, S>
where
    P: ProjectStore + 'static,
    A: ApplicationRepository + 'static,
    S: StaffingRepository + 'static,
{
    pub fn new(projects: Arc<P>, applications: Arc<A>, requests: Arc<S>) -> Self {
        Self {
            projects,
            applications,
            requests,
        }
    }

    /// File a request to join the project's staff.
    pub fn register(
        &self,
        officer: &Nric,
        project_name: &str,
    ) -> Result<StaffingRequest, StaffingError> {
        let project = self
            .projects
            .fetch(project_name)?
            .ok_or_else(|| StaffingError::UnknownProject(project_name.to_string()))?;

        self.check_conflicts(officer, &project)?;
        if self
            .requests
            .open_request_for(officer, project_name)?
            .is_some()
        {
            return Err(StaffingError::AlreadyRequested);
        }

        let request = StaffingRequest {
            id: next_request_id(),
            officer: officer.clone(),
            project: project_name.to_string(),
            status: StaffingStatus::Pending,
        };
        Ok(self.requests.insert(request)?)
    }

    /// Approve or reject a pending request. Approval re-checks slot
    /// capacity and conflicts before the officer joins the roster;
    /// rejection has no side effects.
    pub fn review(
        &self,
        id: &StaffingRequestId,
        approve: bool,
    ) -> Result<StaffingRequest, StaffingError> {
        let mut request = self
            .requests
            .fetch(id)?
            .ok_or_else(|| StaffingError::UnknownRequest(id.clone()))?;

        if request.status != StaffingStatus::Pending {
            return Err(StaffingError::NotPending(request.status));
        }

        if !approve {
            request.status = StaffingStatus::Rejected;
            self.requests.update(request.clone())?;
            return Ok(request);
        }

        let mut project = self
            .projects
            .fetch(&request.project)?
            .ok_or_else(|| StaffingError::UnknownProject(request.project.clone()))?;

        self.check_conflicts(&request.officer, &project)?;
        if !project.has_free_officer_slot() {
            return Err(StaffingError::SlotsFull {
                slots: project.officer_slots,
            });
        }

        project.assigned_officers.push(request.officer.clone());
        self.projects.update(project)?;

        request.status = StaffingStatus::Approved;
        self.requests.update(request.clone())?;
        Ok(request)
    }

    pub fn get(&self, id: &StaffingRequestId) -> Result<StaffingRequest, StaffingError> {
        self.requests
            .fetch(id)?
            .ok_or_else(|| StaffingError::UnknownRequest(id.clone()))
    }

    pub fn for_project(&self, project: &str) -> Result<Vec<StaffingRequest>, StaffingError> {
        Ok(self.requests.for_project(project)?)
    }

    fn check_conflicts(
        &self,
        officer: &Nric,
        project: &super::projects::domain::Project,
    ) -> Result<(), StaffingError> {
        if project.is_assigned(officer) {
            return Err(StaffingError::AlreadyAssigned);
        }

        if let Some(application) = self.applications.active_for(officer)? {
            if application.project == project.name {
                return Err(StaffingError::ApplicantConflict);
            }
        }

        Ok(())
    }
}
