use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::{
    Application, ApplicationId, ApplicationStatus, WithdrawalStatus,
};
use super::repository::ApplicationRepository;
use crate::workflows::bto::domain::{ApplicantProfile, FlatType};
use crate::workflows::bto::eligibility::{eligible_for_flat_type, EligibilityPolicy};
use crate::workflows::bto::projects::repository::ProjectStore;
use crate::workflows::bto::repository::RepositoryError;
use crate::workflows::bto::staffing::StaffingRepository;

/// Errors raised by the application workflow.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("project {0} not found")]
    UnknownProject(String),
    #[error("application {0} not found")]
    UnknownApplication(ApplicationId),
    #[error("applicant already holds active application {0}")]
    DuplicateActiveApplication(ApplicationId),
    #[error("applicant is staff or pending staff on this project")]
    StaffConflict,
    #[error("project is not visible to applicants")]
    ProjectHidden,
    #[error("application window is not open")]
    WindowClosed,
    #[error("project does not offer {}", .0.label())]
    FlatTypeNotOffered(FlatType),
    #[error("applicant is not eligible for {}", .0.label())]
    Ineligible(FlatType),
    #[error("no {} units remain", .0.label())]
    NoUnitsRemaining(FlatType),
    #[error("application is {}, only pending applications can be reviewed", .0.label())]
    NotPending(ApplicationStatus),
    #[error("application is already withdrawn")]
    AlreadyWithdrawn,
    #[error("a withdrawal request is already {}", .0.label())]
    WithdrawalAlreadyOpen(WithdrawalStatus),
    #[error("no withdrawal request is pending")]
    WithdrawalNotPending,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Application lifecycle workflow over the project, application, and
/// staffing registries.
pub struct ApplicationService<P, A, S> {
    projects: Arc<P>,
    applications: Arc<A>,
    staffing: Arc<S>,
    policy: EligibilityPolicy,
}

impl<P, A, S> ApplicationService<P, A, S>
where
    P: ProjectStore + 'static,
    A: ApplicationRepository + 'static,
    S: StaffingRepository + 'static,
{
    pub fn new(projects: Arc<P>, applications: Arc<A>, staffing: Arc<S>) -> Self {
        Self::with_policy(projects, applications, staffing, EligibilityPolicy::default())
    }

    pub fn with_policy(
        projects: Arc<P>,
        applications: Arc<A>,
        staffing: Arc<S>,
        policy: EligibilityPolicy,
    ) -> Self {
        Self {
            projects,
            applications,
            staffing,
            policy,
        }
    }

    /// File a new application. The applicant's existing active application,
    /// if any, is left untouched on failure.
    pub fn apply(
        &self,
        profile: &ApplicantProfile,
        project_name: &str,
        flat_type: FlatType,
        today: NaiveDate,
    ) -> Result<Application, ApplicationError> {
        let project = self
            .projects
            .fetch(project_name)?
            .ok_or_else(|| ApplicationError::UnknownProject(project_name.to_string()))?;

        if let Some(existing) = self.applications.active_for(&profile.nric)? {
            return Err(ApplicationError::DuplicateActiveApplication(existing.id));
        }

        if project.is_assigned(&profile.nric)
            || self
                .staffing
                .open_request_for(&profile.nric, project_name)?
                .is_some()
        {
            return Err(ApplicationError::StaffConflict);
        }

        if !project.visible {
            return Err(ApplicationError::ProjectHidden);
        }
        if !project.window_open(today) {
            return Err(ApplicationError::WindowClosed);
        }
        if !project.offers(flat_type) {
            return Err(ApplicationError::FlatTypeNotOffered(flat_type));
        }
        if !eligible_for_flat_type(profile, flat_type, &self.policy) {
            return Err(ApplicationError::Ineligible(flat_type));
        }

        let application = Application {
            id: next_application_id(),
            applicant: profile.nric.clone(),
            project: project_name.to_string(),
            flat_type,
            status: ApplicationStatus::Pending,
            withdrawal: WithdrawalStatus::NotRequested,
            submitted_on: today,
        };
        Ok(self.applications.insert(application)?)
    }

    /// Decide a pending application. Approval requires remaining stock of
    /// the applied flat type but does not consume a unit; units move only
    /// at booking confirmation.
    pub fn review(
        &self,
        id: &ApplicationId,
        approve: bool,
    ) -> Result<Application, ApplicationError> {
        let mut application = self.fetch(id)?;

        if application.status != ApplicationStatus::Pending {
            return Err(ApplicationError::NotPending(application.status));
        }

        application.status = if approve {
            let project = self
                .projects
                .fetch(&application.project)?
                .ok_or_else(|| ApplicationError::UnknownProject(application.project.clone()))?;
            if project.available_units(application.flat_type) == 0 {
                return Err(ApplicationError::NoUnitsRemaining(application.flat_type));
            }
            ApplicationStatus::Successful
        } else {
            ApplicationStatus::Unsuccessful
        };

        self.applications.update(application.clone())?;
        Ok(application)
    }

    /// Open a withdrawal request on a non-withdrawn application.
    pub fn request_withdrawal(&self, id: &ApplicationId) -> Result<Application, ApplicationError> {
        let mut application = self.fetch(id)?;

        if application.status == ApplicationStatus::Withdrawn {
            return Err(ApplicationError::AlreadyWithdrawn);
        }
        match application.withdrawal {
            WithdrawalStatus::NotRequested | WithdrawalStatus::Rejected => {}
            open => return Err(ApplicationError::WithdrawalAlreadyOpen(open)),
        }

        application.withdrawal = WithdrawalStatus::Pending;
        self.applications.update(application.clone())?;
        Ok(application)
    }

    /// Decide a pending withdrawal request. Approval on a booked
    /// application releases the unit back to inventory and forces the
    /// application to withdrawn; approval elsewhere only marks the
    /// withdrawal, leaving the primary status in place.
    pub fn review_withdrawal(
        &self,
        id: &ApplicationId,
        approve: bool,
    ) -> Result<Application, ApplicationError> {
        let mut application = self.fetch(id)?;

        if application.withdrawal != WithdrawalStatus::Pending {
            return Err(ApplicationError::WithdrawalNotPending);
        }

        if !approve {
            application.withdrawal = WithdrawalStatus::Rejected;
            self.applications.update(application.clone())?;
            return Ok(application);
        }

        if application.status == ApplicationStatus::Booked {
            let mut project = self
                .projects
                .fetch(&application.project)?
                .ok_or_else(|| ApplicationError::UnknownProject(application.project.clone()))?;
            if let Some(inventory) = project.flats.get_mut(&application.flat_type) {
                inventory.release_unit();
            }
            self.projects.update(project)?;
            application.status = ApplicationStatus::Withdrawn;
        }

        application.withdrawal = WithdrawalStatus::Approved;
        self.applications.update(application.clone())?;
        Ok(application)
    }

    pub fn get(&self, id: &ApplicationId) -> Result<Application, ApplicationError> {
        self.fetch(id)
    }

    pub fn active_for(
        &self,
        profile: &ApplicantProfile,
    ) -> Result<Option<Application>, ApplicationError> {
        Ok(self.applications.active_for(&profile.nric)?)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Application, ApplicationError> {
        self.applications
            .fetch(id)?
            .ok_or_else(|| ApplicationError::UnknownApplication(id.clone()))
    }
}
