//! Housing application intake, review, and withdrawal lifecycle.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationStatusView, WithdrawalStatus,
};
pub use repository::{ApplicationRepository, InMemoryApplicationRepository};
pub use router::{application_router, ApplicationSubmission};
pub use service::{ApplicationError, ApplicationService};
