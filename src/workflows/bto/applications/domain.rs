use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::bto::domain::{FlatType, Nric};

/// Identifier wrapper for housing applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Primary lifecycle of a housing application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Successful,
    Unsuccessful,
    Booked,
    Withdrawn,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Successful => "successful",
            Self::Unsuccessful => "unsuccessful",
            Self::Booked => "booked",
            Self::Withdrawn => "withdrawn",
        }
    }
}

/// Withdrawal sub-machine tracked independently of the primary status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    NotRequested,
    Pending,
    Approved,
    Rejected,
}

impl WithdrawalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotRequested => "not_requested",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One applicant's claim on one flat type in one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub applicant: Nric,
    pub project: String,
    pub flat_type: FlatType,
    pub status: ApplicationStatus,
    pub withdrawal: WithdrawalStatus,
    pub submitted_on: NaiveDate,
}

impl Application {
    /// Whether this application blocks the applicant from filing another.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            ApplicationStatus::Pending | ApplicationStatus::Successful | ApplicationStatus::Booked
        ) && matches!(
            self.withdrawal,
            WithdrawalStatus::NotRequested | WithdrawalStatus::Pending | WithdrawalStatus::Rejected
        )
    }

    pub fn status_view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            application_id: self.id.clone(),
            project: self.project.clone(),
            flat_type: self.flat_type.label(),
            status: self.status.label(),
            withdrawal: self.withdrawal.label(),
        }
    }
}

/// Sanitized representation of an application's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub project: String,
    pub flat_type: &'static str,
    pub status: &'static str,
    pub withdrawal: &'static str,
}
