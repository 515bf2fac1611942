use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::{Booking, BookingId, BookingStatus, Receipt};
use super::repository::BookingRepository;
use crate::workflows::bto::applications::domain::{ApplicationId, ApplicationStatus, WithdrawalStatus};
use crate::workflows::bto::applications::repository::ApplicationRepository;
use crate::workflows::bto::domain::{FlatType, Nric, UserAccount};
use crate::workflows::bto::projects::repository::ProjectStore;
use crate::workflows::bto::repository::RepositoryError;

/// Errors raised by the booking workflow.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("application {0} not found")]
    UnknownApplication(ApplicationId),
    #[error("booking {0} not found")]
    UnknownBooking(BookingId),
    #[error("project {0} not found")]
    UnknownProject(String),
    #[error("application is {}, only successful applications can book", .0.label())]
    ApplicationNotSuccessful(ApplicationStatus),
    #[error("application withdrawal has been approved")]
    ApplicationWithdrawn,
    #[error("applicant already holds open booking {0}")]
    DuplicateOpenBooking(BookingId),
    #[error("officer is not assigned to this project")]
    NotAssignedOfficer,
    #[error("booking is {}, only pending bookings can change", .0.label())]
    NotPending(BookingStatus),
    #[error("no {} units remain", .0.label())]
    NoUnitsAvailable(FlatType),
    #[error("receipts are only issued for confirmed bookings")]
    ReceiptUnavailable,
    #[error("account does not own this booking")]
    NotBookingOwner,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_booking_id() -> BookingId {
    let id = BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    BookingId(format!("book-{id:06}"))
}

/// Booking and receipt workflow over the project, application, and booking
/// registries.
pub struct BookingService<P, A, B> {
    projects: Arc<P>,
    applications: Arc<A>,
    bookings: Arc<B>,
}

impl<P, A, B> BookingService<P, A, B>
where
    P: ProjectStore + 'static,
    A: ApplicationRepository + 'static,
    B: BookingRepository + 'static,
{
    pub fn new(projects: Arc<P>, applications: Arc<A>, bookings: Arc<B>) -> Self {
        Self {
            projects,
            applications,
            bookings,
        }
    }

    /// Open a pending booking for a successful, non-withdrawn application.
    /// Inventory is untouched until confirmation.
    pub fn reserve(&self, application_id: &ApplicationId) -> Result<Booking, BookingError> {
        let application = self
            .applications
            .fetch(application_id)?
            .ok_or_else(|| BookingError::UnknownApplication(application_id.clone()))?;

        if application.status != ApplicationStatus::Successful {
            return Err(BookingError::ApplicationNotSuccessful(application.status));
        }
        if application.withdrawal == WithdrawalStatus::Approved {
            return Err(BookingError::ApplicationWithdrawn);
        }
        if let Some(open) = self.bookings.open_for(&application.applicant)? {
            return Err(BookingError::DuplicateOpenBooking(open.id));
        }

        let booking = Booking {
            id: next_booking_id(),
            application: application.id.clone(),
            applicant: application.applicant.clone(),
            project: application.project.clone(),
            flat_type: application.flat_type,
            status: BookingStatus::Pending,
            confirmed_on: None,
        };
        Ok(self.bookings.insert(booking)?)
    }

    /// Confirm a pending booking. Requires the acting officer to be on the
    /// project's staff; takes one unit out of inventory and moves the
    /// application to booked.
    pub fn confirm(
        &self,
        id: &BookingId,
        officer: &Nric,
        today: NaiveDate,
    ) -> Result<Booking, BookingError> {
        let mut booking = self.fetch(id)?;

        if booking.status != BookingStatus::Pending {
            return Err(BookingError::NotPending(booking.status));
        }

        let mut project = self
            .projects
            .fetch(&booking.project)?
            .ok_or_else(|| BookingError::UnknownProject(booking.project.clone()))?;
        if !project.is_assigned(officer) {
            return Err(BookingError::NotAssignedOfficer);
        }

        let reserved = project
            .flats
            .get_mut(&booking.flat_type)
            .map(|inventory| inventory.reserve_unit())
            .unwrap_or(false);
        if !reserved {
            return Err(BookingError::NoUnitsAvailable(booking.flat_type));
        }
        self.projects.update(project)?;

        let mut application = self
            .applications
            .fetch(&booking.application)?
            .ok_or_else(|| BookingError::UnknownApplication(booking.application.clone()))?;
        application.status = ApplicationStatus::Booked;
        self.applications.update(application)?;

        booking.status = BookingStatus::Confirmed;
        booking.confirmed_on = Some(today);
        self.bookings.update(booking.clone())?;
        Ok(booking)
    }

    /// Cancel a pending booking. The parent application reverts to
    /// unsuccessful; inventory stays untouched because a pending booking
    /// never consumed a unit.
    pub fn cancel(&self, id: &BookingId) -> Result<Booking, BookingError> {
        let mut booking = self.fetch(id)?;

        if booking.status != BookingStatus::Pending {
            return Err(BookingError::NotPending(booking.status));
        }

        let mut application = self
            .applications
            .fetch(&booking.application)?
            .ok_or_else(|| BookingError::UnknownApplication(booking.application.clone()))?;
        application.status = ApplicationStatus::Unsuccessful;
        self.applications.update(application)?;

        booking.status = BookingStatus::Cancelled;
        self.bookings.update(booking.clone())?;
        Ok(booking)
    }

    /// Issue a receipt for a confirmed booking held by the given account.
    pub fn receipt(&self, id: &BookingId, account: &UserAccount) -> Result<Receipt, BookingError> {
        let booking = self.fetch(id)?;

        if booking.applicant != account.nric {
            return Err(BookingError::NotBookingOwner);
        }
        let confirmed_on = match (booking.status, booking.confirmed_on) {
            (BookingStatus::Confirmed, Some(date)) => date,
            _ => return Err(BookingError::ReceiptUnavailable),
        };

        let project = self
            .projects
            .fetch(&booking.project)?
            .ok_or_else(|| BookingError::UnknownProject(booking.project.clone()))?;
        let price = project
            .flats
            .get(&booking.flat_type)
            .map(|inventory| inventory.price)
            .unwrap_or(0);

        Ok(Receipt {
            booking_id: booking.id,
            applicant: booking.applicant,
            applicant_name: account.name.clone(),
            project: project.name,
            neighborhood: project.neighborhood,
            flat_type: booking.flat_type.label(),
            price,
            confirmed_on,
        })
    }

    pub fn get(&self, id: &BookingId) -> Result<Booking, BookingError> {
        self.fetch(id)
    }

    fn fetch(&self, id: &BookingId) -> Result<Booking, BookingError> {
        self.bookings
            .fetch(id)?
            .ok_or_else(|| BookingError::UnknownBooking(id.clone()))
    }
}
