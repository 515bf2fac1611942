use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{Booking, BookingId};
use crate::workflows::bto::domain::Nric;
use crate::workflows::bto::repository::RepositoryError;

/// Storage abstraction for flat bookings.
pub trait BookingRepository: Send + Sync {
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError>;
    fn update(&self, booking: Booking) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError>;
    /// The applicant's pending or confirmed booking, if any.
    fn open_for(&self, applicant: &Nric) -> Result<Option<Booking>, RepositoryError>;
}

/// Registry keyed by booking id.
#[derive(Default, Clone)]
pub struct InMemoryBookingRepository {
    records: Arc<Mutex<HashMap<BookingId, Booking>>>,
}

impl BookingRepository for InMemoryBookingRepository {
    fn insert(&self, booking: Booking) -> Result<Booking, RepositoryError> {
        let mut guard = self.records.lock().expect("booking registry poisoned");
        if guard.contains_key(&booking.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(booking.id.clone(), booking.clone());
        Ok(booking)
    }

    fn update(&self, booking: Booking) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("booking registry poisoned");
        if !guard.contains_key(&booking.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(booking.id.clone(), booking);
        Ok(())
    }

    fn fetch(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        let guard = self.records.lock().expect("booking registry poisoned");
        Ok(guard.get(id).cloned())
    }

    fn open_for(&self, applicant: &Nric) -> Result<Option<Booking>, RepositoryError> {
        let guard = self.records.lock().expect("booking registry poisoned");
        Ok(guard
            .values()
            .find(|booking| &booking.applicant == applicant && booking.is_open())
            .cloned())
    }
}
