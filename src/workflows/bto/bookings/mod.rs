//! Flat booking, confirmation, and receipt workflow.

pub mod domain;
pub mod repository;
pub mod service;


pub use domain::{Booking, BookingId, BookingStatus, Receipt};
pub use repository::{BookingRepository, InMemoryBookingRepository};
pub use service::{BookingError, BookingService};
