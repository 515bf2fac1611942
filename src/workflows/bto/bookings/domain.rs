use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::bto::applications::domain::ApplicationId;
use crate::workflows::bto::domain::{FlatType, Nric};

/// Identifier wrapper for flat bookings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// A successful application's claim on a physical unit. Inventory moves
/// only when the booking is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub application: ApplicationId,
    pub applicant: Nric,
    pub project: String,
    pub flat_type: FlatType,
    pub status: BookingStatus,
    pub confirmed_on: Option<NaiveDate>,
}

impl Booking {
    /// Pending and confirmed bookings both block the applicant from
    /// opening another.
    pub fn is_open(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Proof of purchase issued for a confirmed booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub booking_id: BookingId,
    pub applicant: Nric,
    pub applicant_name: String,
    pub project: String,
    pub neighborhood: String,
    pub flat_type: &'static str,
    pub price: u32,
    pub confirmed_on: NaiveDate,
}
