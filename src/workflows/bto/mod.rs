//! Build-To-Order housing rules engine: eligibility, application and
//! withdrawal lifecycle, officer staffing, bookings, and enquiries.

pub mod applications;
pub mod bookings;
pub mod directory;
pub mod domain;
pub mod eligibility;
pub mod enquiries;
pub mod projects;
pub mod repository;
pub mod staffing;

pub use applications::{
    application_router, Application, ApplicationError, ApplicationId, ApplicationService,
    ApplicationStatus, ApplicationSubmission, InMemoryApplicationRepository, WithdrawalStatus,
};
pub use bookings::{
    Booking, BookingError, BookingId, BookingService, BookingStatus, InMemoryBookingRepository,
    Receipt,
};
pub use directory::{DirectoryError, UserDirectory};
pub use domain::{
    ApplicantProfile, FlatType, MaritalStatus, Nric, NricError, Role, UserAccount,
};
pub use eligibility::{eligible_for_flat_type, eligible_for_project, EligibilityPolicy};
pub use enquiries::{
    Enquiry, EnquiryError, EnquiryId, EnquiryService, EnquiryStatus, InMemoryEnquiryRepository,
};
pub use projects::{
    FlatInventory, InMemoryProjectStore, Project, ProjectDraft, ProjectError, ProjectService,
};
pub use repository::RepositoryError;
pub use staffing::{
    InMemoryStaffingRepository, StaffingError, StaffingRequest, StaffingRequestId, StaffingService,
    StaffingStatus,
};
