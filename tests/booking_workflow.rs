//! End-to-end booking scenarios: staffing an officer onto a project, then
//! carrying a successful application through booking confirmation,
//! receipts, and booked-withdrawal inventory restoration.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use bto_portal::workflows::bto::projects::repository::ProjectStore;
use bto_portal::workflows::bto::{
    ApplicantProfile, ApplicationService, ApplicationStatus, BookingService, FlatInventory,
    FlatType, InMemoryApplicationRepository, InMemoryBookingRepository, InMemoryProjectStore,
    InMemoryStaffingRepository, MaritalStatus, Nric, Project, Role, StaffingError, StaffingService,
    UserAccount, WithdrawalStatus,
};

struct Portal {
    projects: Arc<InMemoryProjectStore>,
    applications: ApplicationService<
        InMemoryProjectStore,
        InMemoryApplicationRepository,
        InMemoryStaffingRepository,
    >,
    staffing: StaffingService<
        InMemoryProjectStore,
        InMemoryApplicationRepository,
        InMemoryStaffingRepository,
    >,
    bookings: BookingService<
        InMemoryProjectStore,
        InMemoryApplicationRepository,
        InMemoryBookingRepository,
    >,
}

fn portal(two_room_units: u32) -> Portal {
    let mut flats = BTreeMap::new();
    flats.insert(FlatType::TwoRoom, FlatInventory::new(two_room_units, 120_000));

    let project = Project {
        name: "Acacia Breeze".to_string(),
        neighborhood: "Yishun".to_string(),
        open_date: NaiveDate::from_ymd_opt(2025, 2, 15).expect("valid"),
        close_date: NaiveDate::from_ymd_opt(2025, 3, 20).expect("valid"),
        visible: true,
        manager: Nric::parse("T2000000M").expect("valid nric"),
        officer_slots: 2,
        assigned_officers: Vec::new(),
        flats,
    };

    let projects = Arc::new(InMemoryProjectStore::default());
    projects.insert(project).expect("seed project");
    let application_store = Arc::new(InMemoryApplicationRepository::default());
    let staffing_store = Arc::new(InMemoryStaffingRepository::default());
    let booking_store = Arc::new(InMemoryBookingRepository::default());

    Portal {
        projects: projects.clone(),
        applications: ApplicationService::new(
            projects.clone(),
            application_store.clone(),
            staffing_store.clone(),
        ),
        staffing: StaffingService::new(
            projects.clone(),
            application_store.clone(),
            staffing_store,
        ),
        bookings: BookingService::new(projects, application_store, booking_store),
    }
}

fn officer_nric() -> Nric {
    Nric::parse("S5000001F").expect("valid nric")
}

fn applicant() -> ApplicantProfile {
    ApplicantProfile {
        nric: Nric::parse("S3000001B").expect("valid nric"),
        age: 30,
        marital_status: MaritalStatus::Married,
    }
}

fn mid_window() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid")
}

fn booking_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 2).expect("valid")
}

#[test]
fn single_unit_project_books_down_to_zero() {
    let portal = portal(1);

    let request = portal
        .staffing
        .register(&officer_nric(), "Acacia Breeze")
        .expect("officer registers");
    portal
        .staffing
        .review(&request.id, true)
        .expect("manager approves staffing");

    let application = portal
        .applications
        .apply(&applicant(), "Acacia Breeze", FlatType::TwoRoom, mid_window())
        .expect("apply succeeds");
    portal
        .applications
        .review(&application.id, true)
        .expect("manager approves application");

    let booking = portal
        .bookings
        .reserve(&application.id)
        .expect("booking opens");
    let confirmed = portal
        .bookings
        .confirm(&booking.id, &officer_nric(), booking_day())
        .expect("officer confirms");

    let project = portal
        .projects
        .fetch("Acacia Breeze")
        .expect("fetch")
        .expect("present");
    assert_eq!(project.available_units(FlatType::TwoRoom), 0);

    let booked = portal
        .applications
        .get(&application.id)
        .expect("application present");
    assert_eq!(booked.status, ApplicationStatus::Booked);

    let account = UserAccount {
        nric: applicant().nric,
        name: "Wei Ming".to_string(),
        age: 30,
        marital_status: MaritalStatus::Married,
        role: Role::Applicant,
        password: "password".to_string(),
    };
    let receipt = portal
        .bookings
        .receipt(&confirmed.id, &account)
        .expect("receipt issued");
    assert_eq!(receipt.price, 120_000);
    assert_eq!(receipt.flat_type, "2-Room");
}

#[test]
fn booked_withdrawal_returns_the_unit() {
    let portal = portal(1);

    let request = portal
        .staffing
        .register(&officer_nric(), "Acacia Breeze")
        .expect("officer registers");
    portal
        .staffing
        .review(&request.id, true)
        .expect("staffing approved");

    let application = portal
        .applications
        .apply(&applicant(), "Acacia Breeze", FlatType::TwoRoom, mid_window())
        .expect("apply succeeds");
    portal
        .applications
        .review(&application.id, true)
        .expect("application approved");
    let booking = portal
        .bookings
        .reserve(&application.id)
        .expect("booking opens");
    portal
        .bookings
        .confirm(&booking.id, &officer_nric(), booking_day())
        .expect("booking confirmed");

    portal
        .applications
        .request_withdrawal(&application.id)
        .expect("withdrawal requested");
    let withdrawn = portal
        .applications
        .review_withdrawal(&application.id, true)
        .expect("withdrawal approved");

    assert_eq!(withdrawn.status, ApplicationStatus::Withdrawn);
    assert_eq!(withdrawn.withdrawal, WithdrawalStatus::Approved);

    let project = portal
        .projects
        .fetch("Acacia Breeze")
        .expect("fetch")
        .expect("present");
    assert_eq!(project.available_units(FlatType::TwoRoom), 1);
}

#[test]
fn staff_and_applicant_roles_exclude_each_other_per_project() {
    let portal = portal(3);
    let dual = applicant();

    // Applicant side first: an active application blocks staffing the
    // same project.
    portal
        .applications
        .apply(&dual, "Acacia Breeze", FlatType::TwoRoom, mid_window())
        .expect("apply succeeds");

    match portal.staffing.register(&dual.nric, "Acacia Breeze") {
        Err(StaffingError::ApplicantConflict) => {}
        other => panic!("expected applicant conflict, got {other:?}"),
    }
}
