use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::workflows::bto::applications::repository::InMemoryApplicationRepository;
use crate::workflows::bto::applications::router::application_router;
use crate::workflows::bto::applications::service::ApplicationService;
use crate::workflows::bto::domain::{ApplicantProfile, FlatType, MaritalStatus, Nric};
use crate::workflows::bto::projects::domain::{FlatInventory, Project};
use crate::workflows::bto::projects::repository::{InMemoryProjectStore, ProjectStore};
use crate::workflows::bto::staffing::InMemoryStaffingRepository;

pub(super) type TestService = ApplicationService<
    InMemoryProjectStore,
    InMemoryApplicationRepository,
    InMemoryStaffingRepository,
>;

pub(super) fn project(name: &str, flats: &[(FlatType, u32)]) -> Project {
    let mut inventory = BTreeMap::new();
    for (flat_type, units) in flats {
        let price = match flat_type {
            FlatType::TwoRoom => 120_000,
            FlatType::ThreeRoom => 200_000,
        };
        inventory.insert(*flat_type, FlatInventory::new(*units, price));
    }

    Project {
        name: name.to_string(),
        neighborhood: "Tampines".to_string(),
        open_date: NaiveDate::from_ymd_opt(2025, 2, 15).expect("valid"),
        close_date: NaiveDate::from_ymd_opt(2025, 3, 20).expect("valid"),
        visible: true,
        manager: Nric::parse("T2000000M").expect("valid nric"),
        officer_slots: 5,
        assigned_officers: Vec::new(),
        flats: inventory,
    }
}

pub(super) fn mid_window() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid")
}

pub(super) fn married_profile(suffix: u32) -> ApplicantProfile {
    ApplicantProfile {
        nric: Nric::parse(&format!("S30000{suffix:02}B")).expect("valid nric"),
        age: 30,
        marital_status: MaritalStatus::Married,
    }
}

pub(super) fn single_profile(age: u8, suffix: u32) -> ApplicantProfile {
    ApplicantProfile {
        nric: Nric::parse(&format!("S40000{suffix:02}C")).expect("valid nric"),
        age,
        marital_status: MaritalStatus::Single,
    }
}

pub(super) fn build_service(
    projects: Vec<Project>,
) -> (
    Arc<TestService>,
    Arc<InMemoryProjectStore>,
    Arc<InMemoryApplicationRepository>,
    Arc<InMemoryStaffingRepository>,
) {
    let store = Arc::new(InMemoryProjectStore::default());
    for project in projects {
        store.insert(project).expect("seed project");
    }

    let applications = Arc::new(InMemoryApplicationRepository::default());
    let staffing = Arc::new(InMemoryStaffingRepository::default());
    let service = Arc::new(ApplicationService::new(
        store.clone(),
        applications.clone(),
        staffing.clone(),
    ));

    (service, store, applications, staffing)
}

pub(super) fn router_with(projects: Vec<Project>) -> axum::Router {
    let (service, _, _, _) = build_service(projects);
    application_router(service)
}
