use chrono::NaiveDate;

use super::domain::{ApplicantProfile, FlatType, MaritalStatus};
use super::projects::domain::Project;

const DEFAULT_SINGLE_MINIMUM_AGE: u8 = 35;
const DEFAULT_MARRIED_MINIMUM_AGE: u8 = 21;

/// Policy dial carrying the statutory age floors for each marital status.
#[derive(Debug, Clone)]
pub struct EligibilityPolicy {
    single_minimum_age: u8,
    married_minimum_age: u8,
}

impl EligibilityPolicy {
    pub fn new(single_minimum_age: u8, married_minimum_age: u8) -> Self {
        Self {
            single_minimum_age,
            married_minimum_age,
        }
    }

    pub fn minimum_age(&self, status: MaritalStatus) -> u8 {
        match status {
            MaritalStatus::Single => self.single_minimum_age,
            MaritalStatus::Married => self.married_minimum_age,
        }
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_SINGLE_MINIMUM_AGE, DEFAULT_MARRIED_MINIMUM_AGE)
    }
}

/// Whether the applicant may apply for a unit of the given flat type.
///
/// Singles must meet the higher age floor and may only take two-room units;
/// married applicants may take any flat type once past their age floor.
pub fn eligible_for_flat_type(
    profile: &ApplicantProfile,
    flat_type: FlatType,
    policy: &EligibilityPolicy,
) -> bool {
    if profile.age < policy.minimum_age(profile.marital_status) {
        return false;
    }

    match profile.marital_status {
        MaritalStatus::Single => flat_type == FlatType::TwoRoom,
        MaritalStatus::Married => true,
    }
}

/// Whether the applicant may see and apply to the project today.
///
/// An applicant who already applied keeps visibility into the project
/// regardless of the other checks, even after the window closes.
pub fn eligible_for_project(
    profile: &ApplicantProfile,
    project: &Project,
    today: NaiveDate,
    already_applied: bool,
    policy: &EligibilityPolicy,
) -> bool {
    if already_applied {
        return true;
    }

    if !project.visible || !project.window_open(today) {
        return false;
    }

    project
        .flats
        .keys()
        .any(|flat_type| eligible_for_flat_type(profile, *flat_type, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::bto::domain::Nric;
    use crate::workflows::bto::projects::domain::FlatInventory;
    use std::collections::BTreeMap;

    fn profile(age: u8, marital_status: MaritalStatus) -> ApplicantProfile {
        ApplicantProfile {
            nric: Nric::parse("S1234567A").expect("valid nric"),
            age,
            marital_status,
        }
    }

    fn project(flats: &[FlatType]) -> Project {
        let mut inventory = BTreeMap::new();
        for flat_type in flats {
            inventory.insert(*flat_type, FlatInventory::new(10, 150_000));
        }

        Project {
            name: "Maple Grove".to_string(),
            neighborhood: "Yishun".to_string(),
            open_date: NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid"),
            close_date: NaiveDate::from_ymd_opt(2025, 3, 31).expect("valid"),
            visible: true,
            manager: Nric::parse("T2000000M").expect("valid nric"),
            officer_slots: 5,
            assigned_officers: Vec::new(),
            flats: inventory,
        }
    }

    fn mid_window() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid")
    }

    #[test]
    fn singles_under_threshold_never_take_three_room() {
        let policy = EligibilityPolicy::default();
        for age in [21, 30, 34] {
            assert!(!eligible_for_flat_type(
                &profile(age, MaritalStatus::Single),
                FlatType::ThreeRoom,
                &policy
            ));
            assert!(!eligible_for_flat_type(
                &profile(age, MaritalStatus::Single),
                FlatType::TwoRoom,
                &policy
            ));
        }

        // Even past the age floor the flat type stays restricted.
        assert!(!eligible_for_flat_type(
            &profile(40, MaritalStatus::Single),
            FlatType::ThreeRoom,
            &policy
        ));
        assert!(eligible_for_flat_type(
            &profile(35, MaritalStatus::Single),
            FlatType::TwoRoom,
            &policy
        ));
    }

    #[test]
    fn married_at_twenty_one_takes_any_flat_type() {
        let policy = EligibilityPolicy::default();
        for flat_type in FlatType::ordered() {
            assert!(eligible_for_flat_type(
                &profile(21, MaritalStatus::Married),
                flat_type,
                &policy
            ));
        }
        assert!(!eligible_for_flat_type(
            &profile(20, MaritalStatus::Married),
            FlatType::TwoRoom,
            &policy
        ));
    }

    #[test]
    fn project_eligibility_requires_visible_open_window() {
        let policy = EligibilityPolicy::default();
        let married = profile(30, MaritalStatus::Married);

        let open = project(&[FlatType::TwoRoom, FlatType::ThreeRoom]);
        assert!(eligible_for_project(&married, &open, mid_window(), false, &policy));

        let mut hidden = open.clone();
        hidden.visible = false;
        assert!(!eligible_for_project(&married, &hidden, mid_window(), false, &policy));

        let before_open = NaiveDate::from_ymd_opt(2025, 2, 1).expect("valid");
        assert!(!eligible_for_project(&married, &open, before_open, false, &policy));
    }

    #[test]
    fn single_forty_sees_no_fit_in_three_room_only_project() {
        let policy = EligibilityPolicy::default();
        let single = profile(40, MaritalStatus::Single);
        let three_room_only = project(&[FlatType::ThreeRoom]);

        assert!(!eligible_for_project(
            &single,
            &three_room_only,
            mid_window(),
            false,
            &policy
        ));
    }

    #[test]
    fn prior_application_keeps_project_visible() {
        let policy = EligibilityPolicy::default();
        let single = profile(30, MaritalStatus::Single);
        let mut hidden = project(&[FlatType::ThreeRoom]);
        hidden.visible = false;

        assert!(eligible_for_project(&single, &hidden, mid_window(), true, &policy));
    }
}
