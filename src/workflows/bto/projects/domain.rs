use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::bto::domain::{FlatType, Nric};

/// Unit stock for one flat type inside a project.
///
/// `available_units` never exceeds `total_units`; units move only through
/// [`FlatInventory::reserve_unit`] and [`FlatInventory::release_unit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatInventory {
    pub total_units: u32,
    pub available_units: u32,
    pub price: u32,
}

impl FlatInventory {
    pub fn new(total_units: u32, price: u32) -> Self {
        Self {
            total_units,
            available_units: total_units,
            price,
        }
    }

    /// Take one unit out of availability. Fails once stock is exhausted.
    pub fn reserve_unit(&mut self) -> bool {
        if self.available_units == 0 {
            return false;
        }
        self.available_units -= 1;
        true
    }

    /// Return one unit to availability, clamped at the build total.
    pub fn release_unit(&mut self) -> bool {
        if self.available_units >= self.total_units {
            return false;
        }
        self.available_units += 1;
        true
    }
}

/// A Build-To-Order launch with its application window, staffing capacity,
/// and per-flat-type inventory. Keyed by its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub neighborhood: String,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub visible: bool,
    pub manager: Nric,
    pub officer_slots: usize,
    pub assigned_officers: Vec<Nric>,
    pub flats: BTreeMap<FlatType, FlatInventory>,
}

impl Project {
    pub fn window_open(&self, today: NaiveDate) -> bool {
        self.open_date <= today && today <= self.close_date
    }

    pub fn window_overlaps(&self, other: &Project) -> bool {
        self.open_date <= other.close_date && other.open_date <= self.close_date
    }

    pub fn offers(&self, flat_type: FlatType) -> bool {
        self.flats.contains_key(&flat_type)
    }

    pub fn has_free_officer_slot(&self) -> bool {
        self.assigned_officers.len() < self.officer_slots
    }

    pub fn is_assigned(&self, officer: &Nric) -> bool {
        self.assigned_officers.contains(officer)
    }

    pub fn available_units(&self, flat_type: FlatType) -> u32 {
        self.flats
            .get(&flat_type)
            .map(|inventory| inventory.available_units)
            .unwrap_or(0)
    }
}

/// Mutable fields accepted when creating or editing a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub neighborhood: String,
    pub open_date: NaiveDate,
    pub close_date: NaiveDate,
    pub visible: bool,
    pub officer_slots: usize,
    pub flats: BTreeMap<FlatType, FlatInventory>,
}
