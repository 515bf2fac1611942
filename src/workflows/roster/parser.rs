use std::collections::BTreeMap;
use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;

use super::RosterImportError;
use crate::workflows::bto::domain::{FlatType, MaritalStatus, Nric, Role, UserAccount};
use crate::workflows::bto::projects::domain::{FlatInventory, Project};

pub(crate) fn parse_projects<R: Read>(reader: R) -> Result<Vec<Project>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut projects = Vec::new();

    for (index, record) in csv_reader.deserialize::<ProjectRow>().enumerate() {
        let row = record?;
        let project = row.into_project().map_err(|message| RosterImportError::Row {
            // header occupies line 1
            line: index + 2,
            message,
        })?;
        projects.push(project);
    }

    Ok(projects)
}

pub(crate) fn parse_accounts<R: Read>(reader: R) -> Result<Vec<UserAccount>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut accounts = Vec::new();

    for (index, record) in csv_reader.deserialize::<AccountRow>().enumerate() {
        let row = record?;
        let account = row.into_account().map_err(|message| RosterImportError::Row {
            line: index + 2,
            message,
        })?;
        accounts.push(account);
    }

    Ok(accounts)
}

#[derive(Debug, Deserialize)]
struct ProjectRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Neighborhood")]
    neighborhood: String,
    #[serde(rename = "Two Room Units")]
    two_room_units: u32,
    #[serde(rename = "Two Room Price")]
    two_room_price: u32,
    #[serde(rename = "Three Room Units")]
    three_room_units: u32,
    #[serde(rename = "Three Room Price")]
    three_room_price: u32,
    #[serde(rename = "Opens On")]
    opens_on: String,
    #[serde(rename = "Closes On")]
    closes_on: String,
    #[serde(rename = "Manager")]
    manager: String,
    #[serde(rename = "Officer Slots")]
    officer_slots: usize,
    #[serde(rename = "Visible")]
    visible: String,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project, String> {
        let manager = Nric::parse(&self.manager).map_err(|err| err.to_string())?;
        let open_date = parse_date(&self.opens_on)
            .ok_or_else(|| format!("unparseable opening date '{}'", self.opens_on))?;
        let close_date = parse_date(&self.closes_on)
            .ok_or_else(|| format!("unparseable closing date '{}'", self.closes_on))?;
        if close_date < open_date {
            return Err("closing date precedes opening date".to_string());
        }

        let mut flats = BTreeMap::new();
        if self.two_room_units > 0 {
            flats.insert(
                FlatType::TwoRoom,
                FlatInventory::new(self.two_room_units, self.two_room_price),
            );
        }
        if self.three_room_units > 0 {
            flats.insert(
                FlatType::ThreeRoom,
                FlatInventory::new(self.three_room_units, self.three_room_price),
            );
        }

        Ok(Project {
            name: self.name,
            neighborhood: self.neighborhood,
            open_date,
            close_date,
            visible: parse_flag(&self.visible),
            manager,
            officer_slots: self.officer_slots,
            assigned_officers: Vec::new(),
            flats,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AccountRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "NRIC")]
    nric: String,
    #[serde(rename = "Age")]
    age: u8,
    #[serde(rename = "Marital Status")]
    marital_status: String,
    #[serde(rename = "Password")]
    password: String,
    #[serde(rename = "Role")]
    role: String,
}

impl AccountRow {
    fn into_account(self) -> Result<UserAccount, String> {
        let nric = Nric::parse(&self.nric).map_err(|err| err.to_string())?;

        let marital_status = match self.marital_status.to_ascii_lowercase().as_str() {
            "single" => MaritalStatus::Single,
            "married" => MaritalStatus::Married,
            other => return Err(format!("unknown marital status '{other}'")),
        };

        let role = match self.role.to_ascii_lowercase().as_str() {
            "applicant" => Role::Applicant,
            "officer" => Role::Officer,
            "manager" => Role::Manager,
            other => return Err(format!("unknown role '{other}'")),
        };

        Ok(UserAccount {
            nric,
            name: self.name,
            age: self.age,
            marital_status,
            role,
            password: self.password,
        })
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    NaiveDate::parse_from_str(trimmed, "%m/%d/%Y").ok()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

#[cfg(test)]
pub(crate) fn parse_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_date(value)
}
