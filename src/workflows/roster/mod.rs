//! Flat-file seeding of the project and account registries.
//!
//! The portal boots from the CSV exports the legacy system produced; this
//! module parses them into domain values without touching the registries
//! so callers decide what to do with conflicts.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::bto::domain::UserAccount;
use crate::workflows::bto::projects::domain::Project;

/// Errors raised while reading roster exports.
#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {line}: {message}")]
    Row { line: usize, message: String },
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn projects_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Project>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::projects_from_reader(file)
    }

    pub fn projects_from_reader<R: Read>(reader: R) -> Result<Vec<Project>, RosterImportError> {
        parser::parse_projects(reader)
    }

    pub fn accounts_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<UserAccount>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::accounts_from_reader(file)
    }

    pub fn accounts_from_reader<R: Read>(reader: R) -> Result<Vec<UserAccount>, RosterImportError> {
        parser::parse_accounts(reader)
    }
}
