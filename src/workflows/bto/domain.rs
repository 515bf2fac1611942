use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated national identity number: `S` or `T`, seven digits, one
/// trailing uppercase letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nric(String);

impl Nric {
    pub fn parse(raw: &str) -> Result<Self, NricError> {
        let value = raw.trim().to_ascii_uppercase();
        if value.len() != 9 {
            return Err(NricError::Length(value.len()));
        }

        let bytes = value.as_bytes();
        if !matches!(bytes[0], b'S' | b'T') {
            return Err(NricError::Prefix(value.chars().next().unwrap_or('?')));
        }
        if !bytes[1..8].iter().all(|byte| byte.is_ascii_digit()) {
            return Err(NricError::Digits);
        }
        if !bytes[8].is_ascii_uppercase() {
            return Err(NricError::Checksum(bytes[8] as char));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Nric {
    type Error = NricError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Nric> for String {
    fn from(value: Nric) -> Self {
        value.0
    }
}

/// Validation errors for identity numbers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NricError {
    #[error("identity number must be 9 characters, found {0}")]
    Length(usize),
    #[error("identity number must start with S or T, found {0}")]
    Prefix(char),
    #[error("identity number positions 2-8 must be digits")]
    Digits,
    #[error("identity number must end with an uppercase letter, found {0}")]
    Checksum(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
}

impl MaritalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Married => "Married",
        }
    }
}

/// Unit categories offered inside a project, each with its own inventory
/// and price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatType {
    TwoRoom,
    ThreeRoom,
}

impl FlatType {
    pub const fn ordered() -> [Self; 2] {
        [Self::TwoRoom, Self::ThreeRoom]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TwoRoom => "2-Room",
            Self::ThreeRoom => "3-Room",
        }
    }
}

/// Account roles expressed as capabilities instead of an inheritance chain.
/// An officer is also a valid applicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Applicant,
    Officer,
    Manager,
}

impl Role {
    pub const fn can_apply(self) -> bool {
        matches!(self, Self::Applicant | Self::Officer)
    }

    pub const fn can_staff(self) -> bool {
        matches!(self, Self::Officer)
    }

    pub const fn can_manage(self) -> bool {
        matches!(self, Self::Manager)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Applicant => "Applicant",
            Self::Officer => "Officer",
            Self::Manager => "Manager",
        }
    }
}

/// Snapshot of the identity facts the rules engine consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub nric: Nric,
    pub age: u8,
    pub marital_status: MaritalStatus,
}

/// Directory record for a portal user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub nric: Nric,
    pub name: String,
    pub age: u8,
    pub marital_status: MaritalStatus,
    pub role: Role,
    pub password: String,
}

impl UserAccount {
    pub fn profile(&self) -> ApplicantProfile {
        ApplicantProfile {
            nric: self.nric.clone(),
            age: self.age,
            marital_status: self.marital_status,
        }
    }
}
