use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::domain::{Nric, UserAccount};

/// Errors raised by the user directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("an account already exists for {0}")]
    DuplicateAccount(Nric),
    #[error("no account exists for {0}")]
    UnknownAccount(Nric),
    #[error("password does not match")]
    InvalidPassword,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// In-memory account registry keyed by NRIC.
#[derive(Default, Clone)]
pub struct UserDirectory {
    accounts: Arc<Mutex<BTreeMap<Nric, UserAccount>>>,
}

impl UserDirectory {
    pub fn register(&self, account: UserAccount) -> Result<UserAccount, DirectoryError> {
        let mut guard = self.accounts.lock().expect("user directory poisoned");
        if guard.contains_key(&account.nric) {
            return Err(DirectoryError::DuplicateAccount(account.nric));
        }
        guard.insert(account.nric.clone(), account.clone());
        Ok(account)
    }

    pub fn authenticate(&self, nric: &Nric, password: &str) -> Result<UserAccount, DirectoryError> {
        let guard = self.accounts.lock().expect("user directory poisoned");
        let account = guard
            .get(nric)
            .ok_or_else(|| DirectoryError::UnknownAccount(nric.clone()))?;
        if account.password != password {
            return Err(DirectoryError::InvalidPassword);
        }
        Ok(account.clone())
    }

    pub fn change_password(
        &self,
        nric: &Nric,
        current: &str,
        replacement: &str,
    ) -> Result<(), DirectoryError> {
        if replacement.trim().is_empty() {
            return Err(DirectoryError::EmptyPassword);
        }

        let mut guard = self.accounts.lock().expect("user directory poisoned");
        let account = guard
            .get_mut(nric)
            .ok_or_else(|| DirectoryError::UnknownAccount(nric.clone()))?;
        if account.password != current {
            return Err(DirectoryError::InvalidPassword);
        }
        account.password = replacement.to_string();
        Ok(())
    }

    pub fn get(&self, nric: &Nric) -> Option<UserAccount> {
        let guard = self.accounts.lock().expect("user directory poisoned");
        guard.get(nric).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().expect("user directory poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
