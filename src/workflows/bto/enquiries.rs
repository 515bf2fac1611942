use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::domain::Nric;
use super::repository::RepositoryError;

/// Identifier wrapper for project enquiries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnquiryId(pub String);

impl fmt::Display for EnquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnquiryStatus {
    Pending,
    Replied,
}

impl EnquiryStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Replied => "replied",
        }
    }
}

/// Free-text question tied to a project and submitter. Editable and
/// deletable only while pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enquiry {
    pub id: EnquiryId,
    pub submitter: Nric,
    pub project: String,
    pub text: String,
    pub status: EnquiryStatus,
    pub reply: Option<String>,
}

/// Storage abstraction for enquiries.
pub trait EnquiryRepository: Send + Sync {
    fn insert(&self, enquiry: Enquiry) -> Result<Enquiry, RepositoryError>;
    fn update(&self, enquiry: Enquiry) -> Result<(), RepositoryError>;
    fn remove(&self, id: &EnquiryId) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EnquiryId) -> Result<Option<Enquiry>, RepositoryError>;
    fn for_project(&self, project: &str) -> Result<Vec<Enquiry>, RepositoryError>;
}

/// Registry keyed by enquiry id.
#[derive(Default, Clone)]
pub struct InMemoryEnquiryRepository {
    records: Arc<Mutex<HashMap<EnquiryId, Enquiry>>>,
}

impl EnquiryRepository for InMemoryEnquiryRepository {
    fn insert(&self, enquiry: Enquiry) -> Result<Enquiry, RepositoryError> {
        let mut guard = self.records.lock().expect("enquiry registry poisoned");
        if guard.contains_key(&enquiry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(enquiry.id.clone(), enquiry.clone());
        Ok(enquiry)
    }

    fn update(&self, enquiry: Enquiry) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("enquiry registry poisoned");
        if !guard.contains_key(&enquiry.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(enquiry.id.clone(), enquiry);
        Ok(())
    }

    fn remove(&self, id: &EnquiryId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("enquiry registry poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &EnquiryId) -> Result<Option<Enquiry>, RepositoryError> {
        let guard = self.records.lock().expect("enquiry registry poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_project(&self, project: &str) -> Result<Vec<Enquiry>, RepositoryError> {
        let guard = self.records.lock().expect("enquiry registry poisoned");
        let mut enquiries: Vec<Enquiry> = guard
            .values()
            .filter(|enquiry| enquiry.project == project)
            .cloned()
            .collect();
        enquiries.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(enquiries)
    }
}

/// Errors raised by the enquiry workflow.
#[derive(Debug, thiserror::Error)]
pub enum EnquiryError {
    #[error("enquiry {0} not found")]
    UnknownEnquiry(EnquiryId),
    #[error("enquiry text must not be empty")]
    EmptyText,
    #[error("only the submitter may change an enquiry")]
    NotSubmitter,
    #[error("enquiry has already been replied to")]
    AlreadyReplied,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static ENQUIRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_enquiry_id() -> EnquiryId {
    let id = ENQUIRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EnquiryId(format!("enq-{id:06}"))
}

/// Enquiry submission and reply workflow.
pub struct EnquiryService<E> {
    enquiries: Arc<E>,
}

impl<E> EnquiryService<E>
where
    E: EnquiryRepository + 'static,
{
    pub fn new(enquiries: Arc<E>) -> Self {
        Self { enquiries }
    }

    pub fn submit(
        &self,
        submitter: &Nric,
        project: &str,
        text: &str,
    ) -> Result<Enquiry, EnquiryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EnquiryError::EmptyText);
        }

        let enquiry = Enquiry {
            id: next_enquiry_id(),
            submitter: submitter.clone(),
            project: project.to_string(),
            text: text.to_string(),
            status: EnquiryStatus::Pending,
            reply: None,
        };
        Ok(self.enquiries.insert(enquiry)?)
    }

    pub fn edit(
        &self,
        id: &EnquiryId,
        submitter: &Nric,
        text: &str,
    ) -> Result<Enquiry, EnquiryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EnquiryError::EmptyText);
        }

        let mut enquiry = self.fetch_pending_owned(id, submitter)?;
        enquiry.text = text.to_string();
        self.enquiries.update(enquiry.clone())?;
        Ok(enquiry)
    }

    pub fn delete(&self, id: &EnquiryId, submitter: &Nric) -> Result<(), EnquiryError> {
        self.fetch_pending_owned(id, submitter)?;
        Ok(self.enquiries.remove(id)?)
    }

    /// Record a staff reply. One-shot; replied enquiries are frozen.
    pub fn reply(&self, id: &EnquiryId, reply: &str) -> Result<Enquiry, EnquiryError> {
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(EnquiryError::EmptyText);
        }

        let mut enquiry = self
            .enquiries
            .fetch(id)?
            .ok_or_else(|| EnquiryError::UnknownEnquiry(id.clone()))?;
        if enquiry.status == EnquiryStatus::Replied {
            return Err(EnquiryError::AlreadyReplied);
        }

        enquiry.status = EnquiryStatus::Replied;
        enquiry.reply = Some(reply.to_string());
        self.enquiries.update(enquiry.clone())?;
        Ok(enquiry)
    }

    pub fn for_project(&self, project: &str) -> Result<Vec<Enquiry>, EnquiryError> {
        Ok(self.enquiries.for_project(project)?)
    }

    fn fetch_pending_owned(
        &self,
        id: &EnquiryId,
        submitter: &Nric,
    ) -> Result<Enquiry, EnquiryError> {
        let enquiry = self
            .enquiries
            .fetch(id)?
            .ok_or_else(|| EnquiryError::UnknownEnquiry(id.clone()))?;
        if &enquiry.submitter != submitter {
            return Err(EnquiryError::NotSubmitter);
        }
        if enquiry.status == EnquiryStatus::Replied {
            return Err(EnquiryError::AlreadyReplied);
        }
        Ok(enquiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitter() -> Nric {
        Nric::parse("S1234567A").expect("valid nric")
    }

    fn service() -> EnquiryService<InMemoryEnquiryRepository> {
        EnquiryService::new(Arc::new(InMemoryEnquiryRepository::default()))
    }

    #[test]
    fn submit_edit_and_delete_while_pending() {
        let service = service();
        let enquiry = service
            .submit(&submitter(), "Sunrise Court", "When is the showflat open?")
            .expect("submit succeeds");
        assert_eq!(enquiry.status, EnquiryStatus::Pending);

        let edited = service
            .edit(&enquiry.id, &submitter(), "When do bookings open?")
            .expect("edit succeeds");
        assert_eq!(edited.text, "When do bookings open?");

        service
            .delete(&enquiry.id, &submitter())
            .expect("delete succeeds");
        match service.edit(&enquiry.id, &submitter(), "gone") {
            Err(EnquiryError::UnknownEnquiry(id)) => assert_eq!(id, enquiry.id),
            other => panic!("expected unknown enquiry, got {other:?}"),
        }
    }

    #[test]
    fn reply_freezes_the_enquiry() {
        let service = service();
        let enquiry = service
            .submit(&submitter(), "Sunrise Court", "Any 2-room units left?")
            .expect("submit succeeds");

        let replied = service
            .reply(&enquiry.id, "Yes, twelve remain.")
            .expect("reply succeeds");
        assert_eq!(replied.status, EnquiryStatus::Replied);
        assert_eq!(replied.reply.as_deref(), Some("Yes, twelve remain."));

        match service.edit(&enquiry.id, &submitter(), "updated") {
            Err(EnquiryError::AlreadyReplied) => {}
            other => panic!("expected already replied, got {other:?}"),
        }
        match service.delete(&enquiry.id, &submitter()) {
            Err(EnquiryError::AlreadyReplied) => {}
            other => panic!("expected already replied, got {other:?}"),
        }
        match service.reply(&enquiry.id, "second answer") {
            Err(EnquiryError::AlreadyReplied) => {}
            other => panic!("expected already replied, got {other:?}"),
        }
    }

    #[test]
    fn only_the_submitter_may_edit() {
        let service = service();
        let enquiry = service
            .submit(&submitter(), "Sunrise Court", "Price list?")
            .expect("submit succeeds");

        let other = Nric::parse("T7654321Z").expect("valid nric");
        match service.edit(&enquiry.id, &other, "hijacked") {
            Err(EnquiryError::NotSubmitter) => {}
            other => panic!("expected not submitter, got {other:?}"),
        }
    }

    #[test]
    fn blank_text_is_rejected() {
        let service = service();
        match service.submit(&submitter(), "Sunrise Court", "   ") {
            Err(EnquiryError::EmptyText) => {}
            other => panic!("expected empty text error, got {other:?}"),
        }
    }
}
