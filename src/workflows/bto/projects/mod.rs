pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{FlatInventory, Project, ProjectDraft};
pub use repository::{InMemoryProjectStore, ProjectStore};
pub use service::{ProjectError, ProjectService};
