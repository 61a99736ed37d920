//! Spreadsheet bulk import of documents into a project.
//!
//! The pipeline in [`pipeline::import_documents`] validates the whole upload
//! in memory, checks for duplicates, and only then writes through an
//! [`ImportStore`] inside a single transaction.

pub mod duplicate;
pub mod error;
pub mod pipeline;
pub mod store;

pub use duplicate::DuplicateGuard;
pub use error::ImportError;
pub use pipeline::{import_documents, ImportProject, ImportSummary};
pub use store::{DisciplineLink, ImportStore, ImportTransaction, LookupEntry, NewDocument, StoreError};
