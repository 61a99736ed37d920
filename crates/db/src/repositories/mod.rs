//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods that
//! accept a `&PgPool` (or any Postgres executor when the query also runs
//! inside a transaction) as the first argument.

pub mod client_repo;
pub mod document_repo;
pub mod lookup_repo;
pub mod notification_repo;
pub mod progress_rule_repo;
pub mod project_discipline_repo;
pub mod project_repo;
pub mod user_repo;

pub use client_repo::ClientRepo;
pub use document_repo::DocumentRepo;
pub use lookup_repo::{DisciplineRepo, DocumentTypeRepo};
pub use notification_repo::NotificationRepo;
pub use progress_rule_repo::ProgressRuleRepo;
pub use project_discipline_repo::ProjectDisciplineRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
