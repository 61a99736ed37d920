//! Row models and DTOs, one module per table.

pub mod client;
pub mod document;
pub mod lookup;
pub mod notification;
pub mod progress_rule;
pub mod project;
pub mod project_discipline;
pub mod user;
