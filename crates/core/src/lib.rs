//! Domain logic for the engineering document registry.
//!
//! Everything in this crate is free of database and HTTP concerns. Persistence
//! is reached only through the [`import::ImportStore`] trait, which callers
//! inject.

pub mod document;
pub mod error;
pub mod export;
pub mod import;
pub mod notification;
pub mod permissions;
pub mod project;
pub mod spreadsheet;
pub mod types;
