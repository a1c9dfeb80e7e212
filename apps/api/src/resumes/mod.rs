//! Saved résumés: per-user CRUD over the edited field-set.

pub mod handlers;
pub mod store;
