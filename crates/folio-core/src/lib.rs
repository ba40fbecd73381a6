//! folio-core
//!
//! Pure domain types and storage key conventions.
//! No AWS SDK or browser dependency — this is the shared vocabulary of Folio.

pub mod error;
pub mod keys;
pub mod models;
