//! folio-storage
//!
//! Media persistence. A `MediaStore` registers generated files as media
//! records, backed either by a local directory or an S3 bucket.

pub mod client;
pub mod error;
pub mod media;
pub mod objects;
pub mod state;
