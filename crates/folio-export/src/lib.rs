//! folio-export
//!
//! Template → HTML → PDF pipeline, with optional registration of the result
//! as media.

pub mod error;
pub mod fs;
pub mod generator;
pub mod pdf;
pub mod render;
