use std::io;
use std::path::PathBuf;

use folio_storage::error::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template parse error: {0}")]
    TemplateParse(String),

    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    #[error("failed to {op} {}: {source}", .path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("path cannot be used as a file URL: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("browser error: {0}")]
    Browser(String),

    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<tera::Error> for ExportError {
    fn from(e: tera::Error) -> Self {
        match &e.kind {
            tera::ErrorKind::TemplateNotFound(name) => ExportError::TemplateNotFound(name.clone()),
            _ => ExportError::TemplateRender(error_chain(&e)),
        }
    }
}

impl From<chromiumoxide::error::CdpError> for ExportError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        ExportError::Browser(e.to_string())
    }
}

/// Tera keeps the useful part of a failure (the offending variable or
/// filter) in the source chain, not in the top-level message.
pub(crate) fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

pub(crate) fn fs_error(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> ExportError {
    ExportError::Filesystem {
        op,
        path: path.into(),
        source,
    }
}
