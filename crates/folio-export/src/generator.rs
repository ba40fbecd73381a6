//! End-to-end template → PDF → media pipeline.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use folio_core::models::media::Media;
use folio_storage::media::{MediaStore, ensure_directory};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::error::{ExportError, fs_error};
use crate::fs;
use crate::pdf::{DocumentRenderer, RenderOptions};
use crate::render::{DEFAULT_EXTENSION, TemplateRenderer, normalize_template_name};

/// Folder layout of a [`PdfGenerator`].
#[derive(Debug, Clone)]
pub struct PdfConfig {
    /// Where generated PDFs are written.
    pub output_dir: PathBuf,
    /// Where intermediate HTML is written.
    pub tmp_dir: PathBuf,
    /// Appended to template references that lack it.
    pub template_extension: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("pdf"),
            tmp_dir: PathBuf::from("tmp"),
            template_extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

pub struct PdfGenerator {
    templates: Arc<dyn TemplateRenderer>,
    renderer: Arc<dyn DocumentRenderer>,
    media: Arc<dyn MediaStore>,
    output_dir: RwLock<PathBuf>,
    tmp_dir: PathBuf,
    template_extension: String,
}

impl PdfGenerator {
    pub fn new(
        config: PdfConfig,
        templates: Arc<dyn TemplateRenderer>,
        renderer: Arc<dyn DocumentRenderer>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            templates,
            renderer,
            media,
            output_dir: RwLock::new(config.output_dir),
            tmp_dir: config.tmp_dir,
            template_extension: config.template_extension,
        }
    }

    /// Change where subsequent calls write their PDFs.
    pub fn set_output_folder(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        info!(path = %path.display(), "pdf output folder changed");
        *self.output_dir.write().unwrap_or_else(PoisonError::into_inner) = path;
    }

    pub fn output_folder(&self) -> PathBuf {
        self.output_dir
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn tmp_folder(&self) -> &Path {
        &self.tmp_dir
    }

    /// Render the document at URL `from` into a PDF at `to`.
    ///
    /// `options.path` and `options.format` win over `to` and A4 when set.
    /// Options are validated before the renderer is invoked.
    /// Returns the path the PDF was written to.
    pub async fn generate(
        &self,
        from: &str,
        to: &Path,
        options: RenderOptions,
    ) -> Result<PathBuf, ExportError> {
        let options = options.with_defaults(to);
        options.to_print_params()?;
        let path = options.path.clone().unwrap_or_else(|| to.to_path_buf());
        debug!(from, path = %path.display(), format = ?options.format, "generating pdf");
        self.renderer.render_pdf(from, &options).await?;
        Ok(path)
    }

    /// Render template `from` with `context` and convert the result to a PDF
    /// in the output folder. The caller owns the returned file.
    pub async fn generate_from_template(
        &self,
        from: &str,
        context: &Value,
        options: RenderOptions,
    ) -> Result<PathBuf, ExportError> {
        // Snapshot so a concurrent set_output_folder cannot split this call.
        let output_dir = self.output_folder();
        let tmp_dir = self.tmp_dir.clone();
        tokio::try_join!(fs::safe_make_dir(&tmp_dir), fs::safe_make_dir(&output_dir))?;

        let template = normalize_template_name(from, &self.template_extension);
        let html = self.templates.render(&template, context)?;

        let html_path = tmp_dir.join(format!("{}.html", Uuid::new_v4()));
        fs::create_file(&html_path, &html).await?;

        let pdf_path = output_dir.join(format!("{}.pdf", Uuid::new_v4()));
        let caller_path = options.path.is_some();
        let converted = match file_url(&html_path) {
            Ok(url) => self.generate(&url, &pdf_path, options).await,
            Err(e) => Err(e),
        };

        if let Err(e) = fs::delete_file(&html_path).await {
            warn!(path = %html_path.display(), error = %e, "failed to remove intermediate html");
        }

        match converted {
            Ok(path) => {
                info!(template = %template, path = %path.display(), "pdf generated from template");
                Ok(path)
            }
            Err(e) => {
                if !caller_path {
                    remove_partial(&pdf_path).await;
                }
                Err(e)
            }
        }
    }

    /// Like [`generate_from_template`](Self::generate_from_template), then
    /// register the PDF as media owned by `owner` inside `directory`.
    pub async fn generate_media_from_template(
        &self,
        from: &str,
        context: &Value,
        options: RenderOptions,
        owner: Option<Uuid>,
        directory: Option<Uuid>,
    ) -> Result<Media, ExportError> {
        if let Some(dir) = directory {
            ensure_directory(self.media.as_ref(), dir).await?;
        }

        let caller_path = options.path.is_some();
        let pdf = self.generate_from_template(from, context, options).await?;
        let filename = pdf
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ExportError::InvalidPath(pdf.clone()))?
            .to_string();

        match self
            .media
            .persist_temp_file(&filename, &pdf, owner, directory)
            .await
        {
            Ok(media) => Ok(media),
            Err(e) => {
                if !caller_path {
                    remove_partial(&pdf).await;
                }
                Err(e.into())
            }
        }
    }
}

/// `file://` URL for a local path, made absolute first.
pub fn file_url(path: &Path) -> Result<String, ExportError> {
    let absolute = std::path::absolute(path).map_err(|e| fs_error("resolve", path, e))?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|()| ExportError::InvalidPath(absolute))
}

async fn remove_partial(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed partial pdf"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial pdf"),
    }
}
