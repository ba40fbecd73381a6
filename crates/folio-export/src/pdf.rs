//! HTML → PDF through a headless Chromium.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{ExportError, fs_error};

pub const DEFAULT_FORMAT: &str = "A4";

/// Page options forwarded to the browser's print-to-PDF.
///
/// Every field is optional; [`RenderOptions::with_defaults`] fills in the
/// output path and paper format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub path: Option<PathBuf>,
    /// Named paper size, e.g. `A4` or `Letter` (case-insensitive).
    pub format: Option<String>,
    /// Paper width. Overrides the width of `format`; puppeteer gives
    /// `format` precedence instead.
    pub width: Option<Length>,
    /// Paper height. Overrides the height of `format`, as `width` does.
    pub height: Option<Length>,
    pub landscape: Option<bool>,
    pub scale: Option<f64>,
    pub print_background: Option<bool>,
    pub display_header_footer: Option<bool>,
    pub header_template: Option<String>,
    pub footer_template: Option<String>,
    /// e.g. `1-5, 8`
    pub page_ranges: Option<String>,
    pub prefer_css_page_size: Option<bool>,
    pub margin: Option<Margin>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub left: Option<Length>,
}

/// A CSS length: a bare number of pixels, or a string with a
/// `px`, `in`, `cm` or `mm` suffix (no suffix means pixels).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Pixels(f64),
    Text(String),
}

const PIXELS_PER_INCH: f64 = 96.0;

impl Length {
    pub fn to_inches(&self) -> Result<f64, ExportError> {
        let pixels = match self {
            Length::Pixels(px) => *px,
            Length::Text(text) => {
                let text = text.trim();
                let (value, per_unit) = split_unit(text);
                let value: f64 = value
                    .trim()
                    .parse()
                    .map_err(|_| ExportError::InvalidOptions(format!("invalid length: {text:?}")))?;
                value * per_unit
            }
        };
        Ok(pixels / PIXELS_PER_INCH)
    }
}

/// Split a trailing unit off `text`, returning the number part and the
/// number of pixels per unit.
fn split_unit(text: &str) -> (&str, f64) {
    if text.len() >= 2 && text.is_char_boundary(text.len() - 2) {
        let (value, unit) = text.split_at(text.len() - 2);
        let per_unit = match unit.to_ascii_lowercase().as_str() {
            "px" => Some(1.0),
            "in" => Some(PIXELS_PER_INCH),
            "cm" => Some(37.8),
            "mm" => Some(3.78),
            _ => None,
        };
        if let Some(per_unit) = per_unit {
            return (value, per_unit);
        }
    }
    (text, 1.0)
}

/// Width and height in inches of a named paper format.
pub fn paper_size(format: &str) -> Option<(f64, f64)> {
    let size = match format.to_ascii_lowercase().as_str() {
        "letter" => (8.5, 11.0),
        "legal" => (8.5, 14.0),
        "tabloid" => (11.0, 17.0),
        "ledger" => (17.0, 11.0),
        "a0" => (33.1, 46.8),
        "a1" => (23.4, 33.1),
        "a2" => (16.54, 23.4),
        "a3" => (11.7, 16.54),
        "a4" => (8.27, 11.7),
        "a5" => (5.83, 8.27),
        "a6" => (4.13, 5.83),
        _ => return None,
    };
    Some(size)
}

impl RenderOptions {
    /// Fill `path` with `to` and `format` with A4 when the caller left them out.
    pub fn with_defaults(mut self, to: &Path) -> Self {
        if self.path.is_none() {
            self.path = Some(to.to_path_buf());
        }
        if self.format.is_none() {
            self.format = Some(DEFAULT_FORMAT.to_string());
        }
        self
    }

    /// Resolve paper format and lengths into print parameters (inches).
    pub fn to_print_params(&self) -> Result<PrintToPdfParams, ExportError> {
        let format = self.format.as_deref().unwrap_or(DEFAULT_FORMAT);
        let (mut width, mut height) = paper_size(format)
            .ok_or_else(|| ExportError::InvalidOptions(format!("unknown paper format: {format}")))?;
        if let Some(w) = &self.width {
            width = w.to_inches()?;
        }
        if let Some(h) = &self.height {
            height = h.to_inches()?;
        }

        let margin = self.margin.clone().unwrap_or_default();
        let inches = |length: &Option<Length>| -> Result<f64, ExportError> {
            length.as_ref().map_or(Ok(0.0), Length::to_inches)
        };

        Ok(PrintToPdfParams {
            landscape: self.landscape,
            display_header_footer: self.display_header_footer,
            print_background: self.print_background,
            scale: self.scale,
            paper_width: Some(width),
            paper_height: Some(height),
            margin_top: Some(inches(&margin.top)?),
            margin_bottom: Some(inches(&margin.bottom)?),
            margin_left: Some(inches(&margin.left)?),
            margin_right: Some(inches(&margin.right)?),
            page_ranges: self.page_ranges.clone(),
            header_template: self.header_template.clone(),
            footer_template: self.footer_template.clone(),
            prefer_css_page_size: self.prefer_css_page_size,
            ..Default::default()
        })
    }
}

/// Renders the document at a URL into a PDF file.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Load `source` and write the PDF to `options.path`.
    async fn render_pdf(&self, source: &str, options: &RenderOptions) -> Result<(), ExportError>;
}

/// How to launch the browser.
#[derive(Debug, Clone, Default)]
pub struct BrowserSettings {
    /// Chromium binary; auto-detected when unset.
    pub executable: Option<PathBuf>,
    /// Pass `--no-sandbox`, needed when running as root in containers.
    pub no_sandbox: bool,
}

/// Launches a fresh headless Chromium for every document.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    settings: BrowserSettings,
}

impl ChromiumRenderer {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig, ExportError> {
        let mut builder = BrowserConfig::builder();
        if let Some(executable) = &self.settings.executable {
            builder = builder.chrome_executable(executable);
        }
        if self.settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        builder.build().map_err(ExportError::Browser)
    }
}

#[async_trait]
impl DocumentRenderer for ChromiumRenderer {
    async fn render_pdf(&self, source: &str, options: &RenderOptions) -> Result<(), ExportError> {
        let path = options
            .path
            .as_deref()
            .ok_or_else(|| ExportError::InvalidOptions("missing output path".to_string()))?;
        let params = options.to_print_params()?;

        let (mut browser, mut handler) = Browser::launch(self.browser_config()?).await?;
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let printed = print_page(&browser, source, params).await;

        // Release the browser whether or not printing succeeded.
        if let Err(e) = browser.close().await {
            warn!(error = %e, "failed to close browser");
        }
        if let Err(e) = browser.wait().await {
            warn!(error = %e, "failed to reap browser process");
        }
        events.abort();
        let _ = events.await;

        let pdf = printed?;
        fs::write(path, &pdf)
            .await
            .map_err(|e| fs_error("write", path, e))?;
        debug!(source, path = %path.display(), bytes = pdf.len(), "pdf rendered");
        Ok(())
    }
}

async fn print_page(
    browser: &Browser,
    source: &str,
    params: PrintToPdfParams,
) -> Result<Vec<u8>, ExportError> {
    let page = browser.new_page(source).await?;
    page.wait_for_navigation().await?;
    let pdf = page.pdf(params).await?;
    if let Err(e) = page.close().await {
        warn!(error = %e, "failed to close page");
    }
    Ok(pdf)
}
