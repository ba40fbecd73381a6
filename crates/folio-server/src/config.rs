use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use folio_export::generator::PdfConfig;
use folio_export::pdf::BrowserSettings;
use folio_export::render::DEFAULT_EXTENSION;

/// Where media records and files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaBackend {
    Local { root: PathBuf },
    S3 { bucket: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub pdf: PdfConfig,
    pub template_dir: PathBuf,
    pub media: MediaBackend,
    pub bind: SocketAddr,
    pub browser: BrowserSettings,
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from a variable lookup, so tests need not touch the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let media = match var("FOLIO_MEDIA_BACKEND", "local").as_str() {
            "local" => MediaBackend::Local {
                root: PathBuf::from(var("FOLIO_MEDIA_DIR", "./media")),
            },
            "s3" => MediaBackend::S3 {
                bucket: lookup("FOLIO_BUCKET")
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| eyre::eyre!("FOLIO_BUCKET is required for the s3 media backend"))?,
            },
            other => return Err(eyre::eyre!("unknown FOLIO_MEDIA_BACKEND: {other}")),
        };

        let bind_raw = var("FOLIO_BIND", "0.0.0.0:3000");
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| eyre::eyre!("invalid FOLIO_BIND {bind_raw:?}: {e}"))?;

        Ok(Self {
            pdf: PdfConfig {
                output_dir: PathBuf::from(var("FOLIO_OUTPUT_DIR", "./pdf")),
                tmp_dir: PathBuf::from(var("FOLIO_TMP_DIR", "./tmp")),
                template_extension: var("FOLIO_TEMPLATE_EXTENSION", DEFAULT_EXTENSION),
            },
            template_dir: PathBuf::from(var("FOLIO_TEMPLATE_DIR", "./templates")),
            media,
            bind,
            browser: BrowserSettings {
                executable: lookup("FOLIO_CHROME").filter(|p| !p.is_empty()).map(PathBuf::from),
                no_sandbox: parse_bool("FOLIO_NO_SANDBOX", lookup("FOLIO_NO_SANDBOX"))?,
            },
        })
    }
}

fn parse_bool(key: &str, value: Option<String>) -> eyre::Result<bool> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => Err(eyre::eyre!("invalid boolean for {key}: {other:?}")),
    }
}
