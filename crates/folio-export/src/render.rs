use std::path::Path;

use serde_json::Value;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::{ExportError, error_chain};

/// Extension appended to template references that lack one.
pub const DEFAULT_EXTENSION: &str = "tera";

/// Append `.{extension}` to `name` unless it already ends with it.
pub fn normalize_template_name(name: &str, extension: &str) -> String {
    let suffix = format!(".{}", extension.trim_start_matches('.'));
    if name.ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

/// Turns a named template and a context into markup.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, name: &str, context: &Value) -> Result<String, ExportError>;
}

/// Tera-backed templates (Jinja2 syntax).
pub struct TeraTemplates {
    tera: Tera,
}

impl TeraTemplates {
    /// Load every template under `dir`. Names are paths relative to `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, ExportError> {
        let glob = format!("{}/**/*", dir.display());
        let tera = Tera::new(&glob).map_err(|e| ExportError::TemplateParse(error_chain(&e)))?;
        debug!(dir = %dir.display(), count = tera.get_template_names().count(), "templates loaded");
        Ok(Self::with_escaping(tera))
    }

    /// Build from in-memory `(name, source)` pairs.
    pub fn from_raw<'a>(
        templates: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, ExportError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates)
            .map_err(|e| ExportError::TemplateParse(error_chain(&e)))?;
        Ok(Self::with_escaping(tera))
    }

    // Output is always HTML, so escape regardless of the template's suffix.
    fn with_escaping(mut tera: Tera) -> Self {
        tera.autoescape_on(vec![".tera", ".html", ".htm", ".xml"]);
        Self { tera }
    }
}

impl TemplateRenderer for TeraTemplates {
    fn render(&self, name: &str, context: &Value) -> Result<String, ExportError> {
        let context = match context {
            Value::Null => Context::new(),
            other => Context::from_value(other.clone())?,
        };
        Ok(self.tera.render(name, &context)?)
    }
}
