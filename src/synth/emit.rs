//! Artifact emitters.
//!
//! A [`FormArtifact`] is written either as pretty JSON (consumed by a runtime
//! renderer) or as source text produced by a Tera template. The built-in
//! `form.html` template renders a static HTML skeleton; a custom template
//! receives the artifact as `form` and may include `form.html`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use thiserror::Error;

use super::FormArtifact;

const HTML_TEMPLATE_NAME: &str = "form.html";
const HTML_TEMPLATE: &str = include_str!("templates/form.html.tera");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Failed to read template {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template rendering failed: {0}")]
    Render(#[from] tera::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render the artifact. A custom template, when given, takes precedence over
/// `format`.
pub fn emit(artifact: &FormArtifact, format: OutputFormat, template: Option<&Path>) -> Result<String, EmitError> {
    if let Some(path) = template {
        let source = std::fs::read_to_string(path).map_err(|source| EmitError::Template {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("custom")
            .trim_end_matches(".tera");
        return render_template(artifact, name, &source);
    }

    match format {
        OutputFormat::Json => render_json(artifact),
        OutputFormat::Html => render_html(artifact),
    }
}

pub fn render_json(artifact: &FormArtifact) -> Result<String, EmitError> {
    let mut out = serde_json::to_string_pretty(artifact)?;
    out.push('\n');
    Ok(out)
}

pub fn render_html(artifact: &FormArtifact) -> Result<String, EmitError> {
    let tera = builtin_templates()?;
    render_with(&tera, HTML_TEMPLATE_NAME, artifact)
}

/// Render a user-supplied template. HTML-escaping follows Tera's rules for the
/// template name (on for `.html`, `.htm` and `.xml`).
pub fn render_template(artifact: &FormArtifact, name: &str, source: &str) -> Result<String, EmitError> {
    let mut tera = builtin_templates()?;
    tera.add_raw_template(name, source)?;
    render_with(&tera, name, artifact)
}

fn builtin_templates() -> Result<Tera, EmitError> {
    let mut tera = Tera::default();
    tera.add_raw_template(HTML_TEMPLATE_NAME, HTML_TEMPLATE)?;
    Ok(tera)
}

fn render_with(tera: &Tera, name: &str, artifact: &FormArtifact) -> Result<String, EmitError> {
    let mut context = Context::new();
    context.insert("form", artifact);
    let mut out = tera.render(name, &context)?;
    if !out.ends_with('\n') {
        out.push('\n');
    }
    Ok(out)
}
