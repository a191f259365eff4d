//! Load → validate → synthesize → emit → write.
//!
//! Output is written only after every earlier stage succeeded, so a failed
//! run never leaves a partial artifact behind.

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::schema::{LoadError, Schema, SchemaValidator, SchemaViolation};
use crate::synth::emit::{emit, EmitError};
use crate::synth::{synthesize, FormArtifact};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Schema validation failed with {} violation(s)", .0.len())]
    Invalid(Vec<SchemaViolation>),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct GenerateOutcome {
    pub artifact: FormArtifact,
    pub rendered: String,
    /// `None` for check-only runs
    pub written: Option<PathBuf>,
}

/// Lint, validate and synthesize an already loaded schema.
pub fn prepare(schema: &Schema) -> Result<FormArtifact, PipelineError> {
    for warning in SchemaValidator::lint(schema) {
        warn!("{}", warning);
    }

    SchemaValidator::validate(schema).map_err(PipelineError::Invalid)?;

    let artifact = synthesize(schema);
    debug!(
        "Synthesized '{}': {} section(s), {} rule(s)",
        artifact.title,
        artifact.sections.len(),
        artifact.rules.len()
    );
    Ok(artifact)
}

/// Run the whole pipeline for `settings`. With `check` set nothing is written.
pub fn generate(settings: &Settings, check: bool) -> Result<GenerateOutcome, PipelineError> {
    info!("Loading schema from {}", settings.schema.display());
    let schema = Schema::load(&settings.schema)?;
    let artifact = prepare(&schema)?;
    let rendered = emit(&artifact, settings.format, settings.template.as_deref())?;

    if check {
        info!("Schema '{}' is valid", artifact.title);
        return Ok(GenerateOutcome {
            artifact,
            rendered,
            written: None,
        });
    }

    write_output(&settings.output, &rendered)?;
    info!("Wrote {} bytes to {}", rendered.len(), settings.output.display());

    Ok(GenerateOutcome {
        artifact,
        rendered,
        written: Some(settings.output.clone()),
    })
}

fn write_output(path: &Path, content: &str) -> Result<(), PipelineError> {
    let wrap = |source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(wrap)?;
    }
    std::fs::write(path, content).map_err(wrap)
}

/// Write the human-readable violation report.
pub fn report_violations(out: &mut impl Write, violations: &[SchemaViolation]) -> std::io::Result<()> {
    writeln!(out, "Schema validation failed:")?;
    for violation in violations {
        writeln!(out, "  - {}", violation)?;
    }
    writeln!(out, "Aborting: no form was generated.")
}
