//! # formsynth - schema-driven form synthesis
//!
//! formsynth reads a declarative form schema (sections of typed fields plus
//! actions), checks it for structural errors and synthesizes a render-ready
//! form definition: controls, conditional visibility, validation rules and
//! initial values.
//!
//! ## Features
//!
//! - **Schema loading**: JSON, YAML or TOML, with a published JSON Schema
//! - **Validation**: collect-all structural checks plus non-fatal lint warnings
//! - **Synthesis**: pure and deterministic, byte-identical output across runs
//! - **Emitters**: JSON artifact, built-in HTML skeleton or a custom Tera template
//! - **Runtime model**: immutable `FormState` reducer with touched-gated errors
//! - **Watch mode**: regenerate whenever the schema changes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formsynth::config::Settings;
//! use formsynth::pipeline;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::default();
//!     let outcome = pipeline::generate(&settings, false)?;
//!     println!("{} sections", outcome.artifact.sections.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **schema**: input model, loader and validator
//! - **synth**: artifact model, synthesizer and emitters
//! - **form**: runtime state and the submit port
//! - **pipeline**: orchestration of load, validate, synthesize and write
//! - **config**: settings, settings validation and the file watcher

pub mod cli;
pub mod config;
pub mod form;
pub mod pipeline;
pub mod schema;
pub mod synth;
pub mod value;

use anyhow::Context;
use std::path::Path;
use tracing::{error, info};

use crate::cli::Cli;
use crate::config::watcher::SchemaWatcher;
use crate::config::Settings;
use crate::form::{submit, FormEvent, FormState, LoggingSubmitHandler, SubmitError};
use crate::pipeline::{report_violations, PipelineError};
use crate::schema::Schema;
use crate::synth::FormArtifact;
use crate::value::FieldValue;

/// Entry point shared by the binary and the integration tests.
///
/// `Ok(false)` means the run failed on its input (schema violations or
/// invalid form values) after reporting why; `Err` is reserved for I/O,
/// parse and configuration failures.
pub async fn run(cli: Cli) -> anyhow::Result<bool> {
    if cli.print_schema {
        println!("{}", serde_json::to_string_pretty(&Schema::json_schema())?);
        return Ok(true);
    }

    let settings = Settings::new_with_cli(&cli)?;

    let outcome = match pipeline::generate(&settings, cli.check) {
        Ok(outcome) => outcome,
        Err(PipelineError::Invalid(violations)) => {
            report_violations(&mut std::io::stderr().lock(), &violations)?;
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    match &outcome.written {
        Some(path) => println!("Form generated at {}", path.display()),
        None => println!("Schema {} is valid", settings.schema.display()),
    }

    if let Some(values_path) = &cli.values {
        if !submit_values(&outcome.artifact, values_path).await? {
            return Ok(false);
        }
    }

    if cli.watch {
        watch(settings).await?;
    }

    Ok(true)
}

/// Build a form state from a JSON value map as if a user had typed it in.
///
/// Keys that are not fields of the form are ignored.
pub fn fill(artifact: &FormArtifact, values: &serde_json::Value) -> anyhow::Result<FormState> {
    let map = values
        .as_object()
        .context("Value file must contain a JSON object")?;

    let state = map.iter().fold(FormState::new(artifact), |state, (field, value)| {
        state.apply(
            artifact,
            FormEvent::Change {
                field: field.clone(),
                value: FieldValue::from_json(value),
            },
        )
    });
    Ok(state.apply(artifact, FormEvent::SubmitAttempt))
}

/// Returns `false` when the values do not pass the form's rules.
async fn submit_values(artifact: &FormArtifact, path: &Path) -> anyhow::Result<bool> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read value file {}", path.display()))?;
    let values: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse value file {}", path.display()))?;

    let state = fill(artifact, &values)?;
    match submit(&state, &LoggingSubmitHandler::new()).await {
        Ok(receipt) => {
            println!("{}", receipt.message);
            Ok(true)
        }
        Err(SubmitError::Invalid(errors)) => {
            eprintln!("Form values are invalid:");
            for (field, message) in &errors {
                eprintln!("  - {}: {}", field, message);
            }
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

async fn watch(settings: Settings) -> anyhow::Result<()> {
    let mut paths = vec![settings.schema.clone()];
    paths.extend(settings.template.clone());

    let _watcher = SchemaWatcher::new(paths, move || match pipeline::generate(&settings, false) {
        Ok(outcome) => {
            if let Some(path) = outcome.written {
                info!("Form regenerated at {}", path.display());
            }
        }
        Err(PipelineError::Invalid(violations)) => {
            for violation in &violations {
                error!("{}", violation);
            }
            error!("Schema validation failed, keeping the previous output");
        }
        Err(e) => error!("Regeneration failed: {}", e),
    })?;

    info!("Watching for schema changes, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Stopping watcher");
    Ok(())
}
