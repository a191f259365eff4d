use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;
pub mod watcher;

pub use crate::synth::emit::OutputFormat;

use crate::cli::Cli;

pub const DEFAULT_SCHEMA_PATH: &str = "form-schema.json";
pub const DEFAULT_OUTPUT_PATH: &str = "generated/form.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Schema file to read
    pub schema: PathBuf,
    /// Where the generated form is written
    pub output: PathBuf,
    #[serde(default)]
    pub format: OutputFormat,
    /// Custom Tera template; overrides `format` when set
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema: PathBuf::from(DEFAULT_SCHEMA_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            format: OutputFormat::default(),
            template: None,
        }
    }
}

impl Settings {
    /// Create settings from CLI arguments (config file, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::from_file(&cli.config)?;

        // CLI > env vars > config file > defaults
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    /// Load `<root>/formsynth.{toml,yaml,json}` if present.
    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let settings = Self::from_file(&Path::new(root).join("formsynth"))?;
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let s = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .set_default("schema", DEFAULT_SCHEMA_PATH)?
            .set_default("output", DEFAULT_OUTPUT_PATH)?
            .set_default("format", "json")?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(schema) = &cli.schema {
            self.schema = schema.clone();
        }
        if let Some(output) = &cli.output {
            self.output = output.clone();
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if let Some(template) = &cli.template {
            self.template = Some(template.clone());
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::SettingsValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Configuration validation failed:\n{}", error_messages.join("\n"))
        })
    }
}
