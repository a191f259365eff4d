use clap::Parser;
use std::path::PathBuf;

use crate::config::OutputFormat;

/// Form synthesizer - validate a form schema and generate a render-ready form
#[derive(Parser, Debug, Clone)]
#[command(name = "formsynth", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "FORMSYNTH_CONFIG", default_value = "formsynth.toml")]
    pub config: PathBuf,

    /// Schema file to read (JSON, YAML or TOML)
    #[arg(short, long, env = "FORMSYNTH_SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Where to write the generated form
    #[arg(short, long, env = "FORMSYNTH_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, env = "FORMSYNTH_FORMAT", value_enum)]
    pub format: Option<OutputFormat>,

    /// Custom Tera template to render the form with
    #[arg(long, env = "FORMSYNTH_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Validate the schema without writing any output
    #[arg(long)]
    pub check: bool,

    /// Regenerate whenever the schema changes
    #[arg(long, conflicts_with = "check")]
    pub watch: bool,

    /// Run a JSON value map through the generated form and submit it
    #[arg(long, value_name = "FILE")]
    pub values: Option<PathBuf>,

    /// Print the JSON Schema of the schema file format and exit
    #[arg(long)]
    pub print_schema: bool,
}
