//! yamlconf cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Change the work directory
    ///
    /// Can be specified multiple times. Note that all
    /// paths on the way to the final path must exist.
    ///
    /// This is equivalent to running { cd <directory>; yamlconf ... }
    #[clap(short = 'C', long = "directory", global(true))]
    pub directory: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a document or directory and print the resolved namespace
    Load(LoadCommand),

    /// Load a document or directory and save the resolved tree as a single document
    Save(SaveCommand),

    /// Run a named operation (list_entries, is_document, parse, load_file, load_from_directory)
    Call(CallCommand),
}

#[derive(Parser, Debug)]
pub struct LoadCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct SaveCommand {
    #[clap(flatten)]
    pub input: InputArgs,

    /// Document to write (overwritten if it exists)
    pub destination: PathBuf,

    /// Nesting level from which collections are written inline
    #[arg(long, default_value_t = 5)]
    pub inline: usize,

    /// Spaces per nesting level
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Format flags (1: multi-line strings as literal blocks)
    #[arg(long, default_value_t = 0)]
    pub flags: u32,
}

#[derive(Parser, Debug)]
pub struct CallCommand {
    #[arg(short = 'f', long = "input-format", default_value_t)]
    pub format: InputFormat,

    #[clap(flatten)]
    pub output: OutputArgs,

    pub operation: String,

    pub argument: String,
}

#[derive(Parser, Debug)]
pub struct InputArgs {
    /// Document or directory to load
    pub path: PathBuf,

    /// Namespace the loaded tree is published under
    #[arg(short = 'n', long = "namespace", default_value = "config")]
    pub namespace: String,

    #[arg(short = 'f', long = "input-format", default_value_t)]
    pub format: InputFormat,

    /// Give up after this many resolution passes
    #[arg(long = "max-passes", default_value_t = 64)]
    pub max_passes: usize,

    /// Define a value other documents can look up, e.g. `app.name=Laravel`
    #[arg(short = 'D', long = "define", value_parser = parse_definition)]
    pub definitions: Vec<(String, String)>,
}

fn parse_definition(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Default, Debug)]
pub enum InputFormat {
    #[default]
    Yaml,
    Hcl,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Yaml => f.write_str("yaml"),
            InputFormat::Hcl => f.write_str("hcl"),
        }
    }
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
