use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "ioscope", version, about = "Model I/O introspection")]
pub struct Cli {
    /// Log level (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve input names, shapes and dtypes of a model manifest
    Inspect {
        /// Path to the JSON metadata manifest
        #[arg(long)]
        manifest: PathBuf,

        /// Expected backend (engine, legacy, graph, interpreter or an alias)
        #[arg(long)]
        backend: Option<String>,

        /// Batch size written into dimension 0
        #[arg(long, default_value_t = 1)]
        batch_size: usize,

        /// Input layer name override (repeatable)
        #[arg(long = "input-name")]
        input_names: Vec<String>,

        /// Input shape override without batch, e.g. 224,224,3 (repeatable)
        #[arg(long = "input-shape", value_parser = parse_dims)]
        input_shapes: Vec<Dims>,

        /// Output layer name override (repeatable)
        #[arg(long = "output-name")]
        output_names: Vec<String>,

        /// Prefix stripped from discovered graph output names
        #[arg(long)]
        import_scope: Option<String>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List supported backends and what their adapters can do
    Backends,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// One `--input-shape` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dims(pub Vec<usize>);

pub fn parse_dims(raw: &str) -> Result<Dims, String> {
    raw.split(',')
        .map(|d| {
            d.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid dimension `{d}`: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Dims)
}
