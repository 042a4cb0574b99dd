//! Command-line interface for Sibyl.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sibyl - serve predictions from a pre-trained model over HTTP.
#[derive(Parser, Debug)]
#[command(name = "sibyl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the model and serve the HTTP API
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "SIBYL_CONFIG")]
        config: Option<PathBuf>,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, env = "SIBYL_LOG_LEVEL")]
        log_level: Option<String>,

        /// Bind address for the HTTP listener
        #[arg(short, long, env = "SIBYL_BIND_ADDR")]
        bind: Option<String>,

        /// Path to the model artifact
        #[arg(short, long, env = "SIBYL_MODEL_PATH")]
        model: Option<PathBuf>,

        /// Debug mode: verbose logs, internal error details in responses
        #[arg(long)]
        debug: bool,
    },

    /// Print a summary of a model artifact
    Inspect {
        /// Path to the model artifact
        model: PathBuf,
    },

    /// Run a single prediction without starting the server
    Predict {
        /// Path to the model artifact
        model: PathBuf,

        /// Comma-separated feature values
        #[arg(value_delimiter = ',', allow_negative_numbers = true, required = true)]
        features: Vec<f64>,
    },

    /// Re-encode a model artifact (format chosen by file extension)
    Convert {
        /// Source artifact
        input: PathBuf,

        /// Destination artifact
        output: PathBuf,
    },

    /// Show version information
    Version,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
