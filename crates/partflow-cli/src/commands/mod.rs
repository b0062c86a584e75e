//! CLI command definitions and dispatch.

pub mod put;

use clap::{Parser, Subcommand};

use partflow_core::config::AppConfig;
use partflow_core::error::AppError;

/// PartFlow — streaming multipart uploads for S3-compatible stores
#[derive(Debug, Parser)]
#[command(name = "partflow", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/<env>.toml)
    #[arg(short, long, default_value = "default")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upload a file as a streaming multipart upload
    Put(put::PutArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Put(args) => put::execute(args, config).await,
        }
    }
}
