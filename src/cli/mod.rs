//! CLI for the knowledge assistant

pub mod serve;

use clap::{Parser, Subcommand};

/// Knowledge Assistant - retrieval-augmented question answering with tiered caching
#[derive(Parser)]
#[command(name = "knowledge-assistant")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
