//! CLI surface, ported from the original's `cmd/start.go` cobra flags.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "taskhive", about = "A priority task queue, dispatcher, and worker fleet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP ingress, gRPC dispatch server, worker fleet, and shell.
    Start {
        /// Queuing mode: "local" or "redis".
        #[arg(short, long, default_value = "local")]
        mode: Option<String>,
        /// Number of concurrent workers.
        #[arg(short, long)]
        workers: Option<usize>,
    },
}
