use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `Taskforge` - task tracking API with AI task breakdowns.
#[derive(Parser, Debug)]
#[command(name = "taskforge")]
#[command(version = "0.1.0")]
#[command(about = "Task tracking API with AI task breakdowns.", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (default: [gateway] host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on; 0 picks a free port (default: [gateway] port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the model for a task breakdown and print it as JSON
    Suggest {
        /// Free-text task description
        description: String,
    },

    /// Normalize a raw model reply read from a file or stdin
    Normalize {
        /// Read the reply from this file instead of stdin
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
