// src/cli.rs — CLI definition (clap derive)

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tubepulse",
    about = "YouTube channel analytics bot with AI growth strategies",
    version
)]
pub struct Cli {
    /// Config file path (defaults to ./config.toml when present)
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Telegram bot (default when no subcommand is given)
    Run,
    /// Serve the working directory over HTTP with CORS headers (dev loop)
    Serve {
        /// Port to bind on localhost
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check which credentials and features are configured
    Doctor,
}
