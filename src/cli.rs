use clap::{Parser, Subcommand};

/// HireWire — notification and email delivery service
#[derive(Parser)]
#[command(name = "hirewired", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind (overrides HIREWIRE_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
