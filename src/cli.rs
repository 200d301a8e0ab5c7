use clap::{Parser, Subcommand};

/// Interactive chat application using Google's Gemini AI model.
#[derive(Parser)]
#[command(name = "gemini-chat", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Enable debug logging.
        #[arg(short, long)]
        debug: bool,
    },

    /// Serve the chat web interface.
    Web {
        /// Address to bind.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(long, default_value_t = 5000)]
        port: u16,

        /// Enable debug logging.
        #[arg(short, long)]
        debug: bool,
    },
}
