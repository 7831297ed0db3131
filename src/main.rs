use clap::{Parser, Subcommand};
use std::process;

use ollama_bridge::cmd;

#[derive(Parser)]
#[command(name = "ollama-bridge")]
#[command(version = "0.1.0")]
#[command(about = "Bridge web pages to a local Ollama server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Serve,
    Send {
        prompt: String,
        #[arg(short, long)]
        model: Option<String>,
    },
    #[command(alias = "ls")]
    Models,
    Domains {
        #[command(subcommand)]
        command: DomainCommands,
    },
}

#[derive(Subcommand)]
enum DomainCommands {
    List,
    Add {
        pattern: String,
    },
    AddCurrent {
        url: String,
    },
    AllowAll,
    Remove {
        pattern: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve => cmd::serve().await,
        Commands::Send { prompt, model } => cmd::send(&prompt, model).await,
        Commands::Models => cmd::models().await,
        Commands::Domains { command } => match command {
            DomainCommands::List => cmd::domains_list().await,
            DomainCommands::Add { pattern } => cmd::domains_add(&pattern).await,
            DomainCommands::AddCurrent { url } => cmd::domains_add_current(&url).await,
            DomainCommands::AllowAll => cmd::domains_allow_all().await,
            DomainCommands::Remove { pattern } => cmd::domains_remove(&pattern).await,
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
