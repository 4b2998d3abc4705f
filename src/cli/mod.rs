pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "relayctl")]
#[command(about = "Operator tools for the faculty chat relay")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a JWT for a role using the configured secret")]
    Token(commands::token::TokenArgs),

    #[command(about = "Show which tables a message would read for a role")]
    Detect(commands::detect::DetectArgs),

    #[command(about = "Print the effective chat policy as YAML")]
    Policy(commands::policy::PolicyArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Detect(args) => commands::detect::handle(args, output_format),
        Commands::Policy(args) => commands::policy::handle(args, output_format),
    }
}
