pub mod commands;
pub mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kpi")]
#[command(about = "Offline tools for the booking workbook and KPI settings")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show how a workbook's columns map and how its rows normalize")]
    Inspect {
        #[arg(help = "Path to the .xlsx workbook")]
        file: PathBuf,

        #[arg(long, default_value_t = 5, help = "Number of normalized records to print")]
        rows: usize,
    },

    #[command(about = "Compute a KPI snapshot from a workbook")]
    Compute(commands::compute::ComputeArgs),

    #[command(about = "Read or write the KPI settings document")]
    Settings {
        #[command(subcommand)]
        cmd: commands::settings::SettingsCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Inspect { file, rows } => commands::inspect::handle(&file, rows, output_format).await,
        Commands::Compute(args) => commands::compute::handle(args, output_format).await,
        Commands::Settings { cmd } => commands::settings::handle(cmd, output_format).await,
    }
}
