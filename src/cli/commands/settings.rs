use std::path::PathBuf;

use clap::Subcommand;

use crate::cli::utils::output;
use crate::cli::OutputFormat;
use crate::settings::{KpiSettings, SettingsStore, DEFAULT_COMMISSION_MULTIPLIER};

#[derive(Subcommand)]
pub enum SettingsCommands {
    #[command(about = "Print the current settings (defaults if the document is missing)")]
    Show {
        #[arg(long, default_value = "config.json", help = "Settings document")]
        path: PathBuf,
    },

    #[command(about = "Write a new settings document")]
    Set {
        #[arg(long, help = "Number of rentable units in service")]
        active_units: i64,

        #[arg(long, default_value_t = DEFAULT_COMMISSION_MULTIPLIER, help = "Flat per-booking commission")]
        commission_multiplier: f64,

        #[arg(long, default_value = "config.json", help = "Settings document")]
        path: PathBuf,
    },
}

pub async fn handle(cmd: SettingsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SettingsCommands::Show { path } => {
            let settings = SettingsStore::new(&path).read().await;
            print_settings(output_format, &settings)
        }
        SettingsCommands::Set {
            active_units,
            commission_multiplier,
            path,
        } => {
            let settings = KpiSettings {
                active_units,
                commission_multiplier,
            };
            SettingsStore::new(&path).write(&settings).await?;
            print_settings(output_format, &settings)
        }
    }
}

fn print_settings(output_format: OutputFormat, settings: &KpiSettings) -> anyhow::Result<()> {
    output(output_format, settings, |s| {
        println!("active_units:          {}", s.active_units);
        println!("commission_multiplier: {}", s.commission_multiplier);
    })
}
