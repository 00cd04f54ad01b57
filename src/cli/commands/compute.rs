use std::path::PathBuf;

use chrono::Local;
use clap::Args;

use super::load_dataset;
use crate::cli::utils::{money, output};
use crate::cli::OutputFormat;
use crate::kpi::{self, KpiQuery};
use crate::settings::{KpiSettings, SettingsStore};

#[derive(Args)]
pub struct ComputeArgs {
    #[arg(help = "Path to the .xlsx workbook")]
    pub file: PathBuf,

    #[arg(long, help = "First day, YYYY-MM-DD (default: 30 days before --end)")]
    pub start: Option<String>,

    #[arg(long, help = "Last day, YYYY-MM-DD (default: today)")]
    pub end: Option<String>,

    #[arg(long, help = "Region filter, e.g. \"Region A\" (\"All\" for none)")]
    pub region: Option<String>,

    #[arg(long, help = "Channel filter (\"All\" for none)")]
    pub channel: Option<String>,

    #[arg(long, help = "Settings document to read (default: built-in defaults)")]
    pub settings: Option<PathBuf>,
}

pub async fn handle(args: ComputeArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let query = KpiQuery::parse(
        args.start.as_deref(),
        args.end.as_deref(),
        args.region,
        args.channel,
        Local::now().date_naive(),
    )?;

    let settings = match &args.settings {
        Some(path) => SettingsStore::new(path).read().await,
        None => KpiSettings::default(),
    };
    let dataset = load_dataset(&args.file).await?;
    let snapshot = kpi::compute(&dataset, &query, &settings);

    output(output_format, &snapshot, |s| {
        println!("KPIs {} .. {} ({} days)", query.start, query.end, query.days_in_period());
        println!("  active units        {}", s.active_units);
        println!("  revenue             {}", money(s.total_revenue));
        println!("  reservations        {}", s.total_reservations);
        println!("  check-ins           {}", s.check_ins);
        println!("  check-outs          {}", s.check_outs);
        println!("  nightly rate        {}", money(s.average_nightly_rate));
        println!("  occupancy           {:.2}%", s.occupancy_rate);
        println!("  company commission  {}", money(s.company_commission));
        println!("  cleaning fees       {}", money(s.cleaning_fee_total));
        println!("  partner commission  {}", money(s.partner_commission));
    })
}
