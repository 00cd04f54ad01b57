use std::path::Path;

use serde::Serialize;

use super::load_dataset;
use crate::cli::utils::{money, or_dash, output};
use crate::cli::OutputFormat;
use crate::dataset::{BookingRecord, DatasetSummary};

#[derive(Serialize)]
struct Inspection<'a> {
    summary: DatasetSummary,
    sample: &'a [BookingRecord],
}

pub async fn handle(file: &Path, rows: usize, output_format: OutputFormat) -> anyhow::Result<()> {
    let dataset = load_dataset(file).await?;
    let report = Inspection {
        summary: dataset.summary(),
        sample: &dataset.records[..rows.min(dataset.records.len())],
    };

    output(output_format, &report, |report| {
        let summary = &report.summary;
        println!("{}", file.display());
        println!("  sha256:    {}", summary.fingerprint);
        println!("  rows:      {} ({} malformed)", summary.rows, summary.malformed_rows);
        match &summary.check_in_span {
            Some(span) => println!("  check-ins: {} .. {}", span.first, span.last),
            None => println!("  check-ins: none"),
        }
        println!("  channels:  {}", summary.channels.join(", "));

        println!("\nColumns:");
        for column in &summary.columns {
            println!(
                "  {:<20} <- {:<28} col {}",
                column.canonical,
                or_dash(column.source.as_deref()),
                or_dash(column.position)
            );
        }

        println!("\nFirst {} records:", report.sample.len());
        for record in report.sample {
            println!(
                "  {:<12} {:<8} {:<14} in {} out {} nights {} total {}",
                or_dash(record.listing_name.as_deref()),
                record.region.label(),
                or_dash(record.channel.as_deref()),
                or_dash(record.check_in),
                or_dash(record.check_out),
                or_dash(record.nights),
                or_dash(record.invoice_total.map(money)),
            );
        }
    })
}
