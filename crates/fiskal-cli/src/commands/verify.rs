//! Verify command - re-validate extracted JSON records.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use rust_decimal::Decimal;
use tracing::warn;

use fiskal_core::models::receipt::ReceiptRecord;
use fiskal_core::receipt::Validator;

use super::load_config;

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// Glob pattern matching JSON records
    #[arg(required = true)]
    input: String,
}

pub async fn run(args: VerifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let validator = Validator::new(config.extraction.sum_tolerance);

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No JSON records found for pattern: {}", args.input);
    }

    let mut grand_total = Decimal::ZERO;
    let mut records = 0;
    let mut with_issues = 0;
    let mut unreadable = 0;

    for path in &files {
        let record: ReceiptRecord = match fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str(&content)?))
        {
            Ok(record) => record,
            Err(e) => {
                warn!("Cannot read record {}: {}", path.display(), e);
                eprintln!("{} {}: {}", style("✗").red(), path.display(), e);
                unreadable += 1;
                continue;
            }
        };

        records += 1;
        let total = record.total.unwrap_or_default();
        match grand_total.checked_add(total) {
            Some(sum) => grand_total = sum,
            None => warn!("Total of {} left out of the grand total: sum exceeds the decimal range", path.display()),
        }

        let issues = validator.validate(&record);
        if !issues.is_empty() {
            with_issues += 1;
            println!("{} {}", style("!").yellow(), path.display());
            for issue in &issues {
                println!("  - {}", issue);
            }
        }
    }

    println!();
    println!(
        "{} records, {} with issues, {} unreadable",
        records,
        style(with_issues).yellow(),
        style(unreadable).red()
    );
    println!("Grand total: {}", grand_total);

    Ok(())
}
