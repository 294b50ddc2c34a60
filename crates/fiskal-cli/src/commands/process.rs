//! Process command - extract data from a single receipt file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fiskal_core::models::receipt::{ReceiptRecord, ReceiptType};
use fiskal_core::receipt::{ParseOutcome, ReceiptParser, TextReceiptParser};

use super::{iso_datetime, load_config, read_document};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per item
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Reading document...");

    let text = read_document(&args.input, &config)?;

    pb.set_message("Extracting receipt data...");
    let parser = TextReceiptParser::from_config(&config.extraction);
    let outcome = parser.parse(&text)?;
    pb.finish_and_clear();

    let result = match outcome {
        ParseOutcome::Receipt(result) => result,
        ParseOutcome::NotApplicable => {
            eprintln!(
                "{} {} is a shift report, nothing to extract",
                style("ℹ").blue(),
                args.input.display()
            );
            return Ok(());
        }
    };

    if !result.issues.is_empty() {
        eprintln!("{}", style("Validation issues:").yellow());
        for issue in &result.issues {
            eprintln!("  - {}", issue);
        }
    }

    let output = format_record(&result.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "Parsed in {}ms, total {:?}",
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}

pub fn format_record(record: &ReceiptRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ReceiptRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "receipt_number",
        "datetime",
        "seller_name",
        "inn",
        "description",
        "unit",
        "quantity",
        "unit_price",
        "sum",
        "vat_percent",
    ])?;

    let receipt_number = record.receipt_number.clone().unwrap_or_default();
    let datetime = iso_datetime(record).unwrap_or_default();
    let seller = record.seller_name.clone().unwrap_or_default();
    let inn = record.inn.clone().unwrap_or_default();

    for item in &record.items {
        wtr.write_record([
            &receipt_number,
            &datetime,
            &seller,
            &inn,
            &item.description,
            &item.unit.clone().unwrap_or_default(),
            &item.quantity.to_string(),
            &item.unit_price.to_string(),
            &item.sum.to_string(),
            &item.vat_percent.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(record: &ReceiptRecord) -> String {
    let mut output = String::new();
    let unset = || "-".to_string();

    let kind = match record.receipt_type {
        Some(ReceiptType::Sale) => "sale",
        Some(ReceiptType::Return) => "return",
        None => "unknown",
    };

    output.push_str(&format!(
        "Receipt: {} ({})\n",
        record.receipt_number.clone().unwrap_or_else(unset),
        kind
    ));
    output.push_str(&format!(
        "Date: {}\n",
        iso_datetime(record).unwrap_or_else(unset)
    ));
    output.push_str(&format!(
        "Seller: {}\n",
        record.seller_name.clone().unwrap_or_else(unset)
    ));
    if let Some(inn) = &record.inn {
        output.push_str(&format!("  ИНН: {}\n", inn));
    }
    if let Some(address) = &record.address {
        output.push_str(&format!("  {}\n", address));
    }
    output.push('\n');

    output.push_str("Items:\n");
    for item in &record.items {
        output.push_str(&format!(
            "  {} {} x {} = {}\n",
            item.description, item.quantity, item.unit_price, item.sum
        ));
    }
    output.push('\n');

    output.push_str(&format!(
        "Total: {}\n",
        record.total.map(|t| t.to_string()).unwrap_or_else(unset)
    ));
    if let Some(cash) = record.paid_cash {
        output.push_str(&format!("  Cash: {}\n", cash));
    }
    if let Some(card) = record.paid_card {
        output.push_str(&format!("  Card: {}\n", card));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fiskal_core::models::receipt::LineItem;
    use rust_decimal::Decimal;

    fn record() -> ReceiptRecord {
        ReceiptRecord {
            receipt_number: Some("42".to_string()),
            datetime: NaiveDate::from_ymd_opt(2024, 3, 1).and_then(|d| d.and_hms_opt(10, 15, 0)),
            receipt_type: Some(ReceiptType::Sale),
            total: Some(Decimal::new(12000, 2)),
            items: vec![LineItem {
                description: "Milk 1L".to_string(),
                unit: Some("liter".to_string()),
                quantity: Decimal::new(2, 0),
                unit_price: Decimal::new(6000, 2),
                sum: Decimal::new(12000, 2),
                vat_percent: Some(10),
                payment_method: None,
                item_type: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_csv_has_row_per_item() {
        let csv = format_record(&record(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "42,2024-03-01T10:15:00,,,Milk 1L,liter,2,60.00,120.00,10");
    }

    #[test]
    fn test_text_summary() {
        let text = format_record(&record(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("Receipt: 42 (sale)\nDate: 2024-03-01T10:15:00\n"));
        assert!(text.contains("Milk 1L 2 x 60.00 = 120.00"));
        assert!(text.contains("Total: 120.00"));
    }
}
