//! Batch processing command for multiple receipt files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use fiskal_core::models::config::FiskalConfig;
use fiskal_core::receipt::{ExtractionResult, ParseOutcome, ReceiptParser, TextReceiptParser};

use super::{is_supported, iso_datetime, load_config, read_document};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input files
    #[arg(required = true)]
    input: String,

    /// Directory for one JSON record per receipt
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory receiving copies of files with issues or failures
    #[arg(long, default_value = "errors")]
    errors_dir: PathBuf,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,
}

enum Outcome {
    Receipt(ExtractionResult),
    Skipped,
    Failed(String),
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Outcome,
    processing_time_ms: u64,
}

impl FileResult {
    fn status(&self) -> &'static str {
        match &self.outcome {
            Outcome::Receipt(r) if r.issues.is_empty() => "ok",
            Outcome::Receipt(_) => "issues",
            Outcome::Skipped => "skipped",
            Outcome::Failed(_) => "error",
        }
    }

    fn needs_review(&self) -> bool {
        matches!(self.status(), "issues" | "error")
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let results = process_files(files, &config, args.jobs, &pb).await?;
    pb.finish_and_clear();

    for result in &results {
        if let (Outcome::Receipt(extracted), Some(output_dir)) = (&result.outcome, &args.output_dir) {
            let output_path = output_dir.join(output_name(&result.path));
            fs::write(&output_path, serde_json::to_string_pretty(&extracted.record)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    let quarantined = quarantine(&results, &args.errors_dir)?;

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let count = |status: &str| results.iter().filter(|r| r.status() == status).count();

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} ok, {} with issues, {} skipped, {} failed",
        style(count("ok")).green(),
        style(count("issues")).yellow(),
        count("skipped"),
        style(count("error")).red()
    );

    if quarantined > 0 {
        println!();
        println!(
            "{} {} files copied to {}",
            style("!").yellow(),
            quarantined,
            args.errors_dir.display()
        );
        for result in results.iter().filter(|r| r.needs_review()) {
            match &result.outcome {
                Outcome::Failed(error) => println!("  - {}: {}", result.path.display(), error),
                Outcome::Receipt(extracted) => {
                    let issues: Vec<String> = extracted.issues.iter().map(ToString::to_string).collect();
                    println!("  - {}: {}", result.path.display(), issues.join("; "));
                }
                Outcome::Skipped => {}
            }
        }
    }

    Ok(())
}

/// Parse every file on the blocking pool, at most `jobs` at a time.
async fn process_files(
    files: Vec<PathBuf>,
    config: &FiskalConfig,
    jobs: usize,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<FileResult>> {
    let parser = Arc::new(TextReceiptParser::from_config(&config.extraction));
    let config = Arc::new(config.clone());
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let parser = Arc::clone(&parser);
        let config = Arc::clone(&config);
        let pb = pb.clone();
        let task_path = path.clone();

        let handle = tokio::task::spawn_blocking(move || {
            let path = task_path;
            let _permit = permit;
            let file_start = Instant::now();

            let outcome = match process_single_file(&path, &parser, &config) {
                Ok(ParseOutcome::Receipt(result)) => Outcome::Receipt(result),
                Ok(ParseOutcome::NotApplicable) => {
                    debug!("Skipping shift report {}", path.display());
                    Outcome::Skipped
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", path.display(), e);
                    Outcome::Failed(e.to_string())
                }
            };

            pb.inc(1);
            FileResult {
                path,
                outcome,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        });
        handles.push((path, handle));
    }

    Ok(collect_results(handles, pb).await)
}

/// Await every worker; a worker that died counts as a failure of its file.
async fn collect_results(
    handles: Vec<(PathBuf, JoinHandle<FileResult>)>,
    pb: &ProgressBar,
) -> Vec<FileResult> {
    let mut results = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                error!("Worker for {} failed: {}", path.display(), e);
                pb.inc(1);
                FileResult {
                    path,
                    outcome: Outcome::Failed(format!("worker failed: {}", e)),
                    processing_time_ms: 0,
                }
            }
        };
        results.push(result);
    }
    results
}

/// JSON record name for an input file, keeping its extension so that
/// `a.pdf` and `a.txt` do not collide.
fn output_name(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");
    format!("{}.json", name)
}

fn process_single_file(
    path: &Path,
    parser: &TextReceiptParser,
    config: &FiskalConfig,
) -> anyhow::Result<ParseOutcome> {
    let text = read_document(path, config)?;
    Ok(parser.parse(&text)?)
}

/// Copy files with issues or failures into `errors_dir`.
fn quarantine(results: &[FileResult], errors_dir: &Path) -> anyhow::Result<usize> {
    let mut copied = 0;
    for result in results.iter().filter(|r| r.needs_review()) {
        let Some(name) = result.path.file_name() else {
            continue;
        };
        fs::create_dir_all(errors_dir)?;
        fs::copy(&result.path, errors_dir.join(name))?;
        copied += 1;
    }
    Ok(copied)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "receipt_number",
        "datetime",
        "seller_name",
        "total",
        "items",
        "issues",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.outcome {
            Outcome::Receipt(extracted) => {
                let record = &extracted.record;
                let issues: Vec<String> = extracted.issues.iter().map(ToString::to_string).collect();
                wtr.write_record([
                    filename,
                    result.status(),
                    &record.receipt_number.clone().unwrap_or_default(),
                    &iso_datetime(record).unwrap_or_default(),
                    &record.seller_name.clone().unwrap_or_default(),
                    &record.total.map(|t| t.to_string()).unwrap_or_default(),
                    &record.items.len().to_string(),
                    &issues.join("; "),
                    &time,
                    "",
                ])?;
            }
            Outcome::Skipped => {
                wtr.write_record([filename, "skipped", "", "", "", "", "", "", &time, ""])?;
            }
            Outcome::Failed(error) => {
                wtr.write_record([filename, "error", "", "", "", "", "", "", &time, error])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
