pub mod batch;
pub mod config;
pub mod process;
pub mod verify;

use std::fs;
use std::path::Path;

use fiskal_core::models::config::FiskalConfig;
use fiskal_core::models::receipt::ReceiptRecord;
use fiskal_core::pdf::PdfExtractor;
use tracing::debug;

/// Load configuration from `path`, the default location, or built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<FiskalConfig> {
    let path = match path {
        Some(p) => Path::new(p).to_path_buf(),
        None => config::default_config_path(),
    };

    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(FiskalConfig::from_file(&path)?)
    } else {
        Ok(FiskalConfig::default())
    }
}

/// Whether `path` has an extension the pipeline can read.
pub fn is_supported(path: &Path) -> bool {
    matches!(extension(path).as_str(), "pdf" | "txt")
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Read the text of one receipt document.
pub fn read_document(path: &Path, config: &FiskalConfig) -> anyhow::Result<String> {
    match extension(path).as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::with_config(&config.pdf);
            Ok(extractor.load_text(&data)?)
        }
        "txt" => Ok(fs::read_to_string(path)?),
        other => anyhow::bail!("Unsupported file format: {}", other),
    }
}

/// Receipt timestamp in the ISO-8601 form used by the JSON records.
pub fn iso_datetime(record: &ReceiptRecord) -> Option<String> {
    record
        .datetime
        .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
}
