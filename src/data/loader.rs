use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use super::model::{SalesDataset, SalesRecord};

/// Client removed from every load (internal account, not a customer).
pub const EXCLUDED_CLIENT_CODE_NORM: i64 = 12334;

/// Columns every yearly file must carry, by exact header name.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    "client_code",
    "client_code_norm",
    "client_name",
    "net_sales",
];

// ---------------------------------------------------------------------------
// Load outcome
// ---------------------------------------------------------------------------

/// Non-fatal problems met while loading the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadWarning {
    #[error("Data folder '{}' not found. Create it and put the yearly CSV files inside.", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Data folder '{}' could not be read: {reason}", .path.display())]
    UnreadableDirectory { path: PathBuf, reason: String },

    #[error("File {file} was skipped: {reason}")]
    InvalidFile { file: String, reason: String },

    #[error("No valid CSV files found (for example: ventas_2024.csv, ventas_2025.csv).")]
    NoValidFiles,
}

/// The unified dataset together with every warning raised while building it.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub dataset: SalesDataset,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    fn empty_with(warning: LoadWarning) -> Self {
        log::warn!("{warning}");
        LoadReport {
            dataset: SalesDataset::default(),
            warnings: vec![warning],
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load every yearly CSV in `dir` into one dataset.
///
/// Never fails: a missing directory, a bad file or an empty folder each
/// become a [`LoadWarning`] and the affected input contributes no rows.
/// Callers must check `dataset.is_empty()` before rendering anything.
pub fn load_all_csvs(dir: &Path) -> LoadReport {
    if !dir.exists() {
        return LoadReport::empty_with(LoadWarning::MissingDirectory(dir.to_path_buf()));
    }

    let files = match list_csv_files(dir) {
        Ok(files) => files,
        Err(e) => {
            return LoadReport::empty_with(LoadWarning::UnreadableDirectory {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let mut warnings = Vec::new();
    let mut records = Vec::new();
    let mut loaded_files = 0usize;

    for path in &files {
        let file_name = file_name_of(path);
        let Some(year) = extract_year(&file_name) else {
            log::debug!("Skipping {file_name}: no year in file name");
            continue;
        };

        match load_csv_file(path, year) {
            Ok(rows) => {
                log::info!("Loaded {} rows for {year} from {file_name}", rows.len());
                records.extend(rows);
                loaded_files += 1;
            }
            Err(e) => {
                let warning = LoadWarning::InvalidFile {
                    file: file_name,
                    reason: format!("{e:#}"),
                };
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    if loaded_files == 0 {
        log::warn!("{}", LoadWarning::NoValidFiles);
        warnings.push(LoadWarning::NoValidFiles);
        return LoadReport {
            dataset: SalesDataset::default(),
            warnings,
        };
    }

    let before = records.len();
    records.retain(|r| r.client_code_norm != EXCLUDED_CLIENT_CODE_NORM);
    if records.len() != before {
        log::debug!(
            "Dropped {} rows of excluded client {EXCLUDED_CLIENT_CODE_NORM}",
            before - records.len()
        );
    }

    LoadReport {
        dataset: SalesDataset::from_records(records),
        warnings,
    }
}

/// Regular files directly inside `dir` whose name ends in `.csv` (any case),
/// sorted by file name.
pub fn list_csv_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| file_name_of(path).to_ascii_lowercase().ends_with(".csv"))
        .collect();

    files.sort_by_key(|path| file_name_of(path));
    Ok(files)
}

/// First four consecutive ASCII digits of a file name, read as a year.
///
/// `ventas_2024.csv` → 2024, `report.csv` → `None`.
pub fn extract_year(file_name: &str) -> Option<i32> {
    static YEAR_RE: OnceLock<Regex> = OnceLock::new();
    let re = YEAR_RE.get_or_init(|| Regex::new(r"[0-9]{4}").expect("valid year regex"));
    re.find(file_name)?.as_str().parse().ok()
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Single-file loader
// ---------------------------------------------------------------------------

/// Raw row, cells kept as text so numeric errors can name the column.
/// Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    client_code: String,
    client_code_norm: String,
    client_name: String,
    net_sales: String,
}

/// Read one yearly file, tagging every row with `year`.
fn load_csv_file(path: &Path, year: i32) -> Result<Vec<SalesRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("missing required columns: {}", missing.join(", "));
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRow>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {}", row_no + 1))?;

        let code_norm = parse_client_code_norm(&raw.client_code_norm)
            .with_context(|| format!("CSV row {}, client_code_norm", row_no + 1))?;
        let net_sales = parse_net_sales(&raw.net_sales).with_context(|| {
            format!("CSV row {}, net_sales: '{}' is not a number", row_no + 1, raw.net_sales)
        })?;

        records.push(SalesRecord::new(
            raw.client_code,
            code_norm,
            raw.client_name,
            net_sales,
            year,
        ));
    }

    Ok(records)
}

/// Blank cells read as NaN and keep their row; aggregations skip them.
fn parse_net_sales(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    Ok(s.parse::<f64>()?)
}

/// Accepts integer cells (`12334`) and integral floats (`12334.0`), as
/// written by spreadsheet exports.
fn parse_client_code_norm(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    let f: f64 = s
        .parse()
        .with_context(|| format!("'{s}' is not a number"))?;
    if !f.is_finite() || f.fract() != 0.0 {
        bail!("'{s}' is not an integer id");
    }
    Ok(f as i64)
}
