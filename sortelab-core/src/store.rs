//! Draw history store — the engine's sole read dependency.
//!
//! The [`DrawStore`] trait abstracts over history sources so the engine
//! can be fed from CSV files, memory, or anything a host wires in. An
//! absent history is not an error: strategies degrade to uniform
//! sampling on empty input, so stores return an empty list rather than
//! failing when a format has no records yet.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::HistoricalDraw;

/// Errors from draw history stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error reading draw history: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed draw record (contest {contest}): {reason}")]
    MalformedRecord { contest: u32, reason: String },
}

/// Read access to a format's draw history.
pub trait DrawStore {
    /// All draws for `format_key` ascending by contest, or only the
    /// most recent `window` of them.
    fn list_draws(
        &self,
        format_key: &str,
        window: Option<usize>,
    ) -> Result<Vec<HistoricalDraw>, StoreError>;

    /// Highest contest id on record; 0 when there is no history.
    fn last_contest(&self, format_key: &str) -> Result<u32, StoreError> {
        Ok(self
            .list_draws(format_key, None)?
            .iter()
            .map(|d| d.contest_id)
            .max()
            .unwrap_or(0))
    }
}

fn apply_window(mut draws: Vec<HistoricalDraw>, window: Option<usize>) -> Vec<HistoricalDraw> {
    if let Some(w) = window {
        if draws.len() > w {
            draws = draws.split_off(draws.len() - w);
        }
    }
    draws
}

/// In-memory store for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    draws: HashMap<String, Vec<HistoricalDraw>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the history for a format.
    pub fn insert(&mut self, format_key: &str, mut draws: Vec<HistoricalDraw>) {
        draws.sort_by_key(|d| d.contest_id);
        self.draws.insert(format_key.to_string(), draws);
    }

    /// Append one draw, keeping contest order.
    pub fn push(&mut self, format_key: &str, draw: HistoricalDraw) {
        let draws = self.draws.entry(format_key.to_string()).or_default();
        draws.push(draw);
        draws.sort_by_key(|d| d.contest_id);
    }
}

impl DrawStore for MemoryStore {
    fn list_draws(
        &self,
        format_key: &str,
        window: Option<usize>,
    ) -> Result<Vec<HistoricalDraw>, StoreError> {
        let draws = self.draws.get(format_key).cloned().unwrap_or_default();
        Ok(apply_window(draws, window))
    }
}

/// CSV-backed store: one `<format_key>.csv` per format under a root
/// directory, with `contest,date,numbers` columns and space-separated
/// numbers (`"04 08 15 16 23 42"`).
#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    contest: u32,
    #[serde(default)]
    date: Option<NaiveDate>,
    numbers: String,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, format_key: &str) -> PathBuf {
        self.root.join(format!("{format_key}.csv"))
    }
}

impl DrawStore for CsvStore {
    fn list_draws(
        &self,
        format_key: &str,
        window: Option<usize>,
    ) -> Result<Vec<HistoricalDraw>, StoreError> {
        let path = self.path_for(format_key);
        if !path.exists() {
            // No file yet means no history yet.
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)?;

        let mut draws = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row?;
            let mut numbers = Vec::new();
            for token in row.numbers.split_whitespace() {
                let n: u8 = token.parse().map_err(|_| StoreError::MalformedRecord {
                    contest: row.contest,
                    reason: format!("bad number '{token}'"),
                })?;
                numbers.push(n);
            }
            if numbers.is_empty() {
                return Err(StoreError::MalformedRecord {
                    contest: row.contest,
                    reason: "no numbers".to_string(),
                });
            }
            draws.push(HistoricalDraw {
                contest_id: row.contest,
                draw_date: row.date,
                numbers,
            });
        }

        draws.sort_by_key(|d| d.contest_id);
        Ok(apply_window(draws, window))
    }
}
