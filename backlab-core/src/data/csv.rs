//! CSV file provider.
//!
//! Reads `<dir>/<TICKER>.csv` with the header `date,open,high,low,close,volume`
//! and dates formatted `YYYY-MM-DD`. Extra columns (e.g. `adj_close`) are ignored.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{MarketDataProvider, ProviderError};
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

impl From<CsvRow> for Bar {
    fn from(row: CsvRow) -> Self {
        Bar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            // Some exports write volume as a float; negatives clamp to zero.
            volume: row.volume.max(0.0) as u64,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    fn read_file(path: &Path) -> Result<Vec<Bar>, ProviderError> {
        let display = path.display().to_string();
        let mut reader = ::csv::ReaderBuilder::new()
            .trim(::csv::Trim::All)
            .from_path(path)
            .map_err(|e| ProviderError::Io {
                path: display.clone(),
                reason: e.to_string(),
            })?;

        reader
            .deserialize::<CsvRow>()
            .map(|row| {
                row.map(Bar::from).map_err(|e| ProviderError::Csv {
                    path: display.clone(),
                    reason: e.to_string(),
                })
            })
            .collect()
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch_raw(
        &self,
        ticker: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<Bar>, ProviderError> {
        let path = self.path_for(ticker);
        if !path.is_file() {
            return Err(ProviderError::SymbolNotFound {
                ticker: ticker.to_string(),
            });
        }
        Self::read_file(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &Path, ticker: &str, body: &str) {
        let mut f = std::fs::File::create(dir.join(format!("{ticker}.csv"))).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn reads_and_canonicalizes() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "ABC",
            "date,open,high,low,close,volume\n\
             2024-01-03,2,2,2,2,200\n\
             2024-01-02,1,1,1,1,100\n\
             2024-01-03,3,3,3,3,300.0\n",
        );
        let provider = CsvProvider::new(dir.path());
        let bars = provider.fetch("ABC", d("2024-01-01"), d("2024-01-31")).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 1.0);
        assert_eq!(bars[1].close, 3.0);
        assert_eq!(bars[1].volume, 300);
    }

    #[test]
    fn missing_file_is_symbol_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvProvider::new(dir.path())
            .fetch("NOPE", d("2024-01-01"), d("2024-01-31"))
            .unwrap_err();
        assert!(matches!(err, ProviderError::SymbolNotFound { .. }));
    }

    #[test]
    fn malformed_row_is_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "BAD",
            "date,open,high,low,close,volume\n2024-01-02,1,1,1,not-a-number,1\n",
        );
        let err = CsvProvider::new(dir.path())
            .fetch("BAD", d("2024-01-01"), d("2024-01-31"))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Csv { .. }));
    }
}
