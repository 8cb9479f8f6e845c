use crate::error::LoaderError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core_types::Candle;
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

const DATE_COLUMNS: [&str; 3] = ["date", "timestamp", "time"];
const SYMBOL_COLUMNS: [&str; 2] = ["symbol", "ticker"];

/// Epoch values at or above this are taken to be milliseconds.
const MILLIS_THRESHOLD: u64 = 100_000_000_000;

/// Reads OHLC rows or a single price column from CSV.
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    symbol: Option<String>,
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only rows whose `symbol`/`ticker` column matches, ignoring case.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Loads one candle per row. Rows with a blank open or close are skipped.
    pub fn load_candles<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Candle>, LoaderError> {
        let (file, source) = open(path.as_ref())?;
        self.read_candles(file, &source)
    }

    /// Loads a single price column for close-to-close comparison.
    pub fn load_closes<P: AsRef<Path>>(
        &self,
        path: P,
        column: &str,
    ) -> Result<Vec<Decimal>, LoaderError> {
        let (file, source) = open(path.as_ref())?;
        self.read_closes(file, &source, column)
    }

    /// Like `load_candles`, from any reader. `source` names the input in errors.
    pub fn read_candles<R: Read>(&self, reader: R, source: &str) -> Result<Vec<Candle>, LoaderError> {
        let mut rows = RowReader::new(reader, source, self.symbol.as_deref())?;
        let open = rows.require("open")?;
        let close = rows.require("close")?;
        let high = rows.find(&["high"]);
        let low = rows.find(&["low"]);

        let mut candles = Vec::new();
        while let Some((line, record)) = rows.next_record()? {
            let (Some(open_raw), Some(close_raw)) =
                (field(&record, Some(open)), field(&record, Some(close)))
            else {
                rows.skipped += 1;
                continue;
            };

            let mut candle = Candle::new(
                rows.decimal(line, "open", open_raw)?,
                rows.decimal(line, "close", close_raw)?,
            );
            if let (Some(high_raw), Some(low_raw)) = (field(&record, high), field(&record, low)) {
                let high_price = rows.decimal(line, "high", high_raw)?;
                let low_price = rows.decimal(line, "low", low_raw)?;
                candle = candle.with_range(high_price, low_price).map_err(|source| LoaderError::InvalidRow {
                    path: rows.source.clone(),
                    line,
                    source,
                })?;
            }

            let date = rows.date(line, &record)?;
            if let Some(date) = date {
                candle = candle.with_date(date);
            }
            candles.push((date, candle));
        }

        rows.finish(candles)
    }

    /// Like `load_closes`, from any reader. `source` names the input in errors.
    pub fn read_closes<R: Read>(
        &self,
        reader: R,
        source: &str,
        column: &str,
    ) -> Result<Vec<Decimal>, LoaderError> {
        let mut rows = RowReader::new(reader, source, self.symbol.as_deref())?;
        let price = rows.require(column)?;

        let mut closes = Vec::new();
        while let Some((line, record)) = rows.next_record()? {
            let Some(raw) = field(&record, Some(price)) else {
                rows.skipped += 1;
                continue;
            };
            let value = rows.decimal(line, column, raw)?;
            closes.push((rows.date(line, &record)?, value));
        }

        rows.finish(closes)
    }
}

fn open(path: &Path) -> Result<(File, String), LoaderError> {
    let source = path.display().to_string();
    let file = File::open(path).map_err(|source_err| LoaderError::Io {
        path: source.clone(),
        source: source_err,
    })?;
    Ok((file, source))
}

/// A non-blank cell, if the column exists.
fn field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .filter(|value| !value.is_empty())
}

/// Header lookup, row filtering and cell parsing for one CSV input.
struct RowReader<R: Read> {
    reader: Reader<R>,
    source: String,
    headers: Vec<String>,
    date: Option<usize>,
    symbol: Option<(usize, String)>,
    skipped: usize,
    filtered: usize,
}

impl<R: Read> RowReader<R> {
    fn new(input: R, source: &str, symbol: Option<&str>) -> Result<Self, LoaderError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|source_err| LoaderError::Csv {
                path: source.to_string(),
                source: source_err,
            })?
            .iter()
            .map(|header| header.to_ascii_lowercase())
            .collect();

        let mut rows = Self {
            reader,
            source: source.to_string(),
            headers,
            date: None,
            symbol: None,
            skipped: 0,
            filtered: 0,
        };
        rows.date = rows.find(&DATE_COLUMNS);

        if let Some(symbol) = symbol {
            let index = rows.find(&SYMBOL_COLUMNS).ok_or_else(|| LoaderError::MissingColumn {
                path: rows.source.clone(),
                column: SYMBOL_COLUMNS.join("/"),
            })?;
            rows.symbol = Some((index, symbol.to_string()));
        }

        Ok(rows)
    }

    fn find(&self, names: &[&str]) -> Option<usize> {
        names
            .iter()
            .find_map(|name| self.headers.iter().position(|header| header == name))
    }

    fn require(&self, name: &str) -> Result<usize, LoaderError> {
        self.find(&[name.to_ascii_lowercase().as_str()])
            .ok_or_else(|| LoaderError::MissingColumn {
                path: self.source.clone(),
                column: name.to_string(),
            })
    }

    /// The next record that passes the symbol filter, with its line number.
    fn next_record(&mut self) -> Result<Option<(u64, StringRecord)>, LoaderError> {
        loop {
            let mut record = StringRecord::new();
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|source_err| LoaderError::Csv {
                    path: self.source.clone(),
                    source: source_err,
                })?;
            if !more {
                return Ok(None);
            }

            if let Some((index, symbol)) = &self.symbol {
                let matches = record
                    .get(*index)
                    .is_some_and(|value| value.eq_ignore_ascii_case(symbol));
                if !matches {
                    self.filtered += 1;
                    continue;
                }
            }

            let line = record.position().map_or(0, |position| position.line());
            return Ok(Some((line, record)));
        }
    }

    fn decimal(&self, line: u64, column: &str, raw: &str) -> Result<Decimal, LoaderError> {
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|_| self.invalid(line, column, raw))
    }

    fn date(&self, line: u64, record: &StringRecord) -> Result<Option<NaiveDate>, LoaderError> {
        let Some(raw) = field(record, self.date) else {
            return Ok(None);
        };
        parse_date(raw)
            .map(Some)
            .ok_or_else(|| self.invalid(line, "date", raw))
    }

    fn invalid(&self, line: u64, column: &str, raw: &str) -> LoaderError {
        LoaderError::InvalidValue {
            path: self.source.clone(),
            line,
            column: column.to_string(),
            value: raw.to_string(),
        }
    }

    /// Orders the rows by date when every row has one, then strips the dates.
    fn finish<T>(self, mut rows: Vec<(Option<NaiveDate>, T)>) -> Result<Vec<T>, LoaderError> {
        if self.skipped > 0 {
            tracing::warn!(
                source = %self.source,
                skipped = self.skipped,
                "Skipped rows with missing prices"
            );
        }
        if self.filtered > 0 {
            tracing::warn!(
                source = %self.source,
                filtered = self.filtered,
                "Dropped rows for other symbols"
            );
        }
        if rows.is_empty() {
            return Err(LoaderError::NoRows { path: self.source });
        }

        let dated = rows.iter().filter(|(date, _)| date.is_some()).count();
        if dated == rows.len() {
            // Stable, so rows sharing a date keep their file order.
            rows.sort_by_key(|(date, _)| *date);
        } else if dated > 0 {
            tracing::warn!(
                source = %self.source,
                dated,
                total = rows.len(),
                "Some rows have no date; keeping file order"
            );
        }

        tracing::debug!(source = %self.source, rows = rows.len(), "Loaded price rows");
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }
}

/// Accepts ISO dates, ISO date-times, RFC 3339 and epoch seconds or milliseconds.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    let epoch = raw.parse::<i64>().ok()?;
    let secs = if epoch.unsigned_abs() >= MILLIS_THRESHOLD {
        epoch / 1000
    } else {
        epoch
    };
    DateTime::from_timestamp(secs, 0).map(|datetime| datetime.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn candles(csv: &str) -> Result<Vec<Candle>, LoaderError> {
        CsvLoader::new().read_candles(csv.as_bytes(), "inline")
    }

    #[test]
    fn headers_are_case_insensitive() {
        let rows = candles("Date,Open,High,Low,Close\n2024-01-02,100,103,99,102\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].open, dec!(100));
        assert_eq!(rows[0].close, dec!(102));
        assert_eq!(rows[0].high, Some(dec!(103)));
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn dated_rows_are_sorted() {
        let rows = candles(
            "date,open,close\n2024-01-03,3,4\n2024-01-01,1,2\n2024-01-02,2,3\n",
        )
        .unwrap();
        let opens: Vec<Decimal> = rows.iter().map(|c| c.open).collect();
        assert_eq!(opens, vec![dec!(1), dec!(2), dec!(3)]);
    }

    #[test]
    fn undated_rows_keep_file_order() {
        let rows = candles("open,close\n3,4\n1,2\n").unwrap();
        assert_eq!(rows[0].open, dec!(3));
        assert_eq!(rows[0].date, None);
    }

    #[test]
    fn blank_prices_are_skipped() {
        let rows = candles("open,close\n1,2\n,3\n4,\n5,6\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].close, dec!(6));
    }

    #[test]
    fn missing_close_column() {
        let err = candles("open,high\n1,2\n").unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn { ref column, .. } if column == "close"));
    }

    #[test]
    fn bad_value_reports_line() {
        let err = candles("open,close\n1,2\n1,abc\n").unwrap_err();
        match err {
            LoaderError::InvalidValue { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "close");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn inconsistent_range_is_rejected() {
        let err = candles("open,high,low,close\n100,101,99,105\n").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidRow { line: 2, .. }));
    }

    #[test]
    fn header_only_file_has_no_rows() {
        assert!(matches!(candles("open,close\n").unwrap_err(), LoaderError::NoRows { .. }));
    }

    #[test]
    fn symbol_filter_keeps_matching_rows() {
        let csv = "symbol,date,open,close\nBTC,2024-01-01,1,2\nETH,2024-01-01,10,9\nbtc,2024-01-02,2,3\n";
        let rows = CsvLoader::new()
            .with_symbol("BTC")
            .read_candles(csv.as_bytes(), "inline")
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|c| c.open < dec!(10)));
    }

    #[test]
    fn symbol_filter_counts_dropped_rows() {
        let csv = "symbol,open,close\nBTC,1,2\nETH,10,9\nSOL,5,6\n";
        let mut rows = RowReader::new(csv.as_bytes(), "inline", Some("btc")).unwrap();
        let mut kept = 0;
        while rows.next_record().unwrap().is_some() {
            kept += 1;
        }
        assert_eq!(kept, 1);
        assert_eq!(rows.filtered, 2);
        assert_eq!(rows.skipped, 0);
    }

    #[test]
    fn symbol_filter_needs_a_symbol_column() {
        let err = CsvLoader::new()
            .with_symbol("BTC")
            .read_candles("open,close\n1,2\n".as_bytes(), "inline")
            .unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn { .. }));
    }

    #[test]
    fn closes_from_named_column() {
        let csv = "timestamp,price\n1704153600000,101.5\n1704067200000,100\n";
        let closes = CsvLoader::new()
            .read_closes(csv.as_bytes(), "inline", "Price")
            .unwrap();
        // Epoch milliseconds: 2024-01-02 then 2024-01-01, so they swap.
        assert_eq!(closes, vec![dec!(100), dec!(101.5)]);
    }

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2);
        assert_eq!(parse_date("2024-01-02"), expected);
        assert_eq!(parse_date("2024-01-02 13:45:00"), expected);
        assert_eq!(parse_date("2024-01-02T13:45:00Z"), expected);
        assert_eq!(parse_date("1704153600"), expected);
        assert_eq!(parse_date("1704153600000"), expected);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("-9223372036854775808"), None);
    }

    #[test]
    fn out_of_range_epoch_is_an_invalid_value() {
        let err = candles("date,open,close\n-9223372036854775808,1,2\n").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidValue { ref column, line: 2, .. } if column == "date"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Open,Close\n100,102\n102,98").unwrap();

        let rows = CsvLoader::new().load_candles(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvLoader::new().load_candles(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
