//! Closing-price export: one `time` column plus one column per ticker.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::Watchlist;
use crate::services::FetchReport;

/// Write closing prices for the watchlist to a CSV file.
///
/// Rows are the union of all fetched dates in ascending order; a ticker
/// without a row for a date gets an empty cell. Failed symbols are left
/// out entirely. Returns the number of data rows written.
pub fn export_closes<P: AsRef<Path>>(
    path: P,
    watchlist: &Watchlist,
    report: &FetchReport,
) -> Result<usize> {
    // Watchlist order, data-bearing symbols only
    let symbols: Vec<&String> = watchlist
        .symbols()
        .iter()
        .filter(|s| report.series(s).is_some())
        .collect();

    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut closes_by_symbol: HashMap<&String, HashMap<NaiveDate, f64>> = HashMap::new();

    for symbol in &symbols {
        if let Some(series) = report.series(symbol) {
            let mut closes = HashMap::new();
            for row in series.rows() {
                let date = row.time.date_naive();
                dates.insert(date);
                closes.insert(date, row.close);
            }
            closes_by_symbol.insert(*symbol, closes);
        }
    }

    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["time".to_string()];
    header.extend(symbols.iter().map(|s| s.to_string()));
    writer.write_record(&header)?;

    for date in &dates {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        for symbol in &symbols {
            let cell = closes_by_symbol
                .get(symbol)
                .and_then(|closes| closes.get(date))
                .map(|close| close.to_string())
                .unwrap_or_default();
            record.push(cell);
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(dates.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ohlcv, TimeSeries};
    use crate::services::FetchReport;
    use chrono::{TimeZone, Utc};

    fn series(symbol: &str, closes: &[f64]) -> TimeSeries {
        let rows = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let time = Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 0, 0, 0).unwrap();
                Ohlcv::new(time, close, close, close, close, 100, symbol.to_string())
            })
            .collect();
        TimeSeries::from_rows(rows)
    }

    #[test]
    fn test_export_two_tickers_three_dates() {
        let watchlist =
            Watchlist::from_symbols(vec!["NPN.JO".to_string(), "MTN.JO".to_string()]).unwrap();
        let mut report = FetchReport::default();
        report.record_series("NPN.JO".to_string(), series("NPN.JO", &[100.0, 101.0, 102.0]));
        report.record_series("MTN.JO".to_string(), series("MTN.JO", &[50.0, 51.0, 52.0]));

        let path = std::env::temp_dir().join("jseboard_export_test.csv");
        let rows = export_closes(&path, &watchlist, &report).unwrap();
        assert_eq!(rows, 3);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header = reader.headers().unwrap().clone();
        assert_eq!(header, vec!["time", "NPN.JO", "MTN.JO"]);

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "2024-01-01");
        assert_eq!(&records[0][1], "100");
        assert_eq!(&records[2][2], "52");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_export_blank_cell_for_missing_date() {
        let watchlist =
            Watchlist::from_symbols(vec!["NPN.JO".to_string(), "MTN.JO".to_string()]).unwrap();
        let mut report = FetchReport::default();
        report.record_series("NPN.JO".to_string(), series("NPN.JO", &[100.0, 101.0, 102.0]));
        report.record_series("MTN.JO".to_string(), series("MTN.JO", &[50.0, 51.0]));

        let path = std::env::temp_dir().join("jseboard_export_gap_test.csv");
        export_closes(&path, &watchlist, &report).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(&records[2][1], "102");
        assert_eq!(&records[2][2], "");

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_export_drops_failed_symbols() {
        let watchlist =
            Watchlist::from_symbols(vec!["NPN.JO".to_string(), "XXX.JO".to_string()]).unwrap();
        let mut report = FetchReport::default();
        report.record_series("NPN.JO".to_string(), series("NPN.JO", &[100.0]));

        let path = std::env::temp_dir().join("jseboard_export_drop_test.csv");
        export_closes(&path, &watchlist, &report).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap(), &csv::StringRecord::from(vec!["time", "NPN.JO"]));

        std::fs::remove_file(&path).ok();
    }
}
