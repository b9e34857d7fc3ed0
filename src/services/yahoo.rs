//! Yahoo Finance chart API client.
//!
//! One request per symbol against the v8 chart endpoint, which returns the
//! daily history as parallel JSON arrays of timestamps and OHLCV quotes.
//! First attempt is final: there is no retry, backoff, or rate limiting —
//! a failed symbol is reported and the run continues without it.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use isahc::{config::Configurable, prelude::*, HttpClient};
use serde_json::Value;

use crate::models::Ohlcv;

#[derive(Debug)]
pub enum YahooError {
    Http(isahc::Error),
    Serialization(serde_json::Error),
    InvalidResponse(String),
    NoData,
}

impl From<isahc::Error> for YahooError {
    fn from(error: isahc::Error) -> Self {
        YahooError::Http(error)
    }
}

impl From<serde_json::Error> for YahooError {
    fn from(error: serde_json::Error) -> Self {
        YahooError::Serialization(error)
    }
}

impl std::fmt::Display for YahooError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YahooError::Http(e) => write!(f, "HTTP error: {}", e),
            YahooError::Serialization(e) => write!(f, "Serialization error: {}", e),
            YahooError::InvalidResponse(s) => write!(f, "Invalid response: {}", s),
            YahooError::NoData => write!(f, "No data available"),
        }
    }
}

impl std::error::Error for YahooError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            YahooError::Http(e) => Some(e),
            YahooError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct YahooClient {
    client: HttpClient,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> Result<Self, YahooError> {
        let client = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart/".to_string(),
        })
    }

    /// Fetch the daily OHLCV history for one symbol over `[start, end]`.
    ///
    /// Returns `NoData` when the provider has nothing in range, which the
    /// caller treats as "drop this symbol", not as a failure of the batch.
    pub async fn get_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Ohlcv>, YahooError> {
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| YahooError::InvalidResponse("Invalid start date".to_string()))?
            .and_utc()
            .timestamp();
        let period2 = end
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| YahooError::InvalidResponse("Invalid end date".to_string()))?
            .and_utc()
            .timestamp();

        let url = format!(
            "{}{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url, symbol, period1, period2
        );

        tracing::debug!(
            "chart request: symbol={}, start={}, end={}, url={}",
            symbol,
            start,
            end,
            url
        );

        let request = isahc::Request::builder()
            .uri(&url)
            .method("GET")
            .header("Accept", "application/json, text/plain, */*")
            .header("User-Agent", USER_AGENT)
            .body(())
            .map_err(|e| YahooError::InvalidResponse(format!("Request build error: {}", e)))?;

        let mut response = self.client.send_async(request).await?;
        let status = response.status();
        if status == 404 {
            // Yahoo reports unknown symbols as 404 with an error body
            return Err(YahooError::NoData);
        }
        if !status.is_success() {
            return Err(YahooError::InvalidResponse(format!(
                "HTTP error ({}) - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| YahooError::InvalidResponse(format!("Response body error: {}", e)))?;
        let payload: Value = serde_json::from_str(&text)?;

        tracing::debug!(
            "chart response for {}: {} bytes",
            symbol,
            text.len()
        );

        parse_chart(symbol, &payload, start, end)
    }
}

/// Turn a chart API payload into dated OHLCV rows within `[start, end]`.
///
/// Rows with null prices (halted or unquoted days) are skipped. An empty or
/// absent result is `NoData`.
pub fn parse_chart(
    symbol: &str,
    payload: &Value,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Ohlcv>, YahooError> {
    let chart = payload
        .get("chart")
        .ok_or_else(|| YahooError::InvalidResponse("Missing key: chart".to_string()))?;

    if let Some(error) = chart.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(|c| c.as_str()).unwrap_or("");
        if code == "Not Found" {
            return Err(YahooError::NoData);
        }
        let description = error
            .get("description")
            .and_then(|d| d.as_str())
            .unwrap_or("unknown provider error");
        return Err(YahooError::InvalidResponse(description.to_string()));
    }

    let result = match chart.get("result").and_then(|r| r.as_array()) {
        Some(results) if !results.is_empty() => &results[0],
        _ => return Err(YahooError::NoData),
    };

    let timestamps = match result.get("timestamp").and_then(|t| t.as_array()) {
        Some(ts) if !ts.is_empty() => ts,
        _ => return Err(YahooError::NoData),
    };

    let quote = result
        .get("indicators")
        .and_then(|i| i.get("quote"))
        .and_then(|q| q.as_array())
        .and_then(|q| q.first())
        .ok_or_else(|| YahooError::InvalidResponse("Missing key: indicators.quote".to_string()))?;

    let opens = quote["open"]
        .as_array()
        .ok_or_else(|| YahooError::InvalidResponse("Invalid opens".to_string()))?;
    let highs = quote["high"]
        .as_array()
        .ok_or_else(|| YahooError::InvalidResponse("Invalid highs".to_string()))?;
    let lows = quote["low"]
        .as_array()
        .ok_or_else(|| YahooError::InvalidResponse("Invalid lows".to_string()))?;
    let closes = quote["close"]
        .as_array()
        .ok_or_else(|| YahooError::InvalidResponse("Invalid closes".to_string()))?;
    let volumes = quote["volume"]
        .as_array()
        .ok_or_else(|| YahooError::InvalidResponse("Invalid volumes".to_string()))?;

    let length = timestamps.len();
    if [opens.len(), highs.len(), lows.len(), closes.len(), volumes.len()]
        .iter()
        .any(|&len| len != length)
    {
        return Err(YahooError::InvalidResponse(
            "Inconsistent array lengths".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for i in 0..length {
        let timestamp = timestamps[i].as_i64().ok_or_else(|| {
            YahooError::InvalidResponse(format!(
                "Invalid timestamp at index {}: {:?}",
                i, &timestamps[i]
            ))
        })?;
        let time = DateTime::<Utc>::from_timestamp(timestamp, 0).ok_or_else(|| {
            YahooError::InvalidResponse(format!(
                "Cannot convert timestamp {} to DateTime at index {}",
                timestamp, i
            ))
        })?;

        let date = time.date_naive();
        if date < start || date > end {
            continue;
        }

        // Null quote entries mark days without a trade; skip them
        let (open, high, low, close) = match (
            opens[i].as_f64(),
            highs[i].as_f64(),
            lows[i].as_f64(),
            closes[i].as_f64(),
        ) {
            (Some(o), Some(h), Some(l), Some(c)) => (o, h, l, c),
            _ => continue,
        };

        rows.push(Ohlcv::new(
            time,
            open,
            high,
            low,
            close,
            volumes[i].as_u64().unwrap_or(0),
            symbol.to_string(),
        ));
    }

    if rows.is_empty() {
        return Err(YahooError::NoData);
    }

    rows.sort_by(|a, b| a.time.cmp(&b.time));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart_payload(timestamps: Vec<i64>, closes: Vec<Value>) -> Value {
        let n = timestamps.len();
        let filler: Vec<Value> = (0..n).map(|i| json!(100.0 + i as f64)).collect();
        json!({
            "chart": {
                "result": [{
                    "timestamp": timestamps,
                    "indicators": {
                        "quote": [{
                            "open": filler.clone(),
                            "high": filler.clone(),
                            "low": filler,
                            "close": closes,
                            "volume": (0..n).map(|_| json!(1000)).collect::<Vec<Value>>(),
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_parse_chart_basic() {
        // 2024-01-02 and 2024-01-03, 00:00 UTC
        let payload = chart_payload(
            vec![1704153600, 1704240000],
            vec![json!(101.5), json!(102.5)],
        );
        let (start, end) = range();

        let rows = parse_chart("NPN.JO", &payload, start, end).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].close, 101.5);
        assert_eq!(rows[0].symbol, "NPN.JO");
    }

    #[test]
    fn test_parse_chart_skips_null_rows() {
        let payload = chart_payload(
            vec![1704153600, 1704240000, 1704326400],
            vec![json!(101.5), json!(null), json!(103.5)],
        );
        let (start, end) = range();

        let rows = parse_chart("NPN.JO", &payload, start, end).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].close, 103.5);
    }

    #[test]
    fn test_parse_chart_filters_out_of_range() {
        let payload = chart_payload(
            vec![1704153600, 1704240000],
            vec![json!(101.5), json!(102.5)],
        );
        let start = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        let rows = parse_chart("NPN.JO", &payload, start, end).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close, 102.5);
    }

    #[test]
    fn test_parse_chart_empty_result_is_no_data() {
        let payload = json!({"chart": {"result": [], "error": null}});
        let (start, end) = range();

        assert!(matches!(
            parse_chart("XXX.JO", &payload, start, end),
            Err(YahooError::NoData)
        ));
    }

    #[test]
    fn test_parse_chart_not_found_error_is_no_data() {
        let payload = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found"}
            }
        });
        let (start, end) = range();

        assert!(matches!(
            parse_chart("XXX.JO", &payload, start, end),
            Err(YahooError::NoData)
        ));
    }

    #[test]
    fn test_parse_chart_inconsistent_lengths_rejected() {
        let mut payload = chart_payload(vec![1704153600, 1704240000], vec![json!(101.5)]);
        // close array shorter than timestamps
        payload["chart"]["result"][0]["indicators"]["quote"][0]["close"] =
            json!([101.5]);
        let (start, end) = range();

        assert!(matches!(
            parse_chart("NPN.JO", &payload, start, end),
            Err(YahooError::InvalidResponse(_))
        ));
    }
}
