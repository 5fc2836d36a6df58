//! Yahoo Finance data provider.
//!
//! Fetches daily OHLCV bars from Yahoo's v8 chart API over a blocking client,
//! retrying transient failures with exponential backoff and honouring the
//! shared circuit breaker. Prices are split/dividend adjusted when the
//! response carries an `adjclose` column.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::{debug, warn};

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, DataProvider};
use crate::domain::{Bar, InstrumentSeries};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Quotes,
}

#[derive(Debug, Deserialize)]
struct Quotes {
    quote: Vec<QuoteColumns>,
    adjclose: Option<Vec<AdjCloseColumn>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseColumn {
    adjclose: Vec<Option<f64>>,
}

const CHART_ENDPOINT: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

/// Longest single wait between retries.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Client(e.to_string()))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry `attempt` (1-based): doubles each time, capped at
    /// [`MAX_BACKOFF`].
    fn backoff(base: Duration, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        base.saturating_mul(factor).min(MAX_BACKOFF)
    }

    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        // period2 is exclusive; push it to the end of `end`
        let end_ts = end.and_time(NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "{CHART_ENDPOINT}/{symbol}?period1={start_ts}&period2={end_ts}\
             &interval=1d&includeAdjustedClose=true"
        )
    }

    fn parse_body(symbol: &str, body: &str) -> Result<InstrumentSeries, DataError> {
        let chart: ChartResponse = serde_json::from_str(body).map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;
        Self::parse_response(symbol, chart)
    }

    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<InstrumentSeries, DataError> {
        let not_found = || DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        };

        let result = match (resp.chart.result, resp.chart.error) {
            (Some(result), _) => result,
            (None, Some(err)) if err.code == "Not Found" => return Err(not_found()),
            (None, Some(err)) => {
                return Err(DataError::ResponseFormatChanged(format!(
                    "{}: {}",
                    err.code, err.description
                )))
            }
            (None, None) => {
                return Err(DataError::ResponseFormatChanged(
                    "empty result with no error".into(),
                ))
            }
        };

        let data = result.into_iter().next().ok_or_else(not_found)?;
        // A listed symbol with no trades in range has no timestamp array.
        let timestamps = data.timestamp.unwrap_or_default();
        let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose);

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            // Non-trading placeholders carry no close.
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };
            let factor = adj_closes
                .as_ref()
                .and_then(|v| v.get(i).copied().flatten())
                .filter(|adj| adj.is_finite() && close > 0.0)
                .map_or(1.0, |adj| adj / close);

            let field =
                |col: &[Option<f64>]| col.get(i).copied().flatten().unwrap_or(close) * factor;
            bars.push(Bar {
                date,
                open: field(&quote.open[..]),
                high: field(&quote.high[..]),
                low: field(&quote.low[..]),
                close: close * factor,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        if bars.is_empty() {
            return Err(not_found());
        }

        Ok(InstrumentSeries::from_unsorted(symbol, bars))
    }

    fn fetch_with_retry(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<InstrumentSeries, DataError> {
        let url = Self::chart_url(symbol, start, end);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Self::backoff(self.base_delay, attempt);
                debug!(symbol, attempt, ?delay, "retrying chart request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            let resp = match self.client.get(&url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();
            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                self.circuit_breaker.record_success();
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                warn!(symbol, retry_after, "rate limited by Yahoo Finance");
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }
            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let body = resp
                .text()
                .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
            let series = Self::parse_body(symbol, &body)?;
            self.circuit_breaker.record_success();
            debug!(symbol, bars = series.len(), "fetched chart");
            return Ok(series);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<InstrumentSeries, DataError> {
        self.fetch_with_retry(symbol, start, end)
    }

    fn is_available(&self) -> bool {
        self.circuit_breaker.is_allowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-02, 2024-01-03, 2024-01-04 (00:00 UTC + 2h)
    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704160800, 1704247200, 1704333600],
                "indicators": {
                    "quote": [{
                        "open":   [100.0, null, 102.0],
                        "high":   [101.0, null, 103.0],
                        "low":    [99.0,  null, 101.0],
                        "close":  [100.5, null, 102.5],
                        "volume": [1000,  null, null]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_chart_and_drops_closeless_rows() {
        let series = YahooProvider::parse_body("BBCA.JK", BODY).unwrap();
        assert_eq!(series.symbol(), "BBCA.JK");
        assert_eq!(series.len(), 2);
        let bars = series.bars();
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].close, 100.5);
        assert_eq!(bars[0].volume, 1000);
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(bars[1].volume, 0);
    }

    #[test]
    fn adjusted_close_scales_prices() {
        let body = r#"{"chart":{"result":[{
            "timestamp":[1704160800],
            "indicators":{
                "quote":[{"open":[200.0],"high":[210.0],"low":[190.0],"close":[200.0],"volume":[5]}],
                "adjclose":[{"adjclose":[100.0]}]
            }}],"error":null}}"#;
        let series = YahooProvider::parse_body("X", body).unwrap();
        let bar = &series.bars()[0];
        assert_eq!(bar.close, 100.0);
        assert_eq!(bar.high, 105.0);
        assert_eq!(bar.low, 95.0);
    }

    #[test]
    fn not_found_error_maps_to_symbol_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = YahooProvider::parse_body("NOPE.JK", body).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { symbol } if symbol == "NOPE.JK"));
    }

    #[test]
    fn result_without_timestamps_is_empty() {
        let body = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;
        let err = YahooProvider::parse_body("QUIET.JK", body).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }

    #[test]
    fn garbage_body_is_format_change() {
        let err = YahooProvider::parse_body("X", "<html>").unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        let base = Duration::from_millis(500);
        assert_eq!(YahooProvider::backoff(base, 1), base);
        assert_eq!(YahooProvider::backoff(base, 3), Duration::from_secs(2));
        assert_eq!(YahooProvider::backoff(base, 40), MAX_BACKOFF);
        assert_eq!(YahooProvider::backoff(base, u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn chart_url_covers_whole_end_day() {
        let url = YahooProvider::chart_url(
            "ANTM.JK",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        assert!(url.contains("/ANTM.JK?"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704239999"));
        assert!(url.contains("interval=1d"));
    }
}
