use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::{FetchError, FetchResult};
use crate::models::QuotePoint;
use crate::provider::traits::QuoteProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER_ID: &str = "ALPHA_VANTAGE";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Phrases Alpha Vantage uses in its throttling notices. The provider never
/// returns an HTTP error when a key is over quota; it answers 200 with a
/// `Note` or `Information` field containing one of these.
const DEFAULT_RATE_LIMIT_MARKERS: [&str; 4] = [
    "api call frequency",
    "rate limit",
    "requests per day",
    "calls per minute",
];

/// Case-insensitive substring matcher for rate-limit notices.
///
/// Alpha Vantage has reworded its throttling message several times, so the
/// marker list is configurable rather than baked in.
#[derive(Clone, Debug)]
pub struct RateLimitMatcher {
    markers: Vec<String>,
}

impl RateLimitMatcher {
    pub fn new(markers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            markers: markers
                .into_iter()
                .map(|marker| marker.into().to_lowercase())
                .collect(),
        }
    }

    /// Returns true when the notice contains any configured marker,
    /// ignoring case.
    pub fn matches(&self, notice: &str) -> bool {
        let notice = notice.to_lowercase();
        self.markers.iter().any(|marker| notice.contains(marker))
    }
}

impl Default for RateLimitMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT_MARKERS)
    }
}

/// Connection settings for [`AlphaVantageProvider`].
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub rate_limit: RateLimitMatcher,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            rate_limit: RateLimitMatcher::default(),
        }
    }
}

/// Envelope for the TIME_SERIES_DAILY endpoint. Alpha Vantage reports
/// application-level failures inside a 200 response, so every field here is
/// optional and classification happens after deserialization.
#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

/// Quote provider backed by the Alpha Vantage TIME_SERIES_DAILY endpoint.
pub struct AlphaVantageProvider {
    client: Client,
    base_url: String,
    rate_limit: RateLimitMatcher,
}

impl AlphaVantageProvider {
    pub fn new() -> FetchResult<Self> {
        Self::with_config(ProviderConfig::default())
    }

    pub fn with_config(config: ProviderConfig) -> FetchResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
            rate_limit: config.rate_limit,
        })
    }

    /// Sorts an application-level payload into a series or a typed error.
    fn classify(&self, symbol: &str, response: TimeSeriesResponse) -> FetchResult<Vec<QuotePoint>> {
        if let Some(message) = &response.error_message {
            debug!("Alpha Vantage rejected symbol {}: {}", symbol, message);
            return Err(FetchError::InvalidSymbol);
        }

        // Throttling notices arrive in either field depending on the plan.
        let notices = [response.note.as_deref(), response.information.as_deref()];
        for notice in notices.into_iter().flatten() {
            if self.rate_limit.matches(notice) {
                debug!("Alpha Vantage throttled request for {}: {}", symbol, notice);
                return Err(FetchError::RateLimited);
            }
            warn!("Unrecognized Alpha Vantage notice for {}: {}", symbol, notice);
        }

        let Some(series) = response.time_series else {
            return Err(FetchError::MalformedResponse {
                detail: "missing \"Time Series (Daily)\" field".to_string(),
            });
        };

        if series.is_empty() {
            return Err(FetchError::MalformedResponse {
                detail: "empty time series".to_string(),
            });
        }

        let mut points = Vec::with_capacity(series.len());
        for (raw_date, bar) in &series {
            let date = parse_series_date(raw_date)?;
            let close = parse_close(&bar.close)?;
            points.push(QuotePoint::new(symbol, date, close));
        }

        // Most recent trading day first.
        points.sort_by(|a, b| b.date.cmp(&a.date));

        debug!("Fetched {} daily closes for {}", points.len(), symbol);
        Ok(points)
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_daily(&self, symbol: &str, api_key: &str) -> FetchResult<Vec<QuotePoint>> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", api_key),
            ],
        )
        .map_err(|e| FetchError::Transport {
            detail: format!("invalid request url: {}", e),
        })?;

        debug!("Requesting daily series: {}", mask_key(url.as_str(), api_key));

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Transport {
                detail: format!("HTTP status {}", status),
            });
        }

        let body = response.text().await?;
        let payload: TimeSeriesResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::MalformedResponse {
                detail: format!("invalid JSON payload: {}", e),
            })?;

        self.classify(symbol, payload)
    }
}

fn parse_series_date(raw: &str) -> FetchResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| FetchError::MalformedResponse {
        detail: format!("unparseable series date: {}", raw),
    })
}

fn parse_close(raw: &str) -> FetchResult<Decimal> {
    let close: Decimal = raw.parse().map_err(|_| FetchError::MalformedResponse {
        detail: format!("unparseable close price: {}", raw),
    })?;
    if close.is_sign_negative() {
        return Err(FetchError::MalformedResponse {
            detail: format!("negative close price: {}", raw),
        });
    }
    Ok(close)
}

/// Keys ride in the query string, so they are redacted before logging.
fn mask_key(url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return url.to_string();
    }
    url.replace(api_key, "***")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn provider() -> AlphaVantageProvider {
        AlphaVantageProvider::new().unwrap()
    }

    fn parse(json: &str) -> TimeSeriesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_classify_success_sorted_most_recent_first() {
        let payload = parse(
            r#"{
                "Meta Data": { "2. Symbol": "AAPL" },
                "Time Series (Daily)": {
                    "2024-01-02": { "1. open": "186.06", "4. close": "185.64" },
                    "2024-01-04": { "1. open": "182.15", "4. close": "181.91" },
                    "2024-01-03": { "1. open": "184.22", "4. close": "184.25" }
                }
            }"#,
        );

        let points = provider().classify("AAPL", payload).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(points[0].close, dec!(181.91));
        assert_eq!(points[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(points[2].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(points.iter().all(|p| p.symbol == "AAPL"));
    }

    #[test]
    fn test_classify_error_message_is_invalid_symbol() {
        let payload = parse(
            r#"{ "Error Message": "Invalid API call. Please retry or visit the documentation." }"#,
        );

        let result = provider().classify("ZZZZ", payload);

        assert!(matches!(result, Err(FetchError::InvalidSymbol)));
    }

    #[test]
    fn test_classify_note_frequency_notice_is_rate_limited() {
        let payload = parse(
            r#"{ "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute and 500 calls per day." }"#,
        );

        let result = provider().classify("AAPL", payload);

        assert!(matches!(result, Err(FetchError::RateLimited)));
    }

    #[test]
    fn test_classify_information_quota_notice_is_rate_limited() {
        let payload = parse(
            r#"{ "Information": "We have detected your API key and our standard API rate limit is 25 requests per day." }"#,
        );

        let result = provider().classify("AAPL", payload);

        assert!(matches!(result, Err(FetchError::RateLimited)));
    }

    #[test]
    fn test_classify_unmatched_notice_with_series_still_succeeds() {
        let payload = parse(
            r#"{
                "Information": "A new endpoint is now available for premium members.",
                "Time Series (Daily)": {
                    "2024-01-02": { "4. close": "185.64" }
                }
            }"#,
        );

        let points = provider().classify("AAPL", payload).unwrap();

        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_classify_missing_series_is_malformed() {
        let payload = parse(r#"{ "Meta Data": { "2. Symbol": "AAPL" } }"#);

        let result = provider().classify("AAPL", payload);

        match result {
            Err(FetchError::MalformedResponse { detail }) => {
                assert!(detail.contains("Time Series (Daily)"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_empty_series_is_malformed() {
        let payload = parse(r#"{ "Time Series (Daily)": {} }"#);

        let result = provider().classify("AAPL", payload);

        assert!(matches!(result, Err(FetchError::MalformedResponse { .. })));
    }

    #[test]
    fn test_classify_bad_close_is_malformed() {
        let payload = parse(
            r#"{ "Time Series (Daily)": { "2024-01-02": { "4. close": "not-a-number" } } }"#,
        );

        let result = provider().classify("AAPL", payload);

        match result {
            Err(FetchError::MalformedResponse { detail }) => {
                assert!(detail.contains("not-a-number"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_negative_close_is_malformed() {
        let payload =
            parse(r#"{ "Time Series (Daily)": { "2024-01-02": { "4. close": "-1.25" } } }"#);

        let result = provider().classify("AAPL", payload);

        assert!(matches!(result, Err(FetchError::MalformedResponse { .. })));
    }

    #[test]
    fn test_classify_bad_date_is_malformed() {
        let payload =
            parse(r#"{ "Time Series (Daily)": { "01/02/2024": { "4. close": "185.64" } } }"#);

        let result = provider().classify("AAPL", payload);

        match result {
            Err(FetchError::MalformedResponse { detail }) => {
                assert!(detail.contains("01/02/2024"));
            }
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_markers_override_defaults() {
        let matcher = RateLimitMatcher::new(["quota exceeded"]);

        assert!(matcher.matches("QUOTA EXCEEDED for this key"));
        assert!(!matcher.matches("our standard api call frequency is 5 calls per minute"));
    }

    #[test]
    fn test_default_matcher_covers_known_notices() {
        let matcher = RateLimitMatcher::default();

        assert!(matcher.matches("Our standard API call frequency is 5 calls per minute"));
        assert!(matcher.matches("our standard API rate limit is 25 requests per day"));
        assert!(!matcher.matches("A new endpoint is now available"));
    }

    #[test]
    fn test_parse_series_date() {
        assert_eq!(
            parse_series_date("2024-01-02").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert!(parse_series_date("2024/01/02").is_err());
    }

    #[test]
    fn test_parse_close() {
        assert_eq!(parse_close("185.64").unwrap(), dec!(185.64));
        assert_eq!(parse_close("0").unwrap(), dec!(0));
        assert!(parse_close("").is_err());
        assert!(parse_close("-3.50").is_err());
    }

    #[test]
    fn test_mask_key_redacts_query_parameter() {
        let url = "https://www.alphavantage.co/query?function=TIME_SERIES_DAILY&symbol=AAPL&apikey=SECRET123";

        let masked = mask_key(url, "SECRET123");

        assert!(!masked.contains("SECRET123"));
        assert!(masked.contains("apikey=***"));
    }

    #[test]
    fn test_provider_id() {
        assert_eq!(provider().id(), "ALPHA_VANTAGE");
    }
}
