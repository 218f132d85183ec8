use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::StatusCode;
use reqwest::header::REFERER;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use crate::core::config::DEFAULT_YAHOO_COOKIE_URL;
use crate::core::market::{
    LookbackPeriod, MarketDataProvider, PriceBar, PriceHistory, RawFundamentals,
};

const FINANCE_REFERER: &str = "https://finance.yahoo.com/";
const FUNDAMENTAL_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,assetProfile";

// YahooFinanceProvider implementation for MarketDataProvider
pub struct YahooFinanceProvider {
    base_url: String,
    cookie_url: String,
    client: reqwest::Client,
    /// Crumb issued for the session cookie held in the client's jar.
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_cookie_url(base_url, DEFAULT_YAHOO_COOKIE_URL)
    }

    pub fn with_cookie_url(base_url: &str, cookie_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("stockview/1.0")
            .cookie_store(true)
            .build()?;
        Ok(YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_url: cookie_url.to_string(),
            client,
            crumb: Mutex::new(None),
        })
    }

    fn chart_url(&self, symbol: &str, period: LookbackPeriod) -> String {
        format!(
            "{}/v8/finance/chart/{}?interval=1d&range={}",
            self.base_url,
            urlencoding::encode(symbol),
            period.as_range()
        )
    }

    fn quote_summary_url(&self, symbol: &str, crumb: &str) -> String {
        format!(
            "{}/v10/finance/quoteSummary/{}?modules={}&crumb={}",
            self.base_url,
            urlencoding::encode(symbol),
            FUNDAMENTAL_MODULES,
            urlencoding::encode(crumb)
        )
    }

    fn crumb_url(&self) -> String {
        format!("{}/v1/test/getcrumb", self.base_url)
    }

    /// Visits the cookie endpoint so the jar holds a session, then asks for a
    /// crumb bound to that session. The cookie response status is ignored; only
    /// its `Set-Cookie` matters.
    async fn request_crumb(&self) -> Result<String> {
        debug!("Requesting Yahoo session cookie from {}", self.cookie_url);
        self.client
            .get(&self.cookie_url)
            .header(REFERER, FINANCE_REFERER)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to fetch Yahoo session cookie: {e}"))?;

        let response = self
            .client
            .get(self.crumb_url())
            .header(REFERER, FINANCE_REFERER)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to fetch Yahoo crumb: {e}"))?;
        if !response.status().is_success() {
            bail!("HTTP error: {} while fetching Yahoo crumb", response.status());
        }

        let crumb = response.text().await?.trim().to_string();
        if crumb.is_empty() || crumb.contains('<') {
            bail!("Yahoo returned an invalid crumb");
        }
        debug!("Obtained Yahoo crumb");
        Ok(crumb)
    }

    /// Returns the cached crumb, fetching a new one when none is cached or
    /// when `refresh` is set.
    async fn crumb(&self, refresh: bool) -> Result<String> {
        let mut cached = self.crumb.lock().await;
        if let (false, Some(crumb)) = (refresh, cached.as_ref()) {
            return Ok(crumb.clone());
        }
        let crumb = self.request_crumb().await?;
        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn get(&self, url: &str, symbol: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        debug!(response = ?response, "Received Yahoo response");
        Ok(response)
    }
}

#[derive(Deserialize, Debug)]
struct ProviderError {
    code: Option<String>,
    description: Option<String>,
}

impl ProviderError {
    fn message(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.code.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
    error: Option<ProviderError>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug, Default)]
struct ChartMeta {
    #[serde(alias = "gmtoffset", default)]
    gmt_offset: i64,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug, Default)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

fn column_at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

/// Zips the column arrays into bars, dropping rows without a full OHLC set.
fn extract_bars(item: &ChartItem) -> Vec<PriceBar> {
    let (Some(timestamps), Some(quote)) = (
        item.timestamp.as_ref(),
        item.indicators.as_ref().and_then(|i| i.quote.first()),
    ) else {
        return Vec::new();
    };

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            // Shift to exchange local time so the bar lands on its trading date.
            let date = DateTime::from_timestamp(ts + item.meta.gmt_offset, 0)?.date_naive();
            Some(PriceBar {
                date,
                open: column_at(&quote.open, i)?,
                high: column_at(&quote.high, i)?,
                low: column_at(&quote.low, i)?,
                close: column_at(&quote.close, i)?,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect()
}

#[derive(Deserialize, Debug)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryResult,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryResult {
    result: Option<Vec<serde_json::Map<String, Value>>>,
    error: Option<ProviderError>,
}

/// Yahoo wraps numbers as `{"raw": .., "fmt": ..}` and missing numbers as `{}`.
fn unwrap_value(value: &Value) -> Value {
    match value {
        Value::Object(obj) if obj.contains_key("raw") => obj["raw"].clone(),
        Value::Object(obj) if obj.is_empty() => Value::Null,
        other => other.clone(),
    }
}

/// Flattens the summary modules, in key order, into one mapping. A key seen
/// again only replaces an earlier null.
fn flatten_modules(modules: &serde_json::Map<String, Value>) -> RawFundamentals {
    let mut raw = RawFundamentals::new();
    for module in modules.values() {
        let Value::Object(fields) = module else {
            continue;
        };
        for (key, value) in fields {
            let value = unwrap_value(value);
            match raw.get(key) {
                Some(existing) if !existing.is_null() => {}
                _ => {
                    raw.insert(key.clone(), value);
                }
            }
        }
    }
    raw
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    symbol: &str,
) -> Result<T> {
    if !response.status().is_success() {
        return Err(anyhow!(
            "HTTP error: {} for symbol: {}",
            response.status(),
            symbol
        ));
    }

    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %symbol, period = %period)
    )]
    async fn fetch_price_history(
        &self,
        symbol: &str,
        period: LookbackPeriod,
    ) -> Result<PriceHistory> {
        let url = self.chart_url(symbol, period);
        debug!("Requesting price history from {}", url);

        let data: YahooChartResponse = read_json(self.get(&url, symbol).await?, symbol).await?;
        if let Some(error) = data.chart.error {
            return Err(anyhow!(
                "Yahoo error for symbol {}: {}",
                symbol,
                error.message()
            ));
        }

        let bars = data
            .chart
            .result
            .unwrap_or_default()
            .first()
            .map(extract_bars)
            .unwrap_or_default();
        debug!(bars = bars.len(), "Parsed price history");

        Ok(PriceHistory::from_bars(bars))
    }

    #[instrument(name = "YahooFundamentalsFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_fundamentals(&self, symbol: &str) -> Result<RawFundamentals> {
        let crumb = self.crumb(false).await?;
        let mut response = self
            .get(&self.quote_summary_url(symbol, &crumb), symbol)
            .await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Crumb rejected, requesting a new one");
            let crumb = self.crumb(true).await?;
            response = self
                .get(&self.quote_summary_url(symbol, &crumb), symbol)
                .await?;
        }

        let data: YahooQuoteSummaryResponse = read_json(response, symbol).await?;
        if let Some(error) = data.quote_summary.error {
            return Err(anyhow!(
                "Yahoo error for symbol {}: {}",
                symbol,
                error.message()
            ));
        }

        let modules = data
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No fundamentals found for symbol: {}", symbol))?;

        Ok(flatten_modules(&modules))
    }
}
