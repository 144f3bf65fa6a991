use std::sync::Arc;

use crate::candles;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::provider::{ProviderFuture, SeriesProvider, SourceError};
use crate::{DailyCandle, ProviderId, Symbol};

/// Production Alpha Vantage endpoint.
pub const ALPHAVANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage `TIME_SERIES_DAILY` series provider.
#[derive(Clone)]
pub struct AlphaVantageSeriesAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl Default for AlphaVantageSeriesAdapter {
    fn default() -> Self {
        let api_key = std::env::var("TICKERLENS_ALPHAVANTAGE_API_KEY")
            .unwrap_or_else(|_| String::from("demo"));
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), api_key)
    }
}

impl AlphaVantageSeriesAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(ALPHAVANTAGE_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Endpoint without the key, safe to log.
    fn endpoint(&self, symbol: &Symbol) -> String {
        format!(
            "{}?function=TIME_SERIES_DAILY&symbol={}",
            self.base_url,
            urlencoding::encode(symbol.as_str())
        )
    }
}

impl SeriesProvider for AlphaVantageSeriesAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Alphavantage
    }

    fn fetch<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<DailyCandle>> {
        Box::pin(async move {
            let url = self.endpoint(symbol);
            tracing::debug!(%url, "requesting daily series");

            let request = HttpRequest::get(format!(
                "{url}&apikey={}",
                urlencoding::encode(&self.api_key)
            ))
                .with_header("accept", "application/json")
                .with_timeout_ms(self.timeout_ms);
            let response = self.http_client.execute(request).await?;

            if !response.is_success() {
                return Err(SourceError::network(format!(
                    "alphavantage upstream returned status {}",
                    response.status
                )));
            }

            let candles = candles::normalize(&response.body)?;
            tracing::debug!(symbol = %symbol, count = candles.len(), "normalized daily series");
            Ok(candles)
        })
    }
}
