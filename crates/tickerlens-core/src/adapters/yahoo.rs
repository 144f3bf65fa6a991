use std::sync::Arc;

use crate::headlines::HeadlineExtractor;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient, DEFAULT_TIMEOUT_MS};
use crate::provider::{NewsProvider, ProviderFuture, SourceError};
use crate::{Headline, ProviderId, Symbol};

/// Yahoo Finance quote news page scraper.
#[derive(Clone)]
pub struct YahooNewsAdapter {
    http_client: Arc<dyn HttpClient>,
    extractor: HeadlineExtractor,
    timeout_ms: u64,
}

impl Default for YahooNewsAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()))
    }
}

impl YahooNewsAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            extractor: HeadlineExtractor::yahoo(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Fetch pages from a different origin; links resolve against it too.
    pub fn with_extractor(mut self, extractor: HeadlineExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn endpoint(&self, symbol: &Symbol) -> String {
        let encoded = urlencoding::encode(symbol.as_str());
        format!(
            "{}/quote/{encoded}/news?p={encoded}",
            self.extractor.origin().trim_end_matches('/')
        )
    }
}

impl NewsProvider for YahooNewsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn fetch<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<Headline>> {
        Box::pin(async move {
            let url = self.endpoint(symbol);
            tracing::debug!(%url, "requesting news page");

            let request = HttpRequest::get(url)
                .with_header("accept", "text/html")
                .with_timeout_ms(self.timeout_ms);
            let response = self.http_client.execute(request).await?;

            if !response.is_success() {
                return Err(SourceError::network(format!(
                    "yahoo upstream returned status {}",
                    response.status
                )));
            }
            if response.body.trim().is_empty() {
                return Err(SourceError::parse("yahoo returned an empty document"));
            }

            let headlines = self.extractor.extract(&response.body)?;
            tracing::debug!(symbol = %symbol, count = headlines.len(), "extracted headlines");
            Ok(headlines)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, StaticHttpClient};
    use crate::provider::SourceErrorKind;

    #[tokio::test]
    async fn requests_quote_news_page() {
        let client = Arc::new(StaticHttpClient::ok(
            r#"<a href="/news/a.html"><div class="StretchedBox"></div>A</a>"#,
        ));
        let adapter = YahooNewsAdapter::with_http_client(client.clone());
        let symbol = Symbol::parse("ibm").expect("symbol");

        let headlines = adapter.fetch(&symbol).await.expect("one headline");

        assert_eq!(headlines.len(), 1);
        assert_eq!(
            client.recorded_requests()[0].url,
            "https://finance.yahoo.com/quote/IBM/news?p=IBM"
        );
    }

    #[tokio::test]
    async fn custom_extractor_sets_request_origin_and_link_base() {
        let client = Arc::new(StaticHttpClient::ok(
            r#"<a href="/news/a.html"><p class="card"></p>A</a>"#,
        ));
        let adapter = YahooNewsAdapter::with_http_client(client.clone())
            .with_extractor(HeadlineExtractor::new("https://mirror.example.test/", "card"));
        let symbol = Symbol::parse("BRK.B").expect("symbol");

        let headlines = adapter.fetch(&symbol).await.expect("one headline");

        assert_eq!(
            client.recorded_requests()[0].url,
            "https://mirror.example.test/quote/BRK.B/news?p=BRK.B"
        );
        assert_eq!(headlines[0].url, "https://mirror.example.test/news/a.html");
    }

    #[tokio::test]
    async fn empty_body_is_parse_failure() {
        let adapter = YahooNewsAdapter::with_http_client(Arc::new(StaticHttpClient::ok("  ")));
        let symbol = Symbol::parse("IBM").expect("symbol");

        let err = adapter.fetch(&symbol).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Parse);
    }

    #[tokio::test]
    async fn transport_failure_is_network() {
        let adapter = YahooNewsAdapter::with_http_client(Arc::new(StaticHttpClient::failing(
            HttpError::new("connection refused"),
        )));
        let symbol = Symbol::parse("IBM").expect("symbol");

        let err = adapter.fetch(&symbol).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::Network);
    }
}
