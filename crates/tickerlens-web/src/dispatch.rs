//! Request dispatch: route a command path to one provider call and render
//! the outcome.
//!
//! | Path | Query | Provider call | Success |
//! |------|-------|---------------|---------|
//! | `/news` | `symbol` | [`NewsProvider::fetch`] | 200, JSON array of headlines |
//! | `/plot` | `symbol` | [`SeriesProvider::fetch`] | 200, JSON array of candles |
//! | `/db` | `user`, `symbol` | [`HistoryStore::record`] | 200, empty body |
//!
//! Provider failures are 500 with no body. Unknown paths and missing
//! parameters are 400. Every response carries `Access-Control-Allow-Origin`.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::Query;
use axum::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tickerlens_core::{
    AlphaVantageSeriesAdapter, DuckDbHistoryStore, HistoryStore, NewsProvider, ReqwestHttpClient,
    SeriesProvider, SourceError, Symbol, YahooNewsAdapter,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{OriginPolicy, ServerConfig};

/// Default per-dispatch deadline around a provider call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Command token carried by the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    News,
    Plot,
    Db,
}

impl Endpoint {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/news" => Some(Self::News),
            "/plot" => Some(Self::Plot),
            "/db" => Some(Self::Db),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::Plot => "plot",
            Self::Db => "db",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal state of one dispatch.
#[derive(Debug)]
pub enum Outcome {
    /// Provider succeeded; `None` means an empty 200.
    Success(Option<String>),
    /// Provider failed.
    Failed(SourceError),
    /// Unknown command or missing parameter.
    Rejected(String),
}

impl Outcome {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Success(_) => StatusCode::OK,
            Self::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn into_response(self, allow_origin: HeaderValue) -> Response {
        let status = self.status();
        let mut response = match self {
            Self::Success(Some(json)) => {
                let mut response = (status, Body::from(json)).into_response();
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                response
            }
            Self::Success(None) | Self::Failed(_) | Self::Rejected(_) => status.into_response(),
        };
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        response
    }
}

/// Routes commands to the injected providers.
#[derive(Clone)]
pub struct Dispatcher {
    news: Arc<dyn NewsProvider>,
    series: Arc<dyn SeriesProvider>,
    history: Arc<dyn HistoryStore>,
    deadline: Duration,
    origin_policy: OriginPolicy,
}

impl Dispatcher {
    pub fn new(
        news: Arc<dyn NewsProvider>,
        series: Arc<dyn SeriesProvider>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        Self {
            news,
            series,
            history,
            deadline: DEFAULT_DEADLINE,
            origin_policy: OriginPolicy::Echo,
        }
    }

    /// Production wiring: Yahoo news, Alpha Vantage series, DuckDB history.
    pub fn from_config(config: &ServerConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new());
        let timeout_ms = config.upstream_timeout_ms();

        let news = YahooNewsAdapter::with_http_client(http_client.clone()).with_timeout_ms(timeout_ms);
        let series =
            AlphaVantageSeriesAdapter::with_http_client(http_client, config.alphavantage_key.clone())
                .with_timeout_ms(timeout_ms);
        let history = DuckDbHistoryStore::open(config.ledger.clone());

        Self::new(Arc::new(news), Arc::new(series), Arc::new(history))
            .with_deadline(config.upstream_timeout)
            .with_origin_policy(config.origin_policy.clone())
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_origin_policy(mut self, origin_policy: OriginPolicy) -> Self {
        self.origin_policy = origin_policy;
        self
    }

    /// Handle one inbound request end to end.
    pub async fn handle(&self, uri: &Uri, headers: &HeaderMap) -> Response {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", %request_id, path = uri.path());
        let allow_origin = self.origin_policy.allow_origin(headers.get(ORIGIN));

        let params = Query::<HashMap<String, String>>::try_from_uri(uri)
            .map(|Query(params)| params)
            .unwrap_or_default();

        let outcome = self.dispatch(uri.path(), &params).instrument(span).await;
        outcome.into_response(allow_origin)
    }

    /// Route `path` with its query parameters to a provider.
    pub async fn dispatch(&self, path: &str, params: &HashMap<String, String>) -> Outcome {
        let Some(endpoint) = Endpoint::from_path(path) else {
            tracing::debug!("unrecognized command");
            return Outcome::Rejected(format!("unrecognized command '{path}'"));
        };

        let outcome = match endpoint {
            Endpoint::News => match required_symbol(params) {
                Ok(symbol) => {
                    let news = Arc::clone(&self.news);
                    let result = self.guarded(async move { news.fetch(&symbol).await }).await;
                    render_json(result)
                }
                Err(rejection) => rejection,
            },
            Endpoint::Plot => match required_symbol(params) {
                Ok(symbol) => {
                    let series = Arc::clone(&self.series);
                    let result = self.guarded(async move { series.fetch(&symbol).await }).await;
                    render_json(result)
                }
                Err(rejection) => rejection,
            },
            Endpoint::Db => match (required(params, "user"), required_symbol(params)) {
                (Ok(user), Ok(symbol)) => {
                    let history = Arc::clone(&self.history);
                    let user = user.to_owned();
                    let result = self
                        .guarded(async move { history.record(&user, &symbol).await })
                        .await;
                    result.map_or_else(Outcome::Failed, |()| Outcome::Success(None))
                }
                (Err(rejection), _) | (_, Err(rejection)) => rejection,
            },
        };

        match &outcome {
            Outcome::Success(_) => tracing::info!(%endpoint, "dispatch succeeded"),
            Outcome::Failed(error) => tracing::warn!(
                %endpoint,
                code = error.code(),
                detail = error.message(),
                "provider failed"
            ),
            Outcome::Rejected(reason) => tracing::debug!(%endpoint, %reason, "request rejected"),
        }
        outcome
    }

    /// Run a provider call on its own task under the dispatch deadline.
    async fn guarded<T, F>(&self, call: F) -> Result<T, SourceError>
    where
        F: Future<Output = Result<T, SourceError>> + Send + 'static,
        T: Send + 'static,
    {
        let mut task = tokio::spawn(call.in_current_span());

        match tokio::time::timeout(self.deadline, &mut task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) if join_error.is_panic() => {
                Err(SourceError::internal("provider task panicked"))
            }
            Ok(Err(join_error)) => Err(SourceError::internal(format!(
                "provider task did not complete: {join_error}"
            ))),
            Err(_) => {
                task.abort();
                Err(SourceError::network(format!(
                    "provider exceeded the {}ms deadline",
                    self.deadline.as_millis()
                )))
            }
        }
    }
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, Outcome> {
    params
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Outcome::Rejected(format!("missing '{name}' parameter")))
}

fn required_symbol(params: &HashMap<String, String>) -> Result<Symbol, Outcome> {
    let raw = required(params, "symbol")?;
    Symbol::parse(raw).map_err(|e| Outcome::Rejected(e.to_string()))
}

fn render_json<T: serde::Serialize>(result: Result<T, SourceError>) -> Outcome {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(json) => Outcome::Success(Some(json)),
            Err(e) => Outcome::Failed(SourceError::internal(format!("encoding response: {e}"))),
        },
        Err(error) => Outcome::Failed(error),
    }
}
