use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Uri};
use axum::response::Response;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::dispatch::Dispatcher;

/// Build the facade router. Every path and method goes through the dispatcher.
pub fn router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .fallback(dispatch_request)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(dispatcher))
}

async fn dispatch_request(
    State(dispatcher): State<Arc<Dispatcher>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    dispatcher.handle(&uri, &headers).await
}
