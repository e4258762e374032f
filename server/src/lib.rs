mod config;
mod error;
mod routes;

use std::{future::Future, io, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use model::ModelRegistry;
use tokio::net::TcpListener;

pub use config::ServerConfig;
pub use error::{ApiErr, ServerErr};
pub use routes::Greeting;

/// Builds the HTTP routes on top of an already loaded registry.
pub fn router(registry: Arc<ModelRegistry>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/predict", post(routes::predict))
        .with_state(registry)
}

/// Serves requests on `listener` until `shutdown` resolves.
///
/// Takes ownership of the registry, which is released once the in-flight
/// requests are drained.
///
/// # Arguments
/// * `listener` - An already bound listener.
/// * `registry` - The models to serve, fully loaded.
/// * `shutdown` - Resolves when the server should stop accepting connections.
pub async fn serve<F>(listener: TcpListener, registry: ModelRegistry, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(Arc::new(registry));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
