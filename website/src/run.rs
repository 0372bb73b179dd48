use axum::Router;
use axum::extract::FromRef;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info};

use snafu::ResultExt;

use crate::Result;
use crate::config::Config;
use crate::error::{BindSnafu, ServeSnafu};
use crate::web::all_routes;
use crate::wizard_store::WizardStore;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub config: Arc<Config>,
    pub wizards: Arc<WizardStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            wizards: Arc::new(WizardStore::new()),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new().merge(all_routes(state)).layer(
        ServiceBuilder::new().layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        ),
    )
}

pub async fn run(config: Config) -> Result<()> {
    let port = config.port;
    let state = AppState::new(config);
    let routes_all = build_app(state);

    // Setup the server
    let ip = "127.0.0.1";
    let addr = format!("{}:{}", ip, port);
    info!("HTTP Server running on {}", addr);

    let listener = TcpListener::bind(&addr).await.context(BindSnafu {
        addr: addr.clone(),
    })?;
    axum::serve(listener, routes_all.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(ServeSnafu)?;

    info!("HTTP Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
