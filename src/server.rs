// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use config::ServerConfig;
use controller::{RatingRequest, RatingTransactionHandler, Response, Store};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Renders a handler `Response` as status code + JSON body
pub struct Reply(pub Response);

impl IntoResponse for Reply {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.0.body())).into_response()
    }
}

pub fn router<S>(handler: Arc<RatingTransactionHandler<S>>, cors_permissive: bool) -> Router
where
    S: Store + Send + Sync + 'static,
{
    let cors = if cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/", get(welcome))
        .route("/api/ratings", post(rate::<S>))
        .layer(cors)
        .with_state(handler)
}

async fn welcome() -> &'static str {
    "Welcome"
}

async fn rate<S>(
    State(handler): State<Arc<RatingTransactionHandler<S>>>,
    body: Result<Json<RatingRequest>, JsonRejection>,
) -> Reply
where
    S: Store + Send + Sync + 'static,
{
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            log::warn!("Malformed rating request: {}", rejection);
            return Reply(Response::InvalidRequest(rejection.body_text()));
        }
    };

    // Runs to completion even if the client goes away, so the connection
    // is always given back
    match tokio::task::spawn_blocking(move || handler.handle(request)).await {
        Ok(response) => Reply(response),
        Err(e) => {
            log::error!("Rating handler task failed: {}", e);
            Reply(Response::InternalError)
        }
    }
}

pub async fn run<S>(handler: RatingTransactionHandler<S>, config: &ServerConfig) -> Result<(), Error>
where
    S: Store + Send + Sync + 'static,
{
    let app = router(Arc::new(handler), config.cors_permissive);
    let listener = TcpListener::bind(config.address()).await?;

    log::info!("Server running on port: {}", config.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            log::error!("Couldn't listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
