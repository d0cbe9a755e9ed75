//! Streamable HTTP transport.
//!
//! One message per `POST /mcp` body. A reply is returned with `200 OK`; a
//! message that gets no reply (a notification) yields `202 Accepted` with an
//! empty body.

use super::McpServer;
use crate::{Error, Result};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Path the MCP endpoint is mounted on.
pub const MCP_PATH: &str = "/mcp";

/// Builds the HTTP router for a server.
pub fn router(server: Arc<McpServer>) -> Router {
    Router::new()
        .route(MCP_PATH, post(handle_http_request))
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

/// Handles one posted message.
async fn handle_http_request(State(server): State<Arc<McpServer>>, body: String) -> Response {
    // The store does blocking file I/O under its lock.
    let reply = tokio::task::spawn_blocking(move || server.process(&body)).await;

    match reply {
        Ok(Some(reply)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            reply,
        )
            .into_response(),
        Ok(None) => StatusCode::ACCEPTED.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "MCP request task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
    }
}

/// Serves the router on all interfaces until the process is stopped.
pub(super) fn serve(server: Arc<McpServer>, port: u16) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().map_err(|e| Error::OperationFailed {
        operation: "create_runtime".to_string(),
        cause: e.to_string(),
    })?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(port, path = MCP_PATH, "Starting MCP HTTP server");

    rt.block_on(async {
        let listener =
            tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| Error::OperationFailed {
                    operation: "bind".to_string(),
                    cause: e.to_string(),
                })?;

        axum::serve(listener, router(server))
            .await
            .map_err(|e| Error::OperationFailed {
                operation: "serve".to_string(),
                cause: e.to_string(),
            })
    })
}
