// Local HTTP API - Axum server exposing the brief commands as JSON endpoints
// Lets a browser or another tool drive the same catalog/session as the shell.

pub mod routes;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use rand::{thread_rng, Rng};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::commands::AppState;

/// Shared state for the HTTP server
pub struct ServerState {
    /// Auth token (256-bit random, hex-encoded)
    pub token: String,
    pub app: AppState,
}

/// Generate a cryptographically random 256-bit token (64 hex chars)
pub fn generate_token() -> String {
    let mut rng = thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Auth middleware - validates Bearer token on every request except /api/status
async fn auth_middleware(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if request.uri().path() == "/api/status" {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == state.token => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Build the full router (API routes + auth + CORS)
pub fn router(state: Arc<ServerState>) -> Router {
    // CORS configuration - not a security layer, auth middleware handles that
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .allow_origin(HeaderValue::from_static("*"));

    Router::new()
        .merge(routes::api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
        .layer(cors)
}

/// Serve until Ctrl-C
pub async fn serve(app: AppState, host: &str, port: u16) -> Result<(), String> {
    let token = generate_token();
    let state = Arc::new(ServerState {
        token: token.clone(),
        app,
    });

    let listener = try_bind(host, port).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local addr: {}", e))?;

    info!("HTTP API listening on {}", addr);
    println!("Genre Harvester API on http://{}", addr);
    println!("Authorization: Bearer {}", token);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    info!("HTTP API stopped");
    Ok(())
}

/// Bind the preferred port, then nearby ports, then an OS-assigned one
async fn try_bind(host: &str, preferred_port: u16) -> Result<tokio::net::TcpListener, String> {
    let ip = host
        .parse::<std::net::IpAddr>()
        .map_err(|e| format!("Invalid host {:?}: {}", host, e))?;

    for offset in 0..=10u16 {
        let port = preferred_port.saturating_add(offset);
        if let Ok(listener) = tokio::net::TcpListener::bind(SocketAddr::new(ip, port)).await {
            if offset > 0 {
                warn!("Port {} unavailable, using {}", preferred_port, port);
            }
            return Ok(listener);
        }
    }

    let listener = tokio::net::TcpListener::bind(SocketAddr::new(ip, 0))
        .await
        .map_err(|e| format!("Failed to bind to any port: {}", e))?;
    warn!("All preferred ports unavailable, OS assigned a port");
    Ok(listener)
}
