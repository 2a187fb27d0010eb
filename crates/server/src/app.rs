//! Router setup and the serving loop.
//!
//! # Routes
//!
//! - `GET /` - status
//! - `GET /companies` - servable companies
//! - `GET /latest/{company}` - latest OHLC
//! - `POST /predict` - next-close prediction

use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes::{api, health};
use crate::state::AppState;

/// Build the application with all routes.
pub fn create_app(state: AppState) -> Router {
    // The browser frontend is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/", get(health::status))
        .route("/companies", get(api::get_companies))
        .route("/latest/{company}", get(api::get_latest))
        .route("/predict", post(api::post_predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Listen address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Serve until Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "prediction server listening");
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_create_app() {
        let _app = create_app(test_state());
    }

    /// Send a raw HTTP/1.1 request to a freshly bound app; return the response text.
    async fn roundtrip(request: String) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, create_app(test_state())).await.unwrap();
        });

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        server.abort();
        response
    }

    fn get(path: &str) -> String {
        format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
    }

    #[tokio::test]
    async fn test_routes_companies_and_latest() {
        let companies = roundtrip(get("/companies")).await;
        assert!(companies.starts_with("HTTP/1.1 200"));
        assert!(companies.ends_with(r#"["INFY","TCS"]"#));

        let latest = roundtrip(get("/latest/tcs")).await;
        assert!(latest.starts_with("HTTP/1.1 200"));
        assert!(latest.contains(r#""company":"TCS""#));

        let missing = roundtrip(get("/latest/ACME")).await;
        assert!(missing.starts_with("HTTP/1.1 404"));
        assert!(missing.contains(r#""status":404"#));
    }

    #[tokio::test]
    async fn test_route_predict() {
        let body = r#"{"company":"TCS","open":138,"high":140,"low":137,"close":139}"#;
        let request = format!(
            "POST /predict HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let response = roundtrip(request).await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains(r#""trend":"UP""#));
    }
}
