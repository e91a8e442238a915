//! Axum boundary for the meeting-provisioning relay.

use std::sync::Arc;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use log::*;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use domain::gateway::{google_meet, teams};
use domain::Relay;
use service::config::{ApiVersion, Config};

pub(crate) mod controller;
mod error;
pub(crate) mod extractors;
pub(crate) mod middleware;
pub(crate) mod params;
pub(crate) mod response;
pub mod router;

pub use self::error::{Error, Result};

use crate::extractors::authenticated_user::CALLER_ID_HEADER;

/// Shared application state for the router.
///
/// Both relays are built once at startup so that missing provider
/// configuration fails fast instead of per-request. The state is otherwise
/// immutable; requests share nothing else.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub google_meet: Arc<Relay<google_meet::Connector>>,
    pub teams: Arc<Relay<teams::Connector>>,
}

impl AppState {
    /// Build the relays from static configuration.
    ///
    /// Fails with the `Config` error kind when a provider's client id,
    /// client secret, or redirect URI is missing.
    pub fn from_config(config: Config) -> std::result::Result<Self, domain::Error> {
        let google_meet = Arc::new(domain::relay::google_meet(&config)?);
        let teams = Arc::new(domain::relay::teams(&config)?);

        Ok(Self {
            config,
            google_meet,
            teams,
        })
    }
}

/// Bind the listener and serve the router until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let listen_addr = format!("{host}:{port}");

    let allowed_origins = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid allowed origin: {origin}");
                None
            }
        })
        .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-version"),
            HeaderName::from_static(CALLER_ID_HEADER),
        ])
        .allow_origin(allowed_origins);

    info!("Server starting... listening for connections on http://{listen_addr}");
    info!("API version: {}", ApiVersion::default_version());

    let listener = TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, router::define_routes(app_state).layer(cors)).await
}
