//! Provider-agnostic relay over the meeting connectors.
//!
//! Sequences the authorization-code flow (build consent URL, exchange the
//! callback code, create a meeting with the caller-supplied token) over one
//! connector and collapses connector failures into the two caller-visible
//! error kinds. Provider wire detail is logged here and goes no further.
//!
//! The relay holds no state across calls: access tokens are returned to the
//! caller and must be supplied again for meeting creation.

use chrono::{DateTime, Utc};
use log::*;
use service::config::Config;

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use crate::gateway::{google_meet, teams, Connector, MeetingResult, Settings};

/// One relay instance per provider, parameterized by its connector.
pub struct Relay<C: Connector> {
    connector: C,
}

impl<C: Connector> Relay<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// The provider consent URL to redirect the end user to. Never fails.
    pub fn authorize_url(&self) -> String {
        self.connector.authorization_url()
    }

    /// Exchange a callback authorization code for a bearer access token.
    ///
    /// The token is returned to the caller, who is responsible for retaining
    /// it; nothing is stored here. Any connector failure surfaces as the
    /// `TokenExchange` kind without distinguishing sub-causes.
    pub async fn callback(&self, code: &str) -> Result<String, Error> {
        self.connector.exchange_code(code).await.map_err(|e| {
            warn!(
                "{} token exchange failed: {:?}",
                self.connector.provider().as_str(),
                e
            );
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::TokenExchange),
            }
        })
    }

    /// Create a meeting with a caller-supplied access token.
    ///
    /// The token may have been obtained out-of-band; no ordering with respect
    /// to `callback` is enforced. Any connector failure surfaces as the
    /// `MeetingCreation` kind.
    pub async fn create_meeting(
        &self,
        access_token: &str,
        topic: &str,
        start_time: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<MeetingResult, Error> {
        self.connector
            .create_meeting(access_token, topic, start_time, duration_minutes)
            .await
            .map_err(|e| {
                warn!(
                    "{} meeting creation failed: {:?}",
                    self.connector.provider().as_str(),
                    e
                );
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::MeetingCreation),
                }
            })
    }
}

/// Build the Google Meet relay from static configuration.
///
/// Missing credentials fail here, at startup, rather than per-request.
pub fn google_meet(config: &Config) -> Result<Relay<google_meet::Connector>, Error> {
    let settings = Settings {
        client_id: require(config.googlemeet_client_id(), "GOOGLEMEET_CLIENT_ID")?,
        client_secret: require(config.googlemeet_client_secret(), "GOOGLEMEET_CLIENT_SECRET")?,
        redirect_uri: require(config.googlemeet_redirect_uri(), "GOOGLEMEET_REDIRECT_URI")?,
    };
    let urls = google_meet::Urls {
        auth_url: config.googlemeet_auth_url().to_string(),
        token_url: config.googlemeet_token_url().to_string(),
        api_base_url: config.googlemeet_api_base_url().to_string(),
    };
    let connector = google_meet::Connector::new(settings, urls, config.provider_timeout())?;

    Ok(Relay::new(connector))
}

/// Build the Teams relay from static configuration.
///
/// Missing credentials fail here, at startup, rather than per-request.
pub fn teams(config: &Config) -> Result<Relay<teams::Connector>, Error> {
    let settings = Settings {
        client_id: require(config.teams_client_id(), "TEAMS_CLIENT_ID")?,
        client_secret: require(config.teams_client_secret(), "TEAMS_CLIENT_SECRET")?,
        redirect_uri: require(config.teams_redirect_uri(), "TEAMS_REDIRECT_URI")?,
    };
    let urls = teams::Urls {
        auth_url: config.teams_auth_url().to_string(),
        token_url: config.teams_token_url().to_string(),
        api_base_url: config.teams_api_base_url().to_string(),
    };
    let connector = teams::Connector::new(settings, urls, config.provider_timeout())?;

    Ok(Relay::new(connector))
}

fn require(value: Option<String>, name: &str) -> Result<String, Error> {
    value.ok_or_else(|| {
        error!("Missing provider configuration: {}", name);
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    })
}
