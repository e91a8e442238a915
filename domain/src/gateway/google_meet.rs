//! Google Meet connector.
//!
//! Provisions meetings through the Google Calendar API; the join link comes
//! back as the created event's `hangoutLink`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::gateway::connector::{meeting_window, MeetingResult, ProviderKind, Settings};

/// OAuth scopes requested during authorization.
const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/calendar",
    "https://www.googleapis.com/auth/calendar.events",
];

/// Provider endpoint URLs, overridable for tests.
#[derive(Debug, Clone)]
pub struct Urls {
    pub auth_url: String,
    pub token_url: String,
    pub api_base_url: String,
}

impl Default for Urls {
    fn default() -> Self {
        Self {
            auth_url: service::config::DEFAULT_GOOGLEMEET_AUTH_URL.to_string(),
            token_url: service::config::DEFAULT_GOOGLEMEET_TOKEN_URL.to_string(),
            api_base_url: service::config::DEFAULT_GOOGLEMEET_API_BASE_URL.to_string(),
        }
    }
}

/// Request to exchange an authorization code for tokens
#[derive(Debug, Serialize)]
struct TokenExchangeRequest {
    code: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    grant_type: String,
}

/// OAuth token response from Google
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct EventTime {
    #[serde(rename = "dateTime")]
    date_time: String,
}

/// Request to create a calendar event backing the meeting
#[derive(Debug, Serialize)]
struct CreateEventRequest {
    summary: String,
    start: EventTime,
    end: EventTime,
}

/// Response from creating a calendar event
#[derive(Debug, Deserialize)]
struct EventResponse {
    #[serde(rename = "hangoutLink")]
    hangout_link: Option<String>,
}

/// Google Meet connector.
pub struct Connector {
    settings: Settings,
    urls: Urls,
    http_client: reqwest::Client,
}

impl Connector {
    /// Create a new Google Meet connector.
    ///
    /// `timeout` bounds every outbound call; a timed-out call fails the same
    /// way as any other transport failure.
    pub fn new(settings: Settings, urls: Urls, timeout: Duration) -> Result<Self, Error> {
        let http_client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            settings,
            urls,
            http_client,
        })
    }
}

#[async_trait]
impl crate::gateway::Connector for Connector {
    fn provider(&self) -> ProviderKind {
        ProviderKind::GoogleMeet
    }

    fn authorization_url(&self) -> String {
        let scopes = SCOPES.join(" ");

        format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}&\
            access_type=offline&\
            prompt=consent",
            self.urls.auth_url,
            urlencoding::encode(&self.settings.client_id),
            urlencoding::encode(&self.settings.redirect_uri),
            urlencoding::encode(&scopes)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<String, Error> {
        let request = TokenExchangeRequest {
            code: code.to_string(),
            client_id: self.settings.client_id.clone(),
            client_secret: self.settings.client_secret.clone(),
            redirect_uri: self.settings.redirect_uri.clone(),
            grant_type: "authorization_code".to_string(),
        };

        debug!("Exchanging Google OAuth code for tokens");

        let response = self
            .http_client
            .post(&self.urls.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Google OAuth code: {:?}", e);
                Error::from(e)
            })?;

        if response.status().is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Google token response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Google OAuth".to_string(),
                    )),
                }
            })?;
            info!("Successfully exchanged Google OAuth code for an access token");
            Ok(tokens.access_token)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google OAuth error: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }

    async fn create_meeting(
        &self,
        access_token: &str,
        topic: &str,
        start_time: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<MeetingResult, Error> {
        let url = format!("{}/calendars/primary/events", self.urls.api_base_url);
        let (start, end) = meeting_window(start_time, duration_minutes)?;

        let request = CreateEventRequest {
            summary: topic.to_string(),
            start: EventTime { date_time: start },
            end: EventTime { date_time: end },
        };

        debug!("Creating Google Meet meeting");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to create Google Meet meeting: {:?}", e);
                Error::from(e)
            })?;

        if response.status().is_success() {
            let event: EventResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Google Calendar response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Google Calendar API".to_string(),
                    )),
                }
            })?;

            match event.hangout_link {
                Some(join_url) => {
                    info!("Created Google Meet meeting");
                    Ok(MeetingResult { join_url })
                }
                None => {
                    warn!("Google Calendar response is missing hangoutLink");
                    Err(Error {
                        source: None,
                        error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                            "Missing join link in Google Calendar response".to_string(),
                        )),
                    })
                }
            }
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google Calendar API error: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Connector as _;

    fn connector() -> Connector {
        Connector::new(
            Settings {
                client_id: "google client id".to_string(),
                client_secret: "google-client-secret".to_string(),
                redirect_uri: "https://relay.example.com/googlemeet/callback".to_string(),
            },
            Urls::default(),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_authorization_url_contains_configured_values() {
        let url = connector().authorization_url();

        assert!(url.starts_with(service::config::DEFAULT_GOOGLEMEET_AUTH_URL));
        assert!(url.contains("client_id=google%20client%20id"));
        assert!(url.contains(
            "redirect_uri=https%3A%2F%2Frelay.example.com%2Fgooglemeet%2Fcallback"
        ));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("access_type=offline"));
    }

    #[test]
    fn test_authorization_url_is_deterministic() {
        let connector = connector();
        assert_eq!(connector.authorization_url(), connector.authorization_url());
    }
}
