//! Microsoft Teams connector.
//!
//! Provisions meetings through the Microsoft Graph online-meetings API; the
//! join link comes back as the meeting's `joinWebUrl`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};
use crate::gateway::connector::{meeting_window, MeetingResult, ProviderKind, Settings};

/// OAuth scopes requested during authorization. Microsoft expects the same
/// scope string again on the token exchange.
const SCOPES: [&str; 3] = [
    "openid",
    "offline_access",
    "https://graph.microsoft.com/OnlineMeetings.ReadWrite",
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
            auth_url: service::config::DEFAULT_TEAMS_AUTH_URL.to_string(),
            token_url: service::config::DEFAULT_TEAMS_TOKEN_URL.to_string(),
            api_base_url: service::config::DEFAULT_TEAMS_API_BASE_URL.to_string(),
        }
    }
}

/// Request to exchange an authorization code for tokens
#[derive(Debug, Serialize)]
struct TokenExchangeRequest {
    client_id: String,
    scope: String,
    code: String,
    redirect_uri: String,
    grant_type: String,
    client_secret: String,
}

/// OAuth token response from the Microsoft identity platform
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Request to create an online meeting
#[derive(Debug, Serialize)]
struct CreateMeetingRequest {
    subject: String,
    #[serde(rename = "startDateTime")]
    start_date_time: String,
    #[serde(rename = "endDateTime")]
    end_date_time: String,
}

/// Response from creating an online meeting
#[derive(Debug, Deserialize)]
struct OnlineMeetingResponse {
    #[serde(rename = "joinWebUrl")]
    join_web_url: Option<String>,
}

/// Microsoft Teams connector.
pub struct Connector {
    settings: Settings,
    urls: Urls,
    http_client: reqwest::Client,
}

impl Connector {
    /// Create a new Teams connector.
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
        ProviderKind::Teams
    }

    fn authorization_url(&self) -> String {
        let scopes = SCOPES.join(" ");

        format!(
            "{}?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            response_mode=query&\
            scope={}",
            self.urls.auth_url,
            urlencoding::encode(&self.settings.client_id),
            urlencoding::encode(&self.settings.redirect_uri),
            urlencoding::encode(&scopes)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<String, Error> {
        let request = TokenExchangeRequest {
            client_id: self.settings.client_id.clone(),
            scope: SCOPES.join(" "),
            code: code.to_string(),
            redirect_uri: self.settings.redirect_uri.clone(),
            grant_type: "authorization_code".to_string(),
            client_secret: self.settings.client_secret.clone(),
        };

        debug!("Exchanging Microsoft OAuth code for tokens");

        let response = self
            .http_client
            .post(&self.urls.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Microsoft OAuth code: {:?}", e);
                Error::from(e)
            })?;

        if response.status().is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Microsoft token response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Microsoft OAuth".to_string(),
                    )),
                }
            })?;
            info!("Successfully exchanged Microsoft OAuth code for an access token");
            Ok(tokens.access_token)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Microsoft OAuth error: {}", error_text);
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
        let url = format!("{}/me/onlineMeetings", self.urls.api_base_url);
        let (start, end) = meeting_window(start_time, duration_minutes)?;

        let request = CreateMeetingRequest {
            subject: topic.to_string(),
            start_date_time: start,
            end_date_time: end,
        };

        debug!("Creating Teams meeting");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to create Teams meeting: {:?}", e);
                Error::from(e)
            })?;

        if response.status().is_success() {
            let meeting: OnlineMeetingResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Microsoft Graph response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                        "Invalid response from Microsoft Graph API".to_string(),
                    )),
                }
            })?;

            match meeting.join_web_url {
                Some(join_url) => {
                    info!("Created Teams meeting");
                    Ok(MeetingResult { join_url })
                }
                None => {
                    warn!("Microsoft Graph response is missing joinWebUrl");
                    Err(Error {
                        source: None,
                        error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                            "Missing join link in Microsoft Graph response".to_string(),
                        )),
                    })
                }
            }
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Microsoft Graph API error: {}", error_text);
            Err(Error {
                source: None,
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(error_text)),
            })
        }
    }
}
