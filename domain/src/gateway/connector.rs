//! Provider connector contract and shared types.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainErrorKind, Error, ExternalErrorKind};

/// Known meeting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    GoogleMeet,
    Teams,
}

impl ProviderKind {
    /// Get the provider identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::GoogleMeet => "googlemeet",
            ProviderKind::Teams => "teams",
        }
    }
}

/// Static OAuth client configuration for one provider.
///
/// Tokens and codes obtained with one provider's settings must never be sent
/// to another provider.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Normalized meeting-creation result.
///
/// The join URL is the only field unified across providers; everything else
/// in a provider's response is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingResult {
    pub join_url: String,
}

/// Trait for meeting providers.
///
/// Implementations handle the provider-specific wire details behind a fixed
/// capability set:
/// - Authorization URL construction (scope list, response-mode encoding)
/// - Authorization code exchange at the provider's token endpoint
/// - Meeting creation with a caller-supplied bearer token
///
/// Every operation is stateless and performs at most one outbound call.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Get the provider kind.
    fn provider(&self) -> ProviderKind;

    /// Build the authorization-code consent URL.
    ///
    /// Pure function of static configuration; performs no I/O and cannot fail.
    fn authorization_url(&self) -> String;

    /// Exchange an authorization code for a bearer access token.
    ///
    /// Issues one form-encoded POST to the provider's token endpoint and
    /// returns the `access_token` field of the response body.
    async fn exchange_code(&self, code: &str) -> Result<String, Error>;

    /// Create a meeting and return its normalized join link.
    ///
    /// Issues one authenticated JSON POST to the provider's meeting endpoint.
    /// Not idempotent: two equivalent calls may create two distinct meetings.
    async fn create_meeting(
        &self,
        access_token: &str,
        topic: &str,
        start_time: DateTime<Utc>,
        duration_minutes: i64,
    ) -> Result<MeetingResult, Error>;
}

/// Serialize the meeting time window as ISO-8601 instants with millisecond
/// precision and a `Z` suffix. The end instant is `start_time + duration_minutes`.
///
/// The duration is caller-supplied and unbounded; a value whose end instant
/// cannot be represented fails instead of panicking.
pub(crate) fn meeting_window(
    start_time: DateTime<Utc>,
    duration_minutes: i64,
) -> Result<(String, String), Error> {
    let end_time = chrono::Duration::try_minutes(duration_minutes)
        .and_then(|window| start_time.checked_add_signed(window))
        .ok_or_else(|| Error {
            source: None,
            error_kind: DomainErrorKind::External(ExternalErrorKind::Other(format!(
                "Meeting duration out of range: {duration_minutes} minutes"
            ))),
        })?;

    Ok((
        start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
        end_time.to_rfc3339_opts(SecondsFormat::Millis, true),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_window_adds_duration_in_minutes() {
        let start: DateTime<Utc> = "2025-01-01T10:00:00Z".parse().unwrap();
        let (start_instant, end_instant) = meeting_window(start, 30).unwrap();
        assert_eq!(start_instant, "2025-01-01T10:00:00.000Z");
        assert_eq!(end_instant, "2025-01-01T10:30:00.000Z");
    }

    #[test]
    fn test_meeting_window_preserves_sub_second_precision() {
        let start: DateTime<Utc> = "2025-06-15T23:45:30.250Z".parse().unwrap();
        let (start_instant, end_instant) = meeting_window(start, 90).unwrap();
        assert_eq!(start_instant, "2025-06-15T23:45:30.250Z");
        assert_eq!(end_instant, "2025-06-16T01:15:30.250Z");
    }

    #[test]
    fn test_meeting_window_rejects_out_of_range_duration() {
        let start: DateTime<Utc> = "2025-01-01T10:00:00Z".parse().unwrap();

        let error = meeting_window(start, i64::MAX).unwrap_err();
        assert!(matches!(
            error.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Other(_))
        ));

        let error = meeting_window(start, i64::MIN).unwrap_err();
        assert!(matches!(
            error.error_kind,
            DomainErrorKind::External(ExternalErrorKind::Other(_))
        ));
    }

    #[test]
    fn test_provider_kind_identifier_strings() {
        assert_eq!(ProviderKind::GoogleMeet.as_str(), "googlemeet");
        assert_eq!(ProviderKind::Teams.as_str(), "teams");
    }
}
