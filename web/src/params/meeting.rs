use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

/// Body for POST /{provider}/createMeeting.
///
/// `topic`, `start_time`, and `duration` are forwarded to the provider
/// without independent validation; malformed values surface as the
/// provider's own rejection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    /// Bearer token obtained from the provider's callback; held by the caller.
    pub access_token: String,
    /// Meeting topic.
    pub topic: String,
    /// Meeting start instant, RFC 3339.
    pub start_time: DateTime<Utc>,
    /// Meeting length in minutes.
    pub duration: i64,
}
