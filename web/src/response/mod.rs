//! JSON response bodies for the relay endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Body returned by a successful OAuth callback.
///
/// The access token belongs to the caller from here on; the relay does not
/// retain a copy.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedResponse {
    pub message: String,
    pub access_token: String,
}

/// Body returned by a successful meeting creation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingLinkResponse {
    pub meeting_link: String,
}
