//! Controller for the Google Meet relay endpoints.
//!
//! Note: the authorize and callback endpoints don't use CompareApiVersion
//! because they work via browser redirects which cannot set custom headers.

use crate::extractors::{
    authenticated_user::AuthenticatedUser, compare_api_version::CompareApiVersion,
};
use crate::params::{meeting::CreateParams, oauth::CallbackParams};
use crate::response::{AuthorizedResponse, MeetingLinkResponse};
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use log::*;
use service::config::ApiVersion;

/// GET /googlemeet/authorize
///
/// Redirects the end user to Google's consent page.
#[utoipa::path(
    get,
    path = "/googlemeet/authorize",
    responses(
        (status = 307, description = "Redirect to the Google consent page"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("header_auth" = [])
    )
)]
pub async fn authorize(
    AuthenticatedUser(caller_id): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    info!("Redirecting caller {caller_id} to the Google consent page");
    Redirect::temporary(&app_state.google_meet.authorize_url())
}

/// GET /googlemeet/callback
///
/// Handles the OAuth redirect from Google and exchanges the one-time code
/// for an access token, which is returned to the caller to hold.
#[utoipa::path(
    get,
    path = "/googlemeet/callback",
    params(
        ("code" = String, Query, description = "Authorization code from Google"),
    ),
    responses(
        (status = 200, description = "Token exchange succeeded", body = AuthorizedResponse),
        (status = 400, description = "OAuth Error"),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, Error> {
    let access_token = app_state.google_meet.callback(&params.code).await?;

    Ok(Json(AuthorizedResponse {
        message: "Google Meet authorization successful".to_string(),
        access_token,
    }))
}

/// POST /googlemeet/createMeeting
///
/// Creates a Google Meet meeting with the caller-supplied access token and
/// returns the normalized join link.
#[utoipa::path(
    post,
    path = "/googlemeet/createMeeting",
    params(
        ApiVersion,
    ),
    request_body = CreateParams,
    responses(
        (status = 200, description = "Meeting created successfully", body = MeetingLinkResponse),
        (status = 400, description = "Failed to create meeting"),
        (status = 401, description = "Unauthorized"),
    ),
    security(
        ("header_auth" = [])
    )
)]
pub async fn create_meeting(
    CompareApiVersion(_v): CompareApiVersion,
    AuthenticatedUser(_caller_id): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST create Google Meet meeting: {}", params.topic);

    let meeting = app_state
        .google_meet
        .create_meeting(
            &params.access_token,
            &params.topic,
            params.start_time,
            params.duration,
        )
        .await?;

    Ok(Json(MeetingLinkResponse {
        meeting_link: meeting.join_url,
    }))
}
