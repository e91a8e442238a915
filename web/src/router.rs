use crate::{middleware::auth::require_auth, params, response, AppState};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::controller::{
    google_meet_controller, health_check_controller, teams_controller,
};

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Meeting Relay API"
        ),
        paths(
            google_meet_controller::authorize,
            google_meet_controller::callback,
            google_meet_controller::create_meeting,
            teams_controller::authorize,
            teams_controller::callback,
            teams_controller::create_meeting,
            health_check_controller::health_check,
        ),
        components(
            schemas(
                params::meeting::CreateParams,
                response::AuthorizedResponse,
                response::MeetingLinkResponse,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "meeting_relay", description = "Multi-provider meeting-provisioning relay API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Defines the verified-caller-identity header requirement for gaining access
// to our API endpoints for OpenAPI.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "header_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "x-user-id",
                    "Opaque caller identity set by the upstream authentication layer",
                ))),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(google_meet_routes(app_state.clone()))
        .merge(teams_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn google_meet_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            Router::new()
                .route(
                    "/googlemeet/authorize",
                    get(google_meet_controller::authorize),
                )
                .route(
                    "/googlemeet/createMeeting",
                    post(google_meet_controller::create_meeting),
                )
                .route_layer(from_fn(require_auth)),
        )
        // The provider redirects the browser here; no caller identity is available.
        .route("/googlemeet/callback", get(google_meet_controller::callback))
        .with_state(app_state)
}

fn teams_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(
            Router::new()
                .route("/teams/authorize", get(teams_controller::authorize))
                .route(
                    "/teams/createMeeting",
                    post(teams_controller::create_meeting),
                )
                .route_layer(from_fn(require_auth)),
        )
        // The provider redirects the browser here; no caller identity is available.
        .route("/teams/callback", get(teams_controller::callback))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use clap::Parser;
    use http_body_util::BodyExt;
    use mockito::Server;
    use serde_json::json;
    use service::config::{ApiVersion, Config};
    use tower::ServiceExt;

    fn test_app(server_url: &str) -> Router {
        let config = Config::parse_from([
            "meeting_relay_rs",
            "--googlemeet-client-id",
            "google-client-id",
            "--googlemeet-client-secret",
            "google-client-secret",
            "--googlemeet-redirect-uri",
            "https://relay.example.com/googlemeet/callback",
            "--googlemeet-token-url",
            &format!("{server_url}/google/token"),
            "--googlemeet-api-base-url",
            &format!("{server_url}/google"),
            "--teams-client-id",
            "teams-client-id",
            "--teams-client-secret",
            "teams-client-secret",
            "--teams-redirect-uri",
            "https://relay.example.com/teams/callback",
            "--teams-token-url",
            &format!("{server_url}/teams/token"),
            "--teams-api-base-url",
            &format!("{server_url}/teams"),
        ]);
        define_routes(AppState::from_config(config).unwrap())
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_authorize_redirects_to_consent_url() {
        let server = Server::new_async().await;
        let request = Request::builder()
            .uri("/googlemeet/authorize")
            .header("x-user-id", "caller-1")
            .body(Body::empty())
            .unwrap();

        let response = test_app(&server.url()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let location = response.headers()["location"].to_str().unwrap();
        assert!(location.contains("client_id=google-client-id"));
        assert!(location.contains("response_type=code"));
    }

    #[tokio::test]
    async fn test_authorize_requires_verified_caller() {
        let server = Server::new_async().await;
        let request = Request::builder()
            .uri("/teams/authorize")
            .body(Body::empty())
            .unwrap();

        let response = test_app(&server.url()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_callback_returns_message_and_access_token() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/google/token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"access_token": "abc123"}"#)
            .create_async()
            .await;

        let request = Request::builder()
            .uri("/googlemeet/callback?code=one-time-code")
            .body(Body::empty())
            .unwrap();

        let response = test_app(&server.url()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Google Meet authorization successful",
                "accessToken": "abc123"
            })
        );
    }

    #[tokio::test]
    async fn test_callback_rejected_code_yields_oauth_error_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/google/token")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "invalid_grant"}"#)
            .create_async()
            .await;

        let request = Request::builder()
            .uri("/googlemeet/callback?code=expired-code")
            .body(Body::empty())
            .unwrap();

        let response = test_app(&server.url()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "OAuth Error" }));
    }

    #[tokio::test]
    async fn test_create_meeting_returns_meeting_link() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/teams/me/onlineMeetings")
            .match_header("authorization", "Bearer token-123")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"joinWebUrl": "https://teams.example/join/1"}"#)
            .create_async()
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/teams/createMeeting")
            .header("x-user-id", "caller-1")
            .header(ApiVersion::field_name(), ApiVersion::default_version())
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "accessToken": "token-123",
                    "topic": "Planning",
                    "startTime": "2025-01-01T10:00:00Z",
                    "duration": 30
                })
                .to_string(),
            ))
            .unwrap();

        let response = test_app(&server.url()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({ "meetingLink": "https://teams.example/join/1" })
        );
    }

    #[tokio::test]
    async fn test_create_meeting_provider_rejection_yields_fixed_error_body() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/google/calendars/primary/events")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "Invalid Credentials"}}"#)
            .create_async()
            .await;

        let request = Request::builder()
            .method("POST")
            .uri("/googlemeet/createMeeting")
            .header("x-user-id", "caller-1")
            .header(ApiVersion::field_name(), ApiVersion::default_version())
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "accessToken": "expired-token",
                    "topic": "Standup",
                    "startTime": "2025-01-01T10:00:00Z",
                    "duration": 30
                })
                .to_string(),
            ))
            .unwrap();

        let response = test_app(&server.url()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to create meeting" })
        );
    }

    #[tokio::test]
    async fn test_create_meeting_requires_api_version_header() {
        let server = Server::new_async().await;
        let request = Request::builder()
            .method("POST")
            .uri("/teams/createMeeting")
            .header("x-user-id", "caller-1")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "accessToken": "token-123",
                    "topic": "Planning",
                    "startTime": "2025-01-01T10:00:00Z",
                    "duration": 30
                })
                .to_string(),
            ))
            .unwrap();

        let response = test_app(&server.url()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_check_is_public() {
        let server = Server::new_async().await;
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = test_app(&server.url()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
