use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

/// Header carrying the opaque caller identity, set by the upstream
/// authentication layer once it has verified the caller.
pub(crate) const CALLER_ID_HEADER: &str = "x-user-id";

/// The verified caller identity for a request.
///
/// The value is opaque to the relay: it is never interpreted, only required
/// to be present. Verification happens upstream of this service.
pub(crate) struct AuthenticatedUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts
            .headers
            .get(CALLER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            Some(caller_id) if !caller_id.is_empty() => {
                Ok(AuthenticatedUser(caller_id.to_string()))
            }
            _ => Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string())),
        }
    }
}
