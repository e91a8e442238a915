use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use semver::Version;
use service::config::ApiVersion;

/// Rejects requests whose `x-version` header is missing, malformed, or not
/// one of the supported API versions.
pub(crate) struct CompareApiVersion(pub Version);

#[async_trait]
impl<S> FromRequestParts<S> for CompareApiVersion
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ApiVersion::field_name())
            .and_then(|header| header.to_str().ok())
            .ok_or((
                StatusCode::BAD_REQUEST,
                format!("Missing {} header", ApiVersion::field_name()),
            ))?;

        let version = Version::parse(value)
            .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid API version: {value}")))?;

        if !ApiVersion::versions().iter().any(|supported| *supported == value) {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("Unsupported API version: {value}"),
            ));
        }

        Ok(CompareApiVersion(version))
    }
}
