//! Error types for the `domain` layer.
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer.
/// The `source` field is used to hold the original error that caused
/// the domain error. The intent is to translate errors between layers while
/// maintaining layer boundaries: `web` depends on `domain` and uses the various
/// `error_kind`s to return appropriate HTTP status codes and messages to the
/// client, without ever seeing provider wire detail.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    /// Static provider configuration (client id/secret/redirect URI) is missing.
    /// Raised when a relay is constructed, so it fails at startup rather than per-request.
    Config,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
/// `TokenExchange` and `MeetingCreation` are the two caller-visible kinds; the
/// relay collapses every connector failure into one of them.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The authorization code was invalid, expired, already consumed, or the
    /// token endpoint was unreachable.
    TokenExchange,
    /// The access token was rejected, the payload was refused by the provider,
    /// or the meeting endpoint failed or timed out.
    MeetingCreation,
    Network,
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself, including
        // the bounded per-call timeout.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}
