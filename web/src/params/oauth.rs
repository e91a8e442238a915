use serde::Deserialize;

/// Query parameters for the OAuth callback redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// One-time authorization code issued by the provider after consent.
    pub code: String,
}
