use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use semver::{BuildMetadata, Prerelease, Version};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use utoipa::IntoParams;

type APiVersionList = [&'static str; 1];

const DEFAULT_API_VERSION: &str = "1.0.0-beta1";
// Expand this array to include all valid API versions. Versions that have been
// completely removed should be removed from this list - they're no longer valid.
const API_VERSIONS: APiVersionList = [DEFAULT_API_VERSION];

static X_VERSION: &str = "x-version";

/// Default Google OAuth authorization endpoint.
pub const DEFAULT_GOOGLEMEET_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
/// Default Google OAuth token endpoint.
pub const DEFAULT_GOOGLEMEET_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Default Google Calendar API base URL used to provision Google Meet meetings.
/// Override in tests to point at a mock server.
pub const DEFAULT_GOOGLEMEET_API_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";

/// Default Microsoft identity platform authorization endpoint.
pub const DEFAULT_TEAMS_AUTH_URL: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";
/// Default Microsoft identity platform token endpoint.
pub const DEFAULT_TEAMS_TOKEN_URL: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/token";
/// Default Microsoft Graph API base URL used to provision Teams meetings.
/// Override in tests to point at a mock server.
pub const DEFAULT_TEAMS_API_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Header)]
pub struct ApiVersion {
    /// The version of the API to use for a request.
    #[param(rename = "x-version", style = Simple, required, example = "1.0.0-beta1", value_type = String)]
    pub version: Version,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// Set the current semantic version of the endpoint API to expose to clients. All
    /// endpoints not contained in the specified version will not be exposed by the router.
    #[arg(short, long, env, default_value = DEFAULT_API_VERSION,
        value_parser = clap::builder::PossibleValuesParser::new(API_VERSIONS)
            .map(|s| s.parse::<String>().unwrap()),
        )]
    pub api_version: Option<String>,

    /// The Google OAuth client ID for the Google Meet integration.
    #[arg(long, env)]
    googlemeet_client_id: Option<String>,

    /// The Google OAuth client secret for the Google Meet integration.
    #[arg(long, env)]
    googlemeet_client_secret: Option<String>,

    /// The redirect URI registered with Google for the OAuth callback.
    #[arg(long, env)]
    googlemeet_redirect_uri: Option<String>,

    /// The Google OAuth authorization endpoint.
    #[arg(long, env, default_value = DEFAULT_GOOGLEMEET_AUTH_URL)]
    googlemeet_auth_url: String,

    /// The Google OAuth token endpoint.
    #[arg(long, env, default_value = DEFAULT_GOOGLEMEET_TOKEN_URL)]
    googlemeet_token_url: String,

    /// The Google Calendar API base URL.
    #[arg(long, env, default_value = DEFAULT_GOOGLEMEET_API_BASE_URL)]
    googlemeet_api_base_url: String,

    /// The Microsoft OAuth application (client) ID for the Teams integration.
    #[arg(long, env)]
    teams_client_id: Option<String>,

    /// The Microsoft OAuth client secret for the Teams integration.
    #[arg(long, env)]
    teams_client_secret: Option<String>,

    /// The redirect URI registered with Microsoft for the OAuth callback.
    #[arg(long, env)]
    teams_redirect_uri: Option<String>,

    /// The Microsoft identity platform authorization endpoint.
    #[arg(long, env, default_value = DEFAULT_TEAMS_AUTH_URL)]
    teams_auth_url: String,

    /// The Microsoft identity platform token endpoint.
    #[arg(long, env, default_value = DEFAULT_TEAMS_TOKEN_URL)]
    teams_token_url: String,

    /// The Microsoft Graph API base URL.
    #[arg(long, env, default_value = DEFAULT_TEAMS_API_BASE_URL)]
    teams_api_base_url: String,

    /// Timeout in seconds applied to every outbound call to a provider endpoint.
    #[arg(long, env, default_value_t = 30)]
    pub provider_timeout_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn api_version(&self) -> &str {
        self.api_version
            .as_ref()
            .expect("No API version string provided")
    }

    /// Returns the Google OAuth client ID, if configured.
    pub fn googlemeet_client_id(&self) -> Option<String> {
        self.googlemeet_client_id.clone()
    }

    /// Returns the Google OAuth client secret, if configured.
    pub fn googlemeet_client_secret(&self) -> Option<String> {
        self.googlemeet_client_secret.clone()
    }

    /// Returns the redirect URI registered with Google, if configured.
    pub fn googlemeet_redirect_uri(&self) -> Option<String> {
        self.googlemeet_redirect_uri.clone()
    }

    /// Returns the Google OAuth authorization endpoint URL.
    pub fn googlemeet_auth_url(&self) -> &str {
        &self.googlemeet_auth_url
    }

    /// Returns the Google OAuth token endpoint URL.
    pub fn googlemeet_token_url(&self) -> &str {
        &self.googlemeet_token_url
    }

    /// Returns the Google Calendar API base URL.
    pub fn googlemeet_api_base_url(&self) -> &str {
        &self.googlemeet_api_base_url
    }

    /// Returns the Microsoft OAuth client ID, if configured.
    pub fn teams_client_id(&self) -> Option<String> {
        self.teams_client_id.clone()
    }

    /// Returns the Microsoft OAuth client secret, if configured.
    pub fn teams_client_secret(&self) -> Option<String> {
        self.teams_client_secret.clone()
    }

    /// Returns the redirect URI registered with Microsoft, if configured.
    pub fn teams_redirect_uri(&self) -> Option<String> {
        self.teams_redirect_uri.clone()
    }

    /// Returns the Microsoft identity platform authorization endpoint URL.
    pub fn teams_auth_url(&self) -> &str {
        &self.teams_auth_url
    }

    /// Returns the Microsoft identity platform token endpoint URL.
    pub fn teams_token_url(&self) -> &str {
        &self.teams_token_url
    }

    /// Returns the Microsoft Graph API base URL.
    pub fn teams_api_base_url(&self) -> &str {
        &self.teams_api_base_url
    }

    /// Returns the bounded timeout applied to outbound provider calls.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}

impl ApiVersion {
    pub fn new(version_str: &'static str) -> Self {
        ApiVersion {
            version: Version::parse(version_str).unwrap_or(Version {
                major: 0,
                minor: 0,
                patch: 1,
                pre: Prerelease::EMPTY,
                build: BuildMetadata::EMPTY,
            }),
        }
    }

    pub fn default_version() -> &'static str {
        DEFAULT_API_VERSION
    }

    pub fn field_name() -> &'static str {
        X_VERSION
    }

    pub fn versions() -> APiVersionList {
        API_VERSIONS
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        ApiVersion {
            version: Version::parse(DEFAULT_API_VERSION).unwrap_or(Version {
                major: 0,
                minor: 0,
                patch: 1,
                pre: Prerelease::EMPTY,
                build: BuildMetadata::EMPTY,
            }),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_empty() -> Config {
        Config::parse_from(["meeting_relay_rs"])
    }

    #[test]
    fn test_defaults() {
        let config = parse_empty();
        assert_eq!(config.port, 4000);
        assert_eq!(config.provider_timeout_secs, 30);
        assert_eq!(config.api_version(), DEFAULT_API_VERSION);
        assert_eq!(config.googlemeet_auth_url(), DEFAULT_GOOGLEMEET_AUTH_URL);
        assert_eq!(config.teams_token_url(), DEFAULT_TEAMS_TOKEN_URL);
        assert_eq!(config.runtime_env(), RustEnv::Development);
    }

    #[test]
    fn test_provider_urls_can_be_overridden() {
        let config = Config::parse_from([
            "meeting_relay_rs",
            "--googlemeet-token-url",
            "http://127.0.0.1:9999/token",
            "--teams-api-base-url",
            "http://127.0.0.1:9999",
        ]);
        assert_eq!(config.googlemeet_token_url(), "http://127.0.0.1:9999/token");
        assert_eq!(config.teams_api_base_url(), "http://127.0.0.1:9999");
    }

    #[test]
    fn test_provider_credentials_default_to_unset() {
        let config = parse_empty();
        assert!(config.googlemeet_client_id().is_none());
        assert!(config.teams_client_secret().is_none());
    }
}
