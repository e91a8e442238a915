//! HTTP gateways to the third-party meeting providers.

pub mod connector;
pub mod google_meet;
pub mod teams;

pub use connector::{Connector, MeetingResult, ProviderKind, Settings};
