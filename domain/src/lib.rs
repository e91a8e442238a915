//! Core of the meeting-provisioning relay.
//!
//! The `gateway` module holds the provider connectors (Google Meet, Teams)
//! behind a shared contract; `relay` sequences the authorization-code flow
//! over one connector and classifies failures for the boundary layer.

pub mod error;
pub mod gateway;
pub mod relay;

pub use error::Error;
pub use relay::Relay;
