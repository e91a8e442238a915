//! Request parameter types for the relay endpoints.

pub(crate) mod meeting;
pub(crate) mod oauth;
