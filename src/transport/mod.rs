//! Outbound HTTP plumbing shared by the catalog and generation clients.

mod http;

pub use http::HttpSettings;
