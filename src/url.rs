//! Structured service URLs.

use crate::{engine::Engine, error::ProtocolError};

/// The decomposed parts of a textual service URL, e.g.
/// `service:printer://host.example.com:515/queue1`.
///
/// Purely a parse result; immutable once produced. The port is zero when the
/// URL carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUrl {
    /// Service type, including the `service:` scheme prefix when present.
    pub service_type: String,
    /// Naming authority, empty for the default (IANA) authority.
    pub naming_authority: String,
    pub host: String,
    pub port: u16,
    /// Remainder of the URL after the host identification.
    pub path: String,
}

/// Parses `url` through the engine's URL grammar.
pub fn parse_service_url<E: Engine>(engine: &E, url: &str) -> Result<ServiceUrl, ProtocolError> {
    engine
        .parse_service_url(url)
        .map_err(|code| ProtocolError::new(code, "parse-service-url"))
}
