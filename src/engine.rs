//! Boundary with the protocol engine.
//!
//! The engine owns everything below the handle layer: transport, multicast
//! convergence, directory-agent negotiation, and packet framing. This module
//! pins down the seam the rest of the crate is written against.
//!
//! Streaming calls take string-encoded arguments plus a callback and return
//! a top-level [`ErrorCode`]. The engine invokes the callback zero or more
//! times with a partial result and a per-delivery code, then once with a
//! terminal code; the callback's [`Flow`] return value tells the engine
//! whether to keep streaming. The caller-supplied context of the underlying
//! API surfaces here as the callback closure's captured environment.

use crate::{collect::Flow, error::ErrorCode, url::ServiceUrl};

/// Callback for acknowledgement-only operations (register, deregister,
/// delete-attributes). Fires once with the terminal code.
pub type AckCallback<'a> = &'a mut dyn FnMut(ErrorCode) -> Flow;

/// Callback for service-type queries. The payload is a comma-joined list of
/// type names.
pub type TypesCallback<'a> = &'a mut dyn FnMut(&str, ErrorCode) -> Flow;

/// Callback for service queries. The payload is one service URL and its
/// remaining lifetime in seconds.
pub type ServicesCallback<'a> = &'a mut dyn FnMut(&str, u16, ErrorCode) -> Flow;

/// Callback for attribute queries. The payload is a comma-joined sequence of
/// `(key=value)` tokens.
pub type AttrsCallback<'a> = &'a mut dyn FnMut(&str, ErrorCode) -> Flow;

/// One protocol engine. A [`Handle`](crate::Handle) owns exactly one of the
/// engine's sessions and issues every operation through this trait.
pub trait Engine {
    /// Engine-side session state, allocated by [`Engine::open`] and released
    /// exactly once by [`Engine::close`].
    type Session;

    fn open(&self, lang: &str, is_async: bool) -> Result<Self::Session, ErrorCode>;

    fn close(&self, session: Self::Session);

    fn register(
        &self,
        session: &mut Self::Session,
        url: &str,
        lifetime: u16,
        attrs: &str,
        callback: AckCallback<'_>,
    ) -> ErrorCode;

    fn deregister(
        &self,
        session: &mut Self::Session,
        url: &str,
        callback: AckCallback<'_>,
    ) -> ErrorCode;

    fn delete_attributes(
        &self,
        session: &mut Self::Session,
        url: &str,
        attr_ids: &str,
        callback: AckCallback<'_>,
    ) -> ErrorCode;

    fn find_service_types(
        &self,
        session: &mut Self::Session,
        naming_authority: &str,
        scopes: &str,
        callback: TypesCallback<'_>,
    ) -> ErrorCode;

    fn find_services(
        &self,
        session: &mut Self::Session,
        service_type: &str,
        scopes: &str,
        filter: &str,
        callback: ServicesCallback<'_>,
    ) -> ErrorCode;

    fn find_attributes(
        &self,
        session: &mut Self::Session,
        url: &str,
        scopes: &str,
        attr_ids: &str,
        callback: AttrsCallback<'_>,
    ) -> ErrorCode;

    /// Queries the scopes known to the engine, as one comma-joined string.
    /// Failures here may carry environment-level codes; see
    /// [`ErrorCode::System`].
    fn find_scopes(&self, session: &mut Self::Session) -> Result<String, ErrorCode>;

    fn parse_service_url(&self, url: &str) -> Result<ServiceUrl, ErrorCode>;

    fn escape(&self, text: &str, is_tag: bool) -> Result<String, ErrorCode>;

    fn unescape(&self, text: &str, is_tag: bool) -> Result<String, ErrorCode>;

    fn get_property(&self, name: &str) -> Option<String>;

    fn set_property(&self, name: &str, value: &str);

    /// Interval, in seconds, at which registrations should be refreshed.
    /// Zero when the engine has no opinion.
    fn refresh_interval(&self) -> u16 {
        0
    }
}
