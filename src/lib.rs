//! Client handle layer for SLP-style service discovery: announce, deregister,
//! and query services on a network by type, URL, and attributes, through a
//! protocol engine supplied as an [`Engine`] implementation.

pub mod codec;
pub mod collect;
pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
pub mod url;

#[cfg(test)]
pub(crate) mod testing;

pub use codec::{Value, escape, unescape};
pub use collect::{Collector, Flow};
pub use config::{PropertyStore, get_property, refresh_interval, set_property};
pub use engine::Engine;
pub use error::{ErrorCode, ProtocolError};
pub use handle::{DEFAULT_SCOPE, Handle, LIFETIME_DEFAULT, LIFETIME_MAXIMUM};
pub use url::{ServiceUrl, parse_service_url};
