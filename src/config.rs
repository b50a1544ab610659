//! Process-wide configuration properties.
//!
//! Discovery timeouts, scope defaults, and similar knobs are named string
//! properties owned by the engine. Writes affect handles opened or operated
//! on afterward. Visibility is last-write-wins with no atomicity guarantee
//! against concurrent writers; readers always see the most recently stored
//! value.

use std::collections::HashMap;

use log::trace;
use parking_lot::RwLock;

use crate::engine::Engine;

/// Well-known property names.
pub mod names {
    pub const USE_SCOPES: &str = "net.slp.useScopes";
    pub const DA_ADDRESSES: &str = "net.slp.DAAddresses";
    pub const LOCALE: &str = "net.slp.locale";
    pub const MTU: &str = "net.slp.MTU";
    pub const MULTICAST_TTL: &str = "net.slp.multicastTTL";
    pub const MULTICAST_TIMEOUTS: &str = "net.slp.multicastTimeouts";
    pub const MULTICAST_MAXIMUM_WAIT: &str = "net.slp.multicastMaximumWait";
    pub const DATAGRAM_TIMEOUTS: &str = "net.slp.datagramTimeouts";
    pub const IS_BROADCAST_ONLY: &str = "net.slp.isBroadcastOnly";
    pub const SECURITY_ENABLED: &str = "net.slp.securityEnabled";
}

/// An explicitly-owned store for named configuration properties.
///
/// Engines embed one and expose it through
/// [`Engine::get_property`]/[`Engine::set_property`]. Reads dominate writes,
/// so the values sit behind a reader/writer lock.
#[derive(Debug, Default)]
pub struct PropertyStore {
    values: RwLock<HashMap<String, String>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.values.read().get(name).cloned()
    }

    pub fn set(&self, name: &str, value: &str) {
        trace!("property {name} = {value}");
        self.values
            .write()
            .insert(name.to_string(), value.to_string());
    }
}

/// Reads a named engine property. `None` when the engine does not know the
/// name; there is no typed "unknown property" failure.
pub fn get_property<E: Engine>(engine: &E, name: &str) -> Option<String> {
    engine.get_property(name)
}

/// Writes a named engine property, best effort. Affects handles opened or
/// operated on after the write.
pub fn set_property<E: Engine>(engine: &E, name: &str, value: &str) {
    engine.set_property(name, value);
}

/// Interval, in seconds, at which registrations should be refreshed.
pub fn refresh_interval<E: Engine>(engine: &E) -> u16 {
    engine.refresh_interval()
}
