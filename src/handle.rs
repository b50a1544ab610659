//! Session handles over the protocol engine.
//!
//! A [`Handle`] owns exactly one engine session and turns the engine's
//! callback-driven query interface into blocking operations. Every operation
//! wires a fresh [`Collector`](crate::collect::Collector) in as the engine's
//! callback target, drains the result stream to completion, and either
//! returns the aggregated result or raises a single
//! [`ProtocolError`](crate::error::ProtocolError).
//!
//! # Overview
//!
//! - `register` / `deregister` / `delete_attributes`: announce or retract a
//!   service; acknowledgement-only streams.
//! - `find_service_types` / `find_services` / `find_attributes`: streaming
//!   queries aggregated into a list, a `(url, lifetime)` sequence, or an
//!   attribute mapping.
//! - `find_scopes`: the scopes the engine currently knows.
//!
//! Operations are synchronous at this boundary even when the handle was
//! opened in asynchronous mode; the flag only selects how the engine runs
//! its network probes internally. Operations take `&mut self`, so one
//! operation is in flight per handle at a time; callers that need
//! concurrency open more handles. Nothing is retried; a raised error is
//! final for that call.
//!
//! # Example
//! ```no_run
//! # fn demo<E: srvloc::Engine>(engine: std::sync::Arc<E>) -> Result<(), srvloc::ProtocolError> {
//! use srvloc::{DEFAULT_SCOPE, Handle, LIFETIME_DEFAULT};
//!
//! let mut handle = Handle::open(engine, "en", false)?;
//! handle.register(
//!     "service:test2://10.0.0.1/some/junk/path",
//!     LIFETIME_DEFAULT,
//!     [("attr1", "val1"), ("attr2", "val2")],
//! )?;
//! let found = handle.find_services("service:test2", "(attr1=val1)", DEFAULT_SCOPE)?;
//! # let _ = found;
//! handle.close();
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, sync::Arc};

use log::debug;

use crate::{
    codec::Value,
    collect::{Collector, merge_attr_list, merge_type_list},
    engine::Engine,
    error::{ErrorCode, ProtocolError},
};

/// Default registration lifetime, in seconds (3 hours).
pub const LIFETIME_DEFAULT: u16 = 10800;

/// Maximum registration lifetime, in seconds.
pub const LIFETIME_MAXIMUM: u16 = 65535;

/// Scope list used when the caller has no scope preference.
pub const DEFAULT_SCOPE: &str = "default";

/// One open session with the protocol engine.
///
/// The session is released exactly once: by the first [`Handle::close`], or
/// on drop as a defensive backstop. No operation reaches the engine after
/// the handle is closed; such calls fail with
/// [`ErrorCode::ParameterBad`].
pub struct Handle<E: Engine> {
    engine: Arc<E>,
    session: Option<E::Session>,
    lang: String,
    is_async: bool,
}

impl<E: Engine> std::fmt::Debug for Handle<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("lang", &self.lang)
            .field("is_async", &self.is_async)
            .field("is_closed", &self.session.is_none())
            .finish()
    }
}

impl<E: Engine> Handle<E> {
    /// Opens a session bound to a language tag and an execution mode.
    pub fn open(engine: Arc<E>, lang: &str, is_async: bool) -> Result<Self, ProtocolError> {
        let session = engine
            .open(lang, is_async)
            .map_err(|code| ProtocolError::new(code, "open"))?;
        debug!("opened session lang={lang:?} async={is_async}");
        Ok(Self {
            engine,
            session: Some(session),
            lang: lang.to_string(),
            is_async,
        })
    }

    /// Releases the engine session. Idempotent.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("closing session");
            self.engine.close(session);
        }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn is_async(&self) -> bool {
        self.is_async
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_none()
    }

    /// Announces a service at `url` for `lifetime` seconds, with the encoded
    /// attribute list attached.
    pub fn register(
        &mut self,
        url: &str,
        lifetime: u16,
        attrs: impl Into<Value>,
    ) -> Result<(), ProtocolError> {
        const OP: &str = "register";
        let attrs = attrs.into().encode();
        debug!("{OP}: url={url} lifetime={lifetime}");

        let engine = Arc::clone(&self.engine);
        let session = self.session_mut(OP)?;
        let mut acked = Collector::new(());
        let code = engine.register(session, url, lifetime, &attrs, &mut |code| {
            acked.report(code, |_| Ok(()))
        });
        acked.finish(code, OP)
    }

    /// Retracts a previously registered service URL.
    pub fn deregister(&mut self, url: &str) -> Result<(), ProtocolError> {
        const OP: &str = "deregister";
        debug!("{OP}: url={url}");

        let engine = Arc::clone(&self.engine);
        let session = self.session_mut(OP)?;
        let mut acked = Collector::new(());
        let code = engine.deregister(session, url, &mut |code| acked.report(code, |_| Ok(())));
        acked.finish(code, OP)
    }

    /// Removes the named attributes from a registered service URL.
    pub fn delete_attributes(
        &mut self,
        url: &str,
        attr_ids: impl Into<Value>,
    ) -> Result<(), ProtocolError> {
        const OP: &str = "delete-attributes";
        let attr_ids = attr_ids.into().encode();
        debug!("{OP}: url={url} ids={attr_ids}");

        let engine = Arc::clone(&self.engine);
        let session = self.session_mut(OP)?;
        let mut acked = Collector::new(());
        let code = engine.delete_attributes(session, url, &attr_ids, &mut |code| {
            acked.report(code, |_| Ok(()))
        });
        acked.finish(code, OP)
    }

    /// Lists service types known under `naming_authority` (empty for all) in
    /// the given scopes.
    pub fn find_service_types(
        &mut self,
        naming_authority: &str,
        scopes: impl Into<Value>,
    ) -> Result<Vec<String>, ProtocolError> {
        const OP: &str = "find-service-types";
        let scopes = scopes.into().encode();
        debug!("{OP}: authority={naming_authority:?} scopes={scopes}");

        let engine = Arc::clone(&self.engine);
        let session = self.session_mut(OP)?;
        let mut found = Collector::new(Vec::new());
        let code = engine.find_service_types(session, naming_authority, &scopes, &mut |payload,
                                                                                       code| {
            found.report(code, |types| merge_type_list(payload, types))
        });
        found.finish(code, OP)
    }

    /// Finds services of `service_type` matching `filter` (an attribute
    /// predicate, empty for all) in the given scopes. Returns `(url,
    /// lifetime)` pairs in the order the engine delivered them.
    pub fn find_services(
        &mut self,
        service_type: &str,
        filter: &str,
        scopes: impl Into<Value>,
    ) -> Result<Vec<(String, u16)>, ProtocolError> {
        const OP: &str = "find-services";
        let scopes = scopes.into().encode();
        debug!("{OP}: type={service_type} filter={filter:?} scopes={scopes}");

        let engine = Arc::clone(&self.engine);
        let session = self.session_mut(OP)?;
        let mut found = Collector::new(Vec::new());
        let code = engine.find_services(session, service_type, &scopes, filter, &mut |url,
                                                                                      lifetime,
                                                                                      code| {
            found.report(code, |services| {
                services.push((url.to_string(), lifetime));
                Ok(())
            })
        });
        found.finish(code, OP)
    }

    /// Fetches attributes of a service URL (or of a whole service type),
    /// restricted to `attr_ids` when non-empty. Duplicate keys resolve to
    /// the last value delivered.
    pub fn find_attributes(
        &mut self,
        url: &str,
        attr_ids: impl Into<Value>,
        scopes: impl Into<Value>,
    ) -> Result<HashMap<String, String>, ProtocolError> {
        const OP: &str = "find-attributes";
        let attr_ids = attr_ids.into().encode();
        let scopes = scopes.into().encode();
        debug!("{OP}: url={url} ids={attr_ids:?} scopes={scopes}");

        let engine = Arc::clone(&self.engine);
        let session = self.session_mut(OP)?;
        let mut found = Collector::new(HashMap::new());
        let code = engine.find_attributes(session, url, &scopes, &attr_ids, &mut |payload,
                                                                                  code| {
            found.report(code, |attrs| merge_attr_list(payload, attrs))
        });
        found.finish(code, OP)
    }

    /// Lists the scopes the engine currently supports.
    pub fn find_scopes(&mut self) -> Result<Vec<String>, ProtocolError> {
        const OP: &str = "find-scopes";
        debug!("{OP}");

        let engine = Arc::clone(&self.engine);
        let session = self.session_mut(OP)?;
        let joined = engine
            .find_scopes(session)
            .map_err(|code| ProtocolError::new(code, OP))?;
        Ok(joined.split(',').map(str::to_string).collect())
    }

    fn session_mut(&mut self, op: &'static str) -> Result<&mut E::Session, ProtocolError> {
        self.session
            .as_mut()
            .ok_or_else(|| ProtocolError::new(ErrorCode::ParameterBad, op))
    }
}

impl<E: Engine> Drop for Handle<E> {
    fn drop(&mut self) {
        self.close();
    }
}
