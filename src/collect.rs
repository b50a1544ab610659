//! Bridging the engine's push callbacks into pull-style results.
//!
//! Every query hands the engine a callback that may fire zero or more times
//! with a partial result and finally fires with a terminal code. The
//! [`Collector`] turns that stream into one aggregated result:
//!
//! - while collecting, each `Ok` delivery is merged into the result set in
//!   arrival order;
//! - a `LastCall` delivery finalizes the stream cleanly;
//! - any other code is recorded as the stored error and the engine is told
//!   to stop streaming via [`Flow::Stop`].
//!
//! The first error wins. Once a failure is recorded, later deliveries are
//! neither merged nor allowed to overwrite it. [`Collector::finish`] then
//! resolves the operation: a non-success engine-level return code takes
//! precedence over the stored callback error (it reflects a failure the
//! engine detected before any callback ran), the stored error comes next,
//! and only a clean stream yields the result set.

use std::collections::HashMap;

use log::trace;

use crate::error::{ErrorCode, ProtocolError};

/// Tells the engine whether to keep streaming results.
///
/// This is the callback's return value, not an exception path: the engine
/// treats [`Flow::Stop`] as a plain stop signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Accumulates streamed callback deliveries into a single result set.
#[derive(Debug)]
pub struct Collector<R> {
    result: R,
    error: ErrorCode,
    done: bool,
}

impl<R> Collector<R> {
    pub fn new(result: R) -> Self {
        Self {
            result,
            error: ErrorCode::Ok,
            done: false,
        }
    }

    /// Handles one callback delivery.
    ///
    /// `merge` folds a successful partial result into the result set; it may
    /// reject a malformed payload by returning a failure code, which is
    /// recorded exactly like an engine-reported one.
    pub fn report(
        &mut self,
        code: ErrorCode,
        merge: impl FnOnce(&mut R) -> Result<(), ErrorCode>,
    ) -> Flow {
        if self.error.is_failure() {
            return Flow::Stop;
        }
        match code {
            ErrorCode::Ok => {
                if self.done {
                    // The stream already finalized; nothing further merges.
                    return Flow::Continue;
                }
                match merge(&mut self.result) {
                    Ok(()) => Flow::Continue,
                    Err(failure) => {
                        trace!("collector rejected payload: {failure}");
                        self.error = failure;
                        Flow::Stop
                    }
                }
            }
            ErrorCode::LastCall => {
                self.done = true;
                Flow::Continue
            }
            failure => {
                trace!("collector stored error: {failure}");
                self.error = failure;
                Flow::Stop
            }
        }
    }

    /// Resolves the operation after the engine call returned.
    pub fn finish(self, engine_code: ErrorCode, op: &'static str) -> Result<R, ProtocolError> {
        if engine_code.is_failure() {
            return Err(ProtocolError::new(engine_code, op));
        }
        if self.error.is_failure() {
            return Err(ProtocolError::new(self.error, op));
        }
        Ok(self.result)
    }
}

/// Splits a comma-joined service-type payload and appends each name in
/// order.
pub(crate) fn merge_type_list(payload: &str, types: &mut Vec<String>) -> Result<(), ErrorCode> {
    if payload.is_empty() {
        return Ok(());
    }
    types.extend(payload.split(',').map(str::to_string));
    Ok(())
}

/// Parses a comma-joined sequence of `(key=value)` tokens into the attribute
/// mapping. A duplicate key overwrites, last write wins. A token that is not
/// of that shape is a parse failure.
pub(crate) fn merge_attr_list(
    payload: &str,
    attrs: &mut HashMap<String, String>,
) -> Result<(), ErrorCode> {
    for token in payload.split(',') {
        if token.is_empty() {
            continue;
        }
        let body = token
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(ErrorCode::ParseError)?;
        let (key, val) = body.split_once('=').ok_or(ErrorCode::ParseError)?;
        attrs.insert(key.to_string(), val.to_string());
    }
    Ok(())
}
