//! ResourceArc Wrappers
//!
//! Persistent state for streaming parsers.

use crate::strategy::StreamingParser;
use rustler::ResourceArc;
use std::sync::Mutex;

/// Reason returned when a previous holder panicked with the lock held
pub const MUTEX_POISONED: &str = "mutex_poisoned";

/// Wrapper for StreamingParser that can be stored in a ResourceArc
///
/// One resource is one document stream. The mutex only serializes BEAM
/// processes sharing the handle; chunks must still arrive in order.
pub struct StreamingParserResource {
    pub inner: Mutex<StreamingParser>,
}

impl StreamingParserResource {
    pub fn new() -> Self {
        StreamingParserResource {
            inner: Mutex::new(StreamingParser::new()),
        }
    }

    /// Run `f` with exclusive access to the parser
    ///
    /// # Errors
    ///
    /// Returns [`MUTEX_POISONED`] if the parser mutex is poisoned.
    pub fn with_parser<F, R>(&self, f: F) -> Result<R, &'static str>
    where
        F: FnOnce(&mut StreamingParser) -> R,
    {
        let mut guard = self.inner.lock().map_err(|_| MUTEX_POISONED)?;
        Ok(f(&mut guard))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for StreamingParserResource {}

impl Default for StreamingParserResource {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for the ResourceArc
pub type StreamingParserRef = ResourceArc<StreamingParserResource>;
