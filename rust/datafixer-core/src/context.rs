//! Diagnostics sinks and the error taxonomy reported by the fixer pipeline.
//!
//! [`DataFixerContext`] lets a caller of [`crate::fixer::DataFixer::update`]
//! opt into informational/warning diagnostics without the library dictating
//! a logging backend. `SystemContext` forwards to `tracing`, `SilentContext`
//! discards everything, and `RecordingContext` buffers messages for
//! assertions in tests — the same three-tier shape as the teacher's
//! `ErrorContext`/`ErrorChain` plus its `tracing`-backed logging calls,
//! generalized into an explicit trait so embedding applications can supply
//! their own sink too.

use crate::fix::FixId;
use crate::version::{DataVersion, TypeReference};
use std::sync::Mutex;
use thiserror::Error;

/// A diagnostics sink passed to [`crate::fixer::DataFixer::update`].
pub trait DataFixerContext: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Discards every message. The default when a caller has no diagnostics
/// needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentContext;

impl DataFixerContext for SilentContext {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}

/// Forwards to `tracing`, at `info!`/`warn!` respectively.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemContext;

impl DataFixerContext for SystemContext {
    fn info(&self, message: &str) {
        tracing::info!(target: "datafixer", "{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "datafixer", "{message}");
    }
}

/// Buffers every message it receives, in order, for test assertions.
#[derive(Debug, Default)]
pub struct RecordingContext {
    messages: Mutex<Vec<(Level, String)>>,
}

/// The severity a [`RecordingContext`] message was reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages, in the order they were reported.
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl DataFixerContext for RecordingContext {
    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push((Level::Info, message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push((Level::Warn, message.to_string()));
    }
}

/// The error taxonomy surfaced by `datafixer-core` (`spec.md` §4.I, §7).
#[derive(Debug, Error)]
pub enum DataFixerError {
    #[error("failed to decode {type_ref} at version {version}: {message}")]
    Decode {
        type_ref: TypeReference,
        version: DataVersion,
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("failed to encode {type_ref} at version {version}: {message}")]
    Encode {
        type_ref: TypeReference,
        version: DataVersion,
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("fix {fix_id} failed: {message}")]
    Fix {
        fix_id: FixId,
        message: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("schema error for {type_ref} at version {version}: {message}")]
    Schema {
        type_ref: TypeReference,
        version: DataVersion,
        message: String,
    },

    #[error("illegal argument: {message}")]
    IllegalArgument { message: String },
}
