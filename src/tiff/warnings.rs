//! Pluggable warning reporting
//!
//! Malformed TIFF files are common enough that most field-level
//! problems are recovered rather than failed. The recovery still needs
//! to be visible, so the reader and writer report through a sink the
//! embedding application can replace.

use log::warn;

/// Destination for non-fatal diagnostics
///
/// Implementations must be cheap to call; a sink may be invoked once
/// per entry while scanning a hostile file.
pub trait WarningSink: Send + Sync {
    /// Report a recoverable problem tied to a specific tag
    fn tag_warning(&self, tag: u16, message: &str);

    /// Report a recoverable problem with no tag context
    fn warning(&self, message: &str);
}

/// Default sink that forwards everything to the `log` facade
pub struct LogSink;

impl WarningSink for LogSink {
    fn tag_warning(&self, tag: u16, message: &str) {
        warn!("tag {}: {}", tag, message);
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Shared default sink instance
pub static LOG_SINK: LogSink = LogSink;
