//! Error reporters for the user-facing error channel

use crate::domain::meta::ErrorReporter;

/// Reports errors through `tracing` at error level
#[derive(Debug, Clone, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, message: &str) {
        tracing::error!(message, "Metadata request failed");
    }
}
