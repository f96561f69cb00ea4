//! # Diagnostics Module
//!
//! Fire-and-forget diagnostic sink used by the dispatcher for the two
//! failure classes it reports: routing misconfiguration and handler
//! failures. The sink never returns a value the dispatcher depends on.
//!
//! The default [`TracingSink`] forwards to the `tracing` facade; tests
//! install a recording sink to assert on severity and message.

use serde_json::Value;
use tracing::error;

/// Diagnostic severity. `Critical` marks server-side misconfiguration;
/// `Error` marks handler failures worth operator attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Error,
}

impl Severity {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Error => "error",
        }
    }
}

/// Sink for dispatcher diagnostics, with structured context.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, severity: Severity, message: &str, context: &Value);
}

/// Default sink: emits through `tracing` at error level, carrying the
/// severity and context as fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, severity: Severity, message: &str, context: &Value) {
        error!(severity = severity.as_str(), context = %context, "{message}");
    }
}

/// Install a fmt subscriber honoring `RUST_LOG`. Safe to call more than
/// once; later calls are no-ops.
pub fn init() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
