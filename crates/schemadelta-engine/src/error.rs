//! Reporter error types

use schemadelta_core::DiagnosticCode;

/// Errors that abort a report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// Target not traceable to either schema, or payload shape wrong for the code
    #[error("Malformed {code} diagnostic: {reason}")]
    MalformedDiagnostic {
        code: DiagnosticCode,
        reason: String,
    },
}

impl ReportError {
    pub(crate) fn malformed(code: DiagnosticCode, reason: impl Into<String>) -> Self {
        Self::MalformedDiagnostic {
            code,
            reason: reason.into(),
        }
    }
}
