// panorama-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

// Validation outcomes are plain values (`DoneBlocker`, `ConditionViolation`);
// these are only raised when a caller insists on acting anyway.

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Quality gate '{gate}' cannot be saved: {reasons}")]
    #[diagnostic(
        code(panorama::domain::not_submittable),
        help("Fix the listed problems; the draft was left untouched.")
    )]
    GateNotSubmittable { gate: String, reasons: String },

    #[error("Quality gate '{0}' has never been saved")]
    #[diagnostic(
        code(panorama::domain::not_persisted),
        help("Create the gate before updating, toggling or deleting it.")
    )]
    NotPersisted(String),
}
