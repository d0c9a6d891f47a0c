//! # Core Type Definitions
//!
//! Shared types for the Metaval workflow engine:
//! - Notifications (`Notice`, `NoticeLevel`) and the `Notifier` collaborator trait
//! - Validation failure (`ValidationError`)
//! - Error types (`MetavalError`)
//!
//! ## Determinism Guarantees
//!
//! All collections here are ordered (`BTreeSet`) so that error messages and
//! serialized output are stable across runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::form::RequestField;
use crate::navigation::Page;

// =============================================================================
// NOTIFICATIONS
// =============================================================================

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

impl NoticeLevel {
    /// Lowercase tag used in logs and JSON output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
            NoticeLevel::Info => "info",
        }
    }
}

/// A transient message surfaced to the user (a "toast").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

/// Fire-and-forget notification sink.
///
/// The core never waits on or inspects the result of a notification.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Notifier that keeps every notice in memory, in emission order.
#[derive(Debug, Clone, Default)]
pub struct NoticeBuffer {
    notices: Vec<Notice>,
}

impl NoticeBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices received so far.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Remove and return all buffered notices.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Number of notices carrying exactly this message.
    #[must_use]
    pub fn count_of(&self, message: &str) -> usize {
        self.notices.iter().filter(|n| n.message == message).count()
    }
}

impl Notifier for NoticeBuffer {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Required request fields were left empty on submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("missing required fields: {}", join_fields(.missing_fields))]
pub struct ValidationError {
    pub missing_fields: BTreeSet<RequestField>,
}

fn join_fields(fields: &BTreeSet<RequestField>) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Metaval system.
///
/// - No silent failures
/// - Use `Result<T, MetavalError>` for fallible operations
/// - The CORE should never panic; all errors must be recoverable
#[derive(Debug, Error)]
pub enum MetavalError {
    /// A stage index outside `1..=total` was requested.
    #[error("Stage {index} is out of range (1..={total})")]
    OutOfRange { index: usize, total: usize },

    /// A workflow was defined with no stages.
    #[error("Workflow must contain at least one stage")]
    EmptySequence,

    /// The page identifier is not one the router knows.
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// The sub-view identifier is not valid for its page.
    #[error("Unknown view: {0}")]
    UnknownView(String),

    /// The request form has no field with this key.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// A select-style field was given a value outside its option list.
    #[error("Invalid value '{value}' for {field}")]
    InvalidChoice { field: RequestField, value: String },

    /// No mock request record carries this identifier.
    #[error("Unknown request: {0}")]
    UnknownRequest(String),

    /// The saved search view identifier is unknown.
    #[error("Unknown saved view: {0}")]
    UnknownSavedView(String),

    /// The generation template name is unknown.
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    /// The workflow identifier is unknown.
    #[error("Unknown workflow: {0}")]
    UnknownWorkflow(String),

    /// The exit type identifier is unknown.
    #[error("Unknown exit type: {0}")]
    UnknownExitType(String),

    /// An uploaded tender file is not a PDF.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// An uploaded tender file is over the size limit.
    #[error("File is {size} bytes; the limit is {limit}")]
    FileTooLarge { size: u64, limit: u64 },

    /// No uploaded tender file carries this identifier.
    #[error("Unknown file: {0}")]
    UnknownFile(u64),

    /// The action is not available on the current page or in the current view.
    #[error("Action not available: {action} (page: {page})")]
    NotAvailable { action: String, page: Page },

    /// Form submission failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

impl MetavalError {
    /// Build a `NotAvailable` error for `action` on `page`.
    #[must_use]
    pub fn not_available(action: impl Into<String>, page: Page) -> Self {
        Self::NotAvailable {
            action: action.into(),
            page,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_buffer_keeps_emission_order() {
        let mut buffer = NoticeBuffer::new();
        buffer.notify(Notice::info("first"));
        buffer.notify(Notice::success("second"));

        let messages: Vec<_> = buffer.notices().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);

        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert!(buffer.notices().is_empty());
    }

    #[test]
    fn validation_error_lists_fields_in_order() {
        let err = ValidationError {
            missing_fields: [RequestField::ContractType, RequestField::ContractName]
                .into_iter()
                .collect(),
        };
        assert_eq!(
            err.to_string(),
            "missing required fields: contract_name, contract_type"
        );
    }

    #[test]
    fn out_of_range_display() {
        let err = MetavalError::OutOfRange { index: 9, total: 8 };
        assert_eq!(err.to_string(), "Stage 9 is out of range (1..=8)");
    }

    #[test]
    fn notice_display() {
        assert_eq!(
            Notice::error("Rejected").to_string(),
            "[error] Rejected"
        );
    }
}
