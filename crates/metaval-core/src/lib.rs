//! # metaval-core
//!
//! The deterministic workflow engine for Metaval - THE LOGIC.
//!
//! This crate holds every piece of dashboard state and the transitions
//! between them: the linear stage stepper, request form validation, the draft
//! document projection, typed navigation, the assistant chat, tender uploads
//! and the delayed-task scheduler that models the processing timers.
//!
//! ## Architectural Constraints
//!
//! - Synchronous and deterministic: no async, no I/O, no wall clock
//! - No randomness; reply text comes from an injected `ResponseProvider`
//! - No logging dependency; notices go to an injected `Notifier`
//! - Never panics; every failure is a `MetavalError` value

// =============================================================================
// MODULES
// =============================================================================

pub mod assistant;
pub mod catalog;
pub mod draft;
pub mod exit;
pub mod form;
pub mod generate;
pub mod navigation;
pub mod schedule;
pub mod session;
pub mod tender;
pub mod types;
pub mod workflow;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{MetavalError, Notice, NoticeBuffer, NoticeLevel, Notifier, ValidationError};

// =============================================================================
// RE-EXPORTS: Workflow Engine
// =============================================================================

pub use workflow::{
    CompletionPolicy, MarkerState, StageIndicator, StageKey, StageMarker, StageRenderer,
    StageSequence, StageView, Transition, WorkflowController, WorkflowKind, WorkflowPhase,
    WorkflowStage,
};

// =============================================================================
// RE-EXPORTS: Request Module
// =============================================================================

pub use assistant::{ChatSession, CyclingResponses, FixedResponse, ResponseProvider};
pub use draft::DraftDocument;
pub use form::{FormData, RequestField, RequestForm};

// =============================================================================
// RE-EXPORTS: Shell
// =============================================================================

pub use navigation::{NavTarget, Navigation, Page, RequestView, Router};
pub use schedule::{DelayedTask, Scheduler};
pub use session::{Session, SessionOptions};
pub use tender::{TenderPage, TenderUpload};
