//! # Workflow Controller
//!
//! Tracks the position within a [`StageSequence`] and mediates every
//! transition. The controller is the only writer of the current index.
//!
//! ## Invariant
//!
//! While active, `1 <= current <= total` holds after every operation.
//! Boundary moves are no-ops; only `jump_to` can fail.
//!
//! ## States
//!
//! ```text
//!            advance (i < N)              advance (i == N)
//!   Stage[i] ───────────────► Stage[i+1]   Stage[N] ──────► Completed
//!   Stage[i] ◄─────────────── Stage[i+1]   Completed ─────► Stage[1]
//!            retreat                                  restart / auto-reset
//! ```
//!
//! Under [`CompletionPolicy::AutoReset`] the `Completed` state is never
//! observable: the completing `advance` lands on stage 1.

use super::stage::{StageSequence, WorkflowStage};
use crate::MetavalError;
use serde::{Deserialize, Serialize};

// =============================================================================
// COMPLETION POLICY
// =============================================================================

/// What happens after the final stage is advanced past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompletionPolicy {
    /// Report completion and return to stage 1 immediately.
    #[default]
    AutoReset,
    /// Report completion and hold a `Completed` state until `restart`.
    Durable,
}

impl std::str::FromStr for CompletionPolicy {
    type Err = MetavalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto-reset" | "auto_reset" | "autoreset" => Ok(CompletionPolicy::AutoReset),
            "durable" => Ok(CompletionPolicy::Durable),
            other => Err(MetavalError::ConfigError(format!(
                "unknown completion policy '{}' (expected auto-reset or durable)",
                other
            ))),
        }
    }
}

// =============================================================================
// PHASE & TRANSITION
// =============================================================================

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "index", rename_all = "lowercase")]
pub enum WorkflowPhase {
    /// Positioned on a stage (1-based).
    Stage(usize),
    /// Past the final stage; only reachable with `CompletionPolicy::Durable`.
    Completed,
}

/// Result of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Transition {
    Moved { from: usize, to: usize },
    /// The final stage was advanced past. Emitted exactly once per run.
    Completed { total: usize },
    Unchanged,
}

impl Transition {
    #[must_use]
    pub fn is_completion(&self) -> bool {
        matches!(self, Transition::Completed { .. })
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Linear stepper over a fixed stage sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowController {
    sequence: StageSequence,
    phase: WorkflowPhase,
    policy: CompletionPolicy,
    completions: u64,
}

impl WorkflowController {
    /// Enter the workflow at stage 1 with the default policy.
    #[must_use]
    pub fn new(sequence: StageSequence) -> Self {
        Self::with_policy(sequence, CompletionPolicy::default())
    }

    /// Enter the workflow at stage 1.
    #[must_use]
    pub fn with_policy(sequence: StageSequence, policy: CompletionPolicy) -> Self {
        Self {
            sequence,
            phase: WorkflowPhase::Stage(1),
            policy,
            completions: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// Current 1-based index, or `None` while completed.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            WorkflowPhase::Stage(i) => Some(i),
            WorkflowPhase::Completed => None,
        }
    }

    #[must_use]
    pub fn current_stage(&self) -> Option<&WorkflowStage> {
        self.current_index().and_then(|i| self.sequence.get(i))
    }

    #[must_use]
    pub fn total_stages(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn sequence(&self) -> &StageSequence {
        &self.sequence
    }

    #[must_use]
    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == WorkflowPhase::Completed
    }

    /// True when positioned on the final stage (the forward action completes).
    #[must_use]
    pub fn is_on_final_stage(&self) -> bool {
        self.current_index() == Some(self.total_stages())
    }

    /// Number of completions reported over the controller's lifetime.
    #[must_use]
    pub fn completions(&self) -> u64 {
        self.completions
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Move forward one stage, or complete from the final stage.
    pub fn advance(&mut self) -> Transition {
        let WorkflowPhase::Stage(current) = self.phase else {
            return Transition::Unchanged;
        };
        let total = self.total_stages();

        if current < total {
            let to = current.saturating_add(1);
            self.phase = WorkflowPhase::Stage(to);
            return Transition::Moved { from: current, to };
        }

        self.completions = self.completions.saturating_add(1);
        self.phase = match self.policy {
            CompletionPolicy::AutoReset => WorkflowPhase::Stage(1),
            CompletionPolicy::Durable => WorkflowPhase::Completed,
        };
        Transition::Completed { total }
    }

    /// Move back one stage. No-op on stage 1 and while completed.
    pub fn retreat(&mut self) -> Transition {
        match self.phase {
            WorkflowPhase::Stage(current) if current > 1 => {
                let to = current.saturating_sub(1);
                self.phase = WorkflowPhase::Stage(to);
                Transition::Moved { from: current, to }
            }
            _ => Transition::Unchanged,
        }
    }

    /// Set the current stage directly.
    ///
    /// Returns `MetavalError::OutOfRange` without mutating when `index` is not
    /// in `1..=total`. Jumping out of a durable `Completed` state is allowed.
    pub fn jump_to(&mut self, index: usize) -> Result<Transition, MetavalError> {
        let total = self.total_stages();
        if index == 0 || index > total {
            return Err(MetavalError::OutOfRange { index, total });
        }

        match self.phase {
            WorkflowPhase::Stage(current) if current == index => Ok(Transition::Unchanged),
            WorkflowPhase::Stage(current) => {
                self.phase = WorkflowPhase::Stage(index);
                Ok(Transition::Moved {
                    from: current,
                    to: index,
                })
            }
            WorkflowPhase::Completed => {
                self.phase = WorkflowPhase::Stage(index);
                Ok(Transition::Moved {
                    from: total,
                    to: index,
                })
            }
        }
    }

    /// Return to stage 1 (after completion or on cancellation).
    pub fn restart(&mut self) -> Transition {
        match self.jump_to(1) {
            Ok(transition) => transition,
            // Sequences are never empty, so stage 1 always exists.
            Err(_) => Transition::Unchanged,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
