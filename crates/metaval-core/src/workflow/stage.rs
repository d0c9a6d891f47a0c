//! # Workflow Stages
//!
//! Stage definitions shared by the request workflow and the contract
//! lifecycle indicator.
//!
//! ## Sequences
//!
//! | # | Request workflow | Contract lifecycle |
//! |---|------------------|--------------------|
//! | 1 | Request          | Request            |
//! | 2 | Generate         | Generate           |
//! | 3 | Negotiate        | Negotiate          |
//! | 4 | Approval         | Approval           |
//! | 5 | Execute          | Execute            |
//! | 6 | Comply           | Search             |
//! | 7 | Review           | Comply             |
//! | 8 | Exit             | Review             |
//! | 9 | -                | Exit               |
//!
//! Indices are 1-based everywhere in this module.

use crate::MetavalError;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// STAGE KEY
// =============================================================================

/// Selects the content block a stage renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKey {
    Request,
    Generate,
    Negotiate,
    Approval,
    Execute,
    Search,
    Comply,
    Review,
    Exit,
}

impl StageKey {
    /// Every key, in lifecycle order.
    pub const ALL: [StageKey; 9] = [
        StageKey::Request,
        StageKey::Generate,
        StageKey::Negotiate,
        StageKey::Approval,
        StageKey::Execute,
        StageKey::Search,
        StageKey::Comply,
        StageKey::Review,
        StageKey::Exit,
    ];

    /// Default display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            StageKey::Request => "Request",
            StageKey::Generate => "Generate",
            StageKey::Negotiate => "Negotiate",
            StageKey::Approval => "Approval",
            StageKey::Execute => "Execute",
            StageKey::Search => "Search",
            StageKey::Comply => "Comply",
            StageKey::Review => "Review",
            StageKey::Exit => "Exit",
        }
    }

    /// Parse a stage label, case-insensitively. "approve" is accepted as an
    /// alias of "approval" since contract records use the verb form.
    #[must_use]
    pub fn from_label(label: &str) -> Option<StageKey> {
        let lower = label.trim().to_ascii_lowercase();
        if lower == "approve" {
            return Some(StageKey::Approval);
        }
        StageKey::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(&lower))
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// WORKFLOW STAGE
// =============================================================================

/// One named step in a fixed-length workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStage {
    /// 1-based position in its sequence.
    pub index: usize,
    pub name: String,
    pub render_key: StageKey,
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.index, self.name)
    }
}

// =============================================================================
// STAGE SEQUENCE
// =============================================================================

/// Request workflow stages, in order.
pub const REQUEST_WORKFLOW: [StageKey; 8] = [
    StageKey::Request,
    StageKey::Generate,
    StageKey::Negotiate,
    StageKey::Approval,
    StageKey::Execute,
    StageKey::Comply,
    StageKey::Review,
    StageKey::Exit,
];

/// Contract lifecycle stages, in order.
pub const CONTRACT_LIFECYCLE: [StageKey; 9] = StageKey::ALL;

/// An immutable, non-empty, ordered list of stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSequence {
    stages: Vec<WorkflowStage>,
}

impl StageSequence {
    /// Build a sequence from `(name, key)` pairs. Indices are assigned from 1.
    ///
    /// Returns `MetavalError::EmptySequence` when no stages are given.
    pub fn new<S, I>(definitions: I) -> Result<Self, MetavalError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, StageKey)>,
    {
        let stages: Vec<WorkflowStage> = definitions
            .into_iter()
            .enumerate()
            .map(|(i, (name, render_key))| WorkflowStage {
                index: i.saturating_add(1),
                name: name.into(),
                render_key,
            })
            .collect();

        if stages.is_empty() {
            return Err(MetavalError::EmptySequence);
        }
        Ok(Self { stages })
    }

    /// The 8-stage contract request workflow.
    #[must_use]
    pub fn request_workflow() -> Self {
        Self::from_keys(&REQUEST_WORKFLOW)
    }

    /// The 9-stage contract lifecycle.
    #[must_use]
    pub fn contract_lifecycle() -> Self {
        Self::from_keys(&CONTRACT_LIFECYCLE)
    }

    fn from_keys(keys: &[StageKey]) -> Self {
        Self {
            stages: keys
                .iter()
                .enumerate()
                .map(|(i, key)| WorkflowStage {
                    index: i.saturating_add(1),
                    name: key.label().to_string(),
                    render_key: *key,
                })
                .collect(),
        }
    }

    /// Number of stages (always >= 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage at a 1-based index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&WorkflowStage> {
        index
            .checked_sub(1)
            .and_then(|zero_based| self.stages.get(zero_based))
    }

    /// 1-based index of the first stage with this key.
    #[must_use]
    pub fn position_of(&self, key: StageKey) -> Option<usize> {
        self.stages
            .iter()
            .find(|s| s.render_key == key)
            .map(|s| s.index)
    }

    /// Stage names in order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkflowStage> {
        self.stages.iter()
    }
}

/// Which built-in sequence to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowKind {
    Request,
    Lifecycle,
}

impl WorkflowKind {
    #[must_use]
    pub fn sequence(&self) -> StageSequence {
        match self {
            WorkflowKind::Request => StageSequence::request_workflow(),
            WorkflowKind::Lifecycle => StageSequence::contract_lifecycle(),
        }
    }
}

impl std::str::FromStr for WorkflowKind {
    type Err = MetavalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "request" => Ok(WorkflowKind::Request),
            "lifecycle" => Ok(WorkflowKind::Lifecycle),
            other => Err(MetavalError::UnknownWorkflow(other.to_string())),
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
    fn request_workflow_has_eight_stages() {
        let seq = StageSequence::request_workflow();
        assert_eq!(seq.len(), 8);
        assert_eq!(
            seq.labels(),
            vec![
                "Request", "Generate", "Negotiate", "Approval", "Execute", "Comply", "Review",
                "Exit"
            ]
        );
    }

    #[test]
    fn lifecycle_places_search_sixth() {
        let seq = StageSequence::contract_lifecycle();
        assert_eq!(seq.len(), 9);
        assert_eq!(seq.position_of(StageKey::Search), Some(6));
        assert_eq!(seq.position_of(StageKey::Exit), Some(9));
    }

    #[test]
    fn empty_sequence_rejected() {
        let result = StageSequence::new(Vec::<(String, StageKey)>::new());
        assert!(matches!(result, Err(MetavalError::EmptySequence)));
    }

    #[test]
    fn get_is_one_based() {
        let seq = StageSequence::request_workflow();
        assert!(seq.get(0).is_none());
        assert_eq!(seq.get(1).map(|s| s.render_key), Some(StageKey::Request));
        assert_eq!(seq.get(8).map(|s| s.render_key), Some(StageKey::Exit));
        assert!(seq.get(9).is_none());
    }

    #[test]
    fn from_label_accepts_approve_alias() {
        assert_eq!(StageKey::from_label("Approve"), Some(StageKey::Approval));
        assert_eq!(StageKey::from_label("negotiate"), Some(StageKey::Negotiate));
        assert_eq!(StageKey::from_label("Draft"), None);
    }

    #[test]
    fn stage_display() {
        let seq = StageSequence::request_workflow();
        let stage = seq.get(3).map(|s| s.to_string());
        assert_eq!(stage.as_deref(), Some("3: Negotiate"));
    }
}
