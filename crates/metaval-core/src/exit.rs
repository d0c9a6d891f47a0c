//! # Contract Exit
//!
//! Termination type, closure checklist and debrief of the exit page.

use crate::MetavalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitType {
    #[default]
    Natural,
    Cause,
    Convenience,
}

impl ExitType {
    pub const ALL: [ExitType; 3] = [ExitType::Natural, ExitType::Cause, ExitType::Convenience];

    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            ExitType::Natural => "natural",
            ExitType::Cause => "cause",
            ExitType::Convenience => "convenience",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ExitType::Natural => "Natural Expiry",
            ExitType::Cause => "For Cause",
            ExitType::Convenience => "Convenience",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ExitType::Natural => "End of Term",
            ExitType::Cause => "Due to Breach",
            ExitType::Convenience => "30-Day Notice",
        }
    }
}

impl fmt::Display for ExitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExitType {
    type Err = MetavalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExitType::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(wanted) || t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MetavalError::UnknownExitType(wanted.to_string()))
    }
}

// =============================================================================
// CHECKLIST
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChecklistGroup {
    Administrative,
    Operations,
}

pub const CLOSURE_CHECKLIST: [(ChecklistGroup, &str); 8] = [
    (ChecklistGroup::Administrative, "Termination Notice Dispatched"),
    (ChecklistGroup::Administrative, "Final Ledger Settlement"),
    (ChecklistGroup::Administrative, "Pending Orders Closed"),
    (ChecklistGroup::Administrative, "Bonds Released"),
    (ChecklistGroup::Operations, "Access Credentials Revoked"),
    (ChecklistGroup::Operations, "IP/Technical Transfer"),
    (ChecklistGroup::Operations, "Asset Reclaim Complete"),
    (ChecklistGroup::Operations, "Data Sanitization"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub group: ChecklistGroup,
    pub label: String,
    pub done: bool,
}

/// State of the exit page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitPlan {
    exit_type: ExitType,
    checklist: Vec<ChecklistItem>,
    debrief: String,
}

impl Default for ExitPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitPlan {
    #[must_use]
    pub fn new() -> Self {
        Self {
            exit_type: ExitType::default(),
            checklist: CLOSURE_CHECKLIST
                .iter()
                .map(|(group, label)| ChecklistItem {
                    group: *group,
                    label: (*label).to_string(),
                    done: false,
                })
                .collect(),
            debrief: String::new(),
        }
    }

    #[must_use]
    pub fn exit_type(&self) -> ExitType {
        self.exit_type
    }

    pub fn select(&mut self, exit_type: ExitType) {
        self.exit_type = exit_type;
    }

    #[must_use]
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// Flip the 1-based checklist item. Returns its new state.
    pub fn toggle(&mut self, index: usize) -> Result<bool, MetavalError> {
        let total = self.checklist.len();
        let item = index
            .checked_sub(1)
            .and_then(|i| self.checklist.get_mut(i))
            .ok_or(MetavalError::OutOfRange { index, total })?;
        item.done = !item.done;
        Ok(item.done)
    }

    #[must_use]
    pub fn completed_items(&self) -> usize {
        self.checklist.iter().filter(|i| i.done).count()
    }

    #[must_use]
    pub fn debrief(&self) -> &str {
        &self.debrief
    }

    pub fn set_debrief(&mut self, text: impl Into<String>) {
        self.debrief = text.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_natural_expiry_with_open_checklist() {
        let plan = ExitPlan::new();
        assert_eq!(plan.exit_type(), ExitType::Natural);
        assert_eq!(plan.checklist().len(), 8);
        assert_eq!(plan.completed_items(), 0);
    }

    #[test]
    fn toggle_is_one_based_and_bounded() {
        let mut plan = ExitPlan::new();
        assert_eq!(plan.toggle(1).ok(), Some(true));
        assert_eq!(plan.toggle(1).ok(), Some(false));
        assert!(matches!(
            plan.toggle(0),
            Err(MetavalError::OutOfRange { index: 0, total: 8 })
        ));
        assert!(plan.toggle(9).is_err());
    }

    #[test]
    fn exit_type_parses_id_and_label() {
        assert_eq!("cause".parse::<ExitType>().ok(), Some(ExitType::Cause));
        assert_eq!("Natural Expiry".parse::<ExitType>().ok(), Some(ExitType::Natural));
        assert!(matches!(
            "mutual".parse::<ExitType>(),
            Err(MetavalError::UnknownExitType(_))
        ));
    }

    #[test]
    fn groups_split_evenly() {
        let admin = CLOSURE_CHECKLIST
            .iter()
            .filter(|(g, _)| *g == ChecklistGroup::Administrative)
            .count();
        assert_eq!(admin, 4);
    }
}
