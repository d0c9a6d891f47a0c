//! # Stage Renderer
//!
//! Pure projection from `(stage, form snapshot)` to the content shown for
//! that stage. Never mutates the form.

use super::stage::{StageKey, WorkflowStage};
use crate::draft::{PLACEHOLDER, display_value};
use crate::form::{FormData, RequestField};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Labelled value in a stage view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewField {
    pub label: String,
    pub value: String,
}

impl ViewField {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// Read-only content for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageView {
    pub index: usize,
    pub name: String,
    pub heading: String,
    pub fields: Vec<ViewField>,
    pub lines: Vec<String>,
}

impl StageView {
    /// Value of the first field with this label.
    #[must_use]
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[{}] {}", self.index, self.heading);
        for field in &self.fields {
            let _ = writeln!(out, "  {:<22} {}", field.label, field.value);
        }
        for line in &self.lines {
            let _ = writeln!(out, "  {}", line);
        }
        out
    }
}

/// Money fields display with a leading `$`.
fn money(data: &FormData, field: RequestField) -> String {
    let value = display_value(data, field);
    if value == PLACEHOLDER {
        value
    } else {
        format!("${}", value)
    }
}

pub struct StageRenderer;

impl StageRenderer {
    /// Build the view for `stage` from the current form values.
    #[must_use]
    pub fn render(stage: &WorkflowStage, data: &FormData) -> StageView {
        let title = display_value(data, RequestField::Title);
        let counterparty = display_value(data, RequestField::Counterparty);

        let (heading, fields, lines) = match stage.render_key {
            StageKey::Request => (
                if data.is_filled(RequestField::Title) {
                    title.clone()
                } else {
                    "New Contract Request".to_string()
                },
                vec![
                    ViewField::new("Title", title),
                    ViewField::new("Category", display_value(data, RequestField::Category)),
                    ViewField::new("Value", money(data, RequestField::Value)),
                    ViewField::new("Counterparty", counterparty),
                    ViewField::new(
                        "Description",
                        display_value(data, RequestField::Description),
                    ),
                ],
                Vec::new(),
            ),
            StageKey::Generate => (
                "Generate Contract".to_string(),
                vec![
                    ViewField::new("Contract Title", title),
                    ViewField::new("Between", format!("[Your Company] and {}", counterparty)),
                    ViewField::new("Value", money(data, RequestField::Value)),
                    ViewField::new("Category", display_value(data, RequestField::Category)),
                ],
                vec![
                    "Terms & Conditions:".to_string(),
                    "1. This agreement is effective upon execution by both parties.".to_string(),
                    "2. Payment terms are Net 30 from invoice date.".to_string(),
                    "3. Either party may terminate with 30 days written notice.".to_string(),
                    "[Additional terms generated based on contract type...]".to_string(),
                ],
            ),
            StageKey::Negotiate => (
                "Negotiate".to_string(),
                vec![
                    ViewField::new("Payment Terms", "Net 30 → Net 45"),
                    ViewField::new("Termination Clause", "30 days notice → 60 days notice"),
                ],
                vec!["Proposed redlines awaiting decision.".to_string()],
            ),
            StageKey::Approval => (
                "Approval".to_string(),
                vec![
                    ViewField::new("Finance Manager", "Approved - 2 hours ago"),
                    ViewField::new("Legal Counsel", "Pending review"),
                    ViewField::new("Executive Approval", "Not yet started"),
                ],
                Vec::new(),
            ),
            StageKey::Execute => (
                "Execute".to_string(),
                vec![
                    ViewField::new("Your Company", "Pending"),
                    ViewField::new(&counterparty, "Awaiting signature"),
                ],
                vec!["Signature collection in progress.".to_string()],
            ),
            StageKey::Search => (
                "Repository".to_string(),
                vec![
                    ViewField::new("Contract", display_value(data, RequestField::ContractName)),
                    ViewField::new("Counterparty", counterparty),
                ],
                vec!["Indexed for clause and metadata search.".to_string()],
            ),
            StageKey::Comply => (
                "Compliance Check".to_string(),
                vec![
                    ViewField::new("Legal Review", "Passed"),
                    ViewField::new("Risk Assessment", "Low Risk"),
                    ViewField::new("Compliance", "Review Required"),
                    ViewField::new("Vendor Check", "Verified"),
                ],
                Vec::new(),
            ),
            StageKey::Review => (
                "Review".to_string(),
                vec![
                    ViewField::new("Quality Score", "8.5/10"),
                    ViewField::new("Delivery", "9/10"),
                    ViewField::new("Communication", "8/10"),
                ],
                vec!["Vendor performance".to_string()],
            ),
            StageKey::Exit => (
                "Contract Completed".to_string(),
                vec![
                    ViewField::new("Counterparty", counterparty),
                    ViewField::new("Value", money(data, RequestField::Value)),
                    ViewField::new("Effective Date", "Today"),
                ],
                vec![format!(
                    "Your contract \"{}\" has been successfully executed and is now active.",
                    title
                )],
            ),
        };

        StageView {
            index: stage.index,
            name: stage.name.clone(),
            heading,
            fields,
            lines,
        }
    }
}
