//! # Contract Draft
//!
//! Read-only projection of the request form into the draft contract shown
//! after a successful submit. Empty fields render as [`PLACEHOLDER`].

use crate::form::{FormData, RequestField};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Rendered in place of an empty field.
pub const PLACEHOLDER: &str = "—";

pub const DRAFT_TITLE: &str = "CONTRACT DRAFT";

pub const DRAFT_FOOTER: &str =
    "This is a draft contract. Please review and approve before proceeding.";

/// Section layout: heading plus `(label, field)` rows.
const SECTIONS: [(&str, &[(&str, RequestField)]); 7] = [
    (
        "Contract Details",
        &[
            ("Contract Name", RequestField::ContractName),
            ("Type", RequestField::ContractType),
        ],
    ),
    (
        "Parties",
        &[
            ("Supplier Business", RequestField::SupplierBusiness),
            ("Party B", RequestField::PartyB),
        ],
    ),
    (
        "Duration",
        &[
            ("Start Date", RequestField::StartDate),
            ("End Date", RequestField::EndDate),
        ],
    ),
    (
        "Commercial Terms",
        &[
            ("Buyer Industry", RequestField::BuyerIndustry),
            ("Minimum Quantity", RequestField::MinQuantity),
            ("Payment Terms", RequestField::PaymentTerms),
            ("Delivery Method", RequestField::DeliveryMethod),
        ],
    ),
    (
        "Compliance & Warranty",
        &[
            ("Inspection Period (Days)", RequestField::InspectionPeriod),
            ("Warranty Period (Months)", RequestField::WarrantyPeriod),
        ],
    ),
    (
        "Liabilities",
        &[
            ("Damages - Non Purchase", RequestField::DamagesNonPurchase),
            ("Damages - Non Supply", RequestField::DamagesNonSupply),
        ],
    ),
    (
        "Additional Information",
        &[("Currency", RequestField::Currency)],
    ),
];

/// One labelled value in a draft section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRow {
    pub field: RequestField,
    pub label: String,
    pub value: String,
}

impl DraftRow {
    /// True when the row shows the placeholder rather than a form value.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.value == PLACEHOLDER
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSection {
    pub heading: String,
    pub rows: Vec<DraftRow>,
}

/// The generated draft contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDocument {
    pub title: String,
    pub generated_on: NaiveDate,
    pub sections: Vec<DraftSection>,
    pub footer: String,
}

/// Form value, or the placeholder when empty.
#[must_use]
pub fn display_value(data: &FormData, field: RequestField) -> String {
    let value = data.get(field).trim();
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

impl DraftDocument {
    /// Project form values into the draft layout.
    ///
    /// Notes appear in the last section only when filled.
    #[must_use]
    pub fn from_form(data: &FormData, generated_on: NaiveDate) -> Self {
        let mut sections: Vec<DraftSection> = SECTIONS
            .iter()
            .map(|(heading, rows)| DraftSection {
                heading: (*heading).to_string(),
                rows: rows
                    .iter()
                    .map(|(label, field)| DraftRow {
                        field: *field,
                        label: (*label).to_string(),
                        value: display_value(data, *field),
                    })
                    .collect(),
            })
            .collect();

        if data.is_filled(RequestField::Notes)
            && let Some(last) = sections.last_mut()
        {
            last.rows.push(DraftRow {
                field: RequestField::Notes,
                label: RequestField::Notes.label().to_string(),
                value: data.get(RequestField::Notes).trim().to_string(),
            });
        }

        Self {
            title: DRAFT_TITLE.to_string(),
            generated_on,
            sections,
            footer: DRAFT_FOOTER.to_string(),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &DraftRow> {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }

    /// Value shown for a field, if the field appears in the draft.
    #[must_use]
    pub fn value_of(&self, field: RequestField) -> Option<&str> {
        self.rows()
            .find(|r| r.field == field)
            .map(|r| r.value.as_str())
    }

    /// Fields whose rows carry a real value.
    #[must_use]
    pub fn populated_fields(&self) -> Vec<RequestField> {
        self.rows()
            .filter(|r| !r.is_placeholder())
            .map(|r| r.field)
            .collect()
    }

    /// Plain-text rendering for terminals and export.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title);
        let _ = writeln!(out, "Generated {}", self.generated_on.format("%Y-%m-%d"));
        for section in &self.sections {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", section.heading.to_uppercase());
            for row in &section.rows {
                let _ = writeln!(out, "  {:<26} {}", row.label, row.value);
            }
        }
        let _ = writeln!(out);
        let _ = write!(out, "{}", self.footer);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 7).expect("valid date")
    }

    #[test]
    fn empty_form_is_all_placeholders() {
        let draft = DraftDocument::from_form(&FormData::new(), date());
        assert_eq!(draft.sections.len(), 7);
        assert_eq!(draft.rows().count(), 15);
        assert!(draft.rows().all(DraftRow::is_placeholder));
        assert_eq!(draft.value_of(RequestField::Notes), None);
    }

    #[test]
    fn notes_row_appended_when_filled() {
        let mut data = FormData::new();
        data.set(RequestField::Notes, "Ship in two lots").expect("set");

        let draft = DraftDocument::from_form(&data, date());
        assert_eq!(draft.value_of(RequestField::Notes), Some("Ship in two lots"));
        assert_eq!(
            draft.sections.last().map(|s| s.rows.len()),
            Some(2)
        );
    }

    #[test]
    fn text_rendering_contains_header_and_footer() {
        let mut data = FormData::new();
        data.set(RequestField::ContractName, "Valve Supply").expect("set");

        let text = DraftDocument::from_form(&data, date()).to_text();
        assert!(text.starts_with("CONTRACT DRAFT\nGenerated 2026-01-07"));
        assert!(text.contains("Valve Supply"));
        assert!(text.ends_with(DRAFT_FOOTER));
    }
}
