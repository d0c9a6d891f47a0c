//! # Request Form
//!
//! Typed field set of the new-contract request form, the free-form value
//! store behind it, and submit validation.
//!
//! Only `contract_name` and `contract_type` are required. Select-style fields
//! (`payment_terms`, `delivery_method`) accept only their listed options.

use crate::draft::DraftDocument;
use crate::{MetavalError, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// FIELDS
// =============================================================================

/// Every field the request form carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestField {
    Title,
    Category,
    Value,
    Counterparty,
    Description,
    ContractName,
    ContractType,
    SupplierBusiness,
    PartyB,
    BuyerIndustry,
    StartDate,
    EndDate,
    MinQuantity,
    PaymentTerms,
    DeliveryMethod,
    InspectionPeriod,
    WarrantyPeriod,
    DamagesNonPurchase,
    DamagesNonSupply,
    Currency,
    Notes,
}

/// Accepted `payment_terms` values.
pub const PAYMENT_TERMS: [&str; 6] = [
    "Net 15",
    "Net 30",
    "Net 45",
    "Net 60",
    "COD (Cash on Delivery)",
    "Advance Payment",
];

/// Accepted `delivery_method` values.
pub const DELIVERY_METHODS: [&str; 5] = [
    "FOB (Free on Board)",
    "CIF (Cost, Insurance, Freight)",
    "DAP (Delivered at Place)",
    "DDP (Delivered Duty Paid)",
    "EXW (Ex Works)",
];

/// Fields that must be non-empty for a submit to pass.
pub const REQUIRED_FIELDS: [RequestField; 2] =
    [RequestField::ContractName, RequestField::ContractType];

impl RequestField {
    pub const ALL: [RequestField; 21] = [
        RequestField::Title,
        RequestField::Category,
        RequestField::Value,
        RequestField::Counterparty,
        RequestField::Description,
        RequestField::ContractName,
        RequestField::ContractType,
        RequestField::SupplierBusiness,
        RequestField::PartyB,
        RequestField::BuyerIndustry,
        RequestField::StartDate,
        RequestField::EndDate,
        RequestField::MinQuantity,
        RequestField::PaymentTerms,
        RequestField::DeliveryMethod,
        RequestField::InspectionPeriod,
        RequestField::WarrantyPeriod,
        RequestField::DamagesNonPurchase,
        RequestField::DamagesNonSupply,
        RequestField::Currency,
        RequestField::Notes,
    ];

    /// Snake-case key, as used on the command line and in JSON.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            RequestField::Title => "title",
            RequestField::Category => "category",
            RequestField::Value => "value",
            RequestField::Counterparty => "counterparty",
            RequestField::Description => "description",
            RequestField::ContractName => "contract_name",
            RequestField::ContractType => "contract_type",
            RequestField::SupplierBusiness => "supplier_business",
            RequestField::PartyB => "party_b",
            RequestField::BuyerIndustry => "buyer_industry",
            RequestField::StartDate => "start_date",
            RequestField::EndDate => "end_date",
            RequestField::MinQuantity => "min_quantity",
            RequestField::PaymentTerms => "payment_terms",
            RequestField::DeliveryMethod => "delivery_method",
            RequestField::InspectionPeriod => "inspection_period",
            RequestField::WarrantyPeriod => "warranty_period",
            RequestField::DamagesNonPurchase => "damages_non_purchase",
            RequestField::DamagesNonSupply => "damages_non_supply",
            RequestField::Currency => "currency",
            RequestField::Notes => "notes",
        }
    }

    /// Form label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RequestField::Title => "Title",
            RequestField::Category => "Category",
            RequestField::Value => "Value",
            RequestField::Counterparty => "Counterparty",
            RequestField::Description => "Description",
            RequestField::ContractName => "Contract Name",
            RequestField::ContractType => "Contract Type",
            RequestField::SupplierBusiness => "Supplier Business",
            RequestField::PartyB => "Party B",
            RequestField::BuyerIndustry => "Buyer Industry",
            RequestField::StartDate => "Start Date",
            RequestField::EndDate => "End Date",
            RequestField::MinQuantity => "Min Quantity",
            RequestField::PaymentTerms => "Payment Terms",
            RequestField::DeliveryMethod => "Delivery Method",
            RequestField::InspectionPeriod => "Inspection (Days)",
            RequestField::WarrantyPeriod => "Warranty (Months)",
            RequestField::DamagesNonPurchase => "Damages - Non Purchase",
            RequestField::DamagesNonSupply => "Damages - Non Supply",
            RequestField::Currency => "Currency",
            RequestField::Notes => "Notes",
        }
    }

    /// Option list for select-style fields.
    #[must_use]
    pub fn choices(&self) -> Option<&'static [&'static str]> {
        match self {
            RequestField::PaymentTerms => Some(&PAYMENT_TERMS),
            RequestField::DeliveryMethod => Some(&DELIVERY_METHODS),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        REQUIRED_FIELDS.contains(self)
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RequestField {
    type Err = MetavalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        RequestField::ALL
            .into_iter()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| MetavalError::UnknownField(s.trim().to_string()))
    }
}

// =============================================================================
// FORM DATA
// =============================================================================

/// Free-form field values. Absent and empty are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    values: BTreeMap<RequestField, String>,
}

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value. Empty input clears the field.
    ///
    /// Select-style fields reject values outside their option list.
    pub fn set(&mut self, field: RequestField, value: impl Into<String>) -> Result<(), MetavalError> {
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&field);
            return Ok(());
        }
        if let Some(choices) = field.choices()
            && !choices.contains(&value.as_str())
        {
            return Err(MetavalError::InvalidChoice { field, value });
        }
        self.values.insert(field, value);
        Ok(())
    }

    /// Value of a field, `""` when unset.
    #[must_use]
    pub fn get(&self, field: RequestField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// True when the field holds something other than whitespace.
    #[must_use]
    pub fn is_filled(&self, field: RequestField) -> bool {
        !self.get(field).trim().is_empty()
    }

    /// Fields holding a value, in declaration order.
    #[must_use]
    pub fn filled_fields(&self) -> Vec<RequestField> {
        self.values
            .keys()
            .copied()
            .filter(|f| self.is_filled(*f))
            .collect()
    }
}

// =============================================================================
// REQUEST FORM
// =============================================================================

/// The new-request form: its values plus whether a draft has been produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestForm {
    data: FormData,
    draft: Option<DraftDocument>,
}

impl RequestForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Set a field from its string key.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) -> Result<RequestField, MetavalError> {
        let field: RequestField = key.parse()?;
        self.data.set(field, value)?;
        Ok(field)
    }

    pub fn set(&mut self, field: RequestField, value: impl Into<String>) -> Result<(), MetavalError> {
        self.data.set(field, value)
    }

    /// Check required fields without producing a draft.
    pub fn validate(data: &FormData) -> Result<(), ValidationError> {
        let missing: BTreeSet<RequestField> = REQUIRED_FIELDS
            .into_iter()
            .filter(|f| !data.is_filled(*f))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                missing_fields: missing,
            })
        }
    }

    /// Validate and, on success, build and keep the draft document.
    ///
    /// On failure any previously shown draft is left as it was.
    pub fn submit(&mut self, generated_on: NaiveDate) -> Result<&DraftDocument, ValidationError> {
        Self::validate(&self.data)?;
        Ok(&*self
            .draft
            .insert(DraftDocument::from_form(&self.data, generated_on)))
    }

    /// Draft produced by the last successful submit, if still shown.
    #[must_use]
    pub fn draft(&self) -> Option<&DraftDocument> {
        self.draft.as_ref()
    }

    /// Hide the draft (cancel). Field values are kept.
    pub fn dismiss_draft(&mut self) {
        self.draft = None;
    }
}

// =============================================================================
// TESTS
// =============================================================================
