//! # Catalog
//!
//! Static sample records (contracts, clauses, requests) and the in-memory
//! filters of the contract search page.
//!
//! Records are built on demand from constant tables; nothing here mutates.

use crate::MetavalError;
use crate::workflow::{StageKey, StageSequence};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// RECORD TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub name: String,
    pub contract_type: String,
    pub counterparty: String,
    pub value: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Lifecycle stage label; "Draft" marks contracts not yet in the lifecycle.
    pub stage: String,
    pub risk: RiskLevel,
    pub owner: String,
}

impl Contract {
    /// 1-based lifecycle position, `None` for drafts.
    #[must_use]
    pub fn lifecycle_index(&self) -> Option<usize> {
        StageKey::from_label(&self.stage)
            .and_then(|key| StageSequence::contract_lifecycle().position_of(key))
    }

    fn matches_query(&self, query: &str) -> bool {
        [
            &self.name,
            &self.id,
            &self.counterparty,
            &self.owner,
            &self.contract_type,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(query))
    }

    fn is_nda(&self) -> bool {
        let kind = self.contract_type.to_lowercase();
        kind.contains("nda")
            || kind.contains("non-disclosure")
            || self.name.to_lowercase().contains("nda")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub id: String,
    pub clause_type: String,
    pub snippet: String,
    pub risk: RiskLevel,
    pub contract: String,
}

impl Clause {
    fn matches_query(&self, query: &str) -> bool {
        [&self.id, &self.clause_type, &self.snippet, &self.contract]
            .iter()
            .any(|field| field.to_lowercase().contains(query))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    New,
    InReview,
    Approved,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequestStatus::New => "New",
            RequestStatus::InReview => "In Review",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        })
    }
}

/// A submitted contract request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub id: String,
    pub title: String,
    pub requester: String,
    pub department: String,
    pub value: String,
    pub created: NaiveDate,
    pub status: RequestStatus,
    pub category: String,
    pub description: String,
}

// =============================================================================
// SAMPLE DATA
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

type ContractRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    (i32, u32, u32),
    (i32, u32, u32),
    &'static str,
    RiskLevel,
    &'static str,
);

const CONTRACT_ROWS: [ContractRow; 16] = [
    ("CON-9921", "Global Steel MSA", "Master Services Agreement", "Global Steel Corp", "$2,400,000", (2026, 2, 1), (2029, 1, 31), "Negotiate", RiskLevel::Medium, "Robert Chen"),
    ("CON-9922", "Valve Supply Agreement", "Supply Agreement", "Apex Valves Ltd", "$850,000", (2026, 1, 15), (2027, 1, 14), "Approve", RiskLevel::Low, "Sarah Miller"),
    ("CON-9923", "Mining Equipment Lease", "Lease", "Heavy Machinery Inc", "$5,200,000", (2025, 11, 1), (2030, 10, 31), "Execute", RiskLevel::High, "Emma Wilson"),
    ("CON-9924", "On-site Maintenance SOW", "Statement of Work", "SiteWorks Services", "$120,000", (2026, 3, 1), (2026, 8, 31), "Draft", RiskLevel::Low, "John Chen"),
    ("CON-9925", "Cloud Infrastructure SLA", "Service Level Agreement", "TechCloud Solutions", "$1,800,000", (2026, 4, 1), (2027, 3, 31), "Review", RiskLevel::Medium, "Michael Brown"),
    ("CON-9926", "Raw Material Procurement", "Purchase Agreement", "Metals International", "$3,500,000", (2026, 1, 1), (2026, 12, 31), "Comply", RiskLevel::Low, "Robert Chen"),
    ("CON-9927", "Security Services Contract", "Service Agreement", "SecureGuard Ltd", "$450,000", (2026, 2, 15), (2027, 2, 14), "Request", RiskLevel::Low, "Sarah Miller"),
    ("CON-9932", "Energy Supply Contract", "Utility Agreement", "PowerGrid Energy", "$2,100,000", (2026, 2, 1), (2027, 1, 31), "Search", RiskLevel::High, "Robert Chen"),
    ("CON-9935", "Construction Services", "Construction Agreement", "BuildRight Construction", "$8,500,000", (2026, 5, 1), (2027, 4, 30), "Request", RiskLevel::High, "Michael Brown"),
    ("CON-9941", "Non-Disclosure Agreement - TechCorp", "NDA", "TechCorp Industries", "$0", (2026, 1, 1), (2027, 12, 31), "Execute", RiskLevel::Low, "Robert Chen"),
    ("CON-9942", "Mutual NDA - Innovation Labs", "Mutual NDA", "Innovation Labs", "$0", (2025, 12, 1), (2026, 12, 31), "Execute", RiskLevel::Low, "Sarah Miller"),
    ("CON-9944", "Non-Disclosure - Vendor ABC", "Confidentiality Agreement", "Vendor ABC Corp", "$0", (2026, 3, 1), (2027, 2, 28), "Execute", RiskLevel::Low, "John Chen"),
    ("CON-9945", "Q1 Maintenance Contract", "Service Agreement", "Maintenance Pro", "$250,000", (2025, 10, 1), (2026, 2, 5), "Execute", RiskLevel::Low, "Robert Chen"),
    ("CON-9946", "Temporary Storage Lease", "Lease", "QuickStorage Inc", "$180,000", (2025, 11, 15), (2026, 2, 10), "Execute", RiskLevel::Medium, "Sarah Miller"),
    ("CON-9948", "Emergency Equipment Rental", "Rental Agreement", "Equipment Rentals Co", "$320,000", (2025, 12, 1), (2026, 2, 20), "Execute", RiskLevel::Medium, "John Chen"),
    ("CON-9950", "Quarterly Audit Contract", "Audit Agreement", "Audit Partners", "$75,000", (2025, 12, 10), (2026, 2, 28), "Execute", RiskLevel::Low, "Robert Chen"),
];

/// Sample contract records.
#[must_use]
pub fn sample_contracts() -> Vec<Contract> {
    CONTRACT_ROWS
        .iter()
        .map(
            |(id, name, kind, counterparty, value, start, end, stage, risk, owner)| Contract {
                id: (*id).to_string(),
                name: (*name).to_string(),
                contract_type: (*kind).to_string(),
                counterparty: (*counterparty).to_string(),
                value: (*value).to_string(),
                start: date(start.0, start.1, start.2),
                end: date(end.0, end.1, end.2),
                stage: (*stage).to_string(),
                risk: *risk,
                owner: (*owner).to_string(),
            },
        )
        .collect()
}

const CLAUSE_ROWS: [(&str, &str, &str, RiskLevel, &str); 8] = [
    ("CL-1", "Liability", "...liability of the Supplier shall not exceed 100% of the total Fees...", RiskLevel::Medium, "Global Steel MSA"),
    ("CL-2", "IP Rights", "...Customer shall own all Intellectual Property Rights in the Deliverables...", RiskLevel::Low, "TechCorp SOW"),
    ("CL-3", "Termination", "...either party may terminate for convenience with 30 days notice...", RiskLevel::Low, "Mining Lease X1"),
    ("CL-4", "Payment Terms", "...payment shall be made within 30 days of invoice date, subject to delivery confirmation...", RiskLevel::Low, "Valve Supply Agreement"),
    ("CL-5", "Force Majeure", "...neither party shall be liable for delays due to circumstances beyond reasonable control...", RiskLevel::Medium, "Mining Equipment Lease"),
    ("CL-6", "Confidentiality", "...all proprietary information disclosed shall remain confidential for a period of 5 years...", RiskLevel::Low, "Cloud Infrastructure SLA"),
    ("CL-8", "Indemnification", "...Supplier shall indemnify Customer against all claims arising from Supplier's breach...", RiskLevel::High, "Security Services Contract"),
    ("CL-10", "Price Adjustment", "...prices may be adjusted annually based on CPI index with 5% maximum cap...", RiskLevel::Medium, "IT Support Services"),
];

/// Sample clause library entries.
#[must_use]
pub fn sample_clauses() -> Vec<Clause> {
    CLAUSE_ROWS
        .iter()
        .map(|(id, kind, snippet, risk, contract)| Clause {
            id: (*id).to_string(),
            clause_type: (*kind).to_string(),
            snippet: (*snippet).to_string(),
            risk: *risk,
            contract: (*contract).to_string(),
        })
        .collect()
}

/// Sample contract requests.
#[must_use]
pub fn sample_requests() -> Vec<RequestRecord> {
    vec![
        RequestRecord {
            id: "REQ-2026-001".to_string(),
            title: "Supply of Industrial Valves - Phase 2".to_string(),
            requester: "Sarah Miller".to_string(),
            department: "Procurement".to_string(),
            value: "$450,000".to_string(),
            created: date(2026, 1, 5),
            status: RequestStatus::InReview,
            category: "Valves".to_string(),
            description: "Standard supply agreement for heavy-duty industrial valves for the upcoming mining project.".to_string(),
        },
        RequestRecord {
            id: "REQ-2026-002".to_string(),
            title: "Maintenance Service Level Agreement".to_string(),
            requester: "John Chen".to_string(),
            department: "Operations".to_string(),
            value: "$120,000".to_string(),
            created: date(2026, 1, 6),
            status: RequestStatus::New,
            category: "Services".to_string(),
            description: "Quarterly maintenance and support for site equipment.".to_string(),
        },
        RequestRecord {
            id: "REQ-2026-003".to_string(),
            title: "Spare Parts Procurement - Q1".to_string(),
            requester: "Emma Wilson".to_string(),
            department: "Supply Chain".to_string(),
            value: "$85,000".to_string(),
            created: date(2026, 1, 7),
            status: RequestStatus::Approved,
            category: "Spares".to_string(),
            description: "Bulk order for essential spare parts for the processing plant.".to_string(),
        },
    ]
}

/// Look up a sample request by id (case-insensitive).
pub fn find_request(id: &str) -> Result<RequestRecord, MetavalError> {
    sample_requests()
        .into_iter()
        .find(|r| r.id.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| MetavalError::UnknownRequest(id.trim().to_string()))
}

// =============================================================================
// SEARCH
// =============================================================================

/// Contracts expiring within this many days count as "expiring soon".
pub const EXPIRING_WINDOW_DAYS: u64 = 30;

/// Predefined filters of the contract list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SavedView {
    #[default]
    All,
    My,
    Expiring,
    HighRisk,
    Nda,
}

impl SavedView {
    pub const ALL: [SavedView; 5] = [
        SavedView::All,
        SavedView::My,
        SavedView::Expiring,
        SavedView::HighRisk,
        SavedView::Nda,
    ];

    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            SavedView::All => "all",
            SavedView::My => "my",
            SavedView::Expiring => "expiring",
            SavedView::HighRisk => "high-risk",
            SavedView::Nda => "nda",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SavedView::All => "All Contracts",
            SavedView::My => "My Contracts",
            SavedView::Expiring => "Expiring Soon",
            SavedView::HighRisk => "High Risk",
            SavedView::Nda => "All NDAs",
        }
    }
}

impl FromStr for SavedView {
    type Err = MetavalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SavedView::ALL
            .into_iter()
            .find(|v| v.id() == wanted)
            .ok_or_else(|| MetavalError::UnknownSavedView(s.trim().to_string()))
    }
}

/// Inputs of a contract search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractQuery<'a> {
    pub view: SavedView,
    pub text: &'a str,
    /// Owner matched by `SavedView::My`.
    pub current_user: &'a str,
    /// Reference date for `SavedView::Expiring`.
    pub today: NaiveDate,
}

impl ContractQuery<'_> {
    fn admits(&self, contract: &Contract) -> bool {
        match self.view {
            SavedView::All => true,
            SavedView::My => contract.owner == self.current_user,
            SavedView::Expiring => {
                let horizon = self
                    .today
                    .checked_add_days(Days::new(EXPIRING_WINDOW_DAYS))
                    .unwrap_or(NaiveDate::MAX);
                contract.end >= self.today && contract.end <= horizon
            }
            SavedView::HighRisk => contract.risk == RiskLevel::High,
            SavedView::Nda => contract.is_nda(),
        }
    }
}

/// Apply a saved view, then the free-text query, preserving input order.
#[must_use]
pub fn search_contracts(contracts: &[Contract], query: &ContractQuery<'_>) -> Vec<Contract> {
    let needle = query.text.trim().to_lowercase();
    contracts
        .iter()
        .filter(|c| query.admits(c))
        .filter(|c| needle.is_empty() || c.matches_query(&needle))
        .cloned()
        .collect()
}

/// Free-text search over the clause library.
#[must_use]
pub fn search_clauses(clauses: &[Clause], text: &str) -> Vec<Clause> {
    let needle = text.trim().to_lowercase();
    clauses
        .iter()
        .filter(|c| needle.is_empty() || c.matches_query(&needle))
        .cloned()
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn query(view: SavedView, text: &str) -> ContractQuery<'_> {
        ContractQuery {
            view,
            text,
            current_user: "Robert Chen",
            today: date(2026, 1, 20),
        }
    }

    fn ids(contracts: &[Contract]) -> Vec<&str> {
        contracts.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn all_view_returns_everything() {
        let contracts = sample_contracts();
        assert_eq!(
            search_contracts(&contracts, &query(SavedView::All, "")).len(),
            contracts.len()
        );
    }

    #[test]
    fn my_view_filters_by_owner() {
        let found = search_contracts(&sample_contracts(), &query(SavedView::My, ""));
        assert!(!found.is_empty());
        assert!(found.iter().all(|c| c.owner == "Robert Chen"));
    }

    #[test]
    fn expiring_view_uses_thirty_day_window() {
        let found = search_contracts(&sample_contracts(), &query(SavedView::Expiring, ""));
        assert_eq!(ids(&found), vec!["CON-9945", "CON-9946"]);
    }

    #[test]
    fn nda_view_matches_type_and_name() {
        let found = search_contracts(&sample_contracts(), &query(SavedView::Nda, ""));
        assert_eq!(ids(&found), vec!["CON-9941", "CON-9942"]);
    }

    #[test]
    fn query_is_case_insensitive_and_combines_with_view() {
        let found = search_contracts(&sample_contracts(), &query(SavedView::HighRisk, "  ENERGY "));
        assert_eq!(ids(&found), vec!["CON-9932"]);
    }

    #[test]
    fn clause_search_covers_snippets() {
        let found = search_clauses(&sample_clauses(), "arbitration");
        assert!(found.is_empty());
        let found = search_clauses(&sample_clauses(), "cpi");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "CL-10");
    }

    #[test]
    fn lifecycle_index_maps_stage_labels() {
        let contracts = sample_contracts();
        let by_id = |id: &str| contracts.iter().find(|c| c.id == id).cloned();
        assert_eq!(by_id("CON-9922").and_then(|c| c.lifecycle_index()), Some(4));
        assert_eq!(by_id("CON-9932").and_then(|c| c.lifecycle_index()), Some(6));
        assert_eq!(by_id("CON-9924").and_then(|c| c.lifecycle_index()), None);
    }

    #[test]
    fn find_request_by_id() {
        assert!(find_request("req-2026-002").is_ok());
        assert!(matches!(
            find_request("REQ-1999-001"),
            Err(MetavalError::UnknownRequest(_))
        ));
    }

    #[test]
    fn saved_view_ids_parse() {
        for view in SavedView::ALL {
            assert_eq!(view.id().parse::<SavedView>().ok(), Some(view));
        }
        assert!("archived".parse::<SavedView>().is_err());
    }
}
