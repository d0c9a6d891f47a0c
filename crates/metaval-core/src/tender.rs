//! # Tender AI Page
//!
//! PDF uploads, the simulated insight extraction and the tender document
//! generation that follows it.
//!
//! ## Timeline (from `analyze`)
//!
//! | t (s)  | Event                                   |
//! |--------|-----------------------------------------|
//! | 5..25  | one insight every 5 s; file `completed` |
//! | 26     | generating view opens, phase `thinking` |
//! | 31     | phase `generating`                      |
//! | 41     | phase `complete`, document ready        |
//!
//! The session schedules each step on its delayed-task queue; this module
//! only holds the state and its transitions.

use crate::MetavalError;
use crate::navigation::Page;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Largest accepted upload (50 MB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Insights extracted from every uploaded tender, in order.
pub const TENDER_INSIGHTS: [&str; 5] = [
    "Vendor prequalification requirements identified",
    "Payment terms: Net 30 days detected",
    "Warranty period: 24 months",
    "Compliance requirements: ISO 9001, SOC 2",
    "Performance metrics: 99.5% uptime SLA",
];

pub const INSIGHT_INTERVAL_MS: u64 = 5000;
/// Pause between the last insight and the generating view.
pub const GENERATING_VIEW_DELAY_MS: u64 = 1000;
pub const THINKING_MS: u64 = 5000;
pub const DRAFTING_MS: u64 = 10_000;

// =============================================================================
// UPLOADS
// =============================================================================

/// A file offered for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderUpload {
    pub name: String,
    pub media_type: String,
    pub size_bytes: u64,
}

impl TenderUpload {
    /// Upload whose media type is inferred from the file extension.
    #[must_use]
    pub fn from_name(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let media_type = if name.to_ascii_lowercase().ends_with(".pdf") {
            PDF_MEDIA_TYPE
        } else {
            "application/octet-stream"
        };
        Self {
            name,
            media_type: media_type.to_string(),
            size_bytes,
        }
    }

    /// Type first, then size.
    pub fn validate(&self) -> Result<(), MetavalError> {
        if self.media_type != PDF_MEDIA_TYPE {
            return Err(MetavalError::UnsupportedFileType(self.media_type.clone()));
        }
        if self.size_bytes > MAX_UPLOAD_BYTES {
            return Err(MetavalError::FileTooLarge {
                size: self.size_bytes,
                limit: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ready,
    Processing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: u64,
    pub name: String,
    pub size_bytes: u64,
    pub uploaded_on: NaiveDate,
    pub status: FileStatus,
    pub insights: Vec<String>,
}

impl UploadedFile {
    /// Plain-text export of the extracted insights.
    #[must_use]
    pub fn insights_text(&self) -> String {
        format!(
            "Tender AI Analysis - {}\n\nInsights:\n{}\n\nExtracted from: {}",
            self.name,
            self.insights.join("\n"),
            self.uploaded_on
        )
    }
}

/// Human-readable size with up to two decimals, e.g. `1.5 MB`.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let (unit, divisor) = if bytes >= 1024 * 1024 {
        ("MB", 1024 * 1024)
    } else if bytes >= 1024 {
        ("KB", 1024)
    } else {
        ("Bytes", 1)
    };

    let hundredths = bytes
        .saturating_mul(100)
        .saturating_add(divisor / 2)
        / divisor;
    let whole = hundredths / 100;
    let fraction = hundredths % 100;

    if fraction == 0 {
        format!("{} {}", whole, unit)
    } else if fraction % 10 == 0 {
        format!("{}.{} {}", whole, fraction / 10, unit)
    } else {
        format!("{}.{:02} {}", whole, fraction, unit)
    }
}

// =============================================================================
// GENERATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderView {
    #[default]
    Upload,
    Generating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderPhase {
    Thinking,
    Generating,
    Complete,
}

fn tender_document(file: &UploadedFile, today: NaiveDate) -> String {
    let date = today.format("%m/%d/%Y");
    let mut doc = String::new();
    let _ = write!(
        doc,
        "TENDER DOCUMENT\n\n\
         CONTRACT AGREEMENT\n\n\
         This Tender Agreement (\"Agreement\") is entered into as of {date} between the parties identified below:\n\n\
         PARTY A (Buyer)\nIndustry: Manufacturing\nRequirements: {name}\n\n\
         PARTY B (Supplier)\nBusiness Name: [Supplier Name]\nCertification: ISO 9001, SOC 2\n\n\
         TERMS AND CONDITIONS\n\n",
        date = date,
        name = file.name,
    );
    for (i, (heading, body)) in TENDER_TERMS.iter().enumerate() {
        let _ = write!(doc, "{}. {}\n   {}\n\n", i.saturating_add(1), heading, body);
    }
    let _ = write!(
        doc,
        "SIGNATURES\n\n\
         _______________________          _______________________\n\
         Party A Representative           Party B Representative\n\n\
         Document Generated: {}\nReference: {}",
        date, file.id
    );
    doc
}

const TENDER_TERMS: [(&str, &str); 9] = [
    (
        "SCOPE OF WORK",
        "The Supplier shall provide goods/services as outlined in the attached specifications and requirements documentation.",
    ),
    (
        "PAYMENT TERMS",
        "Payment shall be made within Net 30 days from the date of invoice.",
    ),
    (
        "WARRANTY",
        "The Supplier warrants all deliverables for a period of 24 months from the date of delivery.",
    ),
    (
        "PERFORMANCE METRICS",
        "The Supplier shall maintain a minimum uptime SLA of 99.5% for all services provided.",
    ),
    (
        "COMPLIANCE REQUIREMENTS",
        "All work shall be performed in accordance with ISO 9001 and SOC 2 standards.",
    ),
    (
        "VENDOR PREQUALIFICATION",
        "The Supplier has met all prequalification requirements as specified in the tender documentation.",
    ),
    (
        "DELIVERY AND ACCEPTANCE",
        "Goods/services shall be delivered as per the agreed schedule. Acceptance criteria are defined in Appendix A.",
    ),
    (
        "TERMINATION",
        "Either party may terminate this agreement with 30 days written notice.",
    ),
    (
        "GOVERNING LAW",
        "This agreement shall be governed by the laws of the applicable jurisdiction.",
    ),
];

// =============================================================================
// PAGE STATE
// =============================================================================

/// State of the tender page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TenderPage {
    /// Newest first.
    files: Vec<UploadedFile>,
    next_id: u64,
    view: TenderView,
    phase: Option<TenderPhase>,
    current_file: Option<u64>,
    document: Option<String>,
}

impl TenderPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    #[must_use]
    pub fn file(&self, id: u64) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn view(&self) -> TenderView {
        self.view
    }

    /// Generation phase; `None` until a generating view has been opened.
    #[must_use]
    pub fn phase(&self) -> Option<TenderPhase> {
        self.phase
    }

    #[must_use]
    pub fn current_file(&self) -> Option<&UploadedFile> {
        self.current_file.and_then(|id| self.file(id))
    }

    #[must_use]
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    fn file_mut(&mut self, id: u64) -> Option<&mut UploadedFile> {
        self.files.iter_mut().find(|f| f.id == id)
    }

    /// Validate and store an upload at the top of the list.
    pub fn upload(
        &mut self,
        upload: TenderUpload,
        uploaded_on: NaiveDate,
    ) -> Result<&UploadedFile, MetavalError> {
        upload.validate()?;
        self.next_id = self.next_id.saturating_add(1);
        self.files.insert(
            0,
            UploadedFile {
                id: self.next_id,
                name: upload.name,
                size_bytes: upload.size_bytes,
                uploaded_on,
                status: FileStatus::Ready,
                insights: Vec::new(),
            },
        );
        self.files
            .first()
            .ok_or(MetavalError::UnknownFile(self.next_id))
    }

    pub fn remove(&mut self, id: u64) -> Result<UploadedFile, MetavalError> {
        let position = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or(MetavalError::UnknownFile(id))?;
        Ok(self.files.remove(position))
    }

    /// Start insight extraction on a `ready` file.
    pub fn begin_analysis(&mut self, id: u64) -> Result<(), MetavalError> {
        let file = self.file_mut(id).ok_or(MetavalError::UnknownFile(id))?;
        if file.status != FileStatus::Ready {
            return Err(MetavalError::not_available("analyze", Page::TenderAi));
        }
        file.status = FileStatus::Processing;
        Ok(())
    }

    /// Append insight `index` to a processing file.
    ///
    /// Returns `Some(true)` when that was the last insight and the file is now
    /// completed, `None` when the file is gone or not processing.
    pub fn add_insight(&mut self, id: u64, index: usize) -> Option<bool> {
        let insight = TENDER_INSIGHTS.get(index)?;
        let file = self.file_mut(id)?;
        if file.status != FileStatus::Processing {
            return None;
        }
        file.insights.push((*insight).to_string());
        if file.insights.len() >= TENDER_INSIGHTS.len() {
            file.status = FileStatus::Completed;
            return Some(true);
        }
        Some(false)
    }

    /// Open the generating view for a file, in the thinking phase.
    pub fn open_generating(&mut self, id: u64) -> bool {
        if self.file(id).is_none() {
            return false;
        }
        self.view = TenderView::Generating;
        self.phase = Some(TenderPhase::Thinking);
        self.current_file = Some(id);
        self.document = None;
        true
    }

    /// Thinking to generating, for the file being generated.
    pub fn start_drafting(&mut self, id: u64) -> bool {
        if self.current_file != Some(id) || self.phase != Some(TenderPhase::Thinking) {
            return false;
        }
        self.phase = Some(TenderPhase::Generating);
        true
    }

    /// Produce the tender document and mark generation complete.
    pub fn complete(&mut self, id: u64, today: NaiveDate) -> bool {
        if self.current_file != Some(id) || self.phase != Some(TenderPhase::Generating) {
            return false;
        }
        let Some(file) = self.file(id) else {
            return false;
        };
        self.document = Some(tender_document(file, today));
        self.phase = Some(TenderPhase::Complete);
        true
    }

    /// Back to the upload list. Running generation continues.
    pub fn show_upload(&mut self) {
        self.view = TenderView::Upload;
    }
}
