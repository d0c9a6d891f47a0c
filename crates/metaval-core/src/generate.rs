//! # Contract Generation Page
//!
//! Template selection and the simulated draft generation status. The delay
//! between `Generating` and `Drafted` is driven by the session's scheduler.

use crate::MetavalError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key terms shown next to the generated draft.
pub const DEFAULT_KEY_TERMS: [(&str, &str); 5] = [
    ("Contracting Parties", "Metaval Industrial SA & SteelCraft Ltd"),
    ("Contract Period", "24 Months starting Jan 2026"),
    ("Payment Terms", "Net 45 Days"),
    ("Governing Law", "England and Wales"),
    ("Liability Cap", "100% of Contract Value"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    #[default]
    StandardPurchase,
    SupplyAgreement,
    ServiceMsa,
}

impl Template {
    pub const ALL: [Template; 3] = [
        Template::StandardPurchase,
        Template::SupplyAgreement,
        Template::ServiceMsa,
    ];

    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Template::StandardPurchase => "standard-purchase",
            Template::SupplyAgreement => "supply-agreement",
            Template::ServiceMsa => "service-msa",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Template::StandardPurchase => "Standard Purchase",
            Template::SupplyAgreement => "Supply Agreement",
            Template::ServiceMsa => "Service MSA",
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Template {
    type Err = MetavalError;

    /// Accepts the id (`service-msa`) or the label (`Service MSA`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Template::ALL
            .into_iter()
            .find(|t| t.id().eq_ignore_ascii_case(wanted) || t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| MetavalError::UnknownTemplate(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Generating,
    Drafted,
}

/// State of the generate page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratePage {
    template: Template,
    status: GenerationStatus,
}

impl GeneratePage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn template(&self) -> Template {
        self.template
    }

    #[must_use]
    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    #[must_use]
    pub fn is_drafted(&self) -> bool {
        self.status == GenerationStatus::Drafted
    }

    pub fn select_template(&mut self, template: Template) {
        self.template = template;
    }

    /// Enter `Generating`. Returns false if generation is already running.
    pub fn begin(&mut self) -> bool {
        if self.status == GenerationStatus::Generating {
            return false;
        }
        self.status = GenerationStatus::Generating;
        true
    }

    /// Mark the draft ready. Returns false unless generation was running.
    pub fn finish(&mut self) -> bool {
        if self.status != GenerationStatus::Generating {
            return false;
        }
        self.status = GenerationStatus::Drafted;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_runs_idle_generating_drafted() {
        let mut page = GeneratePage::new();
        assert_eq!(page.status(), GenerationStatus::Idle);
        assert!(page.begin());
        assert!(!page.begin());
        assert!(page.finish());
        assert!(page.is_drafted());
        assert!(!page.finish());
    }

    #[test]
    fn finish_without_begin_is_ignored() {
        let mut page = GeneratePage::new();
        assert!(!page.finish());
        assert_eq!(page.status(), GenerationStatus::Idle);
    }

    #[test]
    fn regenerate_after_draft() {
        let mut page = GeneratePage::new();
        page.begin();
        page.finish();
        assert!(page.begin());
        assert_eq!(page.status(), GenerationStatus::Generating);
    }

    #[test]
    fn template_parses_id_and_label() {
        assert_eq!("service-msa".parse::<Template>().ok(), Some(Template::ServiceMsa));
        assert_eq!(
            "Supply Agreement".parse::<Template>().ok(),
            Some(Template::SupplyAgreement)
        );
        assert!(matches!(
            "lease".parse::<Template>(),
            Err(MetavalError::UnknownTemplate(_))
        ));
    }
}
