//! Persisted records that carry an [`EmailStructure`] indirectly, and the
//! codecs for the two encodings they use.
//!
//! - Header/footer records keep the structure as raw JSON in `content`.
//! - Template records keep it inside `html`, after the
//!   [`STRUCTURE_MARKER`] comment, as 2-space indented JSON.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::{MailframeError, MailframeResult};
use crate::structure::{parse_structure, EmailStructure};

pub const STRUCTURE_MARKER: &str = "<!-- Email Structure -->";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderFooterKind {
    Header,
    Footer,
}

impl HeaderFooterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            HeaderFooterKind::Header => "header",
            HeaderFooterKind::Footer => "footer",
        }
    }
}

/// A reusable header or footer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFooter {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HeaderFooterKind,
    /// JSON-encoded [`EmailStructure`]
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl HeaderFooter {
    /// The nested structure, or `None` if `content` does not parse
    pub fn structure(&self) -> Option<EmailStructure> {
        let parsed = parse_structure(&self.content);
        if parsed.is_none() && !self.content.trim().is_empty() {
            tracing::warn!(
                id = %self.id,
                kind = self.kind.as_str(),
                "header/footer content is not a valid email structure"
            );
        }
        parsed
    }
}

/// Read-only view over the header/footer collection.
///
/// The collection is fetched elsewhere and may not have arrived yet; an
/// empty library resolves every id to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFooterLibrary {
    records: Vec<HeaderFooter>,
}

impl HeaderFooterLibrary {
    pub fn new(records: Vec<HeaderFooter>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> MailframeResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn records(&self) -> &[HeaderFooter] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a weak reference. The record must match both id and kind.
    pub fn resolve(&self, id: &str, kind: HeaderFooterKind) -> Option<&HeaderFooter> {
        let found = self
            .records
            .iter()
            .find(|r| r.id == id && r.kind == kind);
        if found.is_none() {
            tracing::warn!(id = %id, kind = kind.as_str(), "referenced header/footer not found");
        }
        found
    }

    /// First active record of `kind` flagged as default
    pub fn default_for(&self, kind: HeaderFooterKind) -> Option<&HeaderFooter> {
        self.records
            .iter()
            .find(|r| r.kind == kind && r.is_default && r.is_active)
    }

    /// Active records of one kind, in collection order
    pub fn active(&self, kind: HeaderFooterKind) -> impl Iterator<Item = &HeaderFooter> {
        self.records
            .iter()
            .filter(move |r| r.kind == kind && r.is_active)
    }
}

/// A saved email template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Marker comment followed by the JSON-encoded structure
    #[serde(default)]
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_id: Option<String>,
}

impl TemplateRecord {
    /// The embedded structure, or `None` when missing or unparseable
    pub fn structure(&self) -> Option<EmailStructure> {
        match extract_template_structure(&self.html) {
            Ok(structure) => Some(structure),
            Err(MailframeError::MissingStructureMarker) => {
                tracing::debug!(id = %self.id, "template html carries no email structure");
                None
            }
            Err(err) => {
                tracing::warn!(id = %self.id, error = %err, "discarding unparseable template structure");
                None
            }
        }
    }
}

/// Pull the structure out of a template's `html` field.
pub fn extract_template_structure(html: &str) -> MailframeResult<EmailStructure> {
    static STRUCTURE_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = STRUCTURE_REGEX
        .get_or_init(|| Regex::new(r"(?s)<!-- Email Structure -->\s*(\{.*\})\s*$").unwrap());

    let json = re
        .captures(html)
        .and_then(|caps| caps.get(1))
        .ok_or(MailframeError::MissingStructureMarker)?;
    Ok(serde_json::from_str(json.as_str())?)
}

/// Encode a structure the way templates store it: the marker, a newline,
/// then 2-space indented JSON.
pub fn encode_template_html(structure: &EmailStructure) -> MailframeResult<String> {
    let json = serde_json::to_string_pretty(structure)?;
    Ok(format!("{}\n{}", STRUCTURE_MARKER, json))
}

pub fn is_template_html(source: &str) -> bool {
    source.contains(STRUCTURE_MARKER)
}
