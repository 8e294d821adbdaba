use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::block::{ContentBlock, LenientNumber};
use crate::error::MailframeResult;
use crate::layout::{LayoutDefinition, SlotDef};

/// The document the builder edits and the renderer previews
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<EmailLayout>,
    #[serde(default)]
    pub content_blocks: Vec<ContentBlock>,
}

/// Chosen layout plus the per-slot assignments made in the builder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailLayout {
    /// Kept as a string so layouts this crate does not know survive a round trip
    #[serde(rename = "type")]
    pub layout_type: String,
    /// slot id -> content block id
    #[serde(default)]
    pub slots: BTreeMap<String, Option<String>>,
    /// slot id -> width in percent (1-100)
    #[serde(
        default,
        skip_serializing_if = "BTreeMap::is_empty",
        deserialize_with = "deserialize_slot_widths"
    )]
    pub slot_widths: BTreeMap<String, f64>,
    /// row index -> index among the row's slots where the spacer goes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub spacer_positions: BTreeMap<usize, usize>,
}

/// Widths may arrive as numbers or numeric strings. An entry that is neither
/// is dropped so its slot falls back to flex-fill.
fn deserialize_slot_widths<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, LenientNumber>> = Option::deserialize(deserializer)?;
    let mut widths = BTreeMap::new();
    for (slot_id, value) in raw.unwrap_or_default() {
        match value.value() {
            Some(width) => {
                widths.insert(slot_id, width);
            }
            None => {
                tracing::warn!(slot_id = %slot_id, value = ?value, "ignoring unreadable slot width")
            }
        }
    }
    Ok(widths)
}

impl EmailLayout {
    pub fn new(layout_type: impl Into<String>) -> Self {
        Self {
            layout_type: layout_type.into(),
            ..Self::default()
        }
    }

    /// Block id assigned to a slot, ignoring empty assignments
    pub fn assigned_block_id(&self, slot_id: &str) -> Option<&str> {
        self.slots
            .get(slot_id)
            .and_then(|id| id.as_deref())
            .filter(|id| !id.is_empty())
    }

    pub fn definition(&self) -> Option<&'static LayoutDefinition> {
        crate::layout::lookup(&self.layout_type)
    }
}

/// What a slot renders: its block, or a placeholder carrying the slot label
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotContent<'a> {
    Block(&'a ContentBlock),
    Empty { label: &'static str },
}

impl EmailStructure {
    pub fn block_by_id(&self, id: &str) -> Option<&ContentBlock> {
        self.content_blocks.iter().find(|b| b.id() == Some(id))
    }

    /// Resolve the slot -> block weak reference. Unassigned slots and ids
    /// with no matching block both resolve to [`SlotContent::Empty`].
    pub fn slot_content(&self, slot: &SlotDef) -> SlotContent<'_> {
        let assigned = self
            .layout
            .as_ref()
            .and_then(|layout| layout.assigned_block_id(slot.id));

        match assigned {
            None => SlotContent::Empty { label: slot.label },
            Some(block_id) => match self.block_by_id(block_id) {
                Some(block) => SlotContent::Block(block),
                None => {
                    tracing::debug!(slot_id = %slot.id, block_id = %block_id, "slot references a missing block");
                    SlotContent::Empty { label: slot.label }
                }
            },
        }
    }
}

/// Parse a structure from a header/footer `content` string.
pub fn try_parse_structure(content: &str) -> MailframeResult<EmailStructure> {
    Ok(serde_json::from_str(content.trim())?)
}

/// Lenient variant of [`try_parse_structure`] used on the render path:
/// failures are logged and reported as "no structure".
pub fn parse_structure(content: &str) -> Option<EmailStructure> {
    if content.trim().is_empty() {
        return None;
    }
    match try_parse_structure(content) {
        Ok(structure) => Some(structure),
        Err(err) => {
            tracing::warn!(error = %err, "discarding unparseable email structure");
            None
        }
    }
}

/// Serialize a structure to the compact JSON stored in a header/footer `content` field.
pub fn encode_structure(structure: &EmailStructure) -> MailframeResult<String> {
    Ok(serde_json::to_string(structure)?)
}
