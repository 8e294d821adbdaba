use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::OnceLock;

use crate::block::{BlockKind, ContentBlock};
use crate::error::{MailframeError, MailframeResult};
use crate::layout::rows_for;
use crate::structure::{EmailLayout, EmailStructure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Renders, but probably not the way the author meant
    Warning,
    /// Part of the structure is ignored or contradicts itself
    Error,
}

/// One finding about a structure, addressed by its JSON path
#[derive(Debug, Clone, PartialEq)]
pub struct StructureIssue {
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl StructureIssue {
    fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }

    fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for StructureIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", level, self.path, self.message)
    }
}

/// Collect diagnostics for a parsed structure. Never fails; the renderer
/// copes with everything reported here, so this is advisory.
pub fn validate_structure(structure: &EmailStructure) -> Vec<StructureIssue> {
    let mut issues = Vec::new();

    let block_ids = validate_block_ids(&structure.content_blocks, &mut issues);
    for (index, block) in structure.content_blocks.iter().enumerate() {
        validate_block_colors(index, block, &mut issues);
    }

    match &structure.layout {
        None => issues.push(StructureIssue::warning(
            "layout",
            "no layout selected; the preview will be empty",
        )),
        Some(layout) => validate_layout(layout, &block_ids, &mut issues),
    }

    issues
}

/// Like [`validate_structure`], but fails on the first error-level issue.
pub fn check_structure(structure: &EmailStructure) -> MailframeResult<()> {
    match validate_structure(structure)
        .into_iter()
        .find(|issue| issue.severity == Severity::Error)
    {
        Some(issue) => Err(MailframeError::ValidationError(format!(
            "{}: {}",
            issue.path, issue.message
        ))),
        None => Ok(()),
    }
}

fn validate_block_ids<'a>(
    blocks: &'a [ContentBlock],
    issues: &mut Vec<StructureIssue>,
) -> HashSet<&'a str> {
    let mut seen = HashSet::new();
    for (index, block) in blocks.iter().enumerate() {
        if let Some(id) = block.id() {
            if !seen.insert(id) {
                issues.push(StructureIssue::error(
                    format!("contentBlocks[{}].id", index),
                    format!("duplicate block id '{}'; slots resolve to the first block with it", id),
                ));
            }
        }
    }
    seen
}

fn validate_layout(layout: &EmailLayout, block_ids: &HashSet<&str>, issues: &mut Vec<StructureIssue>) {
    for (slot_id, _) in layout.slots.iter() {
        if let Some(block_id) = layout.assigned_block_id(slot_id) {
            if !block_ids.contains(block_id) {
                issues.push(StructureIssue::error(
                    format!("layout.slots.{}", slot_id),
                    format!("references missing block '{}'", block_id),
                ));
            }
        }
    }

    for (slot_id, width) in &layout.slot_widths {
        if !(1.0..=100.0).contains(width) {
            issues.push(StructureIssue::error(
                format!("layout.slotWidths.{}", slot_id),
                format!("width {} is outside 1-100", width),
            ));
        }
    }

    let Some(definition) = layout.definition() else {
        issues.push(StructureIssue::warning(
            "layout.type",
            format!(
                "unknown layout type '{}'; blocks will be shown in order",
                layout.layout_type
            ),
        ));
        return;
    };

    let declared: BTreeSet<&str> = definition.slots.iter().map(|slot| slot.id).collect();
    for slot_id in layout.slots.keys() {
        if !declared.contains(slot_id.as_str()) {
            issues.push(StructureIssue::warning(
                format!("layout.slots.{}", slot_id),
                format!("slot is not part of layout '{}'", layout.layout_type),
            ));
        }
    }
    for slot_id in layout.slot_widths.keys() {
        if !declared.contains(slot_id.as_str()) {
            issues.push(StructureIssue::warning(
                format!("layout.slotWidths.{}", slot_id),
                format!("slot is not part of layout '{}'", layout.layout_type),
            ));
        }
    }

    let rows = match rows_for(definition.layout_type, definition.slots) {
        Ok(rows) => rows,
        Err(err) => {
            issues.push(StructureIssue::error("layout.type", err.to_string()));
            return;
        }
    };

    let stacked = definition.layout_type.stacks_vertically();
    for (row_index, row) in rows.iter().enumerate() {
        let widths: Vec<f64> = row
            .iter()
            .filter_map(|slot| layout.slot_widths.get(slot.id).copied())
            .collect();
        if !stacked && widths.len() == row.len() {
            let total: f64 = widths.iter().sum();
            if total > 100.0 {
                issues.push(StructureIssue::error(
                    format!("layout.slotWidths (row {})", row_index),
                    format!("widths add up to {}%, more than the row holds", total),
                ));
            }
        }

        if let Some(&position) = layout.spacer_positions.get(&row_index) {
            if position > row.len() {
                issues.push(StructureIssue::warning(
                    format!("layout.spacerPositions.{}", row_index),
                    format!(
                        "position {} is past the row's {} slots; the spacer goes at the end",
                        position,
                        row.len()
                    ),
                ));
            }
        }
    }

    for &row_index in layout.spacer_positions.keys() {
        if row_index >= rows.len() {
            issues.push(StructureIssue::warning(
                format!("layout.spacerPositions.{}", row_index),
                format!("layout '{}' has only {} rows", layout.layout_type, rows.len()),
            ));
        }
    }
}

/// `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`, `transparent` or a bare CSS color name
fn is_valid_color(value: &str) -> bool {
    static COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = COLOR_REGEX.get_or_init(|| {
        Regex::new(
            r"^(#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|rgba?\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*(,\s*(0|1|0?\.\d+)\s*)?\)|[a-zA-Z]+)$",
        )
        .unwrap()
    });
    re.is_match(value.trim())
}

fn validate_block_colors(index: usize, block: &ContentBlock, issues: &mut Vec<StructureIssue>) {
    let colors: Vec<(&str, &Option<String>)> = match &block.kind {
        BlockKind::Hero(hero) => vec![
            ("heroBgColor", &hero.bg_color),
            ("heroTextColor", &hero.text_color),
        ],
        BlockKind::Divider(divider) => vec![("dividerBlockColor", &divider.color)],
        BlockKind::InfoCard(card) => vec![
            ("infoCardBgColor", &card.bg_color),
            ("infoCardBorderColor", &card.border_color),
        ],
        BlockKind::Text { .. } | BlockKind::Spacer(_) | BlockKind::Social(_) => Vec::new(),
    };

    for (field, value) in colors {
        let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        if !is_valid_color(value) {
            issues.push(StructureIssue::warning(
                format!("contentBlocks[{}].{}", index, field),
                format!("'{}' is not a recognised color", value),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::try_parse_structure;
    use pretty_assertions::assert_eq;

    fn issues(json: &str) -> Vec<StructureIssue> {
        validate_structure(&try_parse_structure(json).unwrap())
    }

    fn paths(issues: &[StructureIssue]) -> Vec<&str> {
        issues.iter().map(|i| i.path.as_str()).collect()
    }

    #[test]
    fn test_clean_structure_has_no_issues() {
        let found = issues(
            r##"{"layout":{"type":"hero-two-column","slots":{"hero":"h","col1":"a","col2":null},
                "slotWidths":{"col1":40,"col2":40},"spacerPositions":{"1":0}},
                "contentBlocks":[{"id":"h","blockType":"hero","heroBgColor":"#123"},{"id":"a"}]}"##,
        );
        assert_eq!(found, Vec::new());
    }

    #[test]
    fn test_missing_layout_is_a_warning() {
        let found = issues("{}");
        assert_eq!(paths(&found), vec!["layout"]);
        assert_eq!(found[0].severity, Severity::Warning);
    }

    #[test]
    fn test_dangling_and_duplicate_ids() {
        let found = issues(
            r#"{"layout":{"type":"two-column","slots":{"left":"gone","right":"a"}},
                "contentBlocks":[{"id":"a"},{"id":"a"}]}"#,
        );
        assert_eq!(paths(&found), vec!["contentBlocks[1].id", "layout.slots.left"]);
        assert!(found.iter().all(|i| i.severity == Severity::Error));
    }

    #[test]
    fn test_unknown_layout_and_foreign_slots() {
        let found = issues(r#"{"layout":{"type":"carousel","slots":{}}}"#);
        assert_eq!(paths(&found), vec!["layout.type"]);

        let found = issues(r#"{"layout":{"type":"two-column","slots":{"main":null}}}"#);
        assert_eq!(paths(&found), vec!["layout.slots.main"]);
        assert_eq!(found[0].severity, Severity::Warning);
    }

    #[test]
    fn test_width_checks() {
        let found = issues(
            r#"{"layout":{"type":"two-column","slots":{},"slotWidths":{"left":70,"right":60}}}"#,
        );
        assert_eq!(paths(&found), vec!["layout.slotWidths (row 0)"]);

        let found = issues(r#"{"layout":{"type":"two-column","slots":{},"slotWidths":{"left":0}}}"#);
        assert_eq!(paths(&found), vec!["layout.slotWidths.left"]);
    }

    #[test]
    fn test_spacer_position_checks() {
        let found = issues(
            r#"{"layout":{"type":"four-grid","slots":{},"spacerPositions":{"1":3,"4":0}}}"#,
        );
        assert_eq!(
            paths(&found),
            vec!["layout.spacerPositions.1", "layout.spacerPositions.4"]
        );
    }

    #[test]
    fn test_color_checks() {
        let found = issues(
            r##"{"layout":{"type":"single-column","slots":{}},"contentBlocks":[
                {"blockType":"dividerBlock","dividerBlockColor":"#12345"},
                {"blockType":"infoCard","infoCardBgColor":"rgba(0, 0, 0, .5)","infoCardBorderColor":"red"}]}"##,
        );
        assert_eq!(paths(&found), vec!["contentBlocks[0].dividerBlockColor"]);
    }

    #[test]
    fn test_check_structure_fails_on_errors_only() {
        let warn_only = try_parse_structure("{}").unwrap();
        assert_eq!(check_structure(&warn_only), Ok(()));

        let broken = try_parse_structure(r#"{"layout":{"type":"single-column","slots":{"main":"x"}}}"#).unwrap();
        assert!(matches!(check_structure(&broken), Err(MailframeError::ValidationError(_))));
    }
}
