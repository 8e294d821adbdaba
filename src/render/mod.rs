//! Preview rendering: assembles subject, header, body and footer into one
//! standalone HTML document.
//!
//! Rendering never fails. Anything that cannot be interpreted degrades to a
//! placeholder or a simpler layout and is reported through `tracing`.

pub mod block;
pub mod html;

use std::fmt::{self, Write};

use crate::layout::{layout_row, rows_for, CellWidth, RowCell, SlotDef};
use crate::options::RenderOptions;
use crate::records::{HeaderFooter, HeaderFooterKind, HeaderFooterLibrary, TemplateRecord};
use crate::structure::{EmailLayout, EmailStructure, SlotContent};

pub use block::render_block;
pub use html::sanitize_description;

use html::{css_value, escape_html, num};

/// Render a full preview document.
///
/// With no structure, or a structure without a layout, the email area shows
/// the "no preview" state instead of any blocks; the subject banner is still
/// shown. Header and footer records whose content does not parse are left
/// out.
pub fn render_email(
    structure: Option<&EmailStructure>,
    subject: Option<&str>,
    header: Option<&HeaderFooter>,
    footer: Option<&HeaderFooter>,
    opts: &RenderOptions,
) -> String {
    let mut out = String::new();
    // fmt::Write on a String never returns Err
    let _ = write_document(structure, subject, header, footer, opts, &mut out);
    out
}

/// Render a saved template: extract its structure, resolve its header and
/// footer against `library`, then render the whole email.
///
/// A template that names no header (or footer) gets the library's default
/// record for that kind when `opts.fallback_to_default_header_footer` is set.
pub fn render_template(
    template: &TemplateRecord,
    library: &HeaderFooterLibrary,
    opts: &RenderOptions,
) -> String {
    let structure = template.structure();
    let header = resolve_reference(
        library,
        template.header_id.as_deref(),
        HeaderFooterKind::Header,
        opts,
    );
    let footer = resolve_reference(
        library,
        template.footer_id.as_deref(),
        HeaderFooterKind::Footer,
        opts,
    );
    render_email(
        structure.as_ref(),
        template.subject.as_deref(),
        header,
        footer,
        opts,
    )
}

fn resolve_reference<'a>(
    library: &'a HeaderFooterLibrary,
    id: Option<&str>,
    kind: HeaderFooterKind,
    opts: &RenderOptions,
) -> Option<&'a HeaderFooter> {
    match id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => library.resolve(id, kind),
        None if opts.fallback_to_default_header_footer => library.default_for(kind),
        None => None,
    }
}

fn write_document(
    structure: Option<&EmailStructure>,
    subject: Option<&str>,
    header: Option<&HeaderFooter>,
    footer: Option<&HeaderFooter>,
    opts: &RenderOptions,
    out: &mut String,
) -> fmt::Result {
    let subject = subject.map(str::trim).filter(|s| !s.is_empty());

    write!(
        out,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body style="margin:0;padding:24px 0;background-color:{};font-family:{};color:#0f172a;">
<div class="mf-email" style="max-width:{}px;margin:0 auto;background-color:#ffffff;">
"#,
        escape_html(subject.unwrap_or("Email preview")),
        css_value(&opts.page_background),
        css_value(&opts.font_family),
        opts.content_width
    )?;

    if let Some(subject) = subject {
        write!(
            out,
            "<div class=\"mf-subject\" style=\"padding:12px 16px;border-bottom:1px solid #e2e8f0;background-color:#f8fafc;font-size:14px;\"><span style=\"color:#64748b;font-weight:600;\">Subject:</span> {}</div>\n",
            escape_html(subject)
        )?;
    }

    match structure.and_then(|s| s.layout.as_ref().map(|layout| (s, layout))) {
        None => {
            tracing::debug!("no layout to preview");
            write!(
                out,
                "<div class=\"mf-no-preview\" data-state=\"empty\" style=\"padding:48px 16px;text-align:center;color:#94a3b8;font-size:15px;\">{}</div>\n",
                escape_html(&opts.no_preview_text)
            )?;
        }
        Some((structure, layout)) => {
            if let Some(header) = header {
                write_nested_section("header", header, opts, out)?;
            }
            out.push_str("<div data-section=\"body\">");
            write_layout(structure, layout, opts, out)?;
            out.push_str("</div>\n");
            if let Some(footer) = footer {
                write_nested_section("footer", footer, opts, out)?;
            }
        }
    }

    out.push_str("</div>\n</body>\n</html>\n");
    Ok(())
}

fn write_nested_section(
    section: &str,
    record: &HeaderFooter,
    opts: &RenderOptions,
    out: &mut String,
) -> fmt::Result {
    let Some(structure) = record.structure() else {
        return Ok(());
    };

    write!(
        out,
        "<div data-section=\"{}\" data-record-id=\"{}\">",
        section,
        escape_html(&record.id)
    )?;
    match &structure.layout {
        Some(layout) => write_layout(&structure, layout, opts, out)?,
        None => write_sequential(&structure, opts, out)?,
    }
    out.push_str("</div>\n");
    Ok(())
}

/// Blocks in document order, ignoring slot assignment
fn write_sequential(structure: &EmailStructure, opts: &RenderOptions, out: &mut String) -> fmt::Result {
    out.push_str("<div class=\"mf-sequential\" data-fallback=\"sequential\" style=\"padding:8px;\">");
    for block in &structure.content_blocks {
        render_block(block, opts, out)?;
    }
    out.push_str("</div>");
    Ok(())
}

fn write_layout(
    structure: &EmailStructure,
    layout: &EmailLayout,
    opts: &RenderOptions,
    out: &mut String,
) -> fmt::Result {
    let Some(definition) = layout.definition() else {
        tracing::warn!(
            layout_type = %layout.layout_type,
            "unknown layout type, rendering blocks sequentially"
        );
        return write_sequential(structure, opts, out);
    };

    let rows = match rows_for(definition.layout_type, definition.slots) {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(error = %err, "layout rows unavailable, rendering blocks sequentially");
            return write_sequential(structure, opts, out);
        }
    };

    let stacked = definition.layout_type.stacks_vertically();
    write!(
        out,
        "<div class=\"mf-layout\" data-layout=\"{}\">",
        definition.layout_type.as_str()
    )?;

    for (row_index, row) in rows.iter().enumerate() {
        if stacked {
            write!(
                out,
                "<div class=\"mf-row\" data-row=\"{}\" style=\"display:flex;flex-direction:column;\">",
                row_index
            )?;
            for slot in row.iter() {
                write_slot(structure, slot, None, opts, out)?;
            }
        } else {
            write!(
                out,
                "<div class=\"mf-row\" data-row=\"{}\" style=\"display:flex;flex-direction:row;\">",
                row_index
            )?;
            let spacer_position = layout.spacer_positions.get(&row_index).copied();
            for cell in layout_row(row, &layout.slot_widths, spacer_position) {
                match cell {
                    RowCell::Slot { slot, width } => {
                        write_slot(structure, slot, Some(width), opts, out)?
                    }
                    RowCell::Spacer { width } => write!(
                        out,
                        "<div class=\"mf-spacer-cell\" aria-hidden=\"true\" style=\"flex:0 0 {0}%;max-width:{0}%;\"></div>",
                        num(width)
                    )?,
                }
            }
        }
        out.push_str("</div>");
    }

    out.push_str("</div>");
    Ok(())
}

fn cell_style(width: Option<CellWidth>) -> String {
    match width {
        None => "width:100%;".to_string(),
        Some(CellWidth::Percent(w)) => format!("flex:0 0 {0}%;max-width:{0}%;", num(w)),
        Some(CellWidth::Fill) => "flex:1 1 0;min-width:0;".to_string(),
    }
}

fn write_slot(
    structure: &EmailStructure,
    slot: &SlotDef,
    width: Option<CellWidth>,
    opts: &RenderOptions,
    out: &mut String,
) -> fmt::Result {
    write!(
        out,
        "<div class=\"mf-slot\" data-slot-id=\"{}\" style=\"{}box-sizing:border-box;padding:8px;\">",
        slot.id,
        cell_style(width)
    )?;

    match structure.slot_content(slot) {
        SlotContent::Block(block) => render_block(block, opts, out)?,
        SlotContent::Empty { label } => write!(
            out,
            "<div class=\"mf-empty-slot\" data-slot-label=\"{0}\" style=\"padding:24px 12px;border:2px dashed #cbd5e1;border-radius:6px;text-align:center;color:#94a3b8;\"><p style=\"margin:0 0 4px 0;font-weight:600;font-size:13px;\">{0}</p><p style=\"margin:0;font-size:13px;\">{1}</p></div>",
            escape_html(label),
            escape_html(&opts.empty_slot_text)
        )?,
    }

    out.push_str("</div>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::try_parse_structure;

    fn opts() -> RenderOptions {
        RenderOptions::default()
    }

    fn record(id: &str, kind: HeaderFooterKind, content: &str) -> HeaderFooter {
        HeaderFooter {
            id: id.to_string(),
            name: id.to_string(),
            kind,
            content: content.to_string(),
            is_default: false,
            is_active: true,
        }
    }

    #[test]
    fn test_no_structure_is_no_preview() {
        let html = render_email(None, Some("Hi"), None, None, &opts());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("data-state=\"empty\""));
        assert!(html.contains("No preview available"));
        assert!(html.contains("mf-subject"));
        assert!(!html.contains("data-section=\"body\""));
    }

    #[test]
    fn test_structure_without_layout_is_no_preview() {
        let s = try_parse_structure(r#"{"contentBlocks":[{"id":"a","title":"Hidden"}]}"#).unwrap();
        let html = render_email(Some(&s), None, None, None, &opts());
        assert!(html.contains("data-state=\"empty\""));
        assert!(!html.contains("Hidden"));
        assert!(!html.contains("mf-subject"));
    }

    #[test]
    fn test_single_column_renders_assigned_block() {
        let s = try_parse_structure(
            r#"{"layout":{"type":"single-column","slots":{"main":"a"}},
                "contentBlocks":[{"id":"a","title":"Welcome <aboard>"}]}"#,
        )
        .unwrap();
        let html = render_email(Some(&s), None, None, None, &opts());
        assert!(html.contains("data-layout=\"single-column\""));
        assert!(html.contains("data-slot-id=\"main\""));
        assert!(html.contains("Welcome &lt;aboard&gt;"));
        assert!(html.contains("flex:1 1 0;min-width:0;"));
    }

    #[test]
    fn test_spacer_cell_position() {
        let s = try_parse_structure(
            r#"{"layout":{"type":"two-column","slots":{},
                "slotWidths":{"left":30,"right":30},"spacerPositions":{"0":1}}}"#,
        )
        .unwrap();
        let html = render_email(Some(&s), None, None, None, &opts());
        let left = html.find("data-slot-id=\"left\"").unwrap();
        let spacer = html.find("mf-spacer-cell").unwrap();
        let right = html.find("data-slot-id=\"right\"").unwrap();
        assert!(left < spacer && spacer < right);
        assert!(html.contains("flex:0 0 40%;max-width:40%;"));
        assert!(html.contains("flex:0 0 30%;max-width:30%;"));
    }

    #[test]
    fn test_string_slot_width_still_renders() {
        let s = crate::structure::parse_structure(
            r#"{"layout":{"type":"two-column","slots":{"left":"a"},"slotWidths":{"left":"40","right":40}},
                "contentBlocks":[{"id":"a","title":"Hello"}]}"#,
        )
        .unwrap();
        let html = render_email(Some(&s), None, None, None, &opts());
        assert!(html.contains("Hello"));
        assert!(!html.contains("data-state=\"empty\""));
        assert!(html.contains("flex:0 0 20%;max-width:20%;"));
    }

    #[test]
    fn test_non_finite_spacer_height_uses_default() {
        let s = try_parse_structure(
            r#"{"layout":{"type":"single-column","slots":{"main":"s"}},
                "contentBlocks":[{"id":"s","blockType":"spacer","spacerHeight":"NaN"}]}"#,
        )
        .unwrap();
        let html = render_email(Some(&s), None, None, None, &opts());
        assert!(!html.contains("NaN"));
        assert!(html.contains("height:20px;"));
    }

    #[test]
    fn test_stacked_layout_ignores_widths() {
        let s = try_parse_structure(
            r#"{"layout":{"type":"two-stacked","slots":{},"slotWidths":{"top":30,"bottom":30}}}"#,
        )
        .unwrap();
        let html = render_email(Some(&s), None, None, None, &opts());
        assert!(html.contains("flex-direction:column;"));
        assert!(!html.contains("mf-spacer-cell"));
        assert!(!html.contains("flex:0 0 30%"));
        assert_eq!(html.matches("mf-empty-slot").count(), 2);
    }

    #[test]
    fn test_header_without_layout_renders_sequentially() {
        let s = try_parse_structure(r#"{"layout":{"type":"single-column","slots":{}}}"#).unwrap();
        let header = record(
            "h",
            HeaderFooterKind::Header,
            r#"{"contentBlocks":[{"id":"logo","title":"Brand"}]}"#,
        );
        let html = render_email(Some(&s), None, Some(&header), None, &opts());
        let head = html.find("data-section=\"header\"").unwrap();
        let body = html.find("data-section=\"body\"").unwrap();
        assert!(head < body);
        assert!(html.contains("Brand"));
        assert!(html.contains("data-fallback=\"sequential\""));
    }

    #[test]
    fn test_render_template_resolves_references() {
        let library = HeaderFooterLibrary::new(vec![
            record(
                "f1",
                HeaderFooterKind::Footer,
                r#"{"layout":{"type":"single-column","slots":{"main":"x"}},
                    "contentBlocks":[{"id":"x","title":"Unsubscribe"}]}"#,
            ),
            HeaderFooter {
                is_default: true,
                ..record(
                    "h-default",
                    HeaderFooterKind::Header,
                    r#"{"contentBlocks":[{"title":"Default header"}]}"#,
                )
            },
        ]);
        let structure = try_parse_structure(r#"{"layout":{"type":"single-column","slots":{}}}"#).unwrap();
        let template = TemplateRecord {
            id: "t".to_string(),
            subject: Some("Your trip".to_string()),
            html: crate::records::encode_template_html(&structure).unwrap(),
            footer_id: Some("f1".to_string()),
            ..TemplateRecord::default()
        };

        let html = render_template(&template, &library, &opts());
        assert!(html.contains("<title>Your trip</title>"));
        assert!(html.contains("data-section=\"footer\" data-record-id=\"f1\""));
        assert!(!html.contains("data-section=\"header\""));

        let with_defaults = RenderOptions {
            fallback_to_default_header_footer: true,
            ..opts()
        };
        let html = render_template(&template, &library, &with_defaults);
        assert!(html.contains("data-record-id=\"h-default\""));
        assert!(html.contains("Default header"));
    }

    #[test]
    fn test_render_template_without_structure() {
        let template = TemplateRecord {
            html: "<p>legacy</p>".to_string(),
            ..TemplateRecord::default()
        };
        let html = render_template(&template, &HeaderFooterLibrary::default(), &opts());
        assert!(html.contains("data-state=\"empty\""));
    }
}
