//! HTML helpers shared by the renderers: escaping, URL scrubbing and the
//! sanitizer applied to rich-text descriptions before they are inlined.

use std::borrow::Cow;

pub(crate) fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Strip characters that could close a declaration or the style attribute.
pub(crate) fn css_value(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ';' | '"' | '<' | '>' | '{' | '}' | '\\'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Format a length without float noise: `20`, `33.33`.
pub(crate) fn num(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

const BLOCKED_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

/// Neutralise script-capable URLs. `data:image/` is let through for image sources.
pub(crate) fn safe_url(url: &str, allow_data_image: bool) -> String {
    let trimmed = url.trim();
    let lowered: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_lowercase();
    if allow_data_image && lowered.starts_with("data:image/") {
        return trimmed.to_string();
    }
    if BLOCKED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return "#".to_string();
    }
    trimmed.to_string()
}

/// URL for use inside `url('...')` in an inline style
pub(crate) fn css_url(url: &str) -> String {
    safe_url(url, true)
        .replace('\'', "%27")
        .replace('(', "%28")
        .replace(')', "%29")
        .replace('"', "%22")
        .replace(['\n', '\r'], "")
}

/// Tags allowed through from the rich-text editor
const DESCRIPTION_ALLOWED_TAGS: &[&str] = &[
    "p", "br", "span", "div", "strong", "b", "em", "i", "u", "s", "strike", "sub", "sup", "a",
    "ul", "ol", "li", "h1", "h2", "h3", "h4", "blockquote", "hr", "code", "pre", "table", "thead",
    "tbody", "tr", "th", "td",
];

const DESCRIPTION_ALLOWED_ATTRS: &[&str] = &[
    "href", "style", "target", "rel", "title", "align", "colspan", "rowspan",
];

pub const UL_STYLE: &str = "list-style-type:disc;padding-left:24px;margin:0 0 12px 0;";
pub const OL_STYLE: &str = "list-style-type:decimal;padding-left:24px;margin:0 0 12px 0;";
pub const LI_STYLE: &str = "list-style-type:inherit;padding:0;margin:0 0 4px 0;";

fn list_style(tag: &str) -> Option<&'static str> {
    match tag {
        "ul" => Some(UL_STYLE),
        "ol" => Some(OL_STYLE),
        "li" => Some(LI_STYLE),
        _ => None,
    }
}

/// A start or end tag read out of a fragment
struct Tag<'a> {
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: Vec<(String, Option<&'a str>)>,
    /// Byte offset just past the closing `>`
    end: usize,
}

/// Read the tag starting at `start` (which holds `<`). `None` if the input
/// does not form a complete tag there.
fn read_tag(html: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = html.as_bytes();
    let mut i = start + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name = html[name_start..i].to_ascii_lowercase();

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                return Some(Tag {
                    name,
                    closing,
                    self_closing,
                    attrs,
                    end: i + 1,
                })
            }
            b'/' => {
                self_closing = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let attr_name = html[attr_start..i].to_ascii_lowercase();
        if attr_name.is_empty() {
            // stray quote or similar; skip it
            i += 1;
            continue;
        }

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            attrs.push((attr_name, None));
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match *bytes.get(i)? {
            quote @ (b'"' | b'\'') => {
                let value_start = i + 1;
                let len = bytes[value_start..].iter().position(|&b| b == quote)?;
                i = value_start + len + 1;
                &html[value_start..value_start + len]
            }
            _ => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &html[value_start..i]
            }
        };
        attrs.push((attr_name, Some(value)));
    }
}

/// Decode the character references an attribute value may carry. Numeric
/// references are decoded with or without the trailing `;`, as browsers do.
/// Unknown references are left as written.
fn decode_entities(value: &str) -> Cow<'_, str> {
    if !value.contains('&') {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_reference(after) {
            Some((c, consumed)) => {
                out.push(c);
                rest = &after[consumed..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Decode the reference at the start of `s` (just past `&`). Returns the
/// character and the number of bytes consumed.
fn decode_reference(s: &str) -> Option<(char, usize)> {
    if let Some(numeric) = s.strip_prefix('#') {
        let (radix, digits_start) = match numeric.as_bytes().first()? {
            b'x' | b'X' => (16, 2),
            _ => (10, 1),
        };
        let digits = &s[digits_start..];
        let len = digits
            .bytes()
            .take_while(|b| (*b as char).is_digit(radix))
            .count();
        if len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..len], radix).ok()?;
        let c = char::from_u32(code).unwrap_or('\u{fffd}');
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some((c, digits_start + len + semicolon));
    }

    let end = s.find(';')?;
    let c = match &s[..end] {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some((c, end + 1))
}

fn write_tag(tag: &Tag<'_>, out: &mut String) {
    if tag.closing {
        out.push_str("</");
        out.push_str(&tag.name);
        out.push('>');
        return;
    }

    out.push('<');
    out.push_str(&tag.name);

    let forced_style = list_style(&tag.name);
    let mut style_written = false;

    for (name, value) in &tag.attrs {
        if !DESCRIPTION_ALLOWED_ATTRS.contains(&name.as_str()) {
            continue;
        }
        match (name.as_str(), value) {
            ("style", Some(v)) => {
                let decoded = decode_entities(v);
                let existing = decoded.trim();
                let merged = match forced_style {
                    Some(forced) if existing.is_empty() => forced.to_string(),
                    Some(forced) => format!("{}{}", forced, existing),
                    None => existing.to_string(),
                };
                out.push_str(&format!(" style=\"{}\"", escape_html(&merged)));
                style_written = true;
            }
            ("style", None) => {}
            ("href", Some(v)) => {
                let href = safe_url(&decode_entities(v), false);
                out.push_str(&format!(" href=\"{}\"", escape_html(&href)));
            }
            (_, Some(v)) => {
                out.push_str(&format!(" {}=\"{}\"", name, escape_html(&decode_entities(v))));
            }
            (_, None) => {
                out.push(' ');
                out.push_str(name);
            }
        }
    }

    if let (Some(forced), false) = (forced_style, style_written) {
        out.push_str(&format!(" style=\"{}\"", forced));
    }
    if tag.self_closing {
        out.push_str(" /");
    }
    out.push('>');
}

/// Prepare editor HTML for inlining into an email.
///
/// Parses the fragment tag by tag. Allowed tags are re-emitted with a
/// reduced attribute set; `<ul>`, `<ol>` and `<li>` always carry explicit
/// list styles since email clients drop stylesheets. Anything else is
/// escaped and shows up as text. Comments are removed. Never fails: a
/// fragment with no lists passes through with only the attribute filtering.
pub fn sanitize_description(html: &str) -> String {
    let bytes = html.as_bytes();
    let mut out = String::with_capacity(html.len() + 64);
    let mut i = 0;
    let mut text_start = 0;

    while i < bytes.len() {
        if bytes[i] != b'<' {
            i += 1;
            continue;
        }
        out.push_str(&html[text_start..i]);

        if html[i..].starts_with("<!--") {
            i = match html[i + 4..].find("-->") {
                Some(p) => i + 4 + p + 3,
                None => bytes.len(),
            };
            text_start = i;
            continue;
        }

        match read_tag(html, i) {
            Some(tag) if DESCRIPTION_ALLOWED_TAGS.contains(&tag.name.as_str()) => {
                write_tag(&tag, &mut out);
                i = tag.end;
            }
            _ => {
                out.push_str("&lt;");
                i += 1;
            }
        }
        text_start = i;
    }
    out.push_str(&html[text_start..]);
    out
}
