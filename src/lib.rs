//! # Mailframe
//!
//! Layout, slot and block model for builder-authored emails, plus a
//! preview renderer that turns a saved structure into one HTML document.
//!
//! ## Features
//! - Fixed catalog of layouts with row grouping and spacer arithmetic
//! - Content blocks as a sum type over the builder's flat JSON
//! - Header/footer and template record codecs with weak-reference lookup
//! - Best-effort rendering: bad input degrades, it never errors
//! - Advisory structure validation
//!
//! ## Example
//! ```ignore
//! use mailframe::{parse_structure, render_email, RenderOptions};
//!
//! let json = r#"{
//!   "layout": { "type": "two-column", "slots": { "left": "a" } },
//!   "contentBlocks": [ { "id": "a", "title": "Hello" } ]
//! }"#;
//!
//! let structure = parse_structure(json);
//! let html = render_email(structure.as_ref(), Some("Welcome"), None, None, &RenderOptions::default());
//! ```

pub mod block;
pub mod error;
pub mod layout;
pub mod options;
pub mod records;
pub mod render;
pub mod structure;
pub mod validator;

// --- Core types ---
pub use block::{BlockContent, BlockKind, ContentBlock};
pub use error::{MailframeError, MailframeResult};
pub use layout::{check_registry, lookup, LayoutDefinition, LayoutType, SlotDef};
pub use options::RenderOptions;
pub use structure::{EmailLayout, EmailStructure, SlotContent};

// --- Records and codecs ---
pub use records::{
    encode_template_html, extract_template_structure, is_template_html, HeaderFooter,
    HeaderFooterKind, HeaderFooterLibrary, TemplateRecord, STRUCTURE_MARKER,
};
pub use structure::{encode_structure, parse_structure, try_parse_structure};

// --- Rendering and validation ---
pub use render::{render_block, render_email, render_template, sanitize_description};
pub use validator::{check_structure, validate_structure, Severity, StructureIssue};
