use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{MailframeError, MailframeResult};

/// Presentation settings shared by every render pass.
///
/// Loaded from YAML (or JSON, which YAML accepts) with every key optional:
/// ```yaml
/// contentWidth: 640
/// emptySlotText: "Drop a block here"
/// imageFallback: false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Width of the email column in pixels
    pub content_width: u32,
    pub font_family: String,
    pub page_background: String,
    /// Accent used by primary buttons, quotes and accent info cards
    pub accent_color: String,
    /// Placeholder shown inside a slot with no resolvable block
    pub empty_slot_text: String,
    /// Shown instead of the email when there is no layout to render
    pub no_preview_text: String,
    pub empty_info_card_text: String,
    /// Emit an `onerror` handler on images that clears `src` and sets alt text
    pub image_fallback: bool,
    pub image_fallback_alt: String,
    /// Icons are fetched from `{base}/{platform}`
    pub social_icon_base_url: String,
    /// Use the library's default header/footer when a template names none
    pub fallback_to_default_header_footer: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            content_width: 600,
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            page_background: "#f1f5f9".to_string(),
            accent_color: "#6b21a8".to_string(),
            empty_slot_text: "No content assigned".to_string(),
            no_preview_text: "No preview available".to_string(),
            empty_info_card_text: "No items to display".to_string(),
            image_fallback: true,
            image_fallback_alt: "Image unavailable".to_string(),
            social_icon_base_url: "https://cdn.simpleicons.org".to_string(),
            fallback_to_default_header_footer: false,
        }
    }
}

impl RenderOptions {
    pub fn from_yaml_str(source: &str) -> MailframeResult<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> MailframeResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| MailframeError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_take_defaults() {
        let opts = RenderOptions::from_yaml_str("contentWidth: 640\nimageFallback: false").unwrap();
        assert_eq!(opts.content_width, 640);
        assert!(!opts.image_fallback);
        assert_eq!(opts.empty_slot_text, "No content assigned");
        assert!(!opts.fallback_to_default_header_footer);
    }

    #[test]
    fn test_json_is_accepted() {
        let opts = RenderOptions::from_yaml_str(r#"{"emptySlotText": "Empty"}"#).unwrap();
        assert_eq!(opts.empty_slot_text, "Empty");
        assert_eq!(opts.content_width, 600);
    }

    #[test]
    fn test_empty_source_is_default() {
        assert_eq!(RenderOptions::from_yaml_str("  \n").unwrap(), RenderOptions::default());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let err = RenderOptions::from_yaml_str("contentWidth: [").unwrap_err();
        assert!(matches!(err, MailframeError::Yaml(_)));
    }
}
