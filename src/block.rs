//! Content blocks: the units of content an email layout places into slots.
//!
//! The builder persists every block as one flat camelCase object with a
//! `blockType` discriminator and kind-prefixed optional fields. Here the kind
//! is a proper sum type ([`BlockKind`]) so that a hero can never carry divider
//! settings; the flat shape only exists at the serde boundary ([`RawBlock`]).
//!
//! Optional fields stay `Option` so a structure survives a parse/encode round
//! trip unchanged. Defaults are applied through accessor methods at render
//! time.

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_HERO_BG_COLOR: &str = "#6b21a8";
pub const DEFAULT_HERO_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_HERO_MIN_HEIGHT: f64 = 200.0;
pub const DEFAULT_DIVIDER_COLOR: &str = "#e2e8f0";
pub const DEFAULT_DIVIDER_HEIGHT: f64 = 1.0;
pub const DEFAULT_DIVIDER_WIDTH: f64 = 100.0;
pub const DEFAULT_SPACER_HEIGHT: f64 = 20.0;
pub const DEFAULT_SOCIAL_ICON_SIZE: f64 = 32.0;

/// Declares a closed set of string-valued options. Unknown strings parse to
/// `None` so that one odd value never invalidates a whole saved structure.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }
    };
}

wire_enum!(
    /// Horizontal alignment of a text run
    TextAlignment {
        Left => "left",
        Center => "center",
        Right => "right",
        Justify => "justify",
    }
);

wire_enum!(
    TitleSize {
        Small => "small",
        Medium => "medium",
        Large => "large",
        XLarge => "xlarge",
    }
);

wire_enum!(
    SubtitleSize {
        Small => "small",
        Medium => "medium",
        Large => "large",
    }
);

wire_enum!(
    ButtonStyle {
        Primary => "primary",
        Secondary => "secondary",
        Outline => "outline",
    }
);

wire_enum!(
    /// `Full` stretches the button across the block
    ButtonAlign {
        Full => "full",
        Left => "left",
        Center => "center",
        Right => "right",
    }
);

wire_enum!(
    DividerStyle {
        Solid => "solid",
        Dashed => "dashed",
        Dotted => "dotted",
        Gradient => "gradient",
    }
);

wire_enum!(
    InfoCardStyle {
        Default => "default",
        Filled => "filled",
        Outlined => "outlined",
        Accent => "accent",
    }
);

wire_enum!(
    /// Social platforms, in the order their icons are rendered
    SocialPlatform {
        Facebook => "facebook",
        X => "x",
        Instagram => "instagram",
        Linkedin => "linkedin",
        Youtube => "youtube",
        Tiktok => "tiktok",
    }
);

impl SocialPlatform {
    pub fn label(self) -> &'static str {
        match self {
            SocialPlatform::Facebook => "Facebook",
            SocialPlatform::X => "X",
            SocialPlatform::Instagram => "Instagram",
            SocialPlatform::Linkedin => "LinkedIn",
            SocialPlatform::Youtube => "YouTube",
            SocialPlatform::Tiktok => "TikTok",
        }
    }
}

/// A content block as rendered and edited
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub struct ContentBlock {
    /// Stable id used by the slot mapping
    pub id: Option<String>,
    /// Generic fields any kind may carry
    pub content: BlockContent,
    pub kind: BlockKind,
}

impl ContentBlock {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Fields composited beneath the kind-specific visual of any block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockContent {
    pub image_url: Option<String>,
    pub image_link: Option<String>,
    pub image_alt: Option<String>,
    pub title: Option<String>,
    pub title_align: Option<TextAlignment>,
    pub title_size: Option<TitleSize>,
    pub subtitle: Option<String>,
    pub subtitle_align: Option<TextAlignment>,
    pub subtitle_size: Option<SubtitleSize>,
    /// Rich HTML from the editor
    pub description: Option<String>,
    pub description_align: Option<TextAlignment>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub button_style: Option<ButtonStyle>,
    pub button_align: Option<ButtonAlign>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Text { is_quote: bool },
    Hero(HeroBlock),
    Divider(DividerBlock),
    Spacer(SpacerBlock),
    InfoCard(InfoCardBlock),
    Social(SocialBlock),
}

impl Default for BlockKind {
    fn default() -> Self {
        BlockKind::Text { is_quote: false }
    }
}

impl BlockKind {
    /// The `blockType` discriminator this kind is persisted under
    pub fn wire_name(&self) -> &'static str {
        match self {
            BlockKind::Text { .. } => "text",
            BlockKind::Hero(_) => "hero",
            BlockKind::Divider(_) => "dividerBlock",
            BlockKind::Spacer(_) => "spacer",
            BlockKind::InfoCard(_) => "infoCard",
            BlockKind::Social(_) => "social",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeroBlock {
    pub bg_color: Option<String>,
    pub bg_image: Option<String>,
    pub min_height: Option<f64>,
    pub text_color: Option<String>,
    pub text_align: Option<TextAlignment>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub button_text: Option<String>,
    pub button_url: Option<String>,
    pub button_style: Option<ButtonStyle>,
}

impl HeroBlock {
    pub fn bg_color(&self) -> &str {
        non_empty(&self.bg_color).unwrap_or(DEFAULT_HERO_BG_COLOR)
    }

    pub fn text_color(&self) -> &str {
        non_empty(&self.text_color).unwrap_or(DEFAULT_HERO_TEXT_COLOR)
    }

    pub fn min_height(&self) -> f64 {
        self.min_height.unwrap_or(DEFAULT_HERO_MIN_HEIGHT)
    }

    pub fn text_align(&self) -> TextAlignment {
        self.text_align.unwrap_or(TextAlignment::Center)
    }

    pub fn button_style(&self) -> ButtonStyle {
        self.button_style.unwrap_or(ButtonStyle::Primary)
    }

    /// Text and URL of the button, only when both are present
    pub fn button(&self) -> Option<(&str, &str)> {
        Some((non_empty(&self.button_text)?, non_empty(&self.button_url)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DividerBlock {
    pub style: Option<DividerStyle>,
    pub color: Option<String>,
    /// Thickness in pixels
    pub height: Option<f64>,
    /// Width in percent of the slot
    pub width: Option<f64>,
}

impl DividerBlock {
    pub fn style(&self) -> DividerStyle {
        self.style.unwrap_or(DividerStyle::Solid)
    }

    pub fn color(&self) -> &str {
        non_empty(&self.color).unwrap_or(DEFAULT_DIVIDER_COLOR)
    }

    pub fn height(&self) -> f64 {
        self.height.unwrap_or(DEFAULT_DIVIDER_HEIGHT)
    }

    pub fn width(&self) -> f64 {
        self.width.unwrap_or(DEFAULT_DIVIDER_WIDTH)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacerBlock {
    pub height: Option<f64>,
}

impl SpacerBlock {
    pub fn height(&self) -> f64 {
        self.height.unwrap_or(DEFAULT_SPACER_HEIGHT)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoCardBlock {
    pub style: Option<InfoCardStyle>,
    pub title: Option<String>,
    pub bg_color: Option<String>,
    pub border_color: Option<String>,
    pub items: Vec<InfoCardItem>,
}

impl InfoCardBlock {
    pub fn style(&self) -> InfoCardStyle {
        self.style.unwrap_or(InfoCardStyle::Default)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoCardItem {
    pub id: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialBlock {
    pub facebook_url: Option<String>,
    pub x_url: Option<String>,
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub youtube_url: Option<String>,
    pub tiktok_url: Option<String>,
    pub icon_size: Option<f64>,
    pub align: Option<TextAlignment>,
}

impl SocialBlock {
    pub fn url(&self, platform: SocialPlatform) -> Option<&str> {
        let url = match platform {
            SocialPlatform::Facebook => &self.facebook_url,
            SocialPlatform::X => &self.x_url,
            SocialPlatform::Instagram => &self.instagram_url,
            SocialPlatform::Linkedin => &self.linkedin_url,
            SocialPlatform::Youtube => &self.youtube_url,
            SocialPlatform::Tiktok => &self.tiktok_url,
        };
        non_empty(url)
    }

    /// Configured platforms in render order
    pub fn links(&self) -> Vec<(SocialPlatform, &str)> {
        SocialPlatform::ALL
            .iter()
            .filter_map(|&p| self.url(p).map(|url| (p, url)))
            .collect()
    }

    pub fn icon_size(&self) -> f64 {
        self.icon_size.unwrap_or(DEFAULT_SOCIAL_ICON_SIZE)
    }

    pub fn align(&self) -> TextAlignment {
        self.align.unwrap_or(TextAlignment::Left)
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ─── Wire format ────────────────────────────────────────────────────────────

/// The flat object the builder saves
#[doc(hidden)]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    block_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtitle_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    button_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    button_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    button_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_quote: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    hero_bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_bg_image: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_number"
    )]
    hero_min_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_button_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_button_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hero_button_style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    divider_block_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    divider_block_color: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_number"
    )]
    divider_block_height: Option<f64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_number"
    )]
    divider_block_width: Option<f64>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_number"
    )]
    spacer_height: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    info_card_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info_card_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info_card_bg_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info_card_border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info_card_items: Option<Vec<InfoCardItem>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    social_facebook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    social_x_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    social_instagram_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    social_linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    social_youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    social_tiktok_url: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_lenient_number"
    )]
    social_icon_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    social_align: Option<String>,
}

/// A number the builder may have saved as a JSON number or as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LenientNumber {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl LenientNumber {
    /// `20`, `20.5` or `"20"`; unparseable and non-finite values are `None`.
    pub(crate) fn value(&self) -> Option<f64> {
        let value = match self {
            LenientNumber::Number(n) => Some(*n),
            LenientNumber::Text(s) => s.trim().parse::<f64>().ok(),
            LenientNumber::Other(_) => None,
        };
        value.filter(|n| n.is_finite())
    }
}

fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<LenientNumber> = Option::deserialize(deserializer)?;
    Ok(opt.as_ref().and_then(LenientNumber::value))
}

fn parse_option<T>(field: &'static str, value: Option<String>, parse: fn(&str) -> Option<T>) -> Option<T> {
    let value = value?;
    let parsed = parse(value.trim());
    if parsed.is_none() && !value.trim().is_empty() {
        tracing::debug!(field, value = %value, "ignoring unrecognised block option");
    }
    parsed
}

impl From<RawBlock> for ContentBlock {
    fn from(raw: RawBlock) -> Self {
        let content = BlockContent {
            image_url: raw.image_url,
            image_link: raw.image_link,
            image_alt: raw.image_alt,
            title: raw.title,
            title_align: parse_option("titleAlign", raw.title_align, TextAlignment::parse),
            title_size: parse_option("titleSize", raw.title_size, TitleSize::parse),
            subtitle: raw.subtitle,
            subtitle_align: parse_option("subtitleAlign", raw.subtitle_align, TextAlignment::parse),
            subtitle_size: parse_option("subtitleSize", raw.subtitle_size, SubtitleSize::parse),
            description: raw.description,
            description_align: parse_option(
                "descriptionAlign",
                raw.description_align,
                TextAlignment::parse,
            ),
            button_text: raw.button_text,
            button_url: raw.button_url,
            button_style: parse_option("buttonStyle", raw.button_style, ButtonStyle::parse),
            button_align: parse_option("buttonAlign", raw.button_align, ButtonAlign::parse),
        };

        let kind = match raw.block_type.as_deref().unwrap_or("text") {
            "hero" => BlockKind::Hero(HeroBlock {
                bg_color: raw.hero_bg_color,
                bg_image: raw.hero_bg_image,
                min_height: raw.hero_min_height,
                text_color: raw.hero_text_color,
                text_align: parse_option("heroTextAlign", raw.hero_text_align, TextAlignment::parse),
                title: raw.hero_title,
                subtitle: raw.hero_subtitle,
                button_text: raw.hero_button_text,
                button_url: raw.hero_button_url,
                button_style: parse_option(
                    "heroButtonStyle",
                    raw.hero_button_style,
                    ButtonStyle::parse,
                ),
            }),
            "dividerBlock" => BlockKind::Divider(DividerBlock {
                style: parse_option("dividerBlockStyle", raw.divider_block_style, DividerStyle::parse),
                color: raw.divider_block_color,
                height: raw.divider_block_height,
                width: raw.divider_block_width,
            }),
            "spacer" => BlockKind::Spacer(SpacerBlock {
                height: raw.spacer_height,
            }),
            "infoCard" => BlockKind::InfoCard(InfoCardBlock {
                style: parse_option("infoCardStyle", raw.info_card_style, InfoCardStyle::parse),
                title: raw.info_card_title,
                bg_color: raw.info_card_bg_color,
                border_color: raw.info_card_border_color,
                items: raw.info_card_items.unwrap_or_default(),
            }),
            "social" => BlockKind::Social(SocialBlock {
                facebook_url: raw.social_facebook_url,
                x_url: raw.social_x_url,
                instagram_url: raw.social_instagram_url,
                linkedin_url: raw.social_linkedin_url,
                youtube_url: raw.social_youtube_url,
                tiktok_url: raw.social_tiktok_url,
                icon_size: raw.social_icon_size,
                align: parse_option("socialAlign", raw.social_align, TextAlignment::parse),
            }),
            other => {
                if other != "text" {
                    tracing::debug!(block_type = %other, "unknown blockType, treating as text");
                }
                BlockKind::Text {
                    is_quote: raw.is_quote.unwrap_or(false),
                }
            }
        };

        ContentBlock {
            id: raw.id,
            content,
            kind,
        }
    }
}

impl From<ContentBlock> for RawBlock {
    fn from(block: ContentBlock) -> Self {
        let c = block.content;
        let mut raw = RawBlock {
            id: block.id,
            block_type: Some(block.kind.wire_name().to_string()),
            image_url: c.image_url,
            image_link: c.image_link,
            image_alt: c.image_alt,
            title: c.title,
            title_align: c.title_align.map(|v| v.as_str().to_string()),
            title_size: c.title_size.map(|v| v.as_str().to_string()),
            subtitle: c.subtitle,
            subtitle_align: c.subtitle_align.map(|v| v.as_str().to_string()),
            subtitle_size: c.subtitle_size.map(|v| v.as_str().to_string()),
            description: c.description,
            description_align: c.description_align.map(|v| v.as_str().to_string()),
            button_text: c.button_text,
            button_url: c.button_url,
            button_style: c.button_style.map(|v| v.as_str().to_string()),
            button_align: c.button_align.map(|v| v.as_str().to_string()),
            ..RawBlock::default()
        };

        match block.kind {
            BlockKind::Text { is_quote } => {
                raw.is_quote = is_quote.then_some(true);
            }
            BlockKind::Hero(h) => {
                raw.hero_bg_color = h.bg_color;
                raw.hero_bg_image = h.bg_image;
                raw.hero_min_height = h.min_height;
                raw.hero_text_color = h.text_color;
                raw.hero_text_align = h.text_align.map(|v| v.as_str().to_string());
                raw.hero_title = h.title;
                raw.hero_subtitle = h.subtitle;
                raw.hero_button_text = h.button_text;
                raw.hero_button_url = h.button_url;
                raw.hero_button_style = h.button_style.map(|v| v.as_str().to_string());
            }
            BlockKind::Divider(d) => {
                raw.divider_block_style = d.style.map(|v| v.as_str().to_string());
                raw.divider_block_color = d.color;
                raw.divider_block_height = d.height;
                raw.divider_block_width = d.width;
            }
            BlockKind::Spacer(s) => {
                raw.spacer_height = s.height;
            }
            BlockKind::InfoCard(card) => {
                raw.info_card_style = card.style.map(|v| v.as_str().to_string());
                raw.info_card_title = card.title;
                raw.info_card_bg_color = card.bg_color;
                raw.info_card_border_color = card.border_color;
                raw.info_card_items = Some(card.items);
            }
            BlockKind::Social(s) => {
                raw.social_facebook_url = s.facebook_url;
                raw.social_x_url = s.x_url;
                raw.social_instagram_url = s.instagram_url;
                raw.social_linkedin_url = s.linkedin_url;
                raw.social_youtube_url = s.youtube_url;
                raw.social_tiktok_url = s.tiktok_url;
                raw.social_icon_size = s.icon_size;
                raw.social_align = s.align.map(|v| v.as_str().to_string());
            }
        }

        raw
    }
}
