use std::fmt::{self, Write};

use crate::block::{
    non_empty, BlockContent, BlockKind, ButtonAlign, ButtonStyle, ContentBlock, DividerBlock,
    DividerStyle, HeroBlock, InfoCardBlock, InfoCardStyle, SocialBlock, SpacerBlock,
    SubtitleSize, TextAlignment, TitleSize,
};
use crate::options::RenderOptions;
use crate::render::html::{css_url, css_value, escape_html, num, safe_url, sanitize_description};

/// Render one content block to HTML.
///
/// Output depends only on the block and `opts`. The kind-specific visual
/// comes first, then the generic content fields in a fixed order: image,
/// title, subtitle, description, button, and finally social icons for
/// social blocks.
pub fn render_block(block: &ContentBlock, opts: &RenderOptions, out: &mut String) -> fmt::Result {
    let id_attr = block
        .id()
        .map(|id| format!(" data-block-id=\"{}\"", escape_html(id)))
        .unwrap_or_default();
    write!(
        out,
        "<div class=\"mf-block\" data-block-type=\"{}\"{}>",
        block.kind.wire_name(),
        id_attr
    )?;

    match &block.kind {
        BlockKind::Hero(hero) => render_hero(hero, opts, out)?,
        BlockKind::Divider(divider) => render_divider(divider, out)?,
        BlockKind::Spacer(spacer) => render_spacer(spacer, out)?,
        BlockKind::InfoCard(card) => render_info_card(card, opts, out)?,
        BlockKind::Text { .. } | BlockKind::Social(_) => {}
    }

    let is_quote = matches!(block.kind, BlockKind::Text { is_quote: true });
    if is_quote {
        write!(
            out,
            "<blockquote class=\"mf-quote\" style=\"margin:0;padding:8px 16px;border-left:4px solid {};background-color:#faf5ff;font-style:italic;\">",
            css_value(&opts.accent_color)
        )?;
    }
    render_content(&block.content, opts, out)?;
    if is_quote {
        out.push_str("</blockquote>");
    }

    if let BlockKind::Social(social) = &block.kind {
        render_social(social, opts, out)?;
    }

    out.push_str("</div>");
    Ok(())
}

fn align_css(align: TextAlignment) -> &'static str {
    align.as_str()
}

fn title_font_size(size: TitleSize) -> u32 {
    match size {
        TitleSize::Small => 18,
        TitleSize::Medium => 22,
        TitleSize::Large => 28,
        TitleSize::XLarge => 36,
    }
}

fn subtitle_font_size(size: SubtitleSize) -> u32 {
    match size {
        SubtitleSize::Small => 14,
        SubtitleSize::Medium => 16,
        SubtitleSize::Large => 20,
    }
}

fn render_content(content: &BlockContent, opts: &RenderOptions, out: &mut String) -> fmt::Result {
    if let Some(src) = non_empty(&content.image_url) {
        render_image(content, src, opts, out)?;
    }

    if let Some(title) = non_empty(&content.title) {
        let size = content.title_size.unwrap_or(TitleSize::Large);
        let align = content.title_align.unwrap_or(TextAlignment::Center);
        write!(
            out,
            "<h2 class=\"mf-title\" style=\"margin:0 0 8px 0;font-size:{}px;line-height:1.25;font-weight:700;text-align:{};\">{}</h2>",
            title_font_size(size),
            align_css(align),
            escape_html(title)
        )?;
    }

    if let Some(subtitle) = non_empty(&content.subtitle) {
        let size = content.subtitle_size.unwrap_or(SubtitleSize::Medium);
        let align = content.subtitle_align.unwrap_or(TextAlignment::Center);
        write!(
            out,
            "<p class=\"mf-subtitle\" style=\"margin:0 0 8px 0;font-size:{}px;line-height:1.4;color:#475569;text-align:{};\">{}</p>",
            subtitle_font_size(size),
            align_css(align),
            escape_html(subtitle)
        )?;
    }

    if let Some(description) = non_empty(&content.description) {
        let align = content.description_align.unwrap_or(TextAlignment::Justify);
        write!(
            out,
            "<div class=\"mf-description\" style=\"margin:0 0 12px 0;font-size:15px;line-height:1.6;text-align:{};\">{}</div>",
            align_css(align),
            sanitize_description(description)
        )?;
    }

    if let (Some(text), Some(url)) = (non_empty(&content.button_text), non_empty(&content.button_url)) {
        let style = content.button_style.unwrap_or(ButtonStyle::Primary);
        let align = content.button_align.unwrap_or(ButtonAlign::Full);
        render_button(text, url, style, align, opts, out)?;
    }

    Ok(())
}

fn render_image(content: &BlockContent, src: &str, opts: &RenderOptions, out: &mut String) -> fmt::Result {
    let alt = non_empty(&content.image_alt).unwrap_or("");
    let fallback = if opts.image_fallback {
        format!(
            " data-fallback-alt=\"{}\" onerror=\"this.onerror=null;this.removeAttribute('src');this.alt=this.getAttribute('data-fallback-alt');\"",
            escape_html(&opts.image_fallback_alt)
        )
    } else {
        String::new()
    };
    let img = format!(
        "<img class=\"mf-image\" src=\"{}\" alt=\"{}\" style=\"display:block;width:100%;height:auto;border:0;margin:0 0 12px 0;\"{}>",
        escape_html(&safe_url(src, true)),
        escape_html(alt),
        fallback
    );

    match non_empty(&content.image_link) {
        Some(link) => write!(
            out,
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(&safe_url(link, false)),
            img
        ),
        None => out.write_str(&img),
    }
}

fn button_colors(style: ButtonStyle, accent: &str) -> String {
    match style {
        ButtonStyle::Primary => format!(
            "background-color:{0};color:#ffffff;border:2px solid {0};",
            accent
        ),
        ButtonStyle::Secondary => {
            "background-color:#f1f5f9;color:#0f172a;border:2px solid #f1f5f9;".to_string()
        }
        ButtonStyle::Outline => format!(
            "background-color:transparent;color:{0};border:2px solid {0};",
            accent
        ),
    }
}

fn render_button(
    text: &str,
    url: &str,
    style: ButtonStyle,
    align: ButtonAlign,
    opts: &RenderOptions,
    out: &mut String,
) -> fmt::Result {
    let colors = button_colors(style, &css_value(&opts.accent_color));
    let base = "padding:12px 24px;border-radius:6px;font-weight:600;font-size:15px;text-decoration:none;text-align:center;box-sizing:border-box;";
    let href = escape_html(&safe_url(url, false));

    match align {
        ButtonAlign::Full => write!(
            out,
            "<div class=\"mf-button\" style=\"margin:12px 0;\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" style=\"display:block;width:100%;{}{}\">{}</a></div>",
            href,
            base,
            colors,
            escape_html(text)
        ),
        ButtonAlign::Left | ButtonAlign::Center | ButtonAlign::Right => write!(
            out,
            "<div class=\"mf-button\" style=\"margin:12px 0;text-align:{};\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" style=\"display:inline-block;{}{}\">{}</a></div>",
            align.as_str(),
            href,
            base,
            colors,
            escape_html(text)
        ),
    }
}

fn hero_button_colors(style: ButtonStyle, bg: &str, fg: &str) -> String {
    match style {
        ButtonStyle::Primary => format!(
            "background-color:#ffffff;color:{};border:2px solid #ffffff;",
            bg
        ),
        ButtonStyle::Secondary => format!(
            "background-color:rgba(255,255,255,0.2);color:{};border:2px solid transparent;",
            fg
        ),
        ButtonStyle::Outline => format!(
            "background-color:transparent;color:{0};border:2px solid {0};",
            fg
        ),
    }
}

fn render_hero(hero: &HeroBlock, _opts: &RenderOptions, out: &mut String) -> fmt::Result {
    let bg = css_value(hero.bg_color());
    let fg = css_value(hero.text_color());

    let mut style = format!("background-color:{};", bg);
    if let Some(image) = non_empty(&hero.bg_image) {
        style.push_str(&format!(
            "background-image:url('{}');background-size:cover;background-position:center;",
            css_url(image)
        ));
    }
    style.push_str(&format!(
        "min-height:{}px;color:{};text-align:{};padding:40px 24px;box-sizing:border-box;",
        num(hero.min_height()),
        fg,
        hero.text_align().as_str()
    ));

    write!(out, "<div class=\"mf-hero\" style=\"{}\">", escape_html(&style))?;

    if let Some(title) = non_empty(&hero.title) {
        write!(
            out,
            "<h1 style=\"margin:0 0 12px 0;font-size:32px;line-height:1.2;color:inherit;\">{}</h1>",
            escape_html(title)
        )?;
    }
    if let Some(subtitle) = non_empty(&hero.subtitle) {
        write!(
            out,
            "<p style=\"margin:0 0 20px 0;font-size:18px;line-height:1.4;opacity:0.9;\">{}</p>",
            escape_html(subtitle)
        )?;
    }
    if let Some((text, url)) = hero.button() {
        write!(
            out,
            "<a class=\"mf-hero-button\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" style=\"display:inline-block;padding:12px 28px;border-radius:6px;font-weight:600;text-decoration:none;{}\">{}</a>",
            escape_html(&safe_url(url, false)),
            escape_html(&hero_button_colors(hero.button_style(), &bg, &fg)),
            escape_html(text)
        )?;
    }

    out.push_str("</div>");
    Ok(())
}

fn render_divider(divider: &DividerBlock, out: &mut String) -> fmt::Result {
    let color = css_value(divider.color());
    let height = num(divider.height());
    let width = num(divider.width());

    let line = match divider.style() {
        DividerStyle::Gradient => format!(
            "width:{}%;height:{}px;margin:0 auto;border:none;background:linear-gradient(to right, transparent, {}, transparent);",
            width, height, color
        ),
        other => format!(
            "width:{}%;height:0;margin:0 auto;border:none;border-top:{}px {} {};",
            width,
            height,
            other.as_str(),
            color
        ),
    };

    write!(
        out,
        "<div class=\"mf-divider\" style=\"padding:8px 0;\"><div style=\"{}\"></div></div>",
        escape_html(&line)
    )
}

fn render_spacer(spacer: &SpacerBlock, out: &mut String) -> fmt::Result {
    let height = num(spacer.height());
    write!(
        out,
        "<div class=\"mf-spacer\" style=\"height:{0}px;line-height:{0}px;font-size:1px;\">&nbsp;</div>",
        height
    )
}

/// (background, border declarations) for an info card
fn info_card_frame(card: &InfoCardBlock, accent: &str) -> (String, String) {
    let bg = non_empty(&card.bg_color).map(css_value);
    let border = non_empty(&card.border_color).map(css_value);

    match card.style() {
        InfoCardStyle::Default => (
            bg.unwrap_or_else(|| "#ffffff".to_string()),
            format!("border:1px solid {};", border.unwrap_or_else(|| "#e2e8f0".to_string())),
        ),
        InfoCardStyle::Filled => (
            bg.unwrap_or_else(|| "#f8fafc".to_string()),
            "border:none;".to_string(),
        ),
        InfoCardStyle::Outlined => (
            bg.unwrap_or_else(|| "transparent".to_string()),
            format!("border:2px solid {};", border.unwrap_or_else(|| accent.to_string())),
        ),
        InfoCardStyle::Accent => (
            bg.unwrap_or_else(|| "#faf5ff".to_string()),
            format!(
                "border:none;border-left:4px solid {};",
                border.unwrap_or_else(|| accent.to_string())
            ),
        ),
    }
}

fn render_info_card(card: &InfoCardBlock, opts: &RenderOptions, out: &mut String) -> fmt::Result {
    let (bg, border) = info_card_frame(card, &css_value(&opts.accent_color));
    write!(
        out,
        "<div class=\"mf-info-card\" data-style=\"{}\" style=\"{}\">",
        card.style().as_str(),
        escape_html(&format!(
            "background-color:{};{}border-radius:8px;padding:16px;margin:0 0 12px 0;",
            bg, border
        ))
    )?;

    if let Some(title) = non_empty(&card.title) {
        write!(
            out,
            "<p style=\"margin:0 0 8px 0;font-weight:700;font-size:16px;\">{}</p>",
            escape_html(title)
        )?;
    }

    if card.items.is_empty() {
        write!(
            out,
            "<p class=\"mf-empty\" style=\"margin:0;color:#94a3b8;font-style:italic;font-size:14px;\">{}</p>",
            escape_html(&opts.empty_info_card_text)
        )?;
    } else {
        out.push_str("<table role=\"presentation\" width=\"100%\" style=\"border-collapse:collapse;\">");
        for item in &card.items {
            write!(
                out,
                "<tr><td style=\"padding:4px 0;color:#64748b;font-size:14px;\">{}</td><td style=\"padding:4px 0;text-align:right;font-weight:600;font-size:14px;\">{}</td></tr>",
                escape_html(&item.label),
                escape_html(&item.value)
            )?;
        }
        out.push_str("</table>");
    }

    out.push_str("</div>");
    Ok(())
}

fn render_social(social: &SocialBlock, opts: &RenderOptions, out: &mut String) -> fmt::Result {
    let links = social.links();
    if links.is_empty() {
        return Ok(());
    }

    let size = num(social.icon_size());
    let base = opts.social_icon_base_url.trim_end_matches('/');
    write!(
        out,
        "<div class=\"mf-social\" style=\"text-align:{};padding:8px 0;\">",
        social.align().as_str()
    )?;
    for (platform, url) in links {
        write!(
            out,
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" data-platform=\"{}\" style=\"display:inline-block;margin:0 4px;\"><img src=\"{}/{}\" alt=\"{}\" width=\"{}\" height=\"{}\" style=\"display:block;border:0;\"></a>",
            escape_html(&safe_url(url, false)),
            platform.as_str(),
            escape_html(base),
            platform.as_str(),
            platform.label(),
            size,
            size
        )?;
    }
    out.push_str("</div>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::InfoCardItem;

    fn render(block: &ContentBlock) -> String {
        let mut out = String::new();
        render_block(block, &RenderOptions::default(), &mut out).unwrap();
        out
    }

    fn with_kind(kind: BlockKind) -> ContentBlock {
        ContentBlock {
            id: Some("b".to_string()),
            content: BlockContent::default(),
            kind,
        }
    }

    #[test]
    fn test_gradient_divider_defaults() {
        let html = render(&with_kind(BlockKind::Divider(DividerBlock {
            style: Some(DividerStyle::Gradient),
            ..DividerBlock::default()
        })));
        assert!(html.contains("linear-gradient(to right, transparent, #e2e8f0, transparent)"));
        assert!(html.contains("height:1px"));
        assert!(!html.contains("border-top"));
    }

    #[test]
    fn test_solid_divider_defaults() {
        let html = render(&with_kind(BlockKind::Divider(DividerBlock::default())));
        assert!(html.contains("width:100%;height:0;margin:0 auto;border:none;border-top:1px solid #e2e8f0;"));
    }

    #[test]
    fn test_spacer_default_height() {
        let html = render(&with_kind(BlockKind::Spacer(SpacerBlock::default())));
        assert!(html.contains("height:20px;"));
    }

    #[test]
    fn test_hero_defaults_and_button() {
        let mut hero = HeroBlock {
            title: Some("Summer tours".to_string()),
            button_text: Some("Book".to_string()),
            ..HeroBlock::default()
        };
        let html = render(&with_kind(BlockKind::Hero(hero.clone())));
        assert!(html.contains("background-color:#6b21a8;"));
        assert!(html.contains("min-height:200px;color:#ffffff;text-align:center;"));
        assert!(html.contains("Summer tours"));
        assert!(!html.contains("mf-hero-button"), "button needs a URL too");

        hero.button_url = Some("https://example.com/book".to_string());
        hero.button_style = Some(ButtonStyle::Outline);
        let html = render(&with_kind(BlockKind::Hero(hero)));
        assert!(html.contains("mf-hero-button"));
        assert!(html.contains("background-color:transparent;color:#ffffff;border:2px solid #ffffff;"));
    }

    #[test]
    fn test_hero_background_image() {
        let html = render(&with_kind(BlockKind::Hero(HeroBlock {
            bg_image: Some("https://cdn.example.com/a b.jpg".to_string()),
            ..HeroBlock::default()
        })));
        assert!(html.contains("background-image:url('https://cdn.example.com/a b.jpg');"));
        assert!(html.contains("background-size:cover;background-position:center;"));
    }

    #[test]
    fn test_info_card_empty_placeholder() {
        let html = render(&with_kind(BlockKind::InfoCard(InfoCardBlock::default())));
        assert!(html.contains("No items to display"));
        assert!(html.contains("border:1px solid #e2e8f0;"));
    }

    #[test]
    fn test_info_card_items_and_accent() {
        let html = render(&with_kind(BlockKind::InfoCard(InfoCardBlock {
            style: Some(InfoCardStyle::Accent),
            items: vec![InfoCardItem {
                id: "1".to_string(),
                label: "Pickup".to_string(),
                value: "08:00 <hotel>".to_string(),
            }],
            ..InfoCardBlock::default()
        })));
        assert!(html.contains("border-left:4px solid #6b21a8;"));
        assert!(html.contains("Pickup"));
        assert!(html.contains("08:00 &lt;hotel&gt;"));
        assert!(!html.contains("No items to display"));
    }

    #[test]
    fn test_generic_fields_order_and_defaults() {
        let block = ContentBlock {
            id: None,
            content: BlockContent {
                image_url: Some("https://img.example.com/x.png".to_string()),
                title: Some("Title".to_string()),
                subtitle: Some("Sub".to_string()),
                description: Some("<ul><li>a</li></ul>".to_string()),
                button_text: Some("Go".to_string()),
                button_url: Some("https://example.com".to_string()),
                ..BlockContent::default()
            },
            kind: BlockKind::default(),
        };
        let html = render(&block);
        let img = html.find("mf-image").unwrap();
        let title = html.find("mf-title").unwrap();
        let subtitle = html.find("mf-subtitle").unwrap();
        let description = html.find("mf-description").unwrap();
        let button = html.find("mf-button").unwrap();
        assert!(img < title && title < subtitle && subtitle < description && description < button);

        assert!(html.contains("font-size:28px;line-height:1.25;font-weight:700;text-align:center;"));
        assert!(html.contains("font-size:16px;"));
        assert!(html.contains("text-align:justify;"));
        assert!(html.contains("list-style-type:disc"));
        assert!(html.contains("display:block;width:100%;"));
        assert!(html.contains("onerror=\"this.onerror=null;this.removeAttribute('src');"));
    }

    #[test]
    fn test_image_link_wraps_image() {
        let block = ContentBlock {
            content: BlockContent {
                image_url: Some("https://img.example.com/x.png".to_string()),
                image_link: Some("https://example.com".to_string()),
                ..BlockContent::default()
            },
            ..ContentBlock::default()
        };
        let html = render(&block);
        assert!(html.contains("<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\"><img"));
    }

    #[test]
    fn test_image_fallback_can_be_disabled() {
        let block = ContentBlock {
            content: BlockContent {
                image_url: Some("https://img.example.com/x.png".to_string()),
                ..BlockContent::default()
            },
            ..ContentBlock::default()
        };
        let opts = RenderOptions {
            image_fallback: false,
            ..RenderOptions::default()
        };
        let mut html = String::new();
        render_block(&block, &opts, &mut html).unwrap();
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_inline_button_alignment() {
        let block = ContentBlock {
            content: BlockContent {
                button_text: Some("Go".to_string()),
                button_url: Some("javascript:steal()".to_string()),
                button_align: Some(ButtonAlign::Right),
                button_style: Some(ButtonStyle::Secondary),
                ..BlockContent::default()
            },
            ..ContentBlock::default()
        };
        let html = render(&block);
        assert!(html.contains("text-align:right;"));
        assert!(html.contains("display:inline-block;"));
        assert!(html.contains("href=\"#\""));
        assert!(html.contains("background-color:#f1f5f9;"));
    }

    #[test]
    fn test_quote_wraps_content() {
        let block = ContentBlock {
            content: BlockContent {
                description: Some("<p>Wise words</p>".to_string()),
                ..BlockContent::default()
            },
            kind: BlockKind::Text { is_quote: true },
            ..ContentBlock::default()
        };
        let html = render(&block);
        let open = html.find("<blockquote").unwrap();
        let text = html.find("Wise words").unwrap();
        let close = html.find("</blockquote>").unwrap();
        assert!(open < text && text < close);
        assert!(html.contains("border-left:4px solid #6b21a8;"));
    }

    #[test]
    fn test_social_icons() {
        let block = with_kind(BlockKind::Social(SocialBlock {
            instagram_url: Some("https://instagram.com/tours".to_string()),
            facebook_url: Some("https://facebook.com/tours".to_string()),
            align: Some(TextAlignment::Center),
            ..SocialBlock::default()
        }));
        let html = render(&block);
        assert!(html.contains("text-align:center;"));
        assert!(html.contains("src=\"https://cdn.simpleicons.org/facebook\""));
        assert!(html.contains("width=\"32\" height=\"32\""));
        let fb = html.find("data-platform=\"facebook\"").unwrap();
        let ig = html.find("data-platform=\"instagram\"").unwrap();
        assert!(fb < ig);
        assert_eq!(html.matches("data-platform=").count(), 2);
    }

    #[test]
    fn test_social_fields_ignored_on_other_kinds() {
        let html = render(&with_kind(BlockKind::default()));
        assert!(!html.contains("mf-social"));
    }
}
