//! Renders a [`View`] into a Farcaster frame document.
//!
//! The document is plain HTML whose `fc:frame*` meta tags a Farcaster client
//! interprets as an image plus buttons. The image itself is an SVG carried
//! inline as a percent-encoded data URI, so no separate image route exists.

use std::fmt::Write;

use crate::frames::{TextStyle, View};
use crate::theme::{Background, Theme};

pub const IMAGE_WIDTH: u32 = 1200;
pub const IMAGE_HEIGHT: u32 = 630;

/// Build the full frame HTML document for a view.
pub fn frame_html(view: &View, theme: &Theme, public_url: &str) -> String {
    let svg = render_svg(view, theme);
    let image_uri = format!(
        "data:image/svg+xml;charset=utf-8,{}",
        urlencoding::encode(&svg)
    );

    let mut meta = String::new();
    push_meta(&mut meta, "fc:frame", "vNext");
    push_meta(&mut meta, "fc:frame:image", &image_uri);
    push_meta(&mut meta, "fc:frame:image:aspect_ratio", "1.91:1");
    push_meta(&mut meta, "og:image", &image_uri);
    push_meta(&mut meta, "og:title", &escape_xml(&theme.title));

    for (index, button) in view.buttons.iter().enumerate() {
        let n = index + 1;
        push_meta(
            &mut meta,
            &format!("fc:frame:button:{n}"),
            &escape_xml(&button.label),
        );
        push_meta(&mut meta, &format!("fc:frame:button:{n}:action"), "post");
        push_meta(
            &mut meta,
            &format!("fc:frame:button:{n}:target"),
            &format!("{public_url}{}", button.target.path()),
        );
    }

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"/><title>{}</title>{}</head><body></body></html>",
        escape_xml(&theme.title),
        meta
    )
}

fn push_meta(out: &mut String, property: &str, content: &str) {
    // Infallible for String targets.
    let _ = write!(out, "<meta property=\"{property}\" content=\"{content}\"/>");
}

fn render_svg(view: &View, theme: &Theme) -> String {
    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{IMAGE_WIDTH}\" height=\"{IMAGE_HEIGHT}\" viewBox=\"0 0 {IMAGE_WIDTH} {IMAGE_HEIGHT}\">"
    );

    match &view.background {
        Background::Color(color) => {
            let _ = write!(
                svg,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
                escape_xml(color)
            );
        }
        Background::Image(url) => {
            let _ = write!(
                svg,
                "<image href=\"{}\" width=\"100%\" height=\"100%\" preserveAspectRatio=\"xMidYMid slice\"/>",
                escape_xml(url)
            );
        }
    }

    let line_height: i32 = 80;
    let avatar_height: i32 = if view.avatar.is_some() { 140 } else { 0 };
    let total = view.lines.len() as i32 * line_height + avatar_height;
    let mut y = (IMAGE_HEIGHT as i32 - total) / 2 + line_height / 2;

    if let Some(avatar) = &view.avatar {
        let _ = write!(
            svg,
            "<image href=\"{}\" x=\"{}\" y=\"{y}\" width=\"120\" height=\"120\" clip-path=\"circle(60px)\"/>",
            escape_xml(avatar),
            (IMAGE_WIDTH as i32 - 120) / 2
        );
        y += avatar_height;
    }

    for line in &view.lines {
        let (size, fill, weight) = match line.style {
            TextStyle::Title => (56, theme.text_color.as_str(), "bold"),
            TextStyle::Body => (32, theme.text_color.as_str(), "normal"),
            TextStyle::Highlight => (44, theme.accent_color.as_str(), "bold"),
            TextStyle::Error => (48, theme.error_color.as_str(), "bold"),
        };
        let _ = write!(
            svg,
            "<text x=\"{}\" y=\"{y}\" text-anchor=\"middle\" font-family=\"sans-serif\" font-size=\"{size}\" font-weight=\"{weight}\" fill=\"{}\">{}</text>",
            IMAGE_WIDTH / 2,
            escape_xml(fill),
            escape_xml(&line.text)
        );
        y += line_height;
    }

    svg.push_str("</svg>");
    svg
}

/// Escape text for embedding in SVG/HTML attribute and element content.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::home_view;
    use crate::theme::Theme;

    const BASE: &str = "http://localhost:3000";

    #[test]
    fn emits_frame_meta_tags() {
        let theme = Theme::default();
        let html = frame_html(&home_view(&theme), &theme, BASE);

        assert!(html.contains("<meta property=\"fc:frame\" content=\"vNext\"/>"));
        assert!(html.contains("fc:frame:image\" content=\"data:image/svg+xml"));
        assert!(html.contains("<meta property=\"fc:frame:button:1\" content=\"Check Balance\"/>"));
        assert!(html.contains(
            "<meta property=\"fc:frame:button:1:target\" content=\"http://localhost:3000/check\"/>"
        ));
        assert!(html.contains("fc:frame:button:1:action\" content=\"post\""));
        // One button on the home frame, no second slot.
        assert!(!html.contains("fc:frame:button:2"));
    }

    #[test]
    fn svg_escapes_user_text() {
        let theme = Theme::default();
        let mut view = home_view(&theme);
        view.lines[0].text = "<script>&\"danger\"</script>".to_string();

        let svg = render_svg(&view, &theme);
        assert!(!svg.contains("<script>"));
        assert!(svg.contains("&lt;script&gt;&amp;&quot;danger&quot;&lt;/script&gt;"));
    }

    #[test]
    fn image_background_renders_href() {
        let mut theme = Theme::default();
        theme.background = crate::theme::Background::Image("https://img/bg.png".to_string());

        let svg = render_svg(&home_view(&theme), &theme);
        assert!(svg.contains("<image href=\"https://img/bg.png\""));
        assert!(!svg.contains("<rect"));
    }

    #[test]
    fn avatar_is_rendered_when_present() {
        let theme = Theme::default();
        let mut view = home_view(&theme);
        view.avatar = Some("https://img/a.png".to_string());

        let svg = render_svg(&view, &theme);
        assert!(svg.contains("href=\"https://img/a.png\""));
    }

    #[test]
    fn canvas_matches_frame_dimensions() {
        let theme = Theme::default();
        let svg = render_svg(&home_view(&theme), &theme);
        assert!(svg.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1200\" height=\"630\""
        ));
    }
}
