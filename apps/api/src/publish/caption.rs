//! Telegram caption builder (HTML parse mode).

use crate::models::article::Article;

/// Telegram's hard limit for photo captions, in characters.
pub const MAX_CAPTION_CHARS: usize = 1024;

pub const BRAND_LINE: &str = "👻 Snapchat: K3333BI";
const SOURCES_HEADING: &str = "🔗 المصادر المحققة:";
const NO_SOURCES_TEXT: &str = "تحقق ذكي";

/// Escapes the characters Telegram's HTML mode treats specially.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full caption, at most `MAX_CAPTION_CHARS` characters.
///
/// Source links are dropped whole from the end until the caption fits, so a
/// cut never lands inside an `<a>` tag. Whatever is still too long is cut at
/// the limit.
pub fn build_caption(article: &Article) -> String {
    let mut caption = format!(
        "<b>{}</b>\n\n📅 {}\n\n{}",
        escape_html(&article.title),
        escape_html(&article.date_label),
        escape_html(&article.description),
    );
    if let Some(author) = &article.author {
        caption.push_str(&format!("\n\n✍️ {}", escape_html(author)));
    }
    caption.push_str(&format!("\n\n{BRAND_LINE}\n\n{SOURCES_HEADING}\n"));

    let links: Vec<String> = article
        .sources
        .iter()
        .map(|s| {
            format!(
                "<a href=\"{}\">{}</a>",
                escape_html(&s.uri),
                escape_html(&s.title)
            )
        })
        .collect();

    let budget = MAX_CAPTION_CHARS.saturating_sub(caption.chars().count());
    let mut kept = links.len();
    while kept > 0 && joined_chars(&links[..kept]) > budget {
        kept -= 1;
    }

    if kept == 0 {
        caption.push_str(NO_SOURCES_TEXT);
    } else {
        caption.push_str(&links[..kept].join("\n"));
    }

    truncate_chars(caption, MAX_CAPTION_CHARS)
}

/// Characters of `links` joined by newlines.
fn joined_chars(links: &[String]) -> usize {
    let text: usize = links.iter().map(|l| l.chars().count()).sum();
    text + links.len().saturating_sub(1)
}

fn truncate_chars(text: String, max: usize) -> String {
    let Some((byte_idx, _)) = text.char_indices().nth(max) else {
        return text;
    };
    let mut cut = &text[..byte_idx];
    // Never end on half an entity such as "&am".
    if let Some(amp) = cut.rfind('&') {
        if !cut[amp..].contains(';') {
            cut = &cut[..amp];
        }
    }
    cut.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::SourceLink;
    use crate::models::category::Category;
    use crate::models::image::ImageData;
    use chrono::Utc;
    use uuid::Uuid;

    fn article(description: &str, sources: Vec<SourceLink>) -> Article {
        Article {
            id: Uuid::new_v4(),
            category: Category::Technology,
            title: "روبوت <يطلب> إجازة".to_string(),
            description: description.to_string(),
            author: None,
            date_label: "18 أكتوبر 2026".to_string(),
            sources,
            created_at: Utc::now(),
            raw_image: ImageData::empty(),
            composed_frames: Vec::new(),
        }
    }

    #[test]
    fn test_caption_layout_with_sources() {
        let caption = build_caption(&article(
            "نص",
            vec![
                SourceLink {
                    uri: "https://a.example/?x=1&y=2".to_string(),
                    title: "A".to_string(),
                },
                SourceLink {
                    uri: "https://b.example".to_string(),
                    title: "B".to_string(),
                },
            ],
        ));
        assert!(caption.starts_with("<b>روبوت &lt;يطلب&gt; إجازة</b>\n\n📅 18 أكتوبر 2026\n\nنص\n\n"));
        assert!(caption.contains(BRAND_LINE));
        assert!(caption.ends_with(
            "<a href=\"https://a.example/?x=1&amp;y=2\">A</a>\n<a href=\"https://b.example\">B</a>"
        ));
    }

    #[test]
    fn test_caption_without_sources_uses_fallback() {
        let caption = build_caption(&article("نص", Vec::new()));
        assert!(caption.ends_with(&format!("{SOURCES_HEADING}\n{NO_SOURCES_TEXT}")));
    }

    #[test]
    fn test_author_line_present_for_wisdom() {
        let mut a = article("نص", Vec::new());
        a.author = Some("ابن خلدون".to_string());
        assert!(build_caption(&a).contains("✍️ ابن خلدون"));
    }

    #[test]
    fn test_long_caption_truncated_to_exact_limit() {
        let caption = build_caption(&article(&"ع".repeat(3000), Vec::new()));
        assert_eq!(caption.chars().count(), MAX_CAPTION_CHARS);
    }

    #[test]
    fn test_short_caption_untouched() {
        let caption = build_caption(&article("قصير", Vec::new()));
        assert!(caption.chars().count() < MAX_CAPTION_CHARS);
        assert!(caption.ends_with(NO_SOURCES_TEXT));
    }

    fn source(n: usize) -> SourceLink {
        SourceLink {
            uri: format!("https://news.example/{n}/{}", "p".repeat(60)),
            title: format!("مصدر رقم {n}"),
        }
    }

    fn balanced_links(caption: &str) -> bool {
        caption.matches("<a ").count() == caption.matches("</a>").count()
    }

    #[test]
    fn test_overflowing_sources_dropped_whole() {
        let sources: Vec<SourceLink> = (0..20).map(source).collect();
        let caption = build_caption(&article(&"ع".repeat(300), sources));

        assert!(caption.chars().count() <= MAX_CAPTION_CHARS);
        assert!(caption.ends_with("</a>"), "cut inside a link: {caption:?}");
        assert!(balanced_links(&caption));
        assert!(caption.contains("https://news.example/0/"));
        assert!(!caption.contains("https://news.example/19/"));
    }

    #[test]
    fn test_long_description_with_sources_never_splits_a_link() {
        let sources: Vec<SourceLink> = (0..3).map(source).collect();
        let caption = build_caption(&article(&"ع".repeat(3000), sources));
        assert_eq!(caption.chars().count(), MAX_CAPTION_CHARS);
        assert!(!caption.contains("<a "));
        assert!(balanced_links(&caption));
    }

    #[test]
    fn test_cut_never_leaves_half_an_entity() {
        let caption = build_caption(&article(&"&".repeat(1000), Vec::new()));
        let count = caption.chars().count();
        assert!(count <= MAX_CAPTION_CHARS && count > MAX_CAPTION_CHARS - 5);
        let tail = &caption[caption.rfind('&').unwrap()..];
        assert_eq!(tail, "&amp;");
    }
}
