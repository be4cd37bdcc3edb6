//! Inline markdown to styled lines
//!
//! Handles `**bold**`, `*italic*`, `` `code` `` and fenced code blocks. An
//! unterminated marker is kept as literal text.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
}

impl SpanKind {
    fn style(self, base: Style) -> Style {
        match self {
            SpanKind::Plain => base,
            SpanKind::Bold => base.add_modifier(Modifier::BOLD),
            SpanKind::Italic => base.add_modifier(Modifier::ITALIC),
            SpanKind::Code => Style::default().fg(Color::Yellow).bg(Color::Black),
        }
    }
}

/// Split one line into styled segments.
pub fn inline_spans(text: &str) -> Vec<(SpanKind, String)> {
    let mut out = Vec::new();
    let mut rest = text;
    let mut plain = String::new();

    while !rest.is_empty() {
        let marker = if rest.starts_with("**") {
            Some(("**", SpanKind::Bold))
        } else if rest.starts_with('*') {
            Some(("*", SpanKind::Italic))
        } else if rest.starts_with('`') {
            Some(("`", SpanKind::Code))
        } else {
            None
        };

        if let Some((marker, kind)) = marker {
            let body = &rest[marker.len()..];
            if let Some(end) = body.find(marker).filter(|end| *end > 0) {
                if !plain.is_empty() {
                    out.push((SpanKind::Plain, std::mem::take(&mut plain)));
                }
                out.push((kind, body[..end].to_string()));
                rest = &body[end + marker.len()..];
                continue;
            }
        }

        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            plain.push(ch);
        }
        rest = chars.as_str();
    }

    if !plain.is_empty() {
        out.push((SpanKind::Plain, plain));
    }
    out
}

/// Render a message body, fenced blocks included.
pub fn render(text: &str, base: Style) -> Vec<Line<'static>> {
    let code_style = Style::default().fg(Color::Yellow);
    let mut lines = Vec::new();
    let mut in_fence = false;

    for raw in text.lines() {
        if let Some(lang) = raw.trim_start().strip_prefix("```") {
            in_fence = !in_fence;
            if in_fence && !lang.trim().is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("┌ {}", lang.trim()),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            continue;
        }
        if in_fence {
            lines.push(Line::from(vec![
                Span::styled("│ ", Style::default().fg(Color::DarkGray)),
                Span::styled(raw.to_string(), code_style),
            ]));
            continue;
        }
        let spans: Vec<Span<'static>> = inline_spans(raw)
            .into_iter()
            .map(|(kind, text)| Span::styled(text, kind.style(base)))
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

/// Body of the last fenced block in `text`. An unterminated fence counts
/// up to the end of the text.
pub fn last_code_block(text: &str) -> Option<String> {
    let mut last = None;
    let mut current: Option<Vec<&str>> = None;

    for raw in text.lines() {
        if raw.trim_start().starts_with("```") {
            match current.take() {
                Some(body) => last = Some(body.join("\n")),
                None => current = Some(Vec::new()),
            }
            continue;
        }
        if let Some(body) = current.as_mut() {
            body.push(raw);
        }
    }
    if let Some(body) = current {
        last = Some(body.join("\n"));
    }
    last
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_markers() {
        let spans = inline_spans("**Bold** and *italic* and `code`");
        assert_eq!(
            spans,
            vec![
                (SpanKind::Bold, "Bold".to_string()),
                (SpanKind::Plain, " and ".to_string()),
                (SpanKind::Italic, "italic".to_string()),
                (SpanKind::Plain, " and ".to_string()),
                (SpanKind::Code, "code".to_string()),
            ]
        );
    }

    #[test]
    fn test_unterminated_marker_is_literal() {
        assert_eq!(
            inline_spans("2 * 3 = 6"),
            vec![(SpanKind::Plain, "2 * 3 = 6".to_string())]
        );
    }

    #[test]
    fn test_fenced_block() {
        let lines = render("```typescript\nconst x = 42;\n```", Style::default());
        assert_eq!(lines.len(), 2);
        let body: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(body, "│ const x = 42;");
    }

    #[test]
    fn test_last_code_block() {
        let text = "intro\n```py\nprint(1)\n```\nthen\n```rust\nfn main() {}\nlet x = 1;\n```\nbye";
        assert_eq!(
            last_code_block(text).as_deref(),
            Some("fn main() {}\nlet x = 1;")
        );
        assert_eq!(last_code_block("no fences here"), None);
        assert_eq!(last_code_block("```\nopen").as_deref(), Some("open"));
    }
}
