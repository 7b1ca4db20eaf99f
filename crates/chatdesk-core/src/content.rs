//! Splitting message content into prose and fenced code blocks.

use std::sync::OnceLock;

use regex::Regex;

/// A piece of message content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain prose.
    Text(String),
    /// Body of a triple-backtick fence.
    Code {
        language: Option<String>,
        code: String,
    },
}

impl Segment {
    pub fn is_code(&self) -> bool {
        matches!(self, Self::Code { .. })
    }
}

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // (?s) lets the non-greedy body span lines up to the closing fence.
    PATTERN.get_or_init(|| Regex::new(r"(?s)```[ \t]*([^\n`]*)\n(.*?)```").expect("valid regex"))
}

/// Split content into alternating text and code segments.
///
/// An opening fence without a closing one is left as text.
pub fn split_segments(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in fence_pattern().captures_iter(content) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut segments, &content[cursor..whole.start()]);

        let info = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let body = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        segments.push(Segment::Code {
            language: (!info.is_empty()).then(|| info.to_string()),
            code: body.strip_suffix('\n').unwrap_or(body).to_string(),
        });

        cursor = whole.end();
    }

    push_text(&mut segments, &content[cursor..]);
    segments
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    let text = text.trim_matches('\n');
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(
            split_segments("just words"),
            vec![Segment::Text("just words".to_string())]
        );
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_text_code_text() {
        let content = "Here you go:\n```rust\nfn main() {}\n```\nThat's it.";
        let segments = split_segments(content);
        assert_eq!(
            segments,
            vec![
                Segment::Text("Here you go:".to_string()),
                Segment::Code {
                    language: Some("rust".to_string()),
                    code: "fn main() {}".to_string(),
                },
                Segment::Text("That's it.".to_string()),
            ]
        );
    }

    #[test]
    fn test_fence_without_language() {
        let segments = split_segments("```\nls -la\n```");
        assert_eq!(
            segments,
            vec![Segment::Code {
                language: None,
                code: "ls -la".to_string(),
            }]
        );
    }

    #[test]
    fn test_multiple_blocks() {
        let content = "```python\nprint('hi')\n```\nand\n```js\nconsole.log(1)\n```";
        let segments = split_segments(content);
        assert_eq!(segments.len(), 3);
        assert!(segments[0].is_code());
        assert!(!segments[1].is_code());
        assert!(segments[2].is_code());
    }

    #[test]
    fn test_unterminated_fence_is_text() {
        let content = "before\n```rust\nfn main() {}";
        let segments = split_segments(content);
        assert_eq!(segments, vec![Segment::Text(content.to_string())]);
    }
}
