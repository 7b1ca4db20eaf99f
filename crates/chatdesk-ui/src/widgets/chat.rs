//! Chat widget for displaying conversation messages.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use chatdesk_core::{split_segments, ChatMessage, ChatRole, Segment};

use crate::theme::Theme;
use crate::utils::{wrap_text, wrap_text_indented};

const INDENT: &str = "  ";
const CODE_GUTTER: &str = "  │ ";

/// Message list of the active conversation.
#[derive(Debug, Clone)]
pub struct ChatWidget<'a> {
    /// Messages to display.
    messages: &'a [ChatMessage],
    /// Show the typing indicator after the last message.
    typing: bool,
    /// Scroll offset (usize::MAX = auto-scroll to bottom).
    scroll: usize,
    /// Whether the widget is focused.
    focused: bool,
    /// Title override.
    title: Option<String>,
    /// Theme for styling.
    theme: Theme,
}

impl<'a> ChatWidget<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            typing: false,
            scroll: usize::MAX,
            focused: false,
            title: None,
            theme: Theme::default(),
        }
    }

    pub fn typing(mut self, typing: bool) -> Self {
        self.typing = typing;
        self
    }

    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// All lines of the transcript for a given text width.
    pub fn lines(&self, text_width: usize) -> Vec<Line<'static>> {
        let mut all_lines = Vec::new();

        for msg in self.messages {
            all_lines.extend(message_lines(msg, text_width, &self.theme));
            all_lines.push(Line::from(""));
        }

        if self.typing {
            all_lines.push(Line::from(vec![
                Span::styled("AI: ", self.theme.role_style(ChatRole::Assistant)),
                Span::styled("typing...", self.theme.muted_style()),
            ]));
        }

        all_lines
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let visible_height = area.height.saturating_sub(2) as usize;
        let text_width = area.width.saturating_sub(2) as usize;

        let all_lines = self.lines(text_width);
        let total_lines = all_lines.len();

        let max_scroll = total_lines.saturating_sub(visible_height);
        let scroll_offset = if self.scroll == usize::MAX {
            max_scroll
        } else {
            self.scroll.min(max_scroll)
        };

        let lines: Vec<Line> = all_lines
            .into_iter()
            .skip(scroll_offset)
            .take(visible_height)
            .collect();

        let title = match self.title {
            Some(title) => title,
            None if total_lines == 0 => " Chat ".to_string(),
            None => {
                let last_line = (scroll_offset + visible_height).min(total_lines);
                format!(" Chat [{}-{}/{}] ", scroll_offset + 1, last_line, total_lines)
            }
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );

        frame.render_widget(paragraph, area);
    }
}

fn role_prefix(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "You: ",
        ChatRole::Assistant => "AI: ",
        ChatRole::System => "System: ",
        ChatRole::Error => "Error: ",
    }
}

/// Lines for one message: an author line, then prose and code segments.
pub fn message_lines(msg: &ChatMessage, text_width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut header = vec![
        Span::styled(role_prefix(msg.role), theme.role_style(msg.role)),
        Span::styled(
            msg.timestamp.format("%H:%M:%S").to_string(),
            theme.muted_style(),
        ),
    ];
    if let Some(intent) = msg.intent.filter(|_| msg.role == ChatRole::Assistant) {
        header.push(Span::styled(format!(" [{}]", intent), theme.muted_style()));
    }
    if let Some(secs) = msg.processing_time {
        header.push(Span::styled(format!(" {:.1}s", secs), theme.muted_style()));
    }
    if msg.pending {
        header.push(Span::styled(" sending...", theme.warning_style()));
    }
    lines.push(Line::from(header));

    let body_style = match msg.role {
        ChatRole::Error => theme.error_style(),
        _ if msg.pending => theme.muted_style(),
        _ => Default::default(),
    };

    for segment in split_segments(&msg.content) {
        match segment {
            Segment::Text(text) => {
                for wrapped in wrap_text_indented(&text, text_width, INDENT) {
                    lines.push(Line::from(Span::styled(wrapped, body_style)));
                }
            }
            Segment::Code { language, code } => {
                let label = language.unwrap_or_else(|| "code".to_string());
                lines.push(Line::from(Span::styled(
                    format!("{}┌ {}", INDENT, label),
                    theme.muted_style(),
                )));
                let code_width = text_width.saturating_sub(CODE_GUTTER.chars().count());
                for code_line in code.lines() {
                    for wrapped in wrap_text(code_line, code_width.max(1)) {
                        lines.push(Line::from(vec![
                            Span::styled(CODE_GUTTER, theme.muted_style()),
                            Span::styled(wrapped, theme.code_style()),
                        ]));
                    }
                }
            }
        }
    }

    lines
}
