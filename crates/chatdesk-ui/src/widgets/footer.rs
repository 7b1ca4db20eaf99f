//! Footer widget: key help, replaced by the error banner while one is set.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use chatdesk_core::ChatError;

use crate::theme::Theme;

#[derive(Debug, Clone)]
pub struct Footer<'a> {
    /// Help text.
    text: &'a str,
    error: Option<&'a ChatError>,
    /// Show the retry hint next to the error.
    can_retry: bool,
    theme: Theme,
}

impl<'a> Footer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            error: None,
            can_retry: false,
            theme: Theme::default(),
        }
    }

    pub fn error(mut self, error: Option<&'a ChatError>) -> Self {
        self.error = error;
        self
    }

    pub fn can_retry(mut self, can_retry: bool) -> Self {
        self.can_retry = can_retry;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Text shown in the footer.
    pub fn line(&self) -> Line<'static> {
        let Some(error) = self.error else {
            return Line::from(Span::styled(self.text.to_string(), self.theme.muted_style()));
        };

        let mut spans = vec![Span::styled(
            format!(" {} ", error.code()),
            self.theme.error_style().add_modifier(ratatui::style::Modifier::REVERSED),
        )];
        spans.push(Span::styled(
            format!(" {}", error.user_message()),
            self.theme.error_style(),
        ));
        if self.can_retry {
            spans.push(Span::styled("  [Ctrl+R] retry", self.theme.muted_style()));
        }
        spans.push(Span::styled("  [Esc] dismiss", self.theme.muted_style()));
        Line::from(spans)
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line()), area);
    }
}
