//! Message input box with a character counter.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use chatdesk_core::MAX_MESSAGE_LENGTH;

use crate::theme::Theme;

#[derive(Debug, Clone)]
pub struct InputBox<'a> {
    input: &'a str,
    focused: bool,
    /// Input is locked while a send is in flight.
    disabled: bool,
    placeholder: &'a str,
    theme: Theme,
}

impl<'a> InputBox<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            focused: true,
            disabled: false,
            placeholder: "Type a message...",
            theme: Theme::default(),
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Counter shown in the title, e.g. ` 12/4000 `.
    pub fn counter(&self) -> String {
        format!(" {}/{} ", self.input.chars().count(), MAX_MESSAGE_LENGTH)
    }

    fn over_limit(&self) -> bool {
        self.input.chars().count() > MAX_MESSAGE_LENGTH
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused && !self.disabled {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };
        let counter_style = if self.over_limit() {
            self.theme.error_style()
        } else {
            self.theme.muted_style()
        };

        let content = if self.input.is_empty() {
            Line::from(Span::styled(self.placeholder, self.theme.muted_style()))
        } else {
            Line::from(self.input)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Message ")
            .title_bottom(Line::from(Span::styled(self.counter(), counter_style)).right_aligned());

        let paragraph = Paragraph::new(content)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);

        if self.focused && !self.disabled {
            let inner_width = area.width.saturating_sub(2).max(1);
            let len = self.input.chars().count() as u16;
            let x = area.x + 1 + len % inner_width;
            let y = area.y + 1 + (len / inner_width).min(area.height.saturating_sub(3));
            frame.set_cursor_position((x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter() {
        assert_eq!(InputBox::new("héllo").counter(), " 5/4000 ");

        let long = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        assert!(InputBox::new(&long).over_limit());
        assert!(!InputBox::new("ok").over_limit());
    }
}
