//! Modal dialogs.

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme::Theme;
use crate::utils::truncate;

/// Create a centered rectangle within the given area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// A yes/no confirmation dialog.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<'a> {
    title: &'a str,
    message: &'a str,
    /// Subject of the action, e.g. a conversation title.
    subject: Option<&'a str>,
    width: u16,
    theme: Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: &'a str) -> Self {
        Self {
            title,
            message,
            subject: None,
            width: 48,
            theme: Theme::default(),
        }
    }

    pub fn subject(mut self, subject: &'a str) -> Self {
        self.subject = Some(subject);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn render(self, frame: &mut Frame) {
        let height = if self.subject.is_some() { 9 } else { 7 };
        let area = centered_rect(self.width, height, frame.area());

        frame.render_widget(Clear, area);

        let mut lines = vec![Line::from(""), Line::from(self.message)];
        if let Some(subject) = self.subject {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("\"{}\"", truncate(subject, self.width.saturating_sub(6) as usize)),
                self.theme.muted_style(),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(
                "[Y]",
                Style::default()
                    .fg(self.theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("es  "),
            Span::styled(
                "[N]",
                self.theme.error_style().add_modifier(Modifier::BOLD),
            ),
            Span::raw("o"),
        ]));

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(self.theme.focused_border()),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(48, 9, area), Rect::new(26, 15, 48, 9));

        let small = Rect::new(0, 0, 20, 5);
        assert_eq!(centered_rect(48, 9, small), Rect::new(0, 0, 20, 5));
    }
}
