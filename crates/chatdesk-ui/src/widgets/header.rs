//! Header widget: title, service status and stats.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use chatdesk_core::ServiceStatus;

use crate::theme::Theme;

/// A stat to display in the header.
#[derive(Debug, Clone)]
pub struct HeaderStat {
    pub label: String,
    pub value: String,
    pub color: Color,
}

impl HeaderStat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            color: Color::Cyan,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Header with title, service status and stats.
#[derive(Debug, Clone)]
pub struct Header<'a> {
    /// Application title.
    title: &'a str,
    /// Subtitle, usually the active conversation.
    subtitle: Option<String>,
    status: Option<ServiceStatus>,
    /// Stats shown on the right side.
    stats: Vec<HeaderStat>,
    theme: Theme,
}

impl<'a> Header<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            subtitle: None,
            status: None,
            stats: Vec::new(),
            theme: Theme::default(),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn status(mut self, status: ServiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn stat(mut self, stat: HeaderStat) -> Self {
        self.stats.push(stat);
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Render the header.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let has_stats = !self.stats.is_empty();
        let constraints = if has_stats {
            vec![Constraint::Min(30), Constraint::Length(44)]
        } else {
            vec![Constraint::Min(0)]
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let mut title_spans = vec![Span::styled(
            format!(" {} ", self.title),
            self.theme.focused_border(),
        )];
        if let Some(status) = self.status {
            title_spans.push(Span::styled(
                format!("[{}]", status),
                Style::default().fg(self.theme.status_color(status)),
            ));
        }
        if let Some(subtitle) = &self.subtitle {
            title_spans.push(Span::styled(
                format!(" {}", subtitle),
                self.theme.muted_style(),
            ));
        }

        let title_widget =
            Paragraph::new(Line::from(title_spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(title_widget, chunks[0]);

        if has_stats && chunks.len() > 1 {
            let mut stat_spans = vec![Span::raw(" ")];

            for (i, stat) in self.stats.iter().enumerate() {
                if i > 0 {
                    stat_spans.push(Span::raw(" | "));
                }
                stat_spans.push(Span::raw(format!("{}: ", stat.label)));
                stat_spans.push(Span::styled(
                    stat.value.clone(),
                    Style::default().fg(stat.color),
                ));
            }

            let stats_widget = Paragraph::new(Line::from(stat_spans))
                .block(Block::default().borders(Borders::ALL));

            frame.render_widget(stats_widget, chunks[1]);
        }
    }
}
