//! Sidebar listing conversations with the active search and status filter.

use chrono::Utc;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use chatdesk_core::{Conversation, ConversationFilter, ConversationId};

use crate::theme::Theme;
use crate::utils::{format_relative, truncate};

#[derive(Debug, Clone)]
pub struct ConversationList<'a> {
    conversations: &'a [Conversation],
    filter: &'a ConversationFilter,
    active: Option<ConversationId>,
    selected: usize,
    focused: bool,
    theme: Theme,
}

impl<'a> ConversationList<'a> {
    pub fn new(conversations: &'a [Conversation], filter: &'a ConversationFilter) -> Self {
        Self {
            conversations,
            filter,
            active: None,
            selected: 0,
            focused: false,
            theme: Theme::default(),
        }
    }

    /// Mark the conversation currently shown in the chat pane.
    pub fn active(mut self, active: Option<ConversationId>) -> Self {
        self.active = active;
        self
    }

    /// Index into the filtered list.
    pub fn selected(mut self, selected: usize) -> Self {
        self.selected = selected;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn title(&self, shown: usize) -> String {
        let mut title = format!(" Conversations ({}", shown);
        if shown != self.conversations.len() {
            title.push_str(&format!("/{}", self.conversations.len()));
        }
        title.push(')');
        if let Some(status) = self.filter.status {
            title.push_str(&format!(" [{}]", status));
        }
        if !self.filter.query.is_empty() {
            title.push_str(&format!(" /{}", self.filter.query));
        }
        title.push(' ');
        title
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let visible = self.filter.apply(self.conversations);
        let width = area.width.saturating_sub(4) as usize;
        let now = Utc::now();

        let items: Vec<ListItem> = if visible.is_empty() {
            vec![ListItem::new(Line::from(Span::styled(
                "  No conversations",
                self.theme.muted_style(),
            )))]
        } else {
            visible
                .iter()
                .map(|c| {
                    let marker = if Some(c.id) == self.active { "● " } else { "  " };
                    let title = Line::from(vec![
                        Span::styled(marker, self.theme.focused_border()),
                        Span::raw(truncate(&c.title, width.saturating_sub(2))),
                    ]);
                    let detail = Line::from(Span::styled(
                        format!(
                            "  {} msgs · {}",
                            c.message_count,
                            format_relative(c.updated_at, now)
                        ),
                        self.theme.muted_style(),
                    ));
                    ListItem::new(vec![title, detail])
                })
                .collect()
        };

        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(self.title(visible.len())),
            )
            .highlight_style(self.theme.selected_style());

        let mut state = ListState::default();
        if !visible.is_empty() && self.focused {
            state.select(Some(self.selected.min(visible.len() - 1)));
        }

        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use chatdesk_core::ConversationStatus;

    use super::*;

    #[test]
    fn test_title_shows_filter() {
        let conversations = vec![
            Conversation::started_with(ConversationId::new(1), "Rust lifetimes"),
            Conversation::started_with(ConversationId::new(2), "French greetings"),
        ];
        let filter = ConversationFilter {
            query: "rust".to_string(),
            status: Some(ConversationStatus::Active),
        };

        let list = ConversationList::new(&conversations, &filter);
        assert_eq!(list.title(1), " Conversations (1/2) [active] /rust ");

        let filter = ConversationFilter::default();
        let list = ConversationList::new(&conversations, &filter);
        assert_eq!(list.title(2), " Conversations (2) ");
    }
}
