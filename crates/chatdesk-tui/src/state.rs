//! UI state for rendering.

use chatdesk_core::{
    ChatAction, Conversation, ConversationFilter, ConversationId, ServiceStatus, Store,
};

/// Pane receiving key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Conversations,
    /// Editing the conversation search query.
    Search,
}

/// Everything the render pass reads (no async, no locks).
#[derive(Debug, Default)]
pub struct UiState {
    /// Chat state; mutated only through dispatched actions.
    pub store: Store,

    /// Search and status filter for the conversation list.
    pub filter: ConversationFilter,

    pub focus: Focus,

    /// Selected row in the filtered conversation list.
    pub selected: usize,

    /// Chat scroll offset (usize::MAX = follow the bottom).
    pub scroll: usize,

    /// Conversation awaiting delete confirmation.
    pub confirm_delete: Option<ConversationId>,

    /// A send command is on its way to the backend.
    pub send_requested: bool,

    pub should_quit: bool,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            scroll: usize::MAX,
            ..Self::default()
        }
    }

    /// Apply an action from the backend or the UI itself.
    pub fn dispatch(&mut self, action: ChatAction) {
        // Only the requested send's own outcome releases the guard.
        if matches!(
            action,
            ChatAction::SendStarted { .. } | ChatAction::SendRejected(_)
        ) {
            self.send_requested = false;
        }
        if matches!(
            action,
            ChatAction::SendStarted { .. }
                | ChatAction::SendSucceeded { .. }
                | ChatAction::SelectConversation(_)
                | ChatAction::NewConversation
        ) {
            self.scroll = usize::MAX;
        }

        self.store.dispatch(action);
        self.clamp_selection();
    }

    /// Conversations passing the current filter.
    pub fn visible_conversations(&self) -> Vec<&Conversation> {
        self.filter.apply(&self.store.state().conversations)
    }

    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.visible_conversations().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let count = self.visible_conversations().len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn select_prev(&mut self) {
        let count = self.visible_conversations().len();
        if count > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(count - 1);
        }
    }

    /// Keep the selection inside the filtered list.
    pub fn clamp_selection(&mut self) {
        let count = self.visible_conversations().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Returns true if Enter in the input should send.
    pub fn can_submit(&self) -> bool {
        let state = self.store.state();
        !self.send_requested && state.can_send() && !state.input.trim().is_empty()
    }

    /// Hint shown in the empty input box.
    pub fn input_placeholder(&self) -> &'static str {
        let state = self.store.state();
        if state.is_sending {
            "Waiting for reply..."
        } else if state.service_status != ServiceStatus::Unknown
            && !state.service_status.is_available()
        {
            "Service is down, messages may fail..."
        } else {
            "Type a message..."
        }
    }

    pub fn scroll_up(&mut self, lines: usize, total: usize, visible: usize) {
        let max = total.saturating_sub(visible);
        let current = self.scroll.min(max);
        self.scroll = current.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize, total: usize, visible: usize) {
        let max = total.saturating_sub(visible);
        let next = self.scroll.min(max).saturating_add(lines);
        self.scroll = if next >= max { usize::MAX } else { next };
    }
}
