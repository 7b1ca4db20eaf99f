//! Main render function for the TUI.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Frame;

use chatdesk_core::ChatState;
use chatdesk_ui::{
    format_duration, ChatWidget, ConfirmDialog, ConversationList, Footer, Header, HeaderStat,
    InputBox, Theme,
};

use crate::state::{Focus, UiState};

const INPUT_HELP: &str =
    " Enter: send | Tab: conversations | Ctrl+N: new | Ctrl+R: retry | PgUp/PgDn: scroll | Ctrl+C: quit";
const LIST_HELP: &str =
    " j/k: move | Enter: open | d: delete | /: search | f: status filter | r: refresh | Tab: input | q: quit";
const SEARCH_HELP: &str = " Type to search | Enter: done | Esc: back to input";

/// Render the entire UI.
///
/// Returns the chat pane's total line count and visible height.
pub fn render(frame: &mut Frame, ui: &UiState) -> (usize, usize) {
    let theme = Theme::default();
    let chat = ui.store.state();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [list_area, chat_column] =
        Layout::horizontal([Constraint::Length(34), Constraint::Fill(1)]).areas(body_area);

    let [messages_area, input_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(chat_column);

    render_header(frame, header_area, chat, &theme);

    ConversationList::new(&chat.conversations, &ui.filter)
        .active(chat.active_conversation)
        .selected(ui.selected)
        .focused(matches!(ui.focus, Focus::Conversations | Focus::Search))
        .theme(theme.clone())
        .render(frame, list_area);

    let chat_lines = render_messages(frame, messages_area, ui, &theme);

    InputBox::new(&chat.input)
        .focused(ui.focus == Focus::Input)
        .disabled(chat.is_sending)
        .placeholder(ui.input_placeholder())
        .theme(theme.clone())
        .render(frame, input_area);

    let help = match ui.focus {
        Focus::Input => INPUT_HELP,
        Focus::Conversations => LIST_HELP,
        Focus::Search => SEARCH_HELP,
    };
    Footer::new(help)
        .error(chat.error.as_ref())
        .can_retry(chat.last_failed_input.is_some())
        .theme(theme.clone())
        .render(frame, footer_area);

    if let Some(id) = ui.confirm_delete {
        let title = chat
            .conversations
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.title.as_str())
            .unwrap_or("");
        ConfirmDialog::new("Delete conversation", "This cannot be undone.")
            .subject(title)
            .theme(theme)
            .render(frame);
    }

    (chat_lines, messages_area.height.saturating_sub(2) as usize)
}

fn render_header(frame: &mut Frame, area: Rect, chat: &ChatState, theme: &Theme) {
    let mut header = Header::new("Chatdesk")
        .status(chat.service_status)
        .theme(theme.clone());

    if let Some(active) = chat.active() {
        header = header.subtitle(active.title.clone());
    } else {
        header = header.subtitle("New conversation");
    }

    if let Some(rate) = chat.rate_limit {
        let color = if rate.is_exhausted() {
            theme.error
        } else if rate.remaining * 5 <= rate.limit {
            theme.warning
        } else {
            theme.success
        };
        header = header.stat(
            HeaderStat::new("Messages", format!("{}/{}", rate.remaining, rate.limit)).color(color),
        );
        if rate.reset_in_secs > 0 {
            header = header.stat(HeaderStat::new("Reset", format_duration(rate.reset_in_secs)));
        }
    }

    header.render(frame, area);
}

fn render_messages(frame: &mut Frame, area: Rect, ui: &UiState, theme: &Theme) -> usize {
    let chat = ui.store.state();
    let widget = ChatWidget::new(&chat.messages)
        .typing(chat.is_typing)
        .scroll(ui.scroll)
        .focused(ui.focus == Focus::Input)
        .theme(theme.clone());

    let total = widget.lines(area.width.saturating_sub(2) as usize).len();
    widget.render(frame, area);
    total
}
