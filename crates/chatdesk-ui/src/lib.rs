//! Terminal widgets for Chatdesk applications.
//!
//! The crate is organized into:
//! - `widgets` - ratatui widgets (header, conversation list, chat, input, footer, dialogs)
//! - `theme` - Colors, styles, and visual constants
//! - `utils` - Text wrapping, formatting utilities
//!
//! Widgets borrow `chatdesk-core` types directly and never mutate them.

pub mod theme;
pub mod utils;
pub mod widgets;

pub use theme::Theme;
pub use utils::{format_duration, format_relative, truncate, wrap_text, wrap_text_indented};
pub use widgets::chat::ChatWidget;
pub use widgets::conversation_list::ConversationList;
pub use widgets::dialogs::{centered_rect, ConfirmDialog};
pub use widgets::footer::Footer;
pub use widgets::header::{Header, HeaderStat};
pub use widgets::input::InputBox;
