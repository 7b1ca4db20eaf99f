//! Chat widgets.

pub mod chat;
pub mod conversation_list;
pub mod dialogs;
pub mod footer;
pub mod header;
pub mod input;
