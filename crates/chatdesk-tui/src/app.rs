//! Application state and main event loop.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::debug;

use chatdesk_core::{ChatAction, Intent};

use crate::event::BackendCommand;
use crate::render;
use crate::state::{Focus, UiState};

/// Lines moved by PageUp/PageDown.
const PAGE: usize = 10;

/// Main application with UI state and channel handles.
pub struct App {
    /// Current UI state snapshot for rendering.
    state: UiState,

    /// Actions from the backend.
    ui_rx: mpsc::UnboundedReceiver<ChatAction>,

    /// Commands to the backend.
    cmd_tx: mpsc::Sender<BackendCommand>,

    /// Chat pane geometry from the last draw, for scrolling.
    chat_lines: usize,
    chat_height: usize,
}

impl App {
    pub fn new(
        ui_rx: mpsc::UnboundedReceiver<ChatAction>,
        cmd_tx: mpsc::Sender<BackendCommand>,
    ) -> Self {
        Self {
            state: UiState::new(),
            ui_rx,
            cmd_tx,
            chat_lines: 0,
            chat_height: 0,
        }
    }

    /// Run the main event loop.
    ///
    /// This runs on the main thread and handles:
    /// - Drawing the UI
    /// - Processing keyboard input
    /// - Applying actions from the backend
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| {
                let (lines, height) = render::render(frame, &self.state);
                self.chat_lines = lines;
                self.chat_height = height;
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            while let Ok(action) = self.ui_rx.try_recv() {
                self.state.dispatch(action);
            }

            if self.state.should_quit {
                break;
            }
        }

        let _ = self.cmd_tx.blocking_send(BackendCommand::Quit);

        Ok(())
    }

    fn command(&self, command: BackendCommand) {
        debug!(command = ?command, "Backend command");
        if self.cmd_tx.blocking_send(command).is_err() {
            debug!("Backend is gone");
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if let Some(id) = self.state.confirm_delete {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.command(BackendCommand::DeleteConversation(id));
                    self.state.confirm_delete = None;
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.state.confirm_delete = None;
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.state.should_quit = true;
            }
            KeyCode::Char('r') if ctrl => self.retry(),
            KeyCode::Char('n') if ctrl => {
                self.state.dispatch(ChatAction::NewConversation);
                self.state.focus = Focus::Input;
            }
            KeyCode::Char('h') if ctrl => self.command(BackendCommand::CheckHealth),
            KeyCode::Esc => {
                if self.state.store.state().error.is_some() {
                    self.state.dispatch(ChatAction::ErrorCleared);
                } else {
                    self.state.focus = Focus::Input;
                }
            }
            KeyCode::Tab => {
                self.state.focus = match self.state.focus {
                    Focus::Input => Focus::Conversations,
                    Focus::Conversations | Focus::Search => Focus::Input,
                };
            }
            KeyCode::PageUp => {
                self.state
                    .scroll_up(PAGE, self.chat_lines, self.chat_height);
            }
            KeyCode::PageDown => {
                self.state
                    .scroll_down(PAGE, self.chat_lines, self.chat_height);
            }
            code => match self.state.focus {
                Focus::Input => self.handle_input_key(code),
                Focus::Conversations => self.handle_list_key(code),
                Focus::Search => self.handle_search_key(code),
            },
        }
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        let input = &self.state.store.state().input;
        match code {
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => {
                let mut input = input.clone();
                input.push(c);
                self.state.dispatch(ChatAction::InputChanged(input));
            }
            KeyCode::Backspace => {
                let mut input = input.clone();
                input.pop();
                self.state.dispatch(ChatAction::InputChanged(input));
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.state.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Enter => {
                if let Some(id) = self.state.selected_conversation().map(|c| c.id) {
                    self.state.dispatch(ChatAction::SelectConversation(Some(id)));
                    self.state.focus = Focus::Input;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.state.confirm_delete = self.state.selected_conversation().map(|c| c.id);
            }
            KeyCode::Char('/') => self.state.focus = Focus::Search,
            KeyCode::Char('f') => {
                self.state.filter.cycle_status();
                self.state.clamp_selection();
            }
            KeyCode::Char('r') => self.command(BackendCommand::RefreshConversations),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => self.state.focus = Focus::Conversations,
            KeyCode::Char(c) => self.state.filter.query.push(c),
            KeyCode::Backspace => {
                self.state.filter.query.pop();
            }
            _ => {}
        }
        self.state.clamp_selection();
    }

    /// Send the input buffer.
    fn submit(&mut self) {
        if !self.state.can_submit() {
            return;
        }
        let state = self.state.store.state();
        let content = state.input.clone();
        self.send(content);
    }

    /// Resend the content of the last failed message.
    fn retry(&mut self) {
        if self.state.send_requested || !self.state.store.state().can_send() {
            return;
        }
        if let Some(content) = self.state.store.retry_content().map(str::to_string) {
            self.send(content);
        }
    }

    fn send(&mut self, content: String) {
        let conversation_id = self.state.store.state().active_conversation;
        let intent = Some(Intent::detect(&content));
        self.state.send_requested = true;
        self.command(BackendCommand::Send {
            content,
            conversation_id,
            intent,
        });
    }
}
