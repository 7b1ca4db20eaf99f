//! Theme and style definitions.

use ratatui::style::{Color, Modifier, Style};

use chatdesk_core::{ChatRole, ServiceStatus};

/// Theme configuration for Chatdesk terminal applications.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary accent color (highlights, active elements)
    pub accent: Color,
    /// Success color (healthy, confirmed)
    pub success: Color,
    /// Warning color (degraded, pending)
    pub warning: Color,
    /// Error color (down, failed sends)
    pub error: Color,
    /// Muted color (timestamps, secondary info)
    pub muted: Color,
    /// User message color
    pub user: Color,
    /// Assistant message color
    pub assistant: Color,
    /// System message color
    pub system: Color,
    /// Code block color
    pub code: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
            user: Color::Cyan,
            assistant: Color::Green,
            system: Color::Yellow,
            code: Color::LightBlue,
        }
    }
}

impl Theme {
    /// Style for focused/active borders.
    pub fn focused_border(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for unfocused borders.
    pub fn unfocused_border(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Style for muted/secondary text.
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for fenced code.
    pub fn code_style(&self) -> Style {
        Style::default().fg(self.code)
    }

    /// Style for the selected row of a list.
    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Bold style for the author line of a message.
    pub fn role_style(&self, role: ChatRole) -> Style {
        let color = match role {
            ChatRole::User => self.user,
            ChatRole::Assistant => self.assistant,
            ChatRole::System => self.system,
            ChatRole::Error => self.error,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Color for a service status indicator.
    pub fn status_color(&self, status: ServiceStatus) -> Color {
        match status {
            ServiceStatus::Healthy => self.success,
            ServiceStatus::Degraded => self.warning,
            ServiceStatus::Down => self.error,
            ServiceStatus::Unknown => self.muted,
        }
    }
}
