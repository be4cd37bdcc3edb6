//! Actions that views return to communicate with the shell

use crate::domain::CodeFile;

/// Actions returned by views to communicate upward
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No action needed
    None,

    /// Raise a notification (fire-and-forget)
    Notify(String, NotifyLevel),

    /// Hand a code file to the hosting context (fire-and-forget)
    PushCode(CodeFile),

    /// Ask the shell to activate another application by id
    Navigate(String),

    /// Copy text to the system clipboard
    Copy(String),

    /// Request quit
    Quit,
}

/// Notification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Warn,
    Error,
    Agent,
    Learning,
}

impl Action {
    pub fn notify(message: impl Into<String>, level: NotifyLevel) -> Self {
        Action::Notify(message.into(), level)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }
}
