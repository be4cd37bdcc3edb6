use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::Local;
use tracing::{debug, info, warn};

use crate::core::{parse_command, Action, Command, Context, NotifyLevel};
use crate::domain::{Notification, NotificationKind};
use crate::infrastructure::ServiceReply;
use crate::shell::{NavigationEntry, Registry, Shell};

/// Notifications kept before the oldest is dropped
pub const MAX_NOTIFICATIONS: usize = 50;

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Default, Clone)]
pub struct CommandBar {
    pub input: String,
    pub last: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug)]
pub struct App {
    /// Shared context for views
    pub ctx: Context,
    pub shell: Shell,
    pub focus: Focus,
    pub input_mode: InputMode,
    pub command: CommandBar,
    /// Highlighted sidebar row
    pub nav_cursor: usize,
    /// Newest last
    pub notifications: VecDeque<Notification>,
    /// Notifications raised since the last read or clear
    unread: usize,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    /// Also write copies to the OS clipboard
    pub system_clipboard: bool,
    next_notification: u64,
}

impl App {
    pub fn new(registry: Registry, mut ctx: Context) -> Self {
        let shell = Shell::new(registry, &mut ctx);
        Self {
            ctx,
            shell,
            focus: Focus::Content,
            input_mode: InputMode::Normal,
            command: CommandBar::default(),
            nav_cursor: 0,
            notifications: VecDeque::with_capacity(MAX_NOTIFICATIONS),
            unread: 0,
            status: None,
            help_open: false,
            should_quit: false,
            system_clipboard: true,
            next_notification: 1,
        }
    }

    pub fn active_entry(&self) -> &NavigationEntry {
        self.shell.active_entry()
    }

    pub fn focus_label(&self) -> &'static str {
        match (self.input_mode, self.focus) {
            (InputMode::Command, _) => "Command",
            (_, Focus::Sidebar) => "Sidebar",
            (_, Focus::Content) => "Content",
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    /// Activate by id or display name, keeping the sidebar cursor in step.
    pub fn select_app(&mut self, query: &str) -> bool {
        let Some(entry) = self.shell.registry().resolve(query).copied() else {
            debug!(query, "no application matches");
            return false;
        };
        if let Some(pos) = self.shell.registry().position(entry.id) {
            self.nav_cursor = pos;
        }
        self.shell.select_tab(entry.id, &mut self.ctx)
    }

    pub fn select_index(&mut self, index: usize) -> bool {
        let Some(entry) = self.shell.registry().at(index).copied() else {
            return false;
        };
        self.nav_cursor = index;
        self.shell.select_tab(entry.id, &mut self.ctx)
    }

    pub fn toggle_sidebar(&mut self) {
        self.shell.toggle_sidebar();
    }

    pub fn retry(&mut self) {
        if self.shell.retry(&mut self.ctx) {
            self.set_status(format!("Reloaded {}", self.active_entry().name), StatusLevel::Info);
        } else {
            self.set_status("Nothing to retry", StatusLevel::Warn);
        }
    }

    pub fn move_cursor(&mut self, down: bool) {
        let last = self.shell.registry().len().saturating_sub(1);
        self.nav_cursor = if down {
            (self.nav_cursor + 1).min(last)
        } else {
            self.nav_cursor.saturating_sub(1)
        };
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
        let action = self.shell.tick(&mut self.ctx);
        self.apply_action(action);
    }

    pub fn ingest_reply(&mut self, reply: ServiceReply) {
        let action = self.shell.deliver_reply(&reply, &mut self.ctx);
        self.apply_action(action);
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) {
        let notification = Notification {
            id: self.next_notification,
            title: self.active_entry().name.to_string(),
            message: message.into(),
            kind,
            timestamp: Local::now(),
        };
        self.next_notification += 1;
        debug!(id = notification.id, message = %notification.message, "notification");
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.unread = (self.unread + 1).min(self.notifications.len());
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    pub fn mark_notifications_read(&mut self) {
        self.unread = 0;
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Notify(message, level) => self.notify(message, notification_kind(level)),
            Action::PushCode(file) => {
                let name = file.name.clone();
                self.ctx.push_code(file);
                self.notify(format!("{name} pushed to Code Lab"), NotificationKind::Agent);
            }
            Action::Navigate(target) => {
                if !self.select_app(&target) && self.shell.registry().resolve(&target).is_none() {
                    self.set_status(format!("Unknown application: {target}"), StatusLevel::Warn);
                }
            }
            Action::Copy(text) => self.copy(text),
            Action::Quit => self.should_quit = true,
        }
    }

    fn copy(&mut self, text: String) {
        let chars = text.chars().count();
        if self.system_clipboard {
            let result = arboard::Clipboard::new().and_then(|mut board| board.set_text(text.clone()));
            match result {
                Ok(()) => self.set_status(format!("Copied {chars} chars"), StatusLevel::Info),
                Err(err) => {
                    warn!(error = %err, "system clipboard unavailable");
                    self.set_status(
                        format!("Copied {chars} chars (clipboard unavailable)"),
                        StatusLevel::Warn,
                    );
                }
            }
        } else {
            self.set_status(format!("Copied {chars} chars"), StatusLevel::Info);
        }
        self.ctx.set_clipboard(text);
    }

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let input = self.command.input.trim().to_string();
        if input.is_empty() {
            self.exit_command();
            return;
        }
        let command = parse_command(&input);
        self.execute_command(command);
        self.command.last = Some(input);
        self.exit_command();
    }

    pub fn execute_command(&mut self, command: Command) {
        match command {
            Command::Open(target) => {
                if self.shell.registry().resolve(&target).is_none() {
                    self.set_status(format!("Unknown application: {target}"), StatusLevel::Error);
                } else {
                    self.select_app(&target);
                }
            }
            Command::Sidebar => self.toggle_sidebar(),
            Command::Retry => self.retry(),
            Command::Clear => {
                self.notifications.clear();
                self.unread = 0;
                self.set_status("Notifications cleared", StatusLevel::Info);
            }
            Command::Read => {
                self.mark_notifications_read();
                self.set_status("Notifications marked read", StatusLevel::Info);
            }
            Command::Help => self.help_open = true,
            Command::Quit => self.should_quit = true,
            Command::Unknown(text) => {
                self.set_status(format!("Unknown command: {text}"), StatusLevel::Error)
            }
        }
    }

    pub fn request_quit(&mut self) {
        info!("quit requested");
        self.should_quit = true;
    }
}

fn notification_kind(level: NotifyLevel) -> NotificationKind {
    match level {
        NotifyLevel::Info => NotificationKind::Info,
        NotifyLevel::Success => NotificationKind::Success,
        NotifyLevel::Warn => NotificationKind::Warning,
        NotifyLevel::Error => NotificationKind::Error,
        NotifyLevel::Agent => NotificationKind::Agent,
        NotifyLevel::Learning => NotificationKind::Learning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CodeFile, Profile};
    use crate::infrastructure::ServiceClient;

    fn app() -> App {
        let ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        let mut app = App::new(Registry::default_apps(), ctx);
        app.system_clipboard = false;
        app
    }

    #[test]
    fn test_notifications_are_bounded() {
        let mut app = app();
        for i in 0..(MAX_NOTIFICATIONS + 5) {
            app.apply_action(Action::notify(format!("n{i}"), NotifyLevel::Info));
        }
        assert_eq!(app.notifications.len(), MAX_NOTIFICATIONS);
        assert_eq!(app.notifications.front().map(|n| n.message.as_str()), Some("n5"));
        assert_eq!(app.notifications.back().map(|n| n.title.as_str()), Some("Mesh Terminal"));
    }

    #[test]
    fn test_navigate_and_command_palette() {
        let mut app = app();
        app.apply_action(Action::Navigate("Code Lab".into()));
        assert_eq!(app.shell.state().active_id(), "code");
        assert_eq!(app.nav_cursor, 2);

        app.enter_command();
        app.command.input = "open vault".into();
        app.apply_command();
        assert_eq!(app.shell.state().active_id(), "vault");
        assert_eq!(app.input_mode, InputMode::Normal);

        app.execute_command(Command::Open("browser".into()));
        assert_eq!(app.shell.state().active_id(), "vault");
        assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Error));
    }

    #[test]
    fn test_push_code_reaches_code_lab() {
        let mut app = app();
        app.apply_action(Action::PushCode(CodeFile::new("agent.py", "print(1)")));
        assert!(app.ctx.pushed_code.is_some());
        app.select_app("code");
        assert!(app.ctx.pushed_code.is_none());
        assert_eq!(app.notifications.len(), 1);
    }

    #[test]
    fn test_copy_fills_shared_clipboard() {
        let mut app = app();
        app.apply_action(Action::Copy("abc".into()));
        assert_eq!(app.ctx.get_clipboard(), Some("abc"));
    }

    #[test]
    fn test_retry_without_failure_warns() {
        let mut app = app();
        app.execute_command(Command::Retry);
        assert_eq!(app.status_text(), Some(("Nothing to retry", StatusLevel::Warn)));
    }

    #[test]
    fn test_unread_count_resets_on_read_and_clear() {
        let mut app = app();
        for i in 0..3 {
            app.apply_action(Action::notify(format!("n{i}"), NotifyLevel::Info));
        }
        assert_eq!(app.unread_count(), 3);

        app.execute_command(Command::Read);
        assert_eq!(app.unread_count(), 0);
        assert_eq!(app.notifications.len(), 3);

        app.apply_action(Action::notify("late", NotifyLevel::Warn));
        assert_eq!(app.unread_count(), 1);
        app.execute_command(Command::Clear);
        assert_eq!(app.unread_count(), 0);
        assert!(app.notifications.is_empty());

        for i in 0..(MAX_NOTIFICATIONS + 5) {
            app.apply_action(Action::notify(format!("m{i}"), NotifyLevel::Info));
        }
        assert_eq!(app.unread_count(), MAX_NOTIFICATIONS);
    }
}
