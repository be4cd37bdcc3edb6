//! Neural Chat - conversation with the assistant

pub mod markdown;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::core::{Action, AppView, Context, NotifyLevel};
use crate::domain::{ChatMessage, ChatRole};
use crate::infrastructure::export::export_chat;
use crate::infrastructure::{ServiceReply, Ticket};
use crate::service::{ServiceCall, ServiceOutput};
use crate::ui::widgets::TextInput;

pub const ID: &str = "chat";

pub struct ChatView {
    messages: Vec<ChatMessage>,
    input: TextInput,
    pending: Option<Ticket>,
    /// Prompt of the last send, kept for Ctrl+R
    last_prompt: Option<String>,
    error: Option<String>,
    /// Ctrl+L was pressed and awaits `y`
    confirm_clear: bool,
    next_id: u64,
}

pub fn mount(ctx: &mut Context) -> Box<dyn AppView> {
    Box::new(ChatView::new(ctx))
}

impl ChatView {
    pub fn new(ctx: &Context) -> Self {
        let mut view = Self {
            messages: Vec::new(),
            input: TextInput::new(),
            pending: None,
            last_prompt: None,
            error: None,
            confirm_clear: false,
            next_id: 1,
        };
        view.push(
            ChatRole::System,
            format!("Neural link established with {}.", ctx.profile().name()),
        );
        view
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> &str {
        self.input.value()
    }

    pub fn is_confirming_clear(&self) -> bool {
        self.confirm_clear
    }

    fn push(&mut self, role: ChatRole, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(self.next_id, role, text));
        self.next_id += 1;
    }

    fn send(&mut self, ctx: &Context) {
        if self.pending.is_some() {
            return;
        }
        let prompt = self.input.value().trim().to_string();
        if prompt.is_empty() {
            return;
        }
        self.input.clear();
        self.push(ChatRole::User, prompt.clone());
        self.request(prompt, ctx);
    }

    fn retry(&mut self, ctx: &Context) {
        if self.pending.is_some() || self.error.is_none() {
            return;
        }
        if let Some(prompt) = self.last_prompt.clone() {
            debug!("retrying chat prompt");
            self.request(prompt, ctx);
        }
    }

    /// Drops every message. A reply still in flight is abandoned.
    fn clear_history(&mut self) -> Action {
        self.messages.clear();
        self.pending = None;
        self.error = None;
        self.last_prompt = None;
        debug!("chat history cleared");
        Action::notify("Chat history cleared", NotifyLevel::Info)
    }

    fn save(&self, ctx: &Context) -> Action {
        match export_chat(&ctx.export_dir, &self.messages) {
            Ok(path) => Action::notify(
                format!("Chat saved to {}", path.display()),
                NotifyLevel::Success,
            ),
            Err(err) => {
                warn!(error = %err, "chat export failed");
                Action::notify(format!("Chat export failed: {err:#}"), NotifyLevel::Error)
            }
        }
    }

    /// Copy the newest fenced code block in the conversation.
    fn copy_code(&self) -> Action {
        let block = self
            .messages
            .iter()
            .rev()
            .find_map(|message| markdown::last_code_block(&message.text));
        match block {
            Some(body) => Action::Copy(body),
            None => Action::notify("No code block to copy", NotifyLevel::Warn),
        }
    }

    fn request(&mut self, prompt: String, ctx: &Context) {
        self.error = None;
        self.last_prompt = Some(prompt.clone());
        let call = ServiceCall::GenerateContent {
            prompt,
            persona: Some(ctx.profile().persona_prompt()),
        };
        match ctx.service.submit(call) {
            Ok(ticket) => self.pending = Some(ticket),
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}

impl AppView for ChatView {
    fn id(&self) -> &'static str {
        ID
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        if self.confirm_clear {
            self.confirm_clear = false;
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.clear_history(),
                _ => Action::None,
            };
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => self.input.insert('\n'),
            KeyCode::Enter => self.send(ctx),
            KeyCode::Char('r') if ctrl => self.retry(ctx),
            KeyCode::Char('l') if ctrl => self.confirm_clear = true,
            KeyCode::Char('s') if ctrl => return self.save(ctx),
            KeyCode::Char('y') if ctrl => return self.copy_code(),
            _ => {
                self.input.handle_key(key);
            }
        }
        Action::None
    }

    fn on_reply(&mut self, reply: &ServiceReply, _ctx: &mut Context) -> Action {
        if self.pending != Some(reply.ticket) {
            return Action::None;
        }
        self.pending = None;
        match &reply.result {
            Ok(ServiceOutput::Text(text)) => self.push(ChatRole::Assistant, text.clone()),
            Ok(other) => self.push(ChatRole::Assistant, other.summary()),
            Err(err) => self.error = Some(err.to_string()),
        }
        Action::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let banner = if self.error.is_some() || self.confirm_clear {
            2
        } else {
            0
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(banner),
                Constraint::Length(3),
            ])
            .split(area);

        let accent = ctx.theme.accent_color();
        let mut lines: Vec<Line> = Vec::new();
        for message in &self.messages {
            let (who, color) = match message.role {
                ChatRole::User => ("you", accent),
                ChatRole::Assistant => ("neural", Color::Magenta),
                ChatRole::System => ("system", Color::DarkGray),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{who} "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(message.time_label(), Style::default().fg(Color::DarkGray)),
            ]));
            lines.extend(markdown::render(&message.text, Style::default().fg(Color::White)));
            lines.push(Line::from(""));
        }
        if self.pending.is_some() {
            lines.push(Line::from(Span::styled(
                "neural is thinking…",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        // Keep the newest lines in view.
        let visible = rows[0].height.saturating_sub(2) as usize;
        let start = lines.len().saturating_sub(visible);
        let history = Paragraph::new(lines.split_off(start))
            .block(Block::default().borders(Borders::ALL).title(" Neural Chat "))
            .wrap(Wrap { trim: false });
        frame.render_widget(history, rows[0]);

        if self.confirm_clear {
            let banner = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("Clear all {} messages?", self.messages.len()),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    "Press y to confirm, any other key to cancel.",
                    Style::default().fg(Color::DarkGray),
                )),
            ]);
            frame.render_widget(banner, rows[1]);
        } else if let Some(error) = &self.error {
            let banner = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("⚠ {error}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from(Span::styled(
                    "Transient error. Press Ctrl+R to retry.",
                    Style::default().fg(Color::DarkGray),
                )),
            ]);
            frame.render_widget(banner, rows[1]);
        }

        self.input.render(
            frame,
            rows[2],
            "› ",
            Block::default()
                .borders(Borders::ALL)
                .title(" Message (Enter send, Alt+Enter newline, ^L clear, ^S save, ^Y copy code) ")
                .border_style(Style::default().fg(accent)),
            true,
        );
    }
}
