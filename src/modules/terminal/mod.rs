//! Mesh Terminal - command line into the agent mesh

mod commands;
mod pipeline;

pub use commands::{parse, TermCommand, HELP_LINES};
pub use pipeline::{Pipeline, PipelineEvent};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, AppView, Context, NotifyLevel};
use crate::domain::{CodeFile, LedgerKind, TaskStatus};
use crate::infrastructure::{ServiceReply, Ticket};
use crate::service::{ServiceCall, ServiceOutput};
use crate::ui::widgets::TextInput;

pub const ID: &str = "terminal";

const MAX_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Input,
    Output,
    System,
    Agent,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermLine {
    pub kind: LineKind,
    pub text: String,
}

pub struct TerminalView {
    lines: Vec<TermLine>,
    input: TextInput,
    history: Vec<String>,
    /// Position while browsing history with Up/Down
    history_pos: Option<usize>,
    pending_exec: Option<Ticket>,
    pipeline: Option<Pipeline>,
    tasks_started: u32,
}

pub fn mount(ctx: &mut Context) -> Box<dyn AppView> {
    Box::new(TerminalView::new(ctx))
}

impl TerminalView {
    pub fn new(ctx: &Context) -> Self {
        let mut view = Self {
            lines: Vec::new(),
            input: TextInput::new(),
            history: Vec::new(),
            history_pos: None,
            pending_exec: None,
            pipeline: None,
            tasks_started: 0,
        };
        view.push(
            LineKind::System,
            format!("Welcome to the Clone-OS Mesh Terminal, {}.", ctx.profile().name()),
        );
        view.push(LineKind::System, "Type 'help' for available commands.");
        view
    }

    pub fn lines(&self) -> &[TermLine] {
        &self.lines
    }

    pub fn input(&self) -> &str {
        self.input.value()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn pipeline(&self) -> Option<&Pipeline> {
        self.pipeline.as_ref()
    }

    fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        self.lines.push(TermLine {
            kind,
            text: text.into(),
        });
        if self.lines.len() > MAX_LINES {
            let excess = self.lines.len() - MAX_LINES;
            self.lines.drain(..excess);
        }
    }

    fn submit_line(&mut self, ctx: &mut Context) -> Action {
        let line = self.input.take();
        self.history_pos = None;
        let Some(command) = parse(&line) else {
            return Action::None;
        };
        self.history.push(line.trim().to_string());
        self.push(LineKind::Input, format!("$ {}", line.trim()));
        self.run(command, ctx)
    }

    fn run(&mut self, command: TermCommand, ctx: &mut Context) -> Action {
        match command {
            TermCommand::Help => {
                for line in HELP_LINES {
                    self.push(LineKind::Output, *line);
                }
            }
            TermCommand::Echo(text) => self.push(LineKind::Output, text),
            TermCommand::Ls => {
                let names: Vec<String> = ctx
                    .knowledge
                    .iter()
                    .map(|item| format!("{}.md", item.id))
                    .collect();
                self.push(LineKind::Output, format!("agents/  code/  {}", names.join("  ")));
            }
            TermCommand::Pwd => self.push(LineKind::Output, "/mesh/home"),
            TermCommand::Whoami => {
                let profile = ctx.profile();
                self.push(
                    LineKind::Output,
                    format!("{} ({}, {})", profile.name(), profile.role(), profile.specialization()),
                );
            }
            TermCommand::Clear => self.lines.clear(),
            TermCommand::Date => self.push(
                LineKind::Output,
                Local::now().format("%a %b %e %H:%M:%S %Y").to_string(),
            ),
            TermCommand::Exec(command) => {
                match ctx.service.submit(ServiceCall::ExecuteCommand { command }) {
                    Ok(ticket) => {
                        self.pending_exec = Some(ticket);
                        self.push(LineKind::System, "Processing neural command...");
                    }
                    Err(err) => self.push(LineKind::Error, format!("error: {err}")),
                }
            }
            TermCommand::Plan(goal) => {
                if self.pipeline.as_ref().is_some_and(Pipeline::is_running) {
                    self.push(LineKind::Error, "An autonomous task is already running.");
                    return Action::None;
                }
                self.tasks_started += 1;
                let id = format!("task-{}", self.tasks_started);
                match Pipeline::start(id, &goal, ctx) {
                    Ok(pipeline) => {
                        self.pipeline = Some(pipeline);
                        self.push(LineKind::Agent, format!("Planning: {goal}"));
                    }
                    Err(err) => self.push(LineKind::Error, format!("error: {err}")),
                }
            }
            TermCommand::Push(name) => {
                let Some(output) = self.pipeline.as_ref().and_then(Pipeline::last_output) else {
                    self.push(LineKind::Error, "Nothing to push yet. Run 'plan <goal>' first.");
                    return Action::None;
                };
                let file = CodeFile::new(name.clone(), output.to_string());
                self.push(LineKind::System, format!("Pushed {name} to Code Lab."));
                return Action::PushCode(file);
            }
            TermCommand::Notify(message) => {
                self.push(LineKind::System, "Notification sent.");
                return Action::notify(message, NotifyLevel::Info);
            }
            TermCommand::Open(app) => return Action::Navigate(app),
            TermCommand::Usage(name) => {
                self.push(LineKind::Error, format!("usage: {name} <argument>"))
            }
            TermCommand::Unknown(name) => {
                self.push(LineKind::Error, format!("command not found: {name}"))
            }
        }
        Action::None
    }

    fn history_step(&mut self, older: bool) {
        if self.history.is_empty() {
            return;
        }
        let last = self.history.len() - 1;
        let next = match (self.history_pos, older) {
            (None, true) => Some(last),
            (None, false) => None,
            (Some(pos), true) => Some(pos.saturating_sub(1)),
            (Some(pos), false) if pos < last => Some(pos + 1),
            (Some(_), false) => None,
        };
        self.history_pos = next;
        match next {
            Some(pos) => self.input.set(self.history[pos].clone()),
            None => self.input.clear(),
        }
    }
}

impl AppView for TerminalView {
    fn id(&self) -> &'static str {
        ID
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        match key.code {
            KeyCode::Enter => self.submit_line(ctx),
            KeyCode::Up => {
                self.history_step(true);
                Action::None
            }
            KeyCode::Down => {
                self.history_step(false);
                Action::None
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.lines.clear();
                Action::None
            }
            _ => {
                self.input.handle_key(key);
                Action::None
            }
        }
    }

    fn on_reply(&mut self, reply: &ServiceReply, ctx: &mut Context) -> Action {
        if self.pending_exec == Some(reply.ticket) {
            self.pending_exec = None;
            match &reply.result {
                Ok(ServiceOutput::Command(outcome)) => {
                    self.push(LineKind::Output, format!("[{}] {}", outcome.action, outcome.data));
                    for citation in &outcome.citations {
                        self.push(LineKind::Output, format!("  ↳ {citation}"));
                    }
                }
                Ok(other) => self.push(LineKind::Output, other.summary()),
                Err(err) => self.push(LineKind::Error, format!("error: {err}")),
            }
            return Action::None;
        }

        let Some(event) = self
            .pipeline
            .as_mut()
            .and_then(|pipeline| pipeline.on_reply(reply, ctx))
        else {
            return Action::None;
        };
        match event {
            PipelineEvent::Progress(text) => {
                self.push(LineKind::Agent, text);
                Action::None
            }
            PipelineEvent::Completed(text) => {
                self.push(LineKind::System, text.clone());
                Action::notify(text, NotifyLevel::Agent)
            }
            PipelineEvent::Failed(reason) => {
                self.push(LineKind::Error, format!("Task failed: {reason}"));
                Action::notify(format!("Autonomous task failed: {reason}"), NotifyLevel::Error)
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let show_task = self.pipeline.is_some() && area.width >= 80;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(if show_task {
                vec![Constraint::Percentage(62), Constraint::Percentage(38)]
            } else {
                vec![Constraint::Percentage(100)]
            })
            .split(area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(columns[0]);

        let visible = rows[0].height.saturating_sub(2) as usize;
        let start = self.lines.len().saturating_sub(visible);
        let lines: Vec<Line> = self.lines[start..]
            .iter()
            .map(|line| {
                let style = match line.kind {
                    LineKind::Input => Style::default().fg(ctx.theme.accent_color()),
                    LineKind::Output => Style::default().fg(Color::White),
                    LineKind::System => Style::default().fg(Color::DarkGray),
                    LineKind::Agent => Style::default().fg(Color::Magenta),
                    LineKind::Error => Style::default().fg(Color::Red),
                };
                Line::from(Span::styled(line.text.clone(), style))
            })
            .collect();
        let output = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Output "))
            .wrap(Wrap { trim: false });
        frame.render_widget(output, rows[0]);

        let busy = self.pending_exec.is_some()
            || self.pipeline.as_ref().is_some_and(Pipeline::is_running);
        let title = if busy { " Input (working…) " } else { " Input " };
        self.input.render(
            frame,
            rows[1],
            "$ ",
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(ctx.theme.accent_color())),
            true,
        );

        if show_task {
            if let Some(pipeline) = &self.pipeline {
                render_task(frame, columns[1], pipeline);
            }
        }
    }
}

fn render_task(frame: &mut Frame, area: Rect, pipeline: &Pipeline) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let mut items = vec![ListItem::new(Line::from(Span::styled(
        pipeline.goal().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )))];
    if let Some(task) = pipeline.task() {
        items.push(ListItem::new(format!("status: {}", task.status.label())));
        for subtask in &task.subtasks {
            let (icon, color) = match subtask.status {
                TaskStatus::Completed => ("✓", Color::Green),
                TaskStatus::Failed => ("✗", Color::Red),
                TaskStatus::Running | TaskStatus::Executing => ("▶", Color::Yellow),
                TaskStatus::Pending => ("·", Color::DarkGray),
            };
            items.push(ListItem::new(Line::from(vec![
                Span::styled(format!("{icon} "), Style::default().fg(color)),
                Span::raw(subtask.title.clone()),
            ])));
        }
    }
    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Task ")),
        rows[0],
    );

    let visible = rows[1].height.saturating_sub(2) as usize;
    let ledger = pipeline.ledger();
    let start = ledger.len().saturating_sub(visible);
    let entries: Vec<ListItem> = ledger[start..]
        .iter()
        .map(|entry| {
            let color = match entry.kind {
                LedgerKind::Thought => Color::Magenta,
                LedgerKind::Action => Color::Cyan,
                LedgerKind::System => Color::DarkGray,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<7} ", entry.kind.tag()), Style::default().fg(color)),
                Span::raw(entry.content.clone()),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(entries).block(Block::default().borders(Borders::ALL).title(" Ledger ")),
        rows[1],
    );
}
