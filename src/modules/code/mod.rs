//! Code Lab - small editor wired to the AI code operations

mod editor;

pub use editor::Editor;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs};
use ratatui::Frame;
use tracing::debug;

use crate::core::{Action, AppView, Context, NotifyLevel};
use crate::domain::{CodeAnalysis, CodeFile, Severity, TestReport, TestStatus};
use crate::infrastructure::{ServiceReply, Ticket};
use crate::service::{ServiceCall, ServiceOutput};

pub const ID: &str = "code";

pub const DEFAULT_FILE: &str = "main.py";
pub const DEFAULT_CONTENT: &str = "# Enterprise script";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTask {
    Complete,
    Analyze,
    Evolve,
    GenerateTests,
    RunTests,
}

impl CodeTask {
    fn label(self) -> &'static str {
        match self {
            CodeTask::Complete => "Completing",
            CodeTask::Analyze => "Analyzing",
            CodeTask::Evolve => "Evolving",
            CodeTask::GenerateTests => "Generating tests",
            CodeTask::RunTests => "Running tests",
        }
    }
}

pub struct CodeView {
    files: Vec<Editor>,
    active: usize,
    /// In-flight call and the file index it belongs to
    pending: Option<(Ticket, CodeTask, usize)>,
    analysis: Option<CodeAnalysis>,
    tests: Option<String>,
    report: Option<TestReport>,
    status: Option<(String, bool)>,
    scratch: u32,
}

pub fn mount(ctx: &mut Context) -> Box<dyn AppView> {
    Box::new(CodeView::new(ctx))
}

impl CodeView {
    /// Starts with the default script, plus anything pushed while unmounted.
    pub fn new(ctx: &mut Context) -> Self {
        let mut view = Self {
            files: vec![Editor::new(CodeFile::new(DEFAULT_FILE, DEFAULT_CONTENT))],
            active: 0,
            pending: None,
            analysis: None,
            tests: None,
            report: None,
            status: None,
            scratch: 0,
        };
        if let Some(file) = ctx.take_pushed_code() {
            view.open(file);
        }
        view
    }

    pub fn files(&self) -> &[Editor] {
        &self.files
    }

    pub fn active(&self) -> &Editor {
        &self.files[self.active]
    }

    pub fn analysis(&self) -> Option<&CodeAnalysis> {
        self.analysis.as_ref()
    }

    pub fn report(&self) -> Option<&TestReport> {
        self.report.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Open `file`, replacing a file of the same name.
    pub fn open(&mut self, file: CodeFile) {
        match self.files.iter().position(|f| f.name() == file.name) {
            Some(idx) => {
                self.files[idx].replace(&file.content);
                self.active = idx;
            }
            None => {
                self.files.push(Editor::new(file));
                self.active = self.files.len() - 1;
            }
        }
        self.analysis = None;
        self.report = None;
    }

    fn set_status(&mut self, text: impl Into<String>, error: bool) {
        self.status = Some((text.into(), error));
    }

    fn start(&mut self, task: CodeTask, ctx: &Context) {
        if let Some((_, running, _)) = self.pending {
            self.set_status(format!("{} in progress…", running.label()), false);
            return;
        }
        let file = self.active().to_file();
        let call = match task {
            CodeTask::Complete => ServiceCall::CodeCompletion {
                file_name: file.name,
                content: file.content,
            },
            CodeTask::Analyze => ServiceCall::AnalyzeCode {
                file_name: file.name,
                content: file.content,
            },
            CodeTask::Evolve => ServiceCall::EvolveCodebase {
                file_name: file.name,
                content: file.content,
                patterns: ctx.patterns.clone(),
            },
            CodeTask::GenerateTests => ServiceCall::GenerateTests {
                file_name: file.name,
                content: file.content,
            },
            CodeTask::RunTests => {
                let Some(tests) = self.tests.clone() else {
                    self.set_status("No tests yet. Press Ctrl+T to generate them.", true);
                    return;
                };
                ServiceCall::RunTests {
                    file_name: file.name,
                    tests,
                }
            }
        };
        match ctx.service.submit(call) {
            Ok(ticket) => {
                debug!(?task, %ticket, "code task submitted");
                self.pending = Some((ticket, task, self.active));
                self.set_status(format!("{}…", task.label()), false);
            }
            Err(err) => self.set_status(err.to_string(), true),
        }
    }

    fn new_scratch(&mut self) {
        self.scratch += 1;
        let name = format!("scratch_{}.py", self.scratch);
        self.open(CodeFile::new(name, ""));
    }

    fn cycle(&mut self, forward: bool) {
        let len = self.files.len();
        self.active = if forward {
            (self.active + 1) % len
        } else {
            (self.active + len - 1) % len
        };
    }
}

impl AppView for CodeView {
    fn id(&self) -> &'static str {
        ID
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('k') => self.start(CodeTask::Complete, ctx),
                KeyCode::Char('a') => self.start(CodeTask::Analyze, ctx),
                KeyCode::Char('e') => self.start(CodeTask::Evolve, ctx),
                KeyCode::Char('t') => self.start(CodeTask::GenerateTests, ctx),
                KeyCode::Char('r') => self.start(CodeTask::RunTests, ctx),
                KeyCode::Char('y') => {
                    let content = self.active().content();
                    self.set_status(format!("Copied {}", self.active().name()), false);
                    return Action::Copy(content);
                }
                KeyCode::Char('n') => self.new_scratch(),
                _ => {}
            }
            return Action::None;
        }
        match key.code {
            KeyCode::Tab => self.cycle(true),
            KeyCode::BackTab => self.cycle(false),
            _ => {
                let active = self.active;
                self.files[active].handle_key(key);
            }
        }
        Action::None
    }

    fn on_reply(&mut self, reply: &ServiceReply, _ctx: &mut Context) -> Action {
        let Some((ticket, task, file)) = self.pending else {
            return Action::None;
        };
        if ticket != reply.ticket {
            return Action::None;
        }
        self.pending = None;

        let output = match &reply.result {
            Ok(output) => output,
            Err(err) => {
                self.set_status(format!("{} failed: {err}", task.label()), true);
                return Action::None;
            }
        };
        let name = self.files.get(file).map(|f| f.name().to_string()).unwrap_or_default();
        match (task, output) {
            (CodeTask::Complete, ServiceOutput::Text(text)) => {
                if let Some(editor) = self.files.get_mut(file) {
                    editor.append(text);
                }
                self.set_status("Completion inserted", false);
            }
            (CodeTask::Analyze, ServiceOutput::Analysis(analysis)) => {
                let worst = analysis.issues.iter().map(|i| i.severity).max();
                self.set_status(format!("{} issue(s) in {name}", analysis.issues.len()), false);
                self.analysis = Some(analysis.clone());
                if worst == Some(Severity::High) {
                    return Action::notify(
                        format!("High severity issue found in {name}"),
                        NotifyLevel::Warn,
                    );
                }
            }
            (CodeTask::Evolve, ServiceOutput::Text(text)) => {
                if let Some(editor) = self.files.get_mut(file) {
                    editor.replace(text);
                }
                self.set_status("Codebase evolved", false);
                return Action::notify(format!("{name} evolved"), NotifyLevel::Learning);
            }
            (CodeTask::GenerateTests, ServiceOutput::Text(text)) => {
                self.tests = Some(text.clone());
                self.set_status("Tests generated. Press Ctrl+R to run them.", false);
            }
            (CodeTask::RunTests, ServiceOutput::Report(report)) => {
                let summary = format!(
                    "{}/{} passed in {}",
                    report.summary.passed, report.summary.total, report.summary.duration
                );
                let level = if report.summary.failed == 0 {
                    NotifyLevel::Success
                } else {
                    NotifyLevel::Error
                };
                self.report = Some(report.clone());
                self.set_status(summary.clone(), level == NotifyLevel::Error);
                return Action::notify(format!("Tests: {summary}"), level);
            }
            (_, other) => self.set_status(other.summary(), false),
        }
        Action::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let accent = ctx.theme.accent_color();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        let titles: Vec<Line> = self.files.iter().map(|f| Line::from(f.name().to_string())).collect();
        frame.render_widget(
            Tabs::new(titles)
                .select(self.active)
                .highlight_style(Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            rows[0],
        );

        let side_panel = self.analysis.is_some() || self.report.is_some();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(if side_panel {
                vec![Constraint::Percentage(60), Constraint::Percentage(40)]
            } else {
                vec![Constraint::Percentage(100)]
            })
            .split(rows[1]);

        render_editor(frame, columns[0], self.active(), accent);
        if side_panel {
            self.render_panel(frame, columns[1]);
        }

        let (text, style) = match &self.status {
            Some((text, true)) => (text.clone(), Style::default().fg(Color::Red)),
            Some((text, false)) => (text.clone(), Style::default().fg(Color::DarkGray)),
            None => (
                "^K complete  ^A analyze  ^E evolve  ^T tests  ^R run  ^Y copy  ^N new  Tab files"
                    .to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(Span::styled(text, style)), rows[2]);
    }
}

impl CodeView {
    fn render_panel(&self, frame: &mut Frame, area: Rect) {
        let mut items = Vec::new();
        if let Some(analysis) = &self.analysis {
            for issue in &analysis.issues {
                let color = match issue.severity {
                    Severity::High => Color::Red,
                    Severity::Medium => Color::Yellow,
                    Severity::Low => Color::Blue,
                };
                let at = issue.line.map(|l| format!(" L{l}")).unwrap_or_default();
                items.push(ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(
                            format!("[{}] ", issue.severity.label()),
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!("{}{at}", issue.kind.label())),
                    ]),
                    Line::from(format!("  {}", issue.description)),
                ]));
            }
        }
        if let Some(report) = &self.report {
            items.push(ListItem::new(Line::from(Span::styled(
                format!(
                    "Tests {}/{} passed ({})",
                    report.summary.passed, report.summary.total, report.summary.duration
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ))));
            for result in &report.results {
                let (icon, color) = match result.status {
                    TestStatus::Passed => ("✓", Color::Green),
                    TestStatus::Failed => ("✗", Color::Red),
                    TestStatus::Running | TestStatus::Pending => ("·", Color::DarkGray),
                };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("{icon} "), Style::default().fg(color)),
                    Span::raw(format!("{} ({})", result.name, result.duration)),
                ])));
            }
        }
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(" Insights ")),
            area,
        );
    }
}

fn render_editor(frame: &mut Frame, area: Rect, editor: &Editor, accent: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", editor.name()))
        .border_style(Style::default().fg(accent));
    let inner = block.inner(area);
    let (row, col) = editor.cursor();

    let height = inner.height as usize;
    let top = (row + 1).saturating_sub(height);
    let lines: Vec<Line> = editor
        .lines()
        .iter()
        .enumerate()
        .skip(top)
        .take(height)
        .map(|(idx, text)| {
            Line::from(vec![
                Span::styled(format!("{:>3} ", idx + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(text.clone()),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);

    if inner.width > 4 && inner.height > 0 {
        let x = inner.x + (4 + col as u16).min(inner.width - 1);
        let y = inner.y + (row - top) as u16;
        frame.set_cursor(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CodeIssue, IssueKind, Profile};
    use crate::infrastructure::runtime::RuntimeCommand;
    use crate::infrastructure::ServiceClient;
    use crate::service::ServiceError;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn next_call(rx: &mut UnboundedReceiver<RuntimeCommand>) -> (Ticket, ServiceCall) {
        match rx.try_recv() {
            Ok(RuntimeCommand::Call { ticket, call }) => (ticket, call),
            other => panic!("expected a call, got {other:?}"),
        }
    }

    #[test]
    fn test_starts_with_default_script() {
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        let view = CodeView::new(&mut ctx);
        assert_eq!(view.active().name(), "main.py");
        assert_eq!(view.active().content(), "# Enterprise script");
    }

    #[test]
    fn test_picks_up_pushed_code() {
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        ctx.push_code(CodeFile::new("agent.py", "print('agent')"));
        let view = CodeView::new(&mut ctx);
        assert_eq!(view.files().len(), 2);
        assert_eq!(view.active().name(), "agent.py");
        assert!(ctx.pushed_code.is_none());
    }

    #[test]
    fn test_analyze_populates_issues() {
        let (client, mut rx) = ServiceClient::pair();
        let mut ctx = Context::new(Profile::mock(), client);
        let mut view = CodeView::new(&mut ctx);

        view.handle_key(ctrl('a'), &mut ctx);
        assert!(view.is_busy());
        let (ticket, call) = next_call(&mut rx);
        assert_eq!(call.operation(), "analyze_code");

        let analysis = CodeAnalysis {
            issues: vec![CodeIssue {
                severity: Severity::High,
                kind: IssueKind::Security,
                line: Some(1),
                description: "eval".into(),
                fix_suggestion: None,
            }],
        };
        let action = view.on_reply(
            &ServiceReply {
                ticket,
                operation: "analyze_code",
                result: Ok(ServiceOutput::Analysis(analysis)),
            },
            &mut ctx,
        );
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Warn)));
        assert_eq!(view.analysis().map(|a| a.issues.len()), Some(1));
        assert!(!view.is_busy());
    }

    #[test]
    fn test_run_tests_needs_generated_tests() {
        let (client, mut rx) = ServiceClient::pair();
        let mut ctx = Context::new(Profile::mock(), client);
        let mut view = CodeView::new(&mut ctx);

        view.handle_key(ctrl('r'), &mut ctx);
        assert!(rx.try_recv().is_err());
        assert!(view.status().unwrap().contains("Ctrl+T"));

        view.handle_key(ctrl('t'), &mut ctx);
        let (ticket, _) = next_call(&mut rx);
        view.on_reply(
            &ServiceReply {
                ticket,
                operation: "generate_tests",
                result: Ok(ServiceOutput::Text("it('works')".into())),
            },
            &mut ctx,
        );
        view.handle_key(ctrl('r'), &mut ctx);
        let (_, call) = next_call(&mut rx);
        assert!(matches!(call, ServiceCall::RunTests { ref tests, .. } if tests == "it('works')"));
    }

    #[test]
    fn test_failure_surfaces_inline() {
        let (client, mut rx) = ServiceClient::pair();
        let mut ctx = Context::new(Profile::mock(), client);
        let mut view = CodeView::new(&mut ctx);
        view.handle_key(ctrl('k'), &mut ctx);
        let (ticket, _) = next_call(&mut rx);
        view.on_reply(
            &ServiceReply {
                ticket,
                operation: "code_completion",
                result: Err(ServiceError::Timeout {
                    operation: "code_completion",
                    elapsed: std::time::Duration::from_secs(5),
                }),
            },
            &mut ctx,
        );
        assert!(view.status().unwrap().contains("failed"));
        assert_eq!(view.active().content(), DEFAULT_CONTENT);
    }

    #[test]
    fn test_copy_and_scratch_files() {
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        let mut view = CodeView::new(&mut ctx);
        assert_eq!(
            view.handle_key(ctrl('y'), &mut ctx),
            Action::Copy(DEFAULT_CONTENT.to_string())
        );
        view.handle_key(ctrl('n'), &mut ctx);
        assert_eq!(view.active().name(), "scratch_1.py");
        view.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE), &mut ctx);
        assert_eq!(view.active().name(), "main.py");
        view.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT), &mut ctx);
        assert_eq!(view.active().name(), "scratch_1.py");
    }
}
