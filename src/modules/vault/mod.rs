//! Knowledge Vault - browse, filter and export knowledge items

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, AppView, Context, NotifyLevel};
use crate::domain::KnowledgeItem;
use crate::infrastructure::export::{export_knowledge, ExportFormat};
use crate::infrastructure::{ServiceReply, Ticket};
use crate::service::{ServiceCall, ServiceOutput};
use crate::ui::widgets::TextInput;

pub const ID: &str = "vault";

/// `#tag` matches a tag exactly (ignoring case); anything else is a
/// substring search over title and content.
pub fn matches(item: &KnowledgeItem, filter: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() {
        return true;
    }
    if let Some(tag) = filter.strip_prefix('#') {
        return item.tags.iter().any(|t| t.eq_ignore_ascii_case(tag));
    }
    let needle = filter.to_lowercase();
    item.title.to_lowercase().contains(&needle) || item.content.to_lowercase().contains(&needle)
}

pub struct VaultView {
    selected: usize,
    filter: String,
    editing: Option<TextInput>,
    prompts: Vec<String>,
    pending: Option<Ticket>,
    error: Option<String>,
}

pub fn mount(_ctx: &mut Context) -> Box<dyn AppView> {
    Box::new(VaultView::new())
}

impl VaultView {
    pub fn new() -> Self {
        Self {
            selected: 0,
            filter: String::new(),
            editing: None,
            prompts: Vec::new(),
            pending: None,
            error: None,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Indices into the context's knowledge that pass the filter
    pub fn visible(&self, ctx: &Context) -> Vec<usize> {
        ctx.knowledge
            .iter()
            .enumerate()
            .filter(|(_, item)| matches(item, &self.filter))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn selected_item<'a>(&self, ctx: &'a Context) -> Option<&'a KnowledgeItem> {
        self.visible(ctx)
            .get(self.selected)
            .and_then(|&idx| ctx.knowledge.get(idx))
    }

    fn clamp(&mut self, ctx: &Context) {
        let len = self.visible(ctx).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn delete(&mut self, ctx: &mut Context) -> Action {
        let Some(&idx) = self.visible(ctx).get(self.selected) else {
            return Action::None;
        };
        let item = ctx.knowledge.remove(idx);
        self.clamp(ctx);
        Action::notify(format!("Removed \"{}\"", item.title), NotifyLevel::Info)
    }

    fn export(&mut self, format: ExportFormat, ctx: &Context) -> Action {
        let items: Vec<KnowledgeItem> = self
            .visible(ctx)
            .into_iter()
            .filter_map(|idx| ctx.knowledge.get(idx).cloned())
            .collect();
        match export_knowledge(&ctx.export_dir, &items, format) {
            Ok(path) => Action::notify(
                format!("Exported {} item(s) to {}", items.len(), path.display()),
                NotifyLevel::Success,
            ),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "vault export failed");
                Action::notify(format!("Export failed: {err:#}"), NotifyLevel::Error)
            }
        }
    }

    fn request_prompts(&mut self, ctx: &Context) {
        if self.pending.is_some() {
            return;
        }
        let context = self
            .selected_item(ctx)
            .map(|item| format!("{}: {}", item.title, item.content))
            .unwrap_or_else(|| "knowledge vault".to_string());
        match ctx.service.submit(ServiceCall::NeuralPrompts { context }) {
            Ok(ticket) => {
                self.pending = Some(ticket);
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}

impl Default for VaultView {
    fn default() -> Self {
        Self::new()
    }
}

impl AppView for VaultView {
    fn id(&self) -> &'static str {
        ID
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        if let Some(input) = self.editing.as_mut() {
            if key.code == KeyCode::Enter {
                self.filter = input.value().trim().to_string();
                self.editing = None;
                self.selected = 0;
            } else {
                input.handle_key(key);
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected += 1;
                self.clamp(ctx);
            }
            KeyCode::Char('d') | KeyCode::Delete => return self.delete(ctx),
            KeyCode::Char('/') => {
                let mut input = TextInput::new();
                input.set(self.filter.clone());
                self.editing = Some(input);
            }
            KeyCode::Char('p') => self.request_prompts(ctx),
            KeyCode::Char('e') => return self.export(ExportFormat::Json, ctx),
            KeyCode::Char('c') => return self.export(ExportFormat::Csv, ctx),
            _ => {}
        }
        Action::None
    }

    fn on_reply(&mut self, reply: &ServiceReply, _ctx: &mut Context) -> Action {
        if self.pending != Some(reply.ticket) {
            return Action::None;
        }
        self.pending = None;
        match &reply.result {
            Ok(ServiceOutput::Prompts(prompts)) => {
                self.prompts = prompts.clone();
                Action::notify(
                    format!("{} neural prompt(s) ready", prompts.len()),
                    NotifyLevel::Learning,
                )
            }
            Ok(other) => {
                self.prompts = vec![other.summary()];
                Action::None
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Action::None
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let accent = ctx.theme.accent_color();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        let filter_block = Block::default()
            .borders(Borders::ALL)
            .title(" Filter  / edit · Enter apply · #tag ");
        match &self.editing {
            Some(input) => input.render(
                frame,
                rows[0],
                "/",
                filter_block.border_style(Style::default().fg(accent)),
                true,
            ),
            None => {
                let text = if self.filter.is_empty() {
                    Span::styled("(none)", Style::default().fg(Color::DarkGray))
                } else {
                    Span::raw(self.filter.clone())
                };
                frame.render_widget(Paragraph::new(text).block(filter_block), rows[0]);
            }
        }

        let visible = self.visible(ctx);
        let items: Vec<ListItem> = visible
            .iter()
            .filter_map(|&idx| ctx.knowledge.get(idx))
            .map(|item| {
                let tags = item
                    .tags
                    .iter()
                    .map(|t| format!("#{t}"))
                    .collect::<Vec<_>>()
                    .join(" ");
                ListItem::new(vec![
                    Line::from(Span::styled(
                        item.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(tags, Style::default().fg(Color::DarkGray))),
                ])
            })
            .collect();
        let mut state = ListState::default();
        if !visible.is_empty() {
            state.select(Some(self.selected.min(visible.len() - 1)));
        }
        frame.render_stateful_widget(
            List::new(items)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" Items ({}/{}) ", visible.len(), ctx.knowledge.len())),
                )
                .highlight_style(Style::default().fg(accent))
                .highlight_symbol("▶ "),
            columns[0],
            &mut state,
        );

        let mut detail: Vec<Line> = match self.selected_item(ctx) {
            Some(item) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        item.title.clone(),
                        Style::default().fg(accent).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        item.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                        Style::default().fg(Color::DarkGray),
                    )),
                    Line::from(""),
                    Line::from(item.content.clone()),
                ];
                if let Some(url) = &item.url {
                    lines.push(Line::from(Span::styled(
                        url.clone(),
                        Style::default().fg(Color::Blue),
                    )));
                }
                lines
            }
            None => vec![Line::from(Span::styled(
                "No matching items",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        if self.pending.is_some() {
            detail.push(Line::from(""));
            detail.push(Line::from(Span::styled(
                "Generating neural prompts…",
                Style::default().fg(Color::Yellow),
            )));
        }
        if !self.prompts.is_empty() {
            detail.push(Line::from(""));
            detail.push(Line::from(Span::styled(
                "Neural prompts",
                Style::default().fg(Color::Magenta),
            )));
            for prompt in &self.prompts {
                detail.push(Line::from(format!("  • {prompt}")));
            }
        }
        if let Some(error) = &self.error {
            detail.push(Line::from(Span::styled(
                format!("⚠ {error}"),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(
            Paragraph::new(detail)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Detail  d delete · p prompts · e json · c csv "),
                )
                .wrap(Wrap { trim: true }),
            columns[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Profile;
    use crate::infrastructure::ServiceClient;

    fn press(view: &mut VaultView, ctx: &mut Context, code: KeyCode) -> Action {
        view.handle_key(KeyEvent::from(code), ctx)
    }

    #[test]
    fn test_filter_by_text_and_tag() {
        let seed = KnowledgeItem::seed();
        assert!(matches(&seed[0], "#MESH"));
        assert!(!matches(&seed[1], "#mesh"));
        assert!(matches(&seed[1], "checklist"));
        assert!(matches(&seed[2], ""));
    }

    #[test]
    fn test_filter_editing_and_selection() {
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        let mut view = VaultView::new();
        press(&mut view, &mut ctx, KeyCode::Char('/'));
        for ch in "#research".chars() {
            press(&mut view, &mut ctx, KeyCode::Char(ch));
        }
        // `d` while editing types into the filter, it does not delete.
        assert_eq!(ctx.knowledge.len(), 3);
        press(&mut view, &mut ctx, KeyCode::Enter);
        assert_eq!(view.filter(), "#research");
        assert_eq!(view.visible(&ctx).len(), 1);
        assert_eq!(view.selected_item(&ctx).map(|i| i.id.as_str()), Some("k3"));
    }

    #[test]
    fn test_delete_removes_selected_and_clamps() {
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        let mut view = VaultView::new();
        press(&mut view, &mut ctx, KeyCode::Down);
        press(&mut view, &mut ctx, KeyCode::Down);
        press(&mut view, &mut ctx, KeyCode::Down);
        let action = press(&mut view, &mut ctx, KeyCode::Char('d'));
        assert!(matches!(action, Action::Notify(ref m, NotifyLevel::Info) if m.contains("Neural sync")));
        assert_eq!(ctx.knowledge.len(), 2);
        assert_eq!(view.selected_item(&ctx).map(|i| i.id.as_str()), Some("k2"));
    }

    #[test]
    fn test_export_writes_into_export_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        ctx.export_dir = tmp.path().join("exports");
        let mut view = VaultView::new();

        let action = press(&mut view, &mut ctx, KeyCode::Char('e'));
        assert!(matches!(action, Action::Notify(ref m, NotifyLevel::Success) if m.contains("3 item(s)")));
        let written: Vec<_> = std::fs::read_dir(&ctx.export_dir).unwrap().collect();
        assert_eq!(written.len(), 1);
    }

    #[test]
    fn test_prompts_failure_is_inline() {
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        let mut view = VaultView::new();
        press(&mut view, &mut ctx, KeyCode::Char('p'));
        assert!(view.error.is_some());
        assert!(view.prompts().is_empty());
    }
}
