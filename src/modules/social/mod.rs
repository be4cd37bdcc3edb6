//! Social Hub - mock accounts, a feed and AI-written posts

use std::collections::HashMap;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::core::{Action, AppView, Context, NotifyLevel};
use crate::domain::{Platform, Post, PostStats, SentimentData, SocialAccount};
use crate::infrastructure::{ServiceReply, Ticket};
use crate::service::{ServiceCall, ServiceOutput};

pub const ID: &str = "social";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SocialTask {
    Post(usize),
    Sentiment,
    Avatar(usize),
}

pub struct SocialView {
    accounts: Vec<SocialAccount>,
    posts: Vec<Post>,
    selected: usize,
    pending: HashMap<Ticket, SocialTask>,
    sentiment: Option<SentimentData>,
    error: Option<String>,
    next_post: u64,
}

pub fn mount(_ctx: &mut Context) -> Box<dyn AppView> {
    Box::new(SocialView::new())
}

fn mock_accounts() -> Vec<SocialAccount> {
    let account = |id: &str, platform, handle: &str, followers, rate: &str, strategy: &str| {
        SocialAccount {
            id: id.to_string(),
            platform,
            handle: handle.to_string(),
            bio: format!("Official {} presence", Platform::title(&platform)),
            avatar: String::new(),
            followers,
            engagement_rate: rate.to_string(),
            strategy: strategy.to_string(),
        }
    };
    vec![
        account("s1", Platform::Twitter, "@clone_os", 12_400, "4.2%", "Short technical threads"),
        account("s2", Platform::Instagram, "@clone.os", 8_100, "6.8%", "Behind-the-scenes visuals"),
        account("s3", Platform::LinkedIn, "Clone-OS", 3_900, "2.9%", "Enterprise case studies"),
    ]
}

impl SocialView {
    pub fn new() -> Self {
        Self {
            accounts: mock_accounts(),
            posts: Vec::new(),
            selected: 0,
            pending: HashMap::new(),
            sentiment: None,
            error: None,
            next_post: 1,
        }
    }

    pub fn accounts(&self) -> &[SocialAccount] {
        &self.accounts
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn sentiment(&self) -> Option<&SentimentData> {
        self.sentiment.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    fn submit(&mut self, task: SocialTask, call: ServiceCall, ctx: &Context) {
        match ctx.service.submit(call) {
            Ok(ticket) => {
                self.error = None;
                self.pending.insert(ticket, task);
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    fn generate_post(&mut self, ctx: &Context) {
        let account = &self.accounts[self.selected];
        let prompt = format!(
            "Write a {} post for {} following the strategy: {}",
            account.platform.title(),
            account.handle,
            account.strategy
        );
        let call = ServiceCall::GenerateContent {
            prompt,
            persona: Some(ctx.profile().persona_prompt()),
        };
        self.submit(SocialTask::Post(self.selected), call, ctx);
    }

    fn analyze_sentiment(&mut self, ctx: &Context) {
        let transcript = self
            .posts
            .iter()
            .take(10)
            .map(|post| post.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.submit(SocialTask::Sentiment, ServiceCall::MeetingSentiment { transcript }, ctx);
    }

    fn generate_avatar(&mut self, ctx: &Context) {
        let account = &self.accounts[self.selected];
        let prompt = format!("Profile avatar for {} on {}", account.handle, account.platform.title());
        self.submit(
            SocialTask::Avatar(self.selected),
            ServiceCall::GenerateImage { prompt },
            ctx,
        );
    }
}

impl Default for SocialView {
    fn default() -> Self {
        Self::new()
    }
}

impl AppView for SocialView {
    fn id(&self) -> &'static str {
        ID
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.accounts.len() - 1)
            }
            KeyCode::Char('g') => self.generate_post(ctx),
            KeyCode::Char('s') => self.analyze_sentiment(ctx),
            KeyCode::Char('i') => self.generate_avatar(ctx),
            _ => {}
        }
        Action::None
    }

    fn on_reply(&mut self, reply: &ServiceReply, _ctx: &mut Context) -> Action {
        let Some(task) = self.pending.remove(&reply.ticket) else {
            return Action::None;
        };
        let output = match &reply.result {
            Ok(output) => output,
            Err(err) => {
                self.error = Some(err.to_string());
                return Action::None;
            }
        };
        match (task, output) {
            (SocialTask::Post(idx), ServiceOutput::Text(text)) => {
                let Some(account) = self.accounts.get(idx) else {
                    return Action::None;
                };
                let platform = account.platform.title();
                self.posts.insert(
                    0,
                    Post {
                        id: format!("p{}", self.next_post),
                        account_id: account.id.clone(),
                        content: text.clone(),
                        image_url: None,
                        timestamp: Local::now(),
                        stats: PostStats::default(),
                    },
                );
                self.next_post += 1;
                Action::notify(format!("Post published to {platform}"), NotifyLevel::Success)
            }
            (SocialTask::Sentiment, ServiceOutput::Sentiment(data)) => {
                self.sentiment = Some(data.clone());
                Action::None
            }
            (SocialTask::Avatar(idx), ServiceOutput::Image(url) | ServiceOutput::Text(url)) => {
                if let Some(account) = self.accounts.get_mut(idx) {
                    account.avatar = url.clone();
                }
                Action::None
            }
            (_, other) => {
                self.error = Some(format!("unexpected {} output: {}", reply.operation, other.summary()));
                Action::None
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let accent = ctx.theme.accent_color();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(20)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(5)])
            .split(columns[0]);

        let items: Vec<ListItem> = self
            .accounts
            .iter()
            .map(|account| {
                let avatar = if account.avatar.is_empty() { "○" } else { "●" };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(format!("{avatar} ")),
                        Span::styled(account.handle.clone(), Style::default().add_modifier(Modifier::BOLD)),
                        Span::styled(
                            format!("  {}", account.platform.title()),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]),
                    Line::from(Span::styled(
                        format!("  {} followers · {}", account.followers, account.engagement_rate),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect();
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(
            List::new(items)
                .block(Block::default().borders(Borders::ALL).title(" Accounts "))
                .highlight_style(Style::default().fg(accent))
                .highlight_symbol("▶ "),
            left[0],
            &mut state,
        );

        let mut insight = match &self.sentiment {
            Some(data) => vec![Line::from(format!(
                "{} ({:.2}) {}",
                data.label,
                data.score,
                data.trend.as_deref().unwrap_or("")
            ))],
            None => vec![Line::from(Span::styled(
                "press s for sentiment",
                Style::default().fg(Color::DarkGray),
            ))],
        };
        if !self.pending.is_empty() {
            insight.push(Line::from(Span::styled(
                format!("{} request(s) in flight…", self.pending.len()),
                Style::default().fg(Color::Yellow),
            )));
        }
        if let Some(error) = &self.error {
            insight.push(Line::from(Span::styled(format!("⚠ {error}"), Style::default().fg(Color::Red))));
        }
        frame.render_widget(
            Paragraph::new(insight)
                .block(Block::default().borders(Borders::ALL).title(" Sentiment "))
                .wrap(Wrap { trim: true }),
            left[1],
        );

        let mut feed: Vec<Line> = Vec::new();
        for post in &self.posts {
            let handle = self
                .accounts
                .iter()
                .find(|a| a.id == post.account_id)
                .map(|a| a.handle.as_str())
                .unwrap_or("?");
            feed.push(Line::from(vec![
                Span::styled(handle.to_string(), Style::default().fg(accent).add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {}", post.timestamp.format("%H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
            feed.push(Line::from(post.content.clone()));
            feed.push(Line::from(Span::styled(
                format!(
                    "♥ {}  ↻ {}  ✎ {}",
                    post.stats.likes, post.stats.shares, post.stats.comments
                ),
                Style::default().fg(Color::DarkGray),
            )));
            feed.push(Line::from(""));
        }
        if feed.is_empty() {
            feed.push(Line::from(Span::styled(
                "No posts yet. Press g to generate one for the selected account.",
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(
            Paragraph::new(feed)
                .block(Block::default().borders(Borders::ALL).title(" Feed  g post · s sentiment · i avatar "))
                .wrap(Wrap { trim: true }),
            columns[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Profile;
    use crate::infrastructure::runtime::RuntimeCommand;
    use crate::infrastructure::ServiceClient;

    fn press(view: &mut SocialView, ctx: &mut Context, code: KeyCode) -> Action {
        view.handle_key(KeyEvent::from(code), ctx)
    }

    #[test]
    fn test_selection_is_clamped() {
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        let mut view = SocialView::new();
        press(&mut view, &mut ctx, KeyCode::Up);
        assert_eq!(view.selected(), 0);
        for _ in 0..5 {
            press(&mut view, &mut ctx, KeyCode::Down);
        }
        assert_eq!(view.selected(), 2);
    }

    #[test]
    fn test_generated_post_lands_in_feed() {
        let (client, mut rx) = ServiceClient::pair();
        let mut ctx = Context::new(Profile::mock(), client);
        let mut view = SocialView::new();
        press(&mut view, &mut ctx, KeyCode::Down);
        press(&mut view, &mut ctx, KeyCode::Char('g'));
        assert_eq!(view.in_flight(), 1);

        let Ok(RuntimeCommand::Call { ticket, call }) = rx.try_recv() else {
            panic!("g should submit");
        };
        assert!(matches!(call, ServiceCall::GenerateContent { ref prompt, .. } if prompt.contains("Instagram")));

        let action = view.on_reply(
            &ServiceReply {
                ticket,
                operation: "generate_content",
                result: Ok(ServiceOutput::Text("New drop!".into())),
            },
            &mut ctx,
        );
        assert_eq!(action, Action::notify("Post published to Instagram", NotifyLevel::Success));
        assert_eq!(view.posts().len(), 1);
        assert_eq!(view.posts()[0].account_id, "s2");
        assert_eq!(view.in_flight(), 0);
    }

    #[test]
    fn test_sentiment_and_avatar_replies() {
        let (client, mut rx) = ServiceClient::pair();
        let mut ctx = Context::new(Profile::mock(), client);
        let mut view = SocialView::new();
        press(&mut view, &mut ctx, KeyCode::Char('s'));
        press(&mut view, &mut ctx, KeyCode::Char('i'));

        let mut tickets = Vec::new();
        while let Ok(RuntimeCommand::Call { ticket, call }) = rx.try_recv() {
            tickets.push((ticket, call.operation()));
        }
        assert_eq!(tickets.len(), 2);

        // Replies may arrive in any order.
        view.on_reply(
            &ServiceReply {
                ticket: tickets[1].0,
                operation: tickets[1].1,
                result: Ok(ServiceOutput::Image("https://img/avatar.png".into())),
            },
            &mut ctx,
        );
        view.on_reply(
            &ServiceReply {
                ticket: tickets[0].0,
                operation: tickets[0].1,
                result: Ok(ServiceOutput::Sentiment(SentimentData {
                    score: 0.8,
                    label: "Positive".into(),
                    trend: None,
                })),
            },
            &mut ctx,
        );
        assert_eq!(view.accounts()[0].avatar, "https://img/avatar.png");
        assert_eq!(view.sentiment().map(|s| s.label.as_str()), Some("Positive"));
    }
}
