//! Ops Center - live telemetry from the predictive service

pub mod health;
pub mod metrics;

pub use health::{health_items, HealthItem, OpsStatus};
pub use metrics::{CallCounters, TelemetryHistory};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;
use tracing::warn;

use crate::core::{Action, AppView, Context};
use crate::infrastructure::{ServiceReply, Ticket};
use crate::service::{ServiceCall, ServiceOutput};
use crate::ui::widgets::{sparkline_text, MiniSparkline};

pub const ID: &str = "ops";

/// Ticks between telemetry polls
pub const POLL_EVERY: u64 = 5;

pub struct OpsView {
    history: TelemetryHistory,
    counters: CallCounters,
    ticks: u64,
    pending: Option<Ticket>,
    last_error: Option<String>,
}

pub fn mount(ctx: &mut Context) -> Box<dyn AppView> {
    let mut view = OpsView::new();
    view.poll(ctx);
    Box::new(view)
}

impl OpsView {
    pub fn new() -> Self {
        Self {
            history: TelemetryHistory::default(),
            counters: CallCounters::default(),
            ticks: 0,
            pending: None,
            last_error: None,
        }
    }

    pub fn history(&self) -> &TelemetryHistory {
        &self.history
    }

    pub fn counters(&self) -> CallCounters {
        self.counters
    }

    pub fn is_polling(&self) -> bool {
        self.pending.is_some()
    }

    /// At most one poll in flight.
    fn poll(&mut self, ctx: &Context) {
        if self.pending.is_some() {
            return;
        }
        match ctx.service.submit(ServiceCall::PredictiveTelemetry) {
            Ok(ticket) => self.pending = Some(ticket),
            Err(err) => {
                self.counters.failure();
                self.last_error = Some(err.to_string());
            }
        }
    }
}

impl Default for OpsView {
    fn default() -> Self {
        Self::new()
    }
}

impl AppView for OpsView {
    fn id(&self) -> &'static str {
        ID
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        if key.code == KeyCode::Char('r') {
            self.poll(ctx);
        }
        Action::None
    }

    fn on_tick(&mut self, ctx: &mut Context) -> Action {
        self.ticks += 1;
        if self.ticks % POLL_EVERY == 0 {
            self.poll(ctx);
        }
        Action::None
    }

    fn on_reply(&mut self, reply: &ServiceReply, _ctx: &mut Context) -> Action {
        if self.pending != Some(reply.ticket) {
            return Action::None;
        }
        self.pending = None;
        match &reply.result {
            Ok(ServiceOutput::Telemetry(sample)) => {
                self.history.record(*sample);
                self.counters.success();
                self.last_error = None;
            }
            Ok(other) => {
                warn!(output = %other.summary(), "unexpected telemetry output");
                self.counters.failure();
            }
            Err(err) => {
                self.counters.failure();
                self.last_error = Some(err.to_string());
            }
        }
        Action::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(11), Constraint::Min(4)])
            .split(area);
        let series = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Length(3)])
            .margin(1)
            .split(rows[0]);
        frame.render_widget(
            Block::default().borders(Borders::ALL).title(" Telemetry "),
            rows[0],
        );

        let latest = self.history.latest();
        let charts = [
            ("CPU", self.history.cpu(), latest.map(|t| t.cpu), ctx.theme.accent_color()),
            ("RAM", self.history.ram(), latest.map(|t| t.ram), Color::Magenta),
            ("NET", self.history.net(), latest.map(|t| t.net), Color::Green),
        ];
        for (area, (label, data, value, color)) in series.iter().zip(charts.iter()) {
            let value = value.map(|v| v.to_string()).unwrap_or_else(|| "--".to_string());
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{label:<4}"), Style::default().fg(Color::DarkGray)),
                    Span::raw(value),
                ])),
                Rect { height: 1, ..*area },
            );
            let spark_area = Rect {
                y: area.y + 1,
                height: 1,
                ..*area
            };
            frame.render_widget(
                MiniSparkline::new(data).max(100).style(Style::default().fg(*color)),
                spark_area,
            );
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let items: Vec<ListItem> = health_items(latest, &self.counters)
            .into_iter()
            .map(|item| {
                let color = match item.status {
                    OpsStatus::Ok => Color::Green,
                    OpsStatus::Warning => Color::Yellow,
                    OpsStatus::Error => Color::Red,
                    OpsStatus::Unknown => Color::DarkGray,
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} {:<4} ", item.status.icon(), item.status.label()),
                        Style::default().fg(color),
                    ),
                    Span::styled(format!("{:<12}", item.label), Style::default().fg(Color::DarkGray)),
                    Span::raw(item.value),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(items).block(Block::default().borders(Borders::ALL).title(" Health ")),
            columns[0],
        );

        let mut summary = vec![
            Line::from(format!("samples  {}", self.history.len())),
            Line::from(format!("ok       {}", self.counters.ok)),
            Line::from(format!("failed   {}", self.counters.failed)),
            Line::from(Span::styled(
                sparkline_text(&self.history.cpu(), 20),
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if self.pending.is_some() {
            summary.push(Line::from(Span::styled("polling…", Style::default().fg(Color::Yellow))));
        }
        if let Some(error) = &self.last_error {
            summary.push(Line::from(Span::styled(
                format!("⚠ {error}"),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(
            Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title(" Service ")),
            columns[1],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Profile, Telemetry};
    use crate::infrastructure::runtime::RuntimeCommand;
    use crate::infrastructure::ServiceClient;
    use crate::service::ServiceError;

    #[test]
    fn test_polls_on_mount_and_every_n_ticks() {
        let (client, mut rx) = ServiceClient::pair();
        let mut ctx = Context::new(Profile::mock(), client);
        let mut view = mount(&mut ctx);

        let Ok(RuntimeCommand::Call { ticket, .. }) = rx.try_recv() else {
            panic!("mount should poll");
        };
        view.on_reply(
            &ServiceReply {
                ticket,
                operation: "predictive_telemetry",
                result: Ok(ServiceOutput::Telemetry(Telemetry { cpu: 30, ram: 40, net: 5 })),
            },
            &mut ctx,
        );

        for _ in 0..POLL_EVERY - 1 {
            view.on_tick(&mut ctx);
        }
        assert!(rx.try_recv().is_err());
        view.on_tick(&mut ctx);
        assert!(matches!(rx.try_recv(), Ok(RuntimeCommand::Call { .. })));
    }

    #[test]
    fn test_counts_ok_and_failed() {
        let (client, mut rx) = ServiceClient::pair();
        let mut ctx = Context::new(Profile::mock(), client);
        let mut view = OpsView::new();

        view.poll(&ctx);
        let Ok(RuntimeCommand::Call { ticket, .. }) = rx.try_recv() else {
            panic!("poll should submit");
        };
        view.on_reply(
            &ServiceReply {
                ticket,
                operation: "predictive_telemetry",
                result: Ok(ServiceOutput::Telemetry(Telemetry { cpu: 1, ram: 2, net: 3 })),
            },
            &mut ctx,
        );
        view.poll(&ctx);
        let Ok(RuntimeCommand::Call { ticket, .. }) = rx.try_recv() else {
            panic!("poll should submit");
        };
        view.on_reply(
            &ServiceReply {
                ticket,
                operation: "predictive_telemetry",
                result: Err(ServiceError::Unavailable {
                    operation: "predictive_telemetry",
                    reason: "neural link dropped".into(),
                }),
            },
            &mut ctx,
        );

        assert_eq!(view.counters().ok, 1);
        assert_eq!(view.counters().failed, 1);
        assert_eq!(view.history().len(), 1);
        assert!(!view.is_polling());
    }

    #[test]
    fn test_single_poll_in_flight() {
        let (client, mut rx) = ServiceClient::pair();
        let ctx = Context::new(Profile::mock(), client);
        let mut view = OpsView::new();
        view.poll(&ctx);
        view.poll(&ctx);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }
}
