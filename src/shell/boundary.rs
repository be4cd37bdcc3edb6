//! Error boundary around the content area
//!
//! A panic raised while a view renders is caught here, so one broken view
//! never takes the rest of the shell down with it.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::domain::AppTheme;
use crate::infrastructure::logging::{catch_contained, panic_message};

pub const RETRY_LABEL: &str = "[ Retry ]";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BoundaryState {
    #[default]
    Normal,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    state: BoundaryState,
    failures: u32,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, BoundaryState::Failed(_))
    }

    pub fn message(&self) -> Option<&str> {
        match &self.state {
            BoundaryState::Failed(message) => Some(message),
            BoundaryState::Normal => None,
        }
    }

    /// Total failures caught since start-up
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Run `render` inside the boundary. Returns `false` if it panicked, in
    /// which case the boundary is now `Failed`.
    pub fn guard<F: FnOnce()>(&mut self, render: F) -> bool {
        match catch_contained(render) {
            Ok(()) => true,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.failures += 1;
                tracing::error!(%message, failures = self.failures, "view render failed");
                self.state = BoundaryState::Failed(message);
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = BoundaryState::Normal;
    }
}

/// Draw the fallback pane. Returns the area of the retry button.
pub fn render_fallback(
    frame: &mut Frame,
    area: Rect,
    app_name: &str,
    message: &str,
    theme: &AppTheme,
) -> Rect {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" {app_name} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let body = vec![
        Line::from(Span::styled(
            "⚠  CRITICAL SYSTEM ERROR",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "An unexpected error occurred while loading the component.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "The neural link may have been interrupted.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let width = (RETRY_LABEL.chars().count() as u16).min(chunks[3].width);
    let button = Rect {
        x: chunks[3].x + chunks[3].width.saturating_sub(width) / 2,
        y: chunks[3].y,
        width,
        height: chunks[3].height.min(1),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            RETRY_LABEL,
            Style::default()
                .fg(theme.accent_color())
                .add_modifier(Modifier::BOLD),
        )),
        button,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "press r to retry",
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center),
        chunks[4],
    );

    button
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_passes_through_success() {
        let mut boundary = ErrorBoundary::new();
        let mut ran = false;
        assert!(boundary.guard(|| ran = true));
        assert!(ran);
        assert_eq!(boundary.state(), &BoundaryState::Normal);
    }

    #[test]
    fn test_guard_catches_panic_and_reset() {
        let mut boundary = ErrorBoundary::new();
        assert!(!boundary.guard(|| panic!("boom")));
        assert_eq!(boundary.message(), Some("boom"));
        assert_eq!(boundary.failures(), 1);

        boundary.reset();
        assert!(!boundary.is_failed());
        assert_eq!(boundary.failures(), 1);
    }
}
