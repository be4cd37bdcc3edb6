use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod widgets;

use crate::app::{App, Focus, InputMode, StatusLevel};
use crate::domain::NotificationKind;

const BRAND: &str = "CLONE-OS";

pub fn draw(f: &mut Frame, app: &mut App) {
    let areas = layout::areas(f.size(), app.shell.state().sidebar_expanded());

    draw_header(f, areas.header, app);
    draw_sidebar(f, areas.sidebar_nav, app);
    if areas.profile_card.height > 0 {
        draw_profile_card(f, areas.profile_card, app);
    }
    app.shell.render_content(f, areas.content, &app.ctx);
    draw_status_line(f, areas.status_line, app);
    draw_command_line(f, areas.command_line, app);

    if app.help_open {
        draw_help_popup(f, areas.size);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let accent = app.ctx.theme.accent_color();
    let entry = app.active_entry();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(34)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(format!(" {} ", entry.icon), Style::default().fg(accent)),
        Span::styled(
            entry.name,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(title).block(block), chunks[0]);

    let right = Line::from(vec![
        Span::styled("● ", Style::default().fg(Color::Green)),
        Span::styled("System Online", Style::default().fg(Color::Green)),
        Span::styled("  Unread ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.unread_count().to_string()),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(
        Paragraph::new(right).block(block).alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let expanded = app.shell.state().sidebar_expanded();
    let accent = app.ctx.theme.accent_color();
    let active_id = app.shell.state().active_id();
    let sidebar_focused = app.focus == Focus::Sidebar && app.input_mode == InputMode::Normal;

    let brand = if expanded {
        format!("◈ {BRAND}")
    } else {
        "◈".to_string()
    };
    let mut lines = vec![
        Line::from(Span::styled(
            brand,
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (idx, entry) in app.shell.registry().entries().iter().enumerate() {
        let active = entry.id == active_id;
        let marker = if active { "▌" } else { " " };
        let text = if expanded {
            format!("{marker}{} {}", entry.icon, entry.name)
        } else {
            format!("{marker}{}", entry.icon)
        };
        let mut style = if active {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        if sidebar_focused && idx == app.nav_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(text, style)));
    }

    let border = if sidebar_focused { accent } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn draw_profile_card(f: &mut Frame, area: Rect, app: &App) {
    let profile = app.ctx.profile();
    let lines = vec![
        Line::from(Span::styled(
            profile.name().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            profile.role().to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            profile.specialization().to_string(),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let block = Block::default()
        .title("Profile")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = if let Some((text, level)) = app.status_text() {
        let color = match level {
            StatusLevel::Info => Color::Cyan,
            StatusLevel::Warn => Color::Yellow,
            StatusLevel::Error => Color::Red,
        };
        Line::from(Span::styled(text.to_string(), Style::default().fg(color)))
    } else if let Some(latest) = app.notifications.back() {
        Line::from(vec![
            Span::styled(
                format!("{} ", latest.timestamp.format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("[{}] ", latest.title),
                Style::default().fg(notification_color(latest.kind)),
            ),
            Span::raw(latest.message.clone()),
        ])
    } else {
        Line::from(vec![
            Span::styled("Focus ", Style::default().fg(Color::DarkGray)),
            Span::raw(format!("{}  ", app.focus_label())),
            Span::styled("App ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.active_entry().name),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App) {
    if app.input_mode == InputMode::Command {
        let line = Line::from(vec![
            Span::styled(":", Style::default().fg(Color::Yellow)),
            Span::raw(app.command.input.clone()),
        ]);
        f.render_widget(Paragraph::new(line), area);
        let x = area.x + 1 + app.command.input.chars().count() as u16;
        f.set_cursor(x.min(area.right().saturating_sub(1)), area.y);
        return;
    }

    let hint = "F1-F6 apps  Esc sidebar  Ctrl+B collapse  : command  ? help  Ctrl+C quit";
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Shell"),
        Line::from("  F1-F6      Open application"),
        Line::from("  Esc        Focus sidebar"),
        Line::from("  Tab / l    Focus content (sidebar)"),
        Line::from("  j / k      Move selection (sidebar)"),
        Line::from("  1-9        Open by position (sidebar)"),
        Line::from("  b, Ctrl-B  Collapse / expand sidebar"),
        Line::from("  r          Retry a crashed view"),
        Line::from("  n          Mark notifications read"),
        Line::from("  :          Command line"),
        Line::from("  ?          Toggle help"),
        Line::from("  q, Ctrl-C  Quit"),
        Line::from("  Mouse      Click brand or entries"),
        Line::from(""),
        Line::from("Commands"),
        Line::from("  :open <app>   :sidebar   :retry"),
        Line::from("  :clear        :read      :help"),
        Line::from("  :quit"),
        Line::from(""),
        Line::from("Inside a view, see the hints along its bottom border."),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn notification_color(kind: NotificationKind) -> Color {
    match kind {
        NotificationKind::Info => Color::Cyan,
        NotificationKind::Success => Color::Green,
        NotificationKind::Warning => Color::Yellow,
        NotificationKind::Error => Color::Red,
        NotificationKind::Agent => Color::Magenta,
        NotificationKind::Learning => Color::LightBlue,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
