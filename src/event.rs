//! Keyboard and mouse routing for the shell chrome
//!
//! Global chords are handled first, then the command line, then either the
//! sidebar or the mounted view depending on focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, Focus, InputMode};
use crate::ui::layout::{self, SidebarHit};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.request_quit();
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter) {
            app.help_open = false;
        }
        return;
    }

    if app.input_mode == InputMode::Command {
        handle_command_mode(app, key);
        return;
    }

    if key.modifiers.is_empty() {
        if let Some(entry) = app.shell.registry().by_shortcut(key.code).copied() {
            app.select_app(entry.id);
            return;
        }
    }

    match key.code {
        KeyCode::Char('b') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_sidebar();
            return;
        }
        KeyCode::Esc => {
            app.focus = Focus::Sidebar;
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Sidebar => handle_sidebar(app, key),
        Focus::Content => {
            let action = app.shell.handle_key(key, &mut app.ctx);
            app.apply_action(action);
        }
    }
}

fn handle_command_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.exit_command(),
        KeyCode::Enter => app.apply_command(),
        KeyCode::Backspace => {
            if app.command.input.pop().is_none() {
                app.exit_command();
            }
        }
        KeyCode::Up => {
            if let Some(last) = app.command.last.clone() {
                app.command.input = last;
            }
        }
        KeyCode::Char(ch) => app.command.input.push(ch),
        _ => {}
    }
}

fn handle_sidebar(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(true),
        KeyCode::Enter => {
            app.select_index(app.nav_cursor);
            app.focus = Focus::Content;
        }
        KeyCode::Char(ch @ '1'..='9') => {
            let idx = ch as usize - '1' as usize;
            if idx < app.shell.registry().len() {
                app.select_index(idx);
                app.focus = Focus::Content;
            }
        }
        KeyCode::Char('b') => app.toggle_sidebar(),
        KeyCode::Char(':') => app.enter_command(),
        KeyCode::Char('?') => app.help_open = true,
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Char('n') => app.mark_notifications_read(),
        KeyCode::Char('r') if app.shell.is_failed() => app.retry(),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.focus = Focus::Content,
        _ => {}
    }
}

/// `size` is the full terminal area the last frame was drawn into.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, size: Rect) {
    if app.help_open || app.input_mode == InputMode::Command {
        return;
    }
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let (col, row) = (mouse.column, mouse.row);

    if let Some(button) = app.shell.retry_button() {
        if layout::rect_contains(button, col, row) {
            app.retry();
            return;
        }
    }

    let areas = layout::areas(size, app.shell.state().sidebar_expanded());
    let entries = app.shell.registry().len();
    match layout::sidebar_hit(&areas, entries, col, row) {
        Some(SidebarHit::Brand) => app.toggle_sidebar(),
        Some(SidebarHit::Entry(idx)) => {
            app.select_index(idx);
            app.focus = Focus::Sidebar;
        }
        None => {
            if layout::rect_contains(areas.content, col, row) {
                app.focus = Focus::Content;
            } else if layout::rect_contains(areas.sidebar, col, row) {
                app.focus = Focus::Sidebar;
            }
        }
    }
}
