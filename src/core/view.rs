//! Trait implemented by every application view

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use super::{Action, Context};
use crate::infrastructure::ServiceReply;

/// A self-contained panel hosted by the shell.
///
/// A view exists only while it is mounted: the shell builds it on
/// activation and drops it when another application is selected. Replies
/// carrying tickets the view did not submit must be ignored.
pub trait AppView {
    /// Registry identifier of this view
    fn id(&self) -> &'static str;

    /// Handle keyboard input while the content area has focus
    fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action;

    /// Handle a completed service call
    fn on_reply(&mut self, _reply: &ServiceReply, _ctx: &mut Context) -> Action {
        Action::None
    }

    /// Periodic tick, delivered only while mounted
    fn on_tick(&mut self, _ctx: &mut Context) -> Action {
        Action::None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &Context);
}
