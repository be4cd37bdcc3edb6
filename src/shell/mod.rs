//! Dashboard shell
//!
//! Owns the navigation registry, the `{active id} × {sidebar expanded}`
//! state, the single mounted view and the error boundary around it. The
//! chrome around the content area (header, sidebar, footer) is drawn by
//! `ui`, which only reads from here.

mod boundary;
mod registry;
mod state;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::Frame;
use tracing::{debug, info};

use crate::core::{Action, AppView, Context};
use crate::infrastructure::ServiceReply;

pub use boundary::{render_fallback, BoundaryState, ErrorBoundary, RETRY_LABEL};
pub use registry::{MountFn, NavigationEntry, Registry, RegistryError};
pub use state::ShellState;

pub struct Shell {
    registry: Registry,
    state: ShellState,
    view: Option<Box<dyn AppView>>,
    boundary: ErrorBoundary,
    mounts: u64,
    retry_button: Option<Rect>,
}

impl Shell {
    /// First entry active, sidebar expanded, first view mounted.
    pub fn new(registry: Registry, ctx: &mut Context) -> Self {
        let state = ShellState::initial(&registry);
        let mut shell = Self {
            registry,
            state,
            view: None,
            boundary: ErrorBoundary::new(),
            mounts: 0,
            retry_button: None,
        };
        shell.mount_active(ctx);
        shell
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn active_entry(&self) -> &NavigationEntry {
        self.registry
            .get(self.state.active_id())
            .unwrap_or_else(|| self.registry.first())
    }

    /// Id of the mounted view, `None` while the boundary holds a failure.
    pub fn mounted_id(&self) -> Option<&'static str> {
        self.view.as_ref().map(|view| view.id())
    }

    /// Number of views built since start-up
    pub fn mount_count(&self) -> u64 {
        self.mounts
    }

    pub fn boundary(&self) -> &ErrorBoundary {
        &self.boundary
    }

    pub fn is_failed(&self) -> bool {
        self.boundary.is_failed()
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.boundary.message()
    }

    /// Area of the fallback's retry button in the last frame, if shown.
    pub fn retry_button(&self) -> Option<Rect> {
        self.retry_button
    }

    /// Activate `id`, dropping the current view and mounting the new one.
    ///
    /// Unknown ids and the already-active id are no-ops. Returns whether
    /// the active application changed.
    pub fn select_tab(&mut self, id: &str, ctx: &mut Context) -> bool {
        if !self.state.select(id, &self.registry) {
            return false;
        }
        debug!(id = self.state.active_id(), "select application");
        self.boundary.reset();
        self.mount_active(ctx);
        true
    }

    pub fn toggle_sidebar(&mut self) {
        self.state.toggle_sidebar();
        debug!(expanded = self.state.sidebar_expanded(), "toggle sidebar");
    }

    /// Clear a failure and remount the active view. No-op unless failed.
    pub fn retry(&mut self, ctx: &mut Context) -> bool {
        if !self.boundary.is_failed() {
            return false;
        }
        info!(id = self.state.active_id(), "retrying failed view");
        self.boundary.reset();
        self.mount_active(ctx);
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent, ctx: &mut Context) -> Action {
        if self.boundary.is_failed() {
            if key.code == KeyCode::Char('r') && key.modifiers == KeyModifiers::NONE {
                self.retry(ctx);
            }
            return Action::None;
        }
        match self.view.as_mut() {
            Some(view) => view.handle_key(key, ctx),
            None => Action::None,
        }
    }

    /// Hand a completed call to the mounted view. Dropped when nothing is
    /// mounted.
    pub fn deliver_reply(&mut self, reply: &ServiceReply, ctx: &mut Context) -> Action {
        match self.view.as_mut() {
            Some(view) => view.on_reply(reply, ctx),
            None => {
                debug!(ticket = %reply.ticket, operation = reply.operation, "dropping reply, no view mounted");
                Action::None
            }
        }
    }

    pub fn tick(&mut self, ctx: &mut Context) -> Action {
        match self.view.as_mut() {
            Some(view) => view.on_tick(ctx),
            None => Action::None,
        }
    }

    /// Draw the content area through the error boundary.
    pub fn render_content(&mut self, frame: &mut Frame, area: Rect, ctx: &Context) {
        self.retry_button = None;

        if let Some(view) = self.view.as_mut() {
            let rendered = self.boundary.guard(|| view.render(frame, area, ctx));
            if rendered {
                return;
            }
            self.view = None;
        }

        let name = self.active_entry().name;
        let message = self.boundary.message().unwrap_or("view is not mounted");
        self.retry_button = Some(render_fallback(frame, area, name, message, ctx.theme));
    }

    fn mount_active(&mut self, ctx: &mut Context) {
        let entry = *self.active_entry();
        // Old view goes first so it never overlaps with the new one.
        self.view = None;
        self.view = Some((entry.mount)(ctx));
        self.mounts += 1;
        debug!(id = entry.id, mounts = self.mounts, "mounted view");
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("state", &self.state)
            .field("mounted", &self.mounted_id())
            .field("boundary", self.boundary.state())
            .field("mounts", &self.mounts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Profile;
    use crate::infrastructure::ServiceClient;

    fn setup() -> (Shell, Context) {
        let mut ctx = Context::new(Profile::mock(), ServiceClient::disconnected());
        let shell = Shell::new(Registry::default_apps(), &mut ctx);
        (shell, ctx)
    }

    #[test]
    fn test_initial_mount() {
        let (shell, _ctx) = setup();
        assert_eq!(shell.mounted_id(), Some("terminal"));
        assert_eq!(shell.mount_count(), 1);
        assert!(shell.state().sidebar_expanded());
    }

    #[test]
    fn test_select_every_entry_mounts_exactly_that_view() {
        let (mut shell, mut ctx) = setup();
        let ids: Vec<_> = shell.registry().entries().iter().map(|e| e.id).collect();
        for id in ids.into_iter().rev() {
            shell.select_tab(id, &mut ctx);
            assert_eq!(shell.state().active_id(), id);
            assert_eq!(shell.mounted_id(), Some(id));
        }
    }

    #[test]
    fn test_select_same_or_unknown_does_not_remount() {
        let (mut shell, mut ctx) = setup();
        assert!(!shell.select_tab("terminal", &mut ctx));
        assert!(!shell.select_tab("nowhere", &mut ctx));
        assert_eq!(shell.mount_count(), 1);
        assert_eq!(shell.state().active_id(), "terminal");
    }

    #[test]
    fn test_retry_is_noop_when_healthy() {
        let (mut shell, mut ctx) = setup();
        assert!(!shell.retry(&mut ctx));
        assert_eq!(shell.mount_count(), 1);
    }
}
