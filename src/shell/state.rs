//! Shell state machine: `{active id} × {sidebar expanded}`

use tracing::debug;

use super::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    active_id: &'static str,
    sidebar_expanded: bool,
}

impl ShellState {
    /// First registry entry active, sidebar expanded.
    pub fn initial(registry: &Registry) -> Self {
        Self {
            active_id: registry.first().id,
            sidebar_expanded: true,
        }
    }

    pub fn active_id(&self) -> &'static str {
        self.active_id
    }

    pub fn sidebar_expanded(&self) -> bool {
        self.sidebar_expanded
    }

    /// Activate `id`. Unknown or already-active ids leave the state alone.
    /// Returns whether the active id changed.
    pub(crate) fn select(&mut self, id: &str, registry: &Registry) -> bool {
        let Some(entry) = registry.get(id) else {
            debug!(id, "ignoring selection of unknown application");
            return false;
        };
        if entry.id == self.active_id {
            return false;
        }
        self.active_id = entry.id;
        true
    }

    pub(crate) fn toggle_sidebar(&mut self) {
        self.sidebar_expanded = !self.sidebar_expanded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let registry = Registry::default_apps();
        let state = ShellState::initial(&registry);
        assert_eq!(state.active_id(), "terminal");
        assert!(state.sidebar_expanded());
    }

    #[test]
    fn test_select_known_unknown_and_same() {
        let registry = Registry::default_apps();
        let mut state = ShellState::initial(&registry);

        assert!(state.select("ops", &registry));
        assert_eq!(state.active_id(), "ops");

        assert!(!state.select("ops", &registry));
        assert!(!state.select("browser", &registry));
        assert_eq!(state.active_id(), "ops");
    }

    #[test]
    fn test_transitions_are_independent() {
        let registry = Registry::default_apps();
        let mut state = ShellState::initial(&registry);

        state.toggle_sidebar();
        assert!(!state.sidebar_expanded());
        assert_eq!(state.active_id(), "terminal");

        state.select("chat", &registry);
        assert!(!state.sidebar_expanded());

        state.toggle_sidebar();
        assert!(state.sidebar_expanded());
        assert_eq!(state.active_id(), "chat");
    }
}
