//! Navigation registry - the fixed, ordered set of applications

use std::fmt;

use crossterm::event::KeyCode;

use crate::core::{AppView, Context};

/// Builds a fresh view instance when its entry becomes active.
pub type MountFn = fn(&mut Context) -> Box<dyn AppView>;

/// One selectable application in the shell
#[derive(Clone, Copy)]
pub struct NavigationEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    /// Global key that activates this entry
    pub shortcut: Option<KeyCode>,
    pub mount: MountFn,
}

impl NavigationEntry {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        icon: &'static str,
        mount: MountFn,
    ) -> Self {
        Self {
            id,
            name,
            icon,
            shortcut: None,
            mount,
        }
    }

    pub const fn with_shortcut(mut self, key: KeyCode) -> Self {
        self.shortcut = Some(key);
        self
    }
}

impl fmt::Debug for NavigationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("shortcut", &self.shortcut)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("navigation registry is empty")]
    Empty,

    #[error("duplicate navigation id `{0}`")]
    Duplicate(&'static str),

    #[error("shortcut {0:?} bound to more than one entry")]
    DuplicateShortcut(KeyCode),
}

/// Read-only ordered sequence of entries. Never empty, ids unique.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<NavigationEntry>,
}

impl Registry {
    pub fn new(entries: Vec<NavigationEntry>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        for (idx, entry) in entries.iter().enumerate() {
            let earlier = &entries[..idx];
            if earlier.iter().any(|prev| prev.id == entry.id) {
                return Err(RegistryError::Duplicate(entry.id));
            }
            if let Some(key) = entry.shortcut {
                if earlier.iter().any(|prev| prev.shortcut == Some(key)) {
                    return Err(RegistryError::DuplicateShortcut(key));
                }
            }
        }
        Ok(Self { entries })
    }

    /// The six built-in applications.
    pub fn default_apps() -> Self {
        Self {
            entries: crate::modules::DEFAULT_APPS.to_vec(),
        }
    }

    pub fn entries(&self) -> &[NavigationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> &NavigationEntry {
        &self.entries[0]
    }

    pub fn get(&self, id: &str) -> Option<&NavigationEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&NavigationEntry> {
        self.entries.get(index)
    }

    pub fn by_shortcut(&self, key: KeyCode) -> Option<&NavigationEntry> {
        self.entries.iter().find(|entry| entry.shortcut == Some(key))
    }

    /// Look up by id, then by display name, ignoring case.
    pub fn resolve(&self, query: &str) -> Option<&NavigationEntry> {
        let query = query.trim();
        self.entries
            .iter()
            .find(|entry| entry.id.eq_ignore_ascii_case(query))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|entry| entry.name.eq_ignore_ascii_case(query))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Action;
    use crossterm::event::KeyEvent;
    use ratatui::layout::Rect;
    use ratatui::Frame;

    struct Blank;

    impl AppView for Blank {
        fn id(&self) -> &'static str {
            "blank"
        }

        fn handle_key(&mut self, _key: KeyEvent, _ctx: &mut Context) -> Action {
            Action::None
        }

        fn render(&mut self, _frame: &mut Frame, _area: Rect, _ctx: &Context) {}
    }

    fn mount_blank(_ctx: &mut Context) -> Box<dyn AppView> {
        Box::new(Blank)
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert_eq!(Registry::new(vec![]).unwrap_err(), RegistryError::Empty);
        let dup = vec![
            NavigationEntry::new("a", "A", "*", mount_blank),
            NavigationEntry::new("a", "Again", "*", mount_blank),
        ];
        assert_eq!(
            Registry::new(dup).unwrap_err(),
            RegistryError::Duplicate("a")
        );
    }

    #[test]
    fn test_default_apps_order() {
        let registry = Registry::default_apps();
        let ids: Vec<_> = registry.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, ["terminal", "chat", "code", "social", "vault", "ops"]);
        assert_eq!(registry.first().id, "terminal");
        assert!(Registry::new(registry.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        let registry = Registry::default_apps();
        assert_eq!(registry.resolve("CHAT").map(|e| e.id), Some("chat"));
        assert_eq!(registry.resolve("code lab").map(|e| e.id), Some("code"));
        assert!(registry.resolve("browser").is_none());
        assert_eq!(registry.position("vault"), Some(4));
    }

    #[test]
    fn test_shortcuts() {
        let registry = Registry::default_apps();
        assert_eq!(registry.by_shortcut(KeyCode::F(1)).map(|e| e.id), Some("terminal"));
        assert_eq!(registry.by_shortcut(KeyCode::F(6)).map(|e| e.id), Some("ops"));
        assert!(registry.by_shortcut(KeyCode::F(7)).is_none());

        let clash = vec![
            NavigationEntry::new("a", "A", "*", mount_blank).with_shortcut(KeyCode::F(2)),
            NavigationEntry::new("b", "B", "*", mount_blank),
            NavigationEntry::new("c", "C", "*", mount_blank).with_shortcut(KeyCode::F(2)),
        ];
        assert_eq!(
            Registry::new(clash).unwrap_err(),
            RegistryError::DuplicateShortcut(KeyCode::F(2))
        );
    }
}
