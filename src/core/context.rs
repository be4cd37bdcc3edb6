//! Shared context passed to views

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{AppTheme, CodeFile, KnowledgeItem, NeuralPattern, Profile, DARK_THEME};
use crate::infrastructure::ServiceClient;

/// Shared context available to all views
///
/// The profile is only reachable through `&Profile`, so no view can alter
/// it. Shell state deliberately does not live here.
#[derive(Debug)]
pub struct Context {
    profile: Arc<Profile>,

    /// Submission handle for the AI service
    pub service: ServiceClient,

    pub theme: &'static AppTheme,

    /// Last text copied by any view
    pub clipboard: Option<String>,

    /// Code pushed by a view, waiting for the code workspace to pick it up
    pub pushed_code: Option<CodeFile>,

    /// Items the knowledge vault starts from
    pub knowledge: Vec<KnowledgeItem>,

    /// Patterns fed to codebase evolution
    pub patterns: Vec<NeuralPattern>,

    /// Where vault exports are written
    pub export_dir: PathBuf,
}

impl Context {
    pub fn new(profile: Profile, service: ServiceClient) -> Self {
        Self {
            profile: Arc::new(profile),
            service,
            theme: &DARK_THEME,
            clipboard: None,
            pushed_code: None,
            knowledge: KnowledgeItem::seed(),
            patterns: Vec::new(),
            export_dir: PathBuf::from("exports"),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Shared handle for shipping the profile inside a service call
    pub fn profile_handle(&self) -> Arc<Profile> {
        Arc::clone(&self.profile)
    }

    /// Set clipboard content
    pub fn set_clipboard(&mut self, content: String) {
        self.clipboard = Some(content);
    }

    /// Get clipboard content
    pub fn get_clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn push_code(&mut self, file: CodeFile) {
        self.pushed_code = Some(file);
    }

    pub fn take_pushed_code(&mut self) -> Option<CodeFile> {
        self.pushed_code.take()
    }
}
