//! Simulated agent persona

use serde::{Deserialize, Serialize};

/// The agent persona shown across every view.
///
/// Fields are private; once built a profile is only ever read. The shell
/// hands it to views behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    id: String,
    name: String,
    role: String,
    specialization: String,
    bio: Option<String>,
    avatar: Option<String>,
    personality: String,
    background: String,
    speaking_style: String,
    interests: Vec<String>,
}

impl Profile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        role: impl Into<String>,
        specialization: impl Into<String>,
        personality: impl Into<String>,
        background: impl Into<String>,
        speaking_style: impl Into<String>,
        interests: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: role.into(),
            specialization: specialization.into(),
            bio: None,
            avatar: None,
            personality: personality.into(),
            background: background.into(),
            speaking_style: speaking_style.into(),
            interests,
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// The persona the dashboard boots with.
    pub fn mock() -> Self {
        Self::new(
            "1",
            "Enterprise Agent",
            "Architect",
            "architect",
            "Professional and efficient",
            "Enterprise system design",
            "Formal",
            vec!["Optimization".to_string(), "System Design".to_string()],
        )
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn specialization(&self) -> &str {
        &self.specialization
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn personality(&self) -> &str {
        &self.personality
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn speaking_style(&self) -> &str {
        &self.speaking_style
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// One-line persona prompt handed to the content generator.
    pub fn persona_prompt(&self) -> String {
        format!(
            "You are {}, a {} ({}). Personality: {}. Background: {}. Speak in a {} style.",
            self.name,
            self.role,
            self.specialization,
            self.personality,
            self.background,
            self.speaking_style.to_lowercase()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_profile() {
        let profile = Profile::mock();
        assert_eq!(profile.id(), "1");
        assert_eq!(profile.name(), "Enterprise Agent");
        assert_eq!(profile.interests().len(), 2);
        assert!(profile.bio().is_none());
    }

    #[test]
    fn test_persona_prompt_mentions_identity() {
        let profile = Profile::mock().with_bio("Builds systems");
        let prompt = profile.persona_prompt();
        assert!(prompt.contains("Enterprise Agent"));
        assert!(prompt.contains("formal style"));
        assert_eq!(profile.bio(), Some("Builds systems"));
    }
}
