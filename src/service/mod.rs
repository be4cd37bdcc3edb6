//! AI service collaborator
//!
//! `AiService` is the capability set the views consume. `StubAiService` is
//! the only implementation shipped; a real backend would implement the same
//! trait and be handed to the runtime bridge instead.

mod call;
mod stub;

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    AutonomousPlan, CodeAnalysis, CommandOutcome, NeuralPattern, Profile, SentimentData,
    StepOutcome, StepVerification, Telemetry, TestReport,
};

pub use call::{dispatch, ServiceCall, ServiceOutput};
pub use stub::StubAiService;

/// Failure of a single service call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{operation} unavailable: {reason}")]
    Unavailable {
        operation: &'static str,
        reason: String,
    },

    #[error("{operation} timed out after {}ms", .elapsed.as_millis())]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },

    #[error("service bridge closed")]
    Closed,
}

/// Asynchronous AI operations, one method per capability.
#[async_trait]
pub trait AiService: Send + Sync {
    async fn generate_content(
        &self,
        prompt: &str,
        persona: Option<&str>,
    ) -> Result<String, ServiceError>;

    async fn generate_image(&self, prompt: &str) -> Result<String, ServiceError>;

    async fn analyze_image(
        &self,
        prompt: &str,
        data: &str,
        mime_type: &str,
    ) -> Result<String, ServiceError>;

    async fn code_completion(&self, file_name: &str, content: &str)
        -> Result<String, ServiceError>;

    async fn analyze_code(
        &self,
        file_name: &str,
        content: &str,
    ) -> Result<CodeAnalysis, ServiceError>;

    async fn evolve_codebase(
        &self,
        file_name: &str,
        content: &str,
        patterns: &[NeuralPattern],
    ) -> Result<String, ServiceError>;

    async fn generate_tests(&self, file_name: &str, content: &str)
        -> Result<String, ServiceError>;

    async fn run_tests(&self, file_name: &str, tests: &str) -> Result<TestReport, ServiceError>;

    async fn generate_plan(
        &self,
        goal: &str,
        profile: &Profile,
    ) -> Result<AutonomousPlan, ServiceError>;

    async fn execute_step(
        &self,
        subtask: &str,
        profile: &Profile,
    ) -> Result<StepOutcome, ServiceError>;

    async fn verify_step(
        &self,
        subtask: &str,
        result: &str,
    ) -> Result<StepVerification, ServiceError>;

    async fn generate_handoff(&self, from: &str, to: &str) -> Result<String, ServiceError>;

    async fn interview_briefing(&self, topic: &str) -> Result<String, ServiceError>;

    async fn meeting_sentiment(&self, transcript: &str) -> Result<SentimentData, ServiceError>;

    async fn neural_prompts(&self, context: &str) -> Result<Vec<String>, ServiceError>;

    async fn generate_dream(&self, seed: &str) -> Result<String, ServiceError>;

    async fn predictive_telemetry(&self) -> Result<Telemetry, ServiceError>;

    async fn execute_command(&self, command: &str) -> Result<CommandOutcome, ServiceError>;
}
