//! Owned request/response envelopes for shipping calls across the bridge

use std::sync::Arc;

use crate::domain::{
    AutonomousPlan, CodeAnalysis, CommandOutcome, NeuralPattern, Profile, SentimentData,
    StepOutcome, StepVerification, Telemetry, TestReport,
};

use super::{AiService, ServiceError};

/// A service request with all of its parameters owned.
#[derive(Debug, Clone)]
pub enum ServiceCall {
    GenerateContent {
        prompt: String,
        persona: Option<String>,
    },
    GenerateImage {
        prompt: String,
    },
    AnalyzeImage {
        prompt: String,
        data: String,
        mime_type: String,
    },
    CodeCompletion {
        file_name: String,
        content: String,
    },
    AnalyzeCode {
        file_name: String,
        content: String,
    },
    EvolveCodebase {
        file_name: String,
        content: String,
        patterns: Vec<NeuralPattern>,
    },
    GenerateTests {
        file_name: String,
        content: String,
    },
    RunTests {
        file_name: String,
        tests: String,
    },
    GeneratePlan {
        goal: String,
        profile: Arc<Profile>,
    },
    ExecuteStep {
        subtask: String,
        profile: Arc<Profile>,
    },
    VerifyStep {
        subtask: String,
        result: String,
    },
    GenerateHandoff {
        from: String,
        to: String,
    },
    InterviewBriefing {
        topic: String,
    },
    MeetingSentiment {
        transcript: String,
    },
    NeuralPrompts {
        context: String,
    },
    GenerateDream {
        seed: String,
    },
    PredictiveTelemetry,
    ExecuteCommand {
        command: String,
    },
}

impl ServiceCall {
    /// Stable operation name, used in logs and error messages.
    pub fn operation(&self) -> &'static str {
        match self {
            ServiceCall::GenerateContent { .. } => "generate_content",
            ServiceCall::GenerateImage { .. } => "generate_image",
            ServiceCall::AnalyzeImage { .. } => "analyze_image",
            ServiceCall::CodeCompletion { .. } => "code_completion",
            ServiceCall::AnalyzeCode { .. } => "analyze_code",
            ServiceCall::EvolveCodebase { .. } => "evolve_codebase",
            ServiceCall::GenerateTests { .. } => "generate_tests",
            ServiceCall::RunTests { .. } => "run_tests",
            ServiceCall::GeneratePlan { .. } => "generate_plan",
            ServiceCall::ExecuteStep { .. } => "execute_step",
            ServiceCall::VerifyStep { .. } => "verify_step",
            ServiceCall::GenerateHandoff { .. } => "generate_handoff",
            ServiceCall::InterviewBriefing { .. } => "interview_briefing",
            ServiceCall::MeetingSentiment { .. } => "meeting_sentiment",
            ServiceCall::NeuralPrompts { .. } => "neural_prompts",
            ServiceCall::GenerateDream { .. } => "generate_dream",
            ServiceCall::PredictiveTelemetry => "predictive_telemetry",
            ServiceCall::ExecuteCommand { .. } => "execute_command",
        }
    }
}

/// Result payload of a successful call.
#[derive(Debug, Clone)]
pub enum ServiceOutput {
    Text(String),
    Image(String),
    Analysis(CodeAnalysis),
    Report(TestReport),
    Plan(AutonomousPlan),
    Step(StepOutcome),
    Verification(StepVerification),
    Sentiment(SentimentData),
    Prompts(Vec<String>),
    Telemetry(Telemetry),
    Command(CommandOutcome),
}

impl ServiceOutput {
    /// Short human-readable rendering, for logs and fallbacks.
    pub fn summary(&self) -> String {
        match self {
            ServiceOutput::Text(text) | ServiceOutput::Image(text) => text.clone(),
            ServiceOutput::Analysis(analysis) => format!("{} issue(s)", analysis.issues.len()),
            ServiceOutput::Report(report) => format!(
                "{}/{} passed",
                report.summary.passed, report.summary.total
            ),
            ServiceOutput::Plan(plan) => format!("{} subtask(s)", plan.subtasks.len()),
            ServiceOutput::Step(step) => step.text.clone(),
            ServiceOutput::Verification(v) => {
                if v.valid {
                    "valid".to_string()
                } else {
                    "invalid".to_string()
                }
            }
            ServiceOutput::Sentiment(s) => format!("{} ({:.2})", s.label, s.score),
            ServiceOutput::Prompts(prompts) => prompts.join(", "),
            ServiceOutput::Telemetry(t) => format!("cpu {} ram {} net {}", t.cpu, t.ram, t.net),
            ServiceOutput::Command(c) => c.data.clone(),
        }
    }
}

/// Route an owned call to the matching trait method.
pub async fn dispatch(
    service: &dyn AiService,
    call: ServiceCall,
) -> Result<ServiceOutput, ServiceError> {
    let output = match call {
        ServiceCall::GenerateContent { prompt, persona } => ServiceOutput::Text(
            service
                .generate_content(&prompt, persona.as_deref())
                .await?,
        ),
        ServiceCall::GenerateImage { prompt } => {
            ServiceOutput::Image(service.generate_image(&prompt).await?)
        }
        ServiceCall::AnalyzeImage {
            prompt,
            data,
            mime_type,
        } => ServiceOutput::Text(service.analyze_image(&prompt, &data, &mime_type).await?),
        ServiceCall::CodeCompletion { file_name, content } => {
            ServiceOutput::Text(service.code_completion(&file_name, &content).await?)
        }
        ServiceCall::AnalyzeCode { file_name, content } => {
            ServiceOutput::Analysis(service.analyze_code(&file_name, &content).await?)
        }
        ServiceCall::EvolveCodebase {
            file_name,
            content,
            patterns,
        } => ServiceOutput::Text(
            service
                .evolve_codebase(&file_name, &content, &patterns)
                .await?,
        ),
        ServiceCall::GenerateTests { file_name, content } => {
            ServiceOutput::Text(service.generate_tests(&file_name, &content).await?)
        }
        ServiceCall::RunTests { file_name, tests } => {
            ServiceOutput::Report(service.run_tests(&file_name, &tests).await?)
        }
        ServiceCall::GeneratePlan { goal, profile } => {
            ServiceOutput::Plan(service.generate_plan(&goal, &profile).await?)
        }
        ServiceCall::ExecuteStep { subtask, profile } => {
            ServiceOutput::Step(service.execute_step(&subtask, &profile).await?)
        }
        ServiceCall::VerifyStep { subtask, result } => {
            ServiceOutput::Verification(service.verify_step(&subtask, &result).await?)
        }
        ServiceCall::GenerateHandoff { from, to } => {
            ServiceOutput::Text(service.generate_handoff(&from, &to).await?)
        }
        ServiceCall::InterviewBriefing { topic } => {
            ServiceOutput::Text(service.interview_briefing(&topic).await?)
        }
        ServiceCall::MeetingSentiment { transcript } => {
            ServiceOutput::Sentiment(service.meeting_sentiment(&transcript).await?)
        }
        ServiceCall::NeuralPrompts { context } => {
            ServiceOutput::Prompts(service.neural_prompts(&context).await?)
        }
        ServiceCall::GenerateDream { seed } => {
            ServiceOutput::Text(service.generate_dream(&seed).await?)
        }
        ServiceCall::PredictiveTelemetry => {
            ServiceOutput::Telemetry(service.predictive_telemetry().await?)
        }
        ServiceCall::ExecuteCommand { command } => {
            ServiceOutput::Command(service.execute_command(&command).await?)
        }
    };
    Ok(output)
}
