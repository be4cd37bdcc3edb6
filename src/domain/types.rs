//! Data shapes exchanged between views and the service layer

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// === Knowledge ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Local>,
    pub kind: Option<String>,
    pub url: Option<String>,
}

impl KnowledgeItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            timestamp: Local::now(),
            kind: None,
            url: None,
        }
    }

    pub fn tagged(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Items the vault starts with.
    pub fn seed() -> Vec<Self> {
        vec![
            KnowledgeItem::new(
                "k1",
                "Mesh topology notes",
                "Agents hand off work through a shared insight board.",
            )
            .tagged(&["mesh", "agents"]),
            KnowledgeItem::new(
                "k2",
                "Refactoring checklist",
                "Extract pure functions first, then move I/O to the edges.",
            )
            .tagged(&["code", "quality"]),
            KnowledgeItem {
                kind: Some("link".to_string()),
                url: Some("https://example.com/neural-sync".to_string()),
                ..KnowledgeItem::new(
                    "k3",
                    "Neural sync paper",
                    "Summary of the latency budget for synchronised agents.",
                )
                .tagged(&["research"])
            },
        ]
    }
}

// === Agents & tasks ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Executing,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Executing => "executing",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Working,
    Done,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAgent {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub status: AgentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubTask {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub assigned_agent_id: Option<String>,
    pub result: Option<String>,
    pub handoff: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AgentTask {
    pub id: String,
    pub goal: String,
    pub status: TaskStatus,
    pub reasoning: String,
    pub agents: Vec<SubAgent>,
    pub shared_insights: Vec<String>,
    pub subtasks: Vec<SubTask>,
    pub timestamp: DateTime<Local>,
}

impl AgentTask {
    /// Build a task from a plan, wiring each subtask to the agent named in it.
    pub fn from_plan(id: impl Into<String>, goal: impl Into<String>, plan: AutonomousPlan) -> Self {
        let id = id.into();
        let agents: Vec<SubAgent> = plan
            .agents
            .iter()
            .enumerate()
            .map(|(idx, agent)| SubAgent {
                id: format!("{id}-a{idx}"),
                name: agent.name.clone(),
                specialization: agent.specialization.clone(),
                status: AgentStatus::Idle,
            })
            .collect();
        let subtasks = plan
            .subtasks
            .iter()
            .enumerate()
            .map(|(idx, sub)| SubTask {
                id: format!("{id}-s{idx}"),
                title: sub.title.clone(),
                description: sub.description.clone(),
                status: TaskStatus::Pending,
                assigned_agent_id: agents
                    .iter()
                    .find(|a| a.name == sub.agent_name)
                    .map(|a| a.id.clone()),
                result: None,
                handoff: None,
            })
            .collect();
        Self {
            id,
            goal: goal.into(),
            status: TaskStatus::Executing,
            reasoning: plan.reasoning,
            agents,
            shared_insights: Vec::new(),
            subtasks,
            timestamp: Local::now(),
        }
    }

    pub fn agent_mut(&mut self, agent_id: Option<&str>) -> Option<&mut SubAgent> {
        let agent_id = agent_id?;
        self.agents.iter_mut().find(|a| a.id == agent_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAgent {
    pub name: String,
    pub specialization: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSubtask {
    pub title: String,
    pub description: String,
    pub agent_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutonomousPlan {
    pub reasoning: String,
    pub agents: Vec<PlannedAgent>,
    pub subtasks: Vec<PlannedSubtask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub success: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepVerification {
    pub valid: bool,
    pub critical_flaw: Option<String>,
    pub suggested_fix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub action: String,
    pub data: String,
    pub citations: Vec<String>,
}

// === Notifications & ledger ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
    Agent,
    Learning,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Thought,
    Action,
    System,
}

impl LedgerKind {
    pub fn tag(&self) -> &'static str {
        match self {
            LedgerKind::Thought => "THOUGHT",
            LedgerKind::Action => "ACTION",
            LedgerKind::System => "SYSTEM",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub id: u64,
    pub kind: LedgerKind,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

// === Chat ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(id: u64, role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

// === Social ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentData {
    pub score: f64,
    pub label: String,
    pub trend: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Twitter,
    Instagram,
    LinkedIn,
}

impl Platform {
    pub fn title(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Instagram => "Instagram",
            Platform::LinkedIn => "LinkedIn",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SocialAccount {
    pub id: String,
    pub platform: Platform,
    pub handle: String,
    pub bio: String,
    pub avatar: String,
    pub followers: u64,
    pub engagement_rate: String,
    pub strategy: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostStats {
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
}

#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub account_id: String,
    pub content: String,
    pub image_url: Option<String>,
    pub timestamp: DateTime<Local>,
    pub stats: PostStats,
}

// === Code ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFile {
    pub name: String,
    pub content: String,
}

impl CodeFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralPattern {
    pub id: String,
    pub pattern: String,
    pub strength: f64,
    pub confidence: Option<f64>,
    pub trigger: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Bug,
    Smell,
    Security,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::Bug => "bug",
            IssueKind::Smell => "smell",
            IssueKind::Security => "security",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub line: Option<u32>,
    pub description: String,
    pub fix_suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAnalysis {
    pub issues: Vec<CodeIssue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pending,
    Running,
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: String,
    pub name: String,
    pub status: TestStatus,
    pub duration: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub summary: TestSummary,
    pub results: Vec<TestResult>,
}

// === Ops ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telemetry {
    pub cpu: u64,
    pub ram: u64,
    pub net: u64,
}
