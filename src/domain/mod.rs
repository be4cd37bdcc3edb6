//! Domain models
//!
//! Plain data shapes shared by the shell, the views and the service layer.
//! Nothing in here performs I/O.

mod profile;
mod theme;
mod types;

pub use profile::Profile;
pub use theme::{AppTheme, DARK_THEME};
pub use types::{
    AgentTask, AgentStatus, AutonomousPlan, ChatMessage, ChatRole, CodeAnalysis, CodeFile,
    CodeIssue, CommandOutcome, IssueKind, KnowledgeItem, LedgerEntry, LedgerKind, NeuralPattern,
    Notification, NotificationKind, PlannedAgent, PlannedSubtask, Platform, Post, PostStats,
    SentimentData, Severity, SocialAccount, StepOutcome, StepVerification, SubAgent, SubTask,
    TaskStatus, Telemetry, TestReport, TestResult, TestStatus, TestSummary,
};
