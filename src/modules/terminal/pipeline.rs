//! Autonomous agent pipeline
//!
//! `generate_plan`, then for each subtask `execute_step` → `verify_step`,
//! with a `generate_handoff` between consecutive subtasks. Exactly one call
//! is in flight at a time; the pipeline only reacts to its own ticket.

use chrono::Local;
use tracing::{debug, warn};

use crate::core::Context;
use crate::domain::{AgentStatus, AgentTask, LedgerEntry, LedgerKind, TaskStatus};
use crate::infrastructure::{ServiceReply, Ticket};
use crate::service::{ServiceCall, ServiceError, ServiceOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Plan,
    Execute(usize),
    Verify(usize),
    Handoff(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Progress(String),
    Completed(String),
    Failed(String),
}

#[derive(Debug)]
pub struct Pipeline {
    id: String,
    goal: String,
    task: Option<AgentTask>,
    ledger: Vec<LedgerEntry>,
    awaiting: Option<(Ticket, Stage)>,
    last_output: Option<String>,
}

impl Pipeline {
    pub fn start(id: impl Into<String>, goal: &str, ctx: &Context) -> Result<Self, ServiceError> {
        let mut pipeline = Self {
            id: id.into(),
            goal: goal.to_string(),
            task: None,
            ledger: Vec::new(),
            awaiting: None,
            last_output: None,
        };
        pipeline.record(LedgerKind::System, format!("Goal received: {goal}"));
        pipeline.submit(
            ServiceCall::GeneratePlan {
                goal: goal.to_string(),
                profile: ctx.profile_handle(),
            },
            Stage::Plan,
            ctx,
        )?;
        Ok(pipeline)
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn task(&self) -> Option<&AgentTask> {
        self.task.as_ref()
    }

    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    /// Text of the most recent successful step
    pub fn last_output(&self) -> Option<&str> {
        self.last_output.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn owns(&self, ticket: Ticket) -> bool {
        matches!(self.awaiting, Some((owned, _)) if owned == ticket)
    }

    /// Advance on a reply. `None` when the ticket is not ours.
    pub fn on_reply(&mut self, reply: &ServiceReply, ctx: &Context) -> Option<PipelineEvent> {
        let (ticket, stage) = self.awaiting?;
        if ticket != reply.ticket {
            return None;
        }
        self.awaiting = None;

        let output = match &reply.result {
            Ok(output) => output.clone(),
            Err(err) => return Some(self.fail(stage, err.to_string())),
        };

        let event = match (stage, output) {
            (Stage::Plan, ServiceOutput::Plan(plan)) => {
                self.record(LedgerKind::Thought, plan.reasoning.clone());
                let task = AgentTask::from_plan(self.id.clone(), self.goal.clone(), plan);
                let summary = format!(
                    "Plan ready: {} agent(s), {} subtask(s)",
                    task.agents.len(),
                    task.subtasks.len()
                );
                let empty = task.subtasks.is_empty();
                self.task = Some(task);
                if empty {
                    return Some(self.complete());
                }
                self.execute(0, ctx)
                    .map(|()| PipelineEvent::Progress(summary))
                    .unwrap_or_else(|err| self.fail(Stage::Execute(0), err.to_string()))
            }
            (Stage::Execute(idx), ServiceOutput::Step(step)) => {
                if !step.success {
                    return Some(self.fail(stage, step.text));
                }
                let title = self.subtask_title(idx);
                if let Some(task) = self.task.as_mut() {
                    if let Some(subtask) = task.subtasks.get_mut(idx) {
                        subtask.result = Some(step.text.clone());
                    }
                }
                self.last_output = Some(step.text.clone());
                self.record(LedgerKind::Action, format!("{title}: {}", step.text));
                let submitted = self.submit(
                    ServiceCall::VerifyStep {
                        subtask: title.clone(),
                        result: step.text.clone(),
                    },
                    Stage::Verify(idx),
                    ctx,
                );
                match submitted {
                    Ok(()) => PipelineEvent::Progress(format!("[{title}] {}", step.text)),
                    Err(err) => self.fail(Stage::Verify(idx), err.to_string()),
                }
            }
            (Stage::Verify(idx), ServiceOutput::Verification(check)) => {
                if !check.valid {
                    let flaw = check
                        .critical_flaw
                        .unwrap_or_else(|| "verification rejected the result".to_string());
                    return Some(self.fail(stage, flaw));
                }
                self.finish_subtask(idx);
                let next = idx + 1;
                if next >= self.subtask_count() {
                    return Some(self.complete());
                }
                let from = self.subtask_title(idx);
                let to = self.subtask_title(next);
                let submitted = self.submit(
                    ServiceCall::GenerateHandoff {
                        from: from.clone(),
                        to,
                    },
                    Stage::Handoff(idx),
                    ctx,
                );
                match submitted {
                    Ok(()) => PipelineEvent::Progress(format!("✓ {from} verified")),
                    Err(err) => self.fail(Stage::Handoff(idx), err.to_string()),
                }
            }
            (Stage::Handoff(idx), ServiceOutput::Text(handoff)) => {
                if let Some(task) = self.task.as_mut() {
                    if let Some(subtask) = task.subtasks.get_mut(idx) {
                        subtask.handoff = Some(handoff.clone());
                    }
                    task.shared_insights.push(handoff.clone());
                }
                self.record(LedgerKind::Thought, format!("Handoff: {handoff}"));
                self.execute(idx + 1, ctx)
                    .map(|()| PipelineEvent::Progress(format!("→ {handoff}")))
                    .unwrap_or_else(|err| self.fail(Stage::Execute(idx + 1), err.to_string()))
            }
            (stage, other) => {
                warn!(?stage, output = %other.summary(), "unexpected pipeline output");
                self.fail(stage, format!("unexpected {} output", reply.operation))
            }
        };
        Some(event)
    }

    fn execute(&mut self, idx: usize, ctx: &Context) -> Result<(), ServiceError> {
        let title = self.subtask_title(idx);
        if let Some(task) = self.task.as_mut() {
            let agent_id = task.subtasks.get(idx).and_then(|s| s.assigned_agent_id.clone());
            if let Some(subtask) = task.subtasks.get_mut(idx) {
                subtask.status = TaskStatus::Running;
            }
            if let Some(agent) = task.agent_mut(agent_id.as_deref()) {
                agent.status = AgentStatus::Working;
            }
        }
        self.record(LedgerKind::Action, format!("Executing {title}"));
        self.submit(
            ServiceCall::ExecuteStep {
                subtask: title,
                profile: ctx.profile_handle(),
            },
            Stage::Execute(idx),
            ctx,
        )
    }

    fn finish_subtask(&mut self, idx: usize) {
        if let Some(task) = self.task.as_mut() {
            let agent_id = task.subtasks.get(idx).and_then(|s| s.assigned_agent_id.clone());
            if let Some(subtask) = task.subtasks.get_mut(idx) {
                subtask.status = TaskStatus::Completed;
            }
            if let Some(agent) = task.agent_mut(agent_id.as_deref()) {
                agent.status = AgentStatus::Done;
            }
        }
    }

    fn complete(&mut self) -> PipelineEvent {
        if let Some(task) = self.task.as_mut() {
            task.status = TaskStatus::Completed;
        }
        self.record(LedgerKind::System, "Task completed".to_string());
        debug!(id = %self.id, "pipeline completed");
        PipelineEvent::Completed(format!("Task complete: {}", self.goal))
    }

    fn fail(&mut self, stage: Stage, reason: String) -> PipelineEvent {
        self.awaiting = None;
        if let Some(task) = self.task.as_mut() {
            task.status = TaskStatus::Failed;
            let idx = match stage {
                Stage::Execute(idx) | Stage::Verify(idx) | Stage::Handoff(idx) => Some(idx),
                Stage::Plan => None,
            };
            if let Some(idx) = idx {
                let agent_id = task.subtasks.get(idx).and_then(|s| s.assigned_agent_id.clone());
                if let Some(subtask) = task.subtasks.get_mut(idx) {
                    subtask.status = TaskStatus::Failed;
                }
                if let Some(agent) = task.agent_mut(agent_id.as_deref()) {
                    agent.status = AgentStatus::Failed;
                }
            }
        }
        self.record(LedgerKind::System, format!("Failure: {reason}"));
        warn!(id = %self.id, ?stage, %reason, "pipeline failed");
        PipelineEvent::Failed(reason)
    }

    fn submit(&mut self, call: ServiceCall, stage: Stage, ctx: &Context) -> Result<(), ServiceError> {
        let ticket = ctx.service.submit(call)?;
        self.awaiting = Some((ticket, stage));
        Ok(())
    }

    fn record(&mut self, kind: LedgerKind, content: String) {
        let id = self.ledger.len() as u64 + 1;
        self.ledger.push(LedgerEntry {
            id,
            kind,
            content,
            timestamp: Local::now(),
        });
    }

    fn subtask_title(&self, idx: usize) -> String {
        self.task
            .as_ref()
            .and_then(|task| task.subtasks.get(idx))
            .map(|subtask| subtask.title.clone())
            .unwrap_or_default()
    }

    fn subtask_count(&self) -> usize {
        self.task.as_ref().map_or(0, |task| task.subtasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AutonomousPlan, PlannedAgent, PlannedSubtask, Profile, StepOutcome, StepVerification,
    };
    use crate::infrastructure::runtime::RuntimeCommand;
    use crate::infrastructure::ServiceClient;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn last_ticket(rx: &mut UnboundedReceiver<RuntimeCommand>) -> (Ticket, &'static str) {
        let mut last = None;
        while let Ok(RuntimeCommand::Call { ticket, call }) = rx.try_recv() {
            last = Some((ticket, call.operation()));
        }
        last.expect("a submitted call")
    }

    fn reply(ticket: Ticket, operation: &'static str, output: ServiceOutput) -> ServiceReply {
        ServiceReply {
            ticket,
            operation,
            result: Ok(output),
        }
    }

    fn two_step_plan() -> AutonomousPlan {
        AutonomousPlan {
            reasoning: "divide".into(),
            agents: vec![PlannedAgent {
                name: "Coder".into(),
                specialization: "coder".into(),
            }],
            subtasks: vec![
                PlannedSubtask {
                    title: "Design".into(),
                    description: String::new(),
                    agent_name: "Coder".into(),
                },
                PlannedSubtask {
                    title: "Build".into(),
                    description: String::new(),
                    agent_name: "Coder".into(),
                },
            ],
        }
    }

    #[test]
    fn test_full_pipeline_runs_in_order() {
        let (client, mut rx) = ServiceClient::pair();
        let ctx = Context::new(Profile::mock(), client);
        let mut pipeline = Pipeline::start("t1", "ship it", &ctx).unwrap();

        let (t, op) = last_ticket(&mut rx);
        assert_eq!(op, "generate_plan");
        let event = pipeline.on_reply(&reply(t, op, ServiceOutput::Plan(two_step_plan())), &ctx);
        assert!(matches!(event, Some(PipelineEvent::Progress(_))));

        let ok_step = |text: &str| {
            ServiceOutput::Step(StepOutcome {
                success: true,
                text: text.into(),
            })
        };
        let valid = || {
            ServiceOutput::Verification(StepVerification {
                valid: true,
                critical_flaw: None,
                suggested_fix: String::new(),
            })
        };

        let (t, op) = last_ticket(&mut rx);
        assert_eq!(op, "execute_step");
        pipeline.on_reply(&reply(t, op, ok_step("designed")), &ctx);
        let (t, op) = last_ticket(&mut rx);
        assert_eq!(op, "verify_step");
        pipeline.on_reply(&reply(t, op, valid()), &ctx);
        let (t, op) = last_ticket(&mut rx);
        assert_eq!(op, "generate_handoff");
        pipeline.on_reply(&reply(t, op, ServiceOutput::Text("over to you".into())), &ctx);
        let (t, op) = last_ticket(&mut rx);
        assert_eq!(op, "execute_step");
        pipeline.on_reply(&reply(t, op, ok_step("built")), &ctx);
        let (t, op) = last_ticket(&mut rx);
        let event = pipeline.on_reply(&reply(t, op, valid()), &ctx);

        assert!(matches!(event, Some(PipelineEvent::Completed(_))));
        assert!(!pipeline.is_running());
        let task = pipeline.task().unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.subtasks.iter().all(|s| s.status == TaskStatus::Completed));
        assert_eq!(task.shared_insights, vec!["over to you".to_string()]);
        assert_eq!(pipeline.last_output(), Some("built"));
        assert!(pipeline
            .ledger()
            .iter()
            .any(|e| e.kind == LedgerKind::Thought && e.content == "divide"));
    }

    #[test]
    fn test_failure_marks_task_failed() {
        let (client, mut rx) = ServiceClient::pair();
        let ctx = Context::new(Profile::mock(), client);
        let mut pipeline = Pipeline::start("t2", "x", &ctx).unwrap();

        let (t, op) = last_ticket(&mut rx);
        pipeline.on_reply(&reply(t, op, ServiceOutput::Plan(two_step_plan())), &ctx);
        let (t, op) = last_ticket(&mut rx);
        let event = pipeline.on_reply(
            &ServiceReply {
                ticket: t,
                operation: op,
                result: Err(ServiceError::Unavailable {
                    operation: "execute_step",
                    reason: "neural link dropped".into(),
                }),
            },
            &ctx,
        );

        assert!(matches!(event, Some(PipelineEvent::Failed(ref r)) if r.contains("neural link")));
        let task = pipeline.task().unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.subtasks[0].status, TaskStatus::Failed);
        assert_eq!(task.agents[0].status, AgentStatus::Failed);
    }

    #[test]
    fn test_ignores_foreign_tickets() {
        let (client, _rx) = ServiceClient::pair();
        let ctx = Context::new(Profile::mock(), client);
        let mut pipeline = Pipeline::start("t3", "x", &ctx).unwrap();
        let stray = reply(Ticket(9_999), "generate_plan", ServiceOutput::Text(String::new()));
        assert_eq!(pipeline.on_reply(&stray, &ctx), None);
        assert!(pipeline.is_running());
    }
}
