//! Runtime bridge - connects the sync TUI thread with the async Tokio runtime
//!
//! Service calls are submitted through a [`ServiceClient`] and executed on a
//! dedicated worker thread that owns the runtime. Replies come back over a
//! std channel that the UI loop drains once per frame.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::infrastructure::runtime::worker::run_service_worker;
use crate::service::{AiService, ServiceCall, ServiceError, ServiceOutput};

/// Identifies one submitted call. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Commands sent from the TUI to the async worker
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Run a service call
    Call { ticket: Ticket, call: ServiceCall },
    /// Shutdown the worker
    Shutdown,
}

/// Completion of a call, sent from the async worker to the TUI
#[derive(Debug, Clone)]
pub struct ServiceReply {
    pub ticket: Ticket,
    pub operation: &'static str,
    pub result: Result<ServiceOutput, ServiceError>,
}

/// Cloneable submission handle given to views through the shared context
#[derive(Debug, Clone)]
pub struct ServiceClient {
    cmd_tx: UnboundedSender<RuntimeCommand>,
    next_ticket: Arc<AtomicU64>,
}

impl ServiceClient {
    /// Client feeding the given channel. The receiving side is usually the
    /// worker; tests hold it directly to inspect submissions.
    pub fn pair() -> (Self, UnboundedReceiver<RuntimeCommand>) {
        let (cmd_tx, cmd_rx) = unbounded_channel();
        (
            Self {
                cmd_tx,
                next_ticket: Arc::new(AtomicU64::new(1)),
            },
            cmd_rx,
        )
    }

    /// Client with nobody listening; every submission fails with `Closed`.
    pub fn disconnected() -> Self {
        let (client, _rx) = Self::pair();
        client
    }

    /// Queue a call. The returned ticket is what the reply will carry.
    pub fn submit(&self, call: ServiceCall) -> Result<Ticket, ServiceError> {
        let ticket = Ticket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%ticket, operation = call.operation(), "submit service call");
        self.cmd_tx
            .send(RuntimeCommand::Call { ticket, call })
            .map_err(|_| ServiceError::Closed)?;
        Ok(ticket)
    }

    fn shutdown(&self) {
        let _ = self.cmd_tx.send(RuntimeCommand::Shutdown);
    }
}

/// Bridge between sync TUI thread and async Tokio runtime
pub struct RuntimeBridge {
    client: ServiceClient,
    evt_rx: Receiver<ServiceReply>,
}

impl RuntimeBridge {
    /// Spawn the worker thread serving `service`.
    ///
    /// Calls that run longer than `timeout` resolve to
    /// [`ServiceError::Timeout`].
    pub fn new(service: Arc<dyn AiService>, timeout: Duration) -> anyhow::Result<Self> {
        let (client, cmd_rx) = ServiceClient::pair();
        let (evt_tx, evt_rx) = mpsc::channel::<ServiceReply>();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("clone-os-service")
            .enable_time()
            .build()
            .context("create tokio runtime")?;

        thread::Builder::new()
            .name("clone-os-bridge".to_string())
            .spawn(move || {
                runtime.block_on(run_service_worker(service, timeout, cmd_rx, evt_tx));
            })
            .context("spawn service bridge thread")?;

        Ok(Self { client, evt_rx })
    }

    pub fn client(&self) -> ServiceClient {
        self.client.clone()
    }

    /// Poll for replies (non-blocking)
    pub fn poll_events(&self) -> Vec<ServiceReply> {
        let mut events = Vec::new();
        while let Ok(evt) = self.evt_rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Block up to `timeout` for the next reply
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ServiceReply> {
        match self.evt_rx.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for RuntimeBridge {
    fn drop(&mut self) {
        self.client.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::StubAiService;

    #[test]
    fn test_tickets_are_unique_and_increasing() {
        let (client, mut rx) = ServiceClient::pair();
        let a = client.submit(ServiceCall::PredictiveTelemetry).unwrap();
        let b = client.clone().submit(ServiceCall::PredictiveTelemetry).unwrap();
        assert!(b > a);
        assert!(matches!(rx.try_recv(), Ok(RuntimeCommand::Call { ticket, .. }) if ticket == a));
    }

    #[test]
    fn test_disconnected_client_reports_closed() {
        let client = ServiceClient::disconnected();
        assert_eq!(
            client.submit(ServiceCall::PredictiveTelemetry),
            Err(ServiceError::Closed)
        );
    }

    #[test]
    fn test_bridge_round_trip() {
        let bridge =
            RuntimeBridge::new(Arc::new(StubAiService::instant()), Duration::from_secs(2)).unwrap();
        let ticket = bridge
            .client()
            .submit(ServiceCall::NeuralPrompts {
                context: "focus".into(),
            })
            .unwrap();
        let reply = bridge
            .recv_timeout(Duration::from_secs(2))
            .expect("reply");
        assert_eq!(reply.ticket, ticket);
        assert_eq!(reply.operation, "neural_prompts");
        assert!(matches!(reply.result, Ok(ServiceOutput::Prompts(ref p)) if p.len() == 2));
    }

    #[test]
    fn test_bridge_times_out_slow_calls() {
        let slow = StubAiService::new(Duration::from_millis(500), None);
        let bridge = RuntimeBridge::new(Arc::new(slow), Duration::from_millis(20)).unwrap();
        bridge
            .client()
            .submit(ServiceCall::GenerateDream { seed: "x".into() })
            .unwrap();
        let reply = bridge
            .recv_timeout(Duration::from_secs(2))
            .expect("reply");
        assert!(matches!(
            reply.result,
            Err(ServiceError::Timeout {
                operation: "generate_dream",
                ..
            })
        ));
    }
}
