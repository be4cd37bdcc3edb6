//! Async worker - runs in the Tokio runtime and executes service calls

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::infrastructure::runtime::bridge::{RuntimeCommand, ServiceReply};
use crate::service::{dispatch, AiService, ServiceError};

/// Run the async worker loop
///
/// Each call runs in its own task so a slow operation never holds up the
/// ones queued behind it. Replies are sent in completion order.
pub async fn run_service_worker(
    service: Arc<dyn AiService>,
    timeout: Duration,
    mut cmd_rx: UnboundedReceiver<RuntimeCommand>,
    evt_tx: Sender<ServiceReply>,
) {
    info!(timeout_ms = timeout.as_millis() as u64, "service worker started");

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            RuntimeCommand::Shutdown => break,
            RuntimeCommand::Call { ticket, call } => {
                let service = Arc::clone(&service);
                let evt_tx = evt_tx.clone();
                tokio::spawn(async move {
                    let operation = call.operation();
                    let started = Instant::now();
                    let result =
                        match tokio::time::timeout(timeout, dispatch(service.as_ref(), call)).await
                        {
                            Ok(result) => result,
                            Err(_) => Err(ServiceError::Timeout {
                                operation,
                                elapsed: timeout,
                            }),
                        };
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    match &result {
                        Ok(_) => debug!(%ticket, operation, elapsed_ms, "service call finished"),
                        Err(err) => warn!(%ticket, operation, elapsed_ms, error = %err, "service call failed"),
                    }
                    // The UI may already be gone during shutdown.
                    let _ = evt_tx.send(ServiceReply {
                        ticket,
                        operation,
                        result,
                    });
                });
            }
        }
    }

    info!("service worker stopped");
}
