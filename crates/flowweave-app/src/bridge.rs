//! Channel bridge between the egui thread and the async backend client.
//!
//! The UI never blocks on the backend: requests go over a std mpsc channel to
//! a background thread running a single-threaded tokio runtime, and results
//! come back as events the app drains each frame with `try_recv`.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use tracing::{error, info};
use uuid::Uuid;

use flowweave_client::{
    AutomationBackend, AutomationPatch, MemoryBackend, TriggerRequest, watch_execution,
};
use flowweave_core::{Automation, AutomationExecution, AutomationStatus, Graph, TriggerType};

pub enum BackendRequest {
    Create {
        name: String,
        trigger_type: TriggerType,
        template: Option<String>,
    },
    SaveGraph {
        automation_id: Uuid,
        graph: Graph,
    },
    Rename {
        automation_id: Uuid,
        name: String,
    },
    SetStatus {
        automation_id: Uuid,
        status: AutomationStatus,
    },
    SetEnabled {
        automation_id: Uuid,
        enabled: bool,
    },
    Delete {
        automation_id: Uuid,
    },
    Trigger {
        automation_id: Uuid,
        test_mode: bool,
    },
    FetchExecutions {
        automation_id: Uuid,
    },
}

#[derive(Debug, Clone)]
pub enum BackendEvent {
    Created(Automation),
    Saved(Automation),
    SaveFailed(String),
    Updated(Automation),
    Deleted(Uuid),
    Triggered(Uuid),
    ExecutionSnapshot(AutomationExecution),
    Executions(Vec<AutomationExecution>),
    Error(String),
}

pub struct BackendBridge {
    request_tx: Sender<BackendRequest>,
    event_rx: Receiver<BackendEvent>,
}

impl BackendBridge {
    /// Spawn the worker thread and hand back the UI-side channel ends.
    pub fn start(backend: Arc<MemoryBackend>) -> Self {
        let (request_tx, request_rx) = channel::<BackendRequest>();
        let (event_tx, event_rx) = channel::<BackendEvent>();

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to build backend runtime: {}", e);
                    return;
                }
            };

            while let Ok(request) = request_rx.recv() {
                rt.block_on(handle_request(&*backend, request, &event_tx));
            }
            info!("Backend bridge shutting down");
        });

        Self {
            request_tx,
            event_rx,
        }
    }

    pub fn send(&self, request: BackendRequest) {
        let _ = self.request_tx.send(request);
    }

    pub fn try_recv(&self) -> Option<BackendEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_request(
    backend: &dyn AutomationBackend,
    request: BackendRequest,
    event_tx: &Sender<BackendEvent>,
) {
    let emit = |event: BackendEvent| {
        let _ = event_tx.send(event);
    };

    match request {
        BackendRequest::Create {
            name,
            trigger_type,
            template,
        } => match backend
            .create_automation(&name, trigger_type, template.as_deref())
            .await
        {
            Ok(automation) => emit(BackendEvent::Created(automation)),
            Err(e) => emit(BackendEvent::Error(format!("Create failed: {}", e))),
        },
        BackendRequest::SaveGraph {
            automation_id,
            graph,
        } => match backend
            .update_automation(automation_id, AutomationPatch::graph(graph))
            .await
        {
            Ok(automation) => emit(BackendEvent::Saved(automation)),
            Err(e) => emit(BackendEvent::SaveFailed(e.to_string())),
        },
        BackendRequest::Rename {
            automation_id,
            name,
        } => {
            let patch = AutomationPatch {
                name: Some(name),
                ..Default::default()
            };
            match backend.update_automation(automation_id, patch).await {
                Ok(automation) => emit(BackendEvent::Updated(automation)),
                Err(e) => emit(BackendEvent::Error(format!("Rename failed: {}", e))),
            }
        }
        BackendRequest::SetStatus {
            automation_id,
            status,
        } => match backend
            .update_automation(automation_id, AutomationPatch::status(status))
            .await
        {
            Ok(automation) => emit(BackendEvent::Updated(automation)),
            Err(e) => emit(BackendEvent::Error(format!("Status change failed: {}", e))),
        },
        BackendRequest::SetEnabled {
            automation_id,
            enabled,
        } => {
            let patch = AutomationPatch {
                enabled: Some(enabled),
                ..Default::default()
            };
            match backend.update_automation(automation_id, patch).await {
                Ok(automation) => emit(BackendEvent::Updated(automation)),
                Err(e) => emit(BackendEvent::Error(format!("Toggle failed: {}", e))),
            }
        }
        BackendRequest::Delete { automation_id } => {
            match backend.delete_automation(automation_id).await {
                Ok(()) => emit(BackendEvent::Deleted(automation_id)),
                Err(e) => emit(BackendEvent::Error(format!("Delete failed: {}", e))),
            }
        }
        BackendRequest::Trigger {
            automation_id,
            test_mode,
        } => {
            let request = TriggerRequest {
                trigger_data: serde_json::json!({}),
                test_mode,
            };
            match backend.trigger_execution(automation_id, request).await {
                Ok(execution_id) => {
                    emit(BackendEvent::Triggered(execution_id));
                    // Surface intermediate snapshots while polling so the
                    // trace drawer updates live.
                    if let Ok(execution) = backend.get_execution(execution_id).await {
                        emit(BackendEvent::ExecutionSnapshot(execution));
                    }
                    match watch_execution(backend, execution_id, Duration::from_millis(250)).await
                    {
                        Ok(execution) => emit(BackendEvent::ExecutionSnapshot(execution)),
                        Err(e) => emit(BackendEvent::Error(format!("Run failed: {}", e))),
                    }
                }
                Err(e) => emit(BackendEvent::Error(format!("Trigger failed: {}", e))),
            }
        }
        BackendRequest::FetchExecutions { automation_id } => {
            match backend.list_executions(automation_id).await {
                Ok(executions) => emit(BackendEvent::Executions(executions)),
                Err(e) => emit(BackendEvent::Error(format!(
                    "Failed to load executions: {}",
                    e
                ))),
            }
        }
    }
}
