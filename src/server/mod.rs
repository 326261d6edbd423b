//! gRPC surface: the host-exposed call boundary around the replication
//! core.

pub mod error_mapping;
pub mod structured_error;

use std::sync::Arc;

use tokio::sync::watch;
use tonic::{Request, Response, Status};
use tracing::{info, warn};

use crate::drive::DriveProvider;
use crate::greeting::get_greeting;
use crate::metrics::{generate_request_id, OperationTimer};
use crate::replicate::{CopyOutcome, IterationReport, Replicator, RetryPolicy};

use structured_error::to_error_json;

// Import generated protobuf types
pub mod proto {
    #![allow(clippy::pedantic)]
    #![allow(clippy::all)]
    tonic::include_proto!("drivedup");
}

use proto::drivedup_daemon_server::DrivedupDaemon;
use proto::{
    DaemonInfo, GetDaemonInfoRequest, GetGreetingRequest, GetGreetingResponse,
    IterationReport as ProtoIterationReport, ItemOutcome, ReplicateRequest, ReplicateResponse,
    ShutdownRequest, ShutdownResponse,
};

/// Signal type for daemon shutdown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownSignal {
    None,
    Shutdown,
}

/// The daemon's gRPC service.
pub struct DrivedupDaemonService {
    replicator: Replicator,
    backend: String,
    shutdown_tx: Arc<watch::Sender<ShutdownSignal>>,
}

impl DrivedupDaemonService {
    #[must_use]
    pub fn new(
        provider: Arc<dyn DriveProvider>,
        retry: RetryPolicy,
        backend: &str,
        shutdown_tx: Arc<watch::Sender<ShutdownSignal>>,
    ) -> Self {
        Self {
            replicator: Replicator::new(provider, retry),
            backend: backend.to_string(),
            shutdown_tx,
        }
    }
}

fn outcome_to_proto(outcome: &CopyOutcome) -> ItemOutcome {
    match outcome {
        CopyOutcome::Created {
            source_id,
            source_name,
            item,
        } => ItemOutcome {
            source_id: source_id.clone(),
            source_name: source_name.clone(),
            created: true,
            created_id: item.id.clone(),
            created_name: item.name.clone(),
            kind: item.kind.to_string(),
            skip_reason: String::new(),
            detail: String::new(),
        },
        CopyOutcome::Skipped {
            source_id,
            source_name,
            reason,
        } => ItemOutcome {
            source_id: source_id.clone(),
            source_name: source_name.clone(),
            created: false,
            created_id: String::new(),
            created_name: String::new(),
            kind: String::new(),
            skip_reason: reason.code().to_string(),
            detail: reason.to_string(),
        },
    }
}

fn iteration_to_proto(report: &IterationReport) -> ProtoIterationReport {
    ProtoIterationReport {
        iteration: report.iteration,
        root: Some(outcome_to_proto(&report.root)),
        children: report.children.iter().map(outcome_to_proto).collect(),
    }
}

#[tonic::async_trait]
impl DrivedupDaemon for DrivedupDaemonService {
    async fn replicate(
        &self,
        request: Request<ReplicateRequest>,
    ) -> Result<Response<ReplicateResponse>, Status> {
        let _timer = OperationTimer::new("replicate");
        let request_id = generate_request_id();
        let req = request.into_inner();

        info!(
            request_id = %request_id,
            quantity = req.quantity,
            "replicate requested"
        );

        match self
            .replicator
            .replicate(
                &req.source_url,
                req.quantity,
                &req.destination_url,
                req.desired_name.as_deref(),
            )
            .await
        {
            Ok(report) => Ok(Response::new(ReplicateResponse {
                success: true,
                error: String::new(),
                iterations: report.iterations.iter().map(iteration_to_proto).collect(),
            })),
            Err(e) => {
                warn!(request_id = %request_id, "replication batch rejected: {e}");
                Ok(Response::new(ReplicateResponse {
                    success: false,
                    error: to_error_json(&e),
                    iterations: vec![],
                }))
            }
        }
    }

    async fn get_greeting(
        &self,
        request: Request<GetGreetingRequest>,
    ) -> Result<Response<GetGreetingResponse>, Status> {
        let req = request.into_inner();
        Ok(Response::new(GetGreetingResponse {
            greeting: get_greeting(&req.name),
        }))
    }

    async fn get_daemon_info(
        &self,
        _request: Request<GetDaemonInfoRequest>,
    ) -> Result<Response<DaemonInfo>, Status> {
        Ok(Response::new(DaemonInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            pid: std::process::id(),
            backend: self.backend.clone(),
        }))
    }

    async fn shutdown(
        &self,
        _request: Request<ShutdownRequest>,
    ) -> Result<Response<ShutdownResponse>, Status> {
        info!("shutdown requested");
        if self.shutdown_tx.send(ShutdownSignal::Shutdown).is_err() {
            warn!("no shutdown listener registered");
        }
        Ok(Response::new(ShutdownResponse { success: true }))
    }
}
