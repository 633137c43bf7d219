//! # Node Runtime
//!
//! Starts the background workers over a [`NodeContainer`] and stops them
//! cooperatively.
//!
//! ## Startup Sequence
//!
//! 1. Replay stored state diffs (`restore_ledger_state`)
//! 2. Recover the persisted validator set
//! 3. Spawn the round application worker, the candidate tracker and the
//!    status reporter, each with a child of the shutdown token

use std::sync::Arc;

use anyhow::{Context, Result};
use tangle_ledger::LedgerApi;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::container::{NodeConfig, NodeContainer};
use crate::status::StatusReporter;

/// The node runtime orchestrating all workers.
pub struct NodeRuntime {
    container: Arc<NodeContainer>,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Result<Self> {
        info!("Creating tangle node runtime");
        Ok(Self {
            container: Arc::new(NodeContainer::new(config)?),
            tasks: Vec::new(),
        })
    }

    /// Recover state and spawn the workers.
    pub async fn start(&mut self) -> Result<()> {
        let container = Arc::clone(&self.container);

        container
            .ledger
            .restore_ledger_state()
            .context("Failed to restore ledger state")?;
        container
            .tracker
            .init()
            .context("Failed to recover validator set")?;
        info!(
            snapshot_index = container.ledger.latest_snapshot_index(),
            validators = container.tracker.validator_set().len(),
            "Node state recovered"
        );

        let worker = container.round_worker();
        let token = container.shutdown.child_token();
        self.tasks
            .push(("round-applier", tokio::spawn(worker.run(token))));

        let tracker = Arc::clone(&container.tracker);
        let token = container.shutdown.child_token();
        self.tasks
            .push(("candidate-tracker", tokio::spawn(tracker.run(token))));

        let reporter = StatusReporter::new(
            container.ledger.clone(),
            container.rounds.clone(),
            Arc::clone(&container.tracker),
            container.config.runtime.status_interval,
        );
        let token = container.shutdown.child_token();
        self.tasks
            .push(("status-reporter", tokio::spawn(reporter.run(token))));

        info!(workers = self.tasks.len(), "Node runtime started");
        Ok(())
    }

    /// Cancel every worker and wait for them to stop.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");
        self.container.shutdown.cancel();

        let timeout = self.container.config.runtime.shutdown_timeout;
        for (name, handle) in self.tasks {
            match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(worker = name, error = %e, "Worker panicked"),
                Err(_) => warn!(worker = name, "Worker did not stop in time"),
            }
        }

        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<NodeContainer> {
        Arc::clone(&self.container)
    }
}
