//! Item source whose responses are released by the test.

use async_trait::async_trait;
use feature_runtime::catalog::{CatalogError, Item, ItemSource};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

struct Step {
    gate: oneshot::Receiver<()>,
    result: Result<Vec<Item>, CatalogError>,
}

/// Release handle for one scripted response.
///
/// Dropping the gate releases the response as well.
pub struct Gate(oneshot::Sender<()>);

impl Gate {
    pub fn release(self) {
        let _ = self.0.send(());
    }

    /// Resolves once the fetch waiting on this gate has been dropped.
    pub async fn closed(&mut self) {
        self.0.closed().await;
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

/// Each fetch takes the next scripted step and waits for its gate.
/// Fetches beyond the script return an empty list right away.
#[derive(Default)]
pub struct GatedSource {
    steps: Mutex<VecDeque<Step>>,
    started: AtomicUsize,
}

impl GatedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, result: Result<Vec<Item>, CatalogError>) -> Gate {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().push_back(Step { gate: rx, result });
        Gate(tx)
    }

    /// Number of fetches that have started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ItemSource for GatedSource {
    async fn fetch_items(&self) -> Result<Vec<Item>, CatalogError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().pop_front();
        let Some(step) = step else {
            return Ok(Vec::new());
        };
        let _ = step.gate.await;
        step.result
    }
}
