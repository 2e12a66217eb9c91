//! Shared test utilities and mock services.

#![allow(dead_code, unused_imports)]

pub mod direct;
pub mod scripted;

use feature_runtime::catalog::{CatalogFeature, CatalogServices, InMemoryCatalog, Item};
use feature_runtime::config::InvalidTransitionPolicy;
use feature_runtime::feature::FeatureSnapshot;
use feature_runtime::{Feature, FeatureModel, RuntimeConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use scripted::GatedSource;

pub type Recorded<S> = Arc<Mutex<Vec<S>>>;

/// Subscribe an observer that keeps every snapshot it is given.
pub fn record<F: Feature>(model: &mut FeatureModel<F>) -> Recorded<FeatureSnapshot<F>> {
    let recorded: Recorded<FeatureSnapshot<F>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    model.subscribe(move |snapshot| sink.lock().push(snapshot.clone()));
    recorded
}

/// Config that logs invalid transitions instead of panicking.
pub fn log_config() -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.diagnostics.invalid_transition = InvalidTransitionPolicy::Log;
    config
}

pub fn item(id: u64, title: &str) -> Item {
    Item {
        id,
        title: title.to_string(),
    }
}

/// Catalog model whose fetches are driven by `source`; saves and tracking
/// go to the returned in-memory service.
pub fn gated_catalog(
    source: &Arc<GatedSource>,
    config: &RuntimeConfig,
) -> (FeatureModel<CatalogFeature>, Arc<InMemoryCatalog>) {
    let memory = Arc::new(InMemoryCatalog::new(Duration::ZERO));
    let services = CatalogServices::new(source.clone(), memory.clone(), memory.clone());
    let model = FeatureModel::new(CatalogFeature::new(services), config)
        .expect("Failed to create model");
    (model, memory)
}

/// Yield to the runtime until `condition` holds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

/// Give spawned tasks a chance to run.
pub async fn yield_many() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
