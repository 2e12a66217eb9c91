use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// One entry of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub title: String,
}

/// Data entered in the compose sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub title: String,
}

impl ItemForm {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Domain failures, rendered by the view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Item rejected: {reason}")]
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEvent {
    ItemOpened { id: u64 },
    ItemSaved { id: u64 },
}

#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_items(&self) -> Result<Vec<Item>, CatalogError>;
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn save_item(&self, form: ItemForm) -> Result<Item, CatalogError>;
}

#[async_trait]
pub trait Analytics: Send + Sync {
    async fn track(&self, event: TrackEvent) -> Result<(), CatalogError>;
}

/// Services the catalog feature is built with.
#[derive(Clone)]
pub struct CatalogServices {
    pub source: Arc<dyn ItemSource>,
    pub store: Arc<dyn ItemStore>,
    pub analytics: Arc<dyn Analytics>,
}

impl CatalogServices {
    pub fn new(
        source: Arc<dyn ItemSource>,
        store: Arc<dyn ItemStore>,
        analytics: Arc<dyn Analytics>,
    ) -> Self {
        Self {
            source,
            store,
            analytics,
        }
    }

    /// Use one value for every capability.
    pub fn shared<S>(service: Arc<S>) -> Self
    where
        S: ItemSource + ItemStore + Analytics + 'static,
    {
        Self {
            source: service.clone(),
            store: service.clone(),
            analytics: service,
        }
    }
}
