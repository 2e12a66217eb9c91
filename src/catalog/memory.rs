use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::service::{Analytics, CatalogError, Item, ItemForm, ItemSource, ItemStore, TrackEvent};

#[derive(Default)]
struct Inner {
    items: Vec<Item>,
    next_id: u64,
    fetch_failures: VecDeque<CatalogError>,
    save_failures: VecDeque<CatalogError>,
    tracked: Vec<TrackEvent>,
    fetches: usize,
}

/// In-process catalog with simulated latency, for the demo and tests.
pub struct InMemoryCatalog {
    inner: Mutex<Inner>,
    latency: Duration,
}

impl InMemoryCatalog {
    pub fn new(latency: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            latency,
        }
    }

    pub fn with_items<I, S>(self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut inner = self.inner.lock();
            for title in titles {
                inner.next_id += 1;
                let id = inner.next_id;
                inner.items.push(Item {
                    id,
                    title: title.into(),
                });
            }
        }
        self
    }

    /// Make the next fetch fail with `error`.
    pub fn fail_next_fetch(&self, error: CatalogError) {
        self.inner.lock().fetch_failures.push_back(error);
    }

    /// Make the next save fail with `error`.
    pub fn fail_next_save(&self, error: CatalogError) {
        self.inner.lock().save_failures.push_back(error);
    }

    pub fn items(&self) -> Vec<Item> {
        self.inner.lock().items.clone()
    }

    pub fn tracked(&self) -> Vec<TrackEvent> {
        self.inner.lock().tracked.clone()
    }

    /// Number of fetches that reached the service.
    pub fn fetches(&self) -> usize {
        self.inner.lock().fetches
    }

    async fn delay(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl ItemSource for InMemoryCatalog {
    async fn fetch_items(&self) -> Result<Vec<Item>, CatalogError> {
        self.inner.lock().fetches += 1;
        self.delay().await;

        let mut inner = self.inner.lock();
        match inner.fetch_failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(inner.items.clone()),
        }
    }
}

#[async_trait]
impl ItemStore for InMemoryCatalog {
    async fn save_item(&self, form: ItemForm) -> Result<Item, CatalogError> {
        self.delay().await;

        let mut inner = self.inner.lock();
        if let Some(error) = inner.save_failures.pop_front() {
            return Err(error);
        }
        inner.next_id += 1;
        let item = Item {
            id: inner.next_id,
            title: form.title,
        };
        inner.items.push(item.clone());
        Ok(item)
    }
}

#[async_trait]
impl Analytics for InMemoryCatalog {
    async fn track(&self, event: TrackEvent) -> Result<(), CatalogError> {
        self.inner.lock().tracked.push(event);
        Ok(())
    }
}
