//! Explicit publish/subscribe for feature snapshots.

/// Callback invoked with every published snapshot.
pub type Observer<S> = Box<dyn FnMut(&S) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered set of observers. Notification order is subscription order.
pub struct ObserverRegistry<S> {
    observers: Vec<(SubscriptionId, Observer<S>)>,
    next_id: u64,
}

impl<S> ObserverRegistry<S> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, observer: Observer<S>) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn notify(&mut self, snapshot: &S) {
        for (_, observer) in self.observers.iter_mut() {
            observer(snapshot);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn clear(&mut self) {
        self.observers.clear();
    }
}

impl<S> Default for ObserverRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
