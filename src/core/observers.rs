use crate::domain::Aggregates;

pub type SubscriptionId = u64;

type Observer = Box<dyn Fn(&Aggregates) + Send>;

/// Callbacks notified with a fresh aggregate snapshot after every ledger change.
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: SubscriptionId,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&Aggregates) + Send + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn notify(&self, aggregates: &Aggregates) {
        for (_, observer) in &self.observers {
            observer(aggregates);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
