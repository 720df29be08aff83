use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

/// A value with a current snapshot and push notifications on replacement.
pub struct Published<T> {
    current: Arc<T>,
    subscribers: Vec<Sender<Arc<T>>>,
}

impl<T> Published<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: Arc::new(initial),
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> Arc<T> {
        Arc::clone(&self.current)
    }

    /// Receive every future snapshot. The current one is delivered first.
    pub fn subscribe(&mut self) -> Receiver<Arc<T>> {
        let (tx, rx) = mpsc::channel();
        let _ = tx.send(Arc::clone(&self.current));
        self.subscribers.push(tx);
        rx
    }

    /// Replace the snapshot wholesale and notify subscribers, dropping any
    /// whose receiver is gone.
    pub fn publish(&mut self, value: T) {
        self.current = Arc::new(value);
        let current = &self.current;
        self.subscribers
            .retain(|tx| tx.send(Arc::clone(current)).is_ok());
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
