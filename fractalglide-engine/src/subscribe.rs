/// Handle returned by a subscription, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// An ordered list of callbacks owned by the renderer.
///
/// Ids are never reused, so unsubscribing is deterministic: it removes
/// exactly the entry the id was issued for, and returns `false` for an id
/// that was already removed. Callbacks run on the coordinating thread, in
/// subscription order.
pub struct Subscribers<T: ?Sized> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn FnMut(&T)>)>,
}

impl<T: ?Sized> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, callback: Box<dyn FnMut(&T)>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Remove a subscription. Returns whether it was still present.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, value: &T) {
        for (_, callback) in &mut self.entries {
            callback(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}
