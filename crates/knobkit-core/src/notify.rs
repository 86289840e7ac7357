//! Value-change observers.

/// Handle returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<S> = Box<dyn FnMut(&S)>;

/// A list of callbacks invoked with the sender, in subscription order.
pub struct Observers<S: ?Sized> {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback<S>)>,
}

impl<S: ?Sized> Default for Observers<S> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }
}

impl<S: ?Sized> std::fmt::Debug for Observers<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.callbacks.len())
            .finish()
    }
}

impl<S: ?Sized> Observers<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&S) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback. Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Invoke every callback once with `sender`.
    pub fn emit(&mut self, sender: &S) {
        for (_, callback) in &mut self.callbacks {
            callback(sender);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut observers: Observers<i32> = Observers::new();
        for tag in ["a", "b"] {
            let log = log.clone();
            observers.subscribe(move |v: &i32| log.borrow_mut().push(format!("{tag}{v}")));
        }
        observers.emit(&7);
        assert_eq!(*log.borrow(), vec!["a7", "b7"]);
    }

    #[test]
    fn test_unsubscribe() {
        let hits = Rc::new(RefCell::new(0));
        let mut observers: Observers<()> = Observers::new();
        let h = hits.clone();
        let id = observers.subscribe(move |_| *h.borrow_mut() += 1);
        observers.emit(&());
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));
        observers.emit(&());
        assert_eq!(*hits.borrow(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut observers: Observers<()> = Observers::new();
        let a = observers.subscribe(|_| {});
        let b = observers.subscribe(|_| {});
        assert_ne!(a, b);
        assert_eq!(observers.len(), 2);
        observers.clear();
        assert!(observers.is_empty());
    }
}
