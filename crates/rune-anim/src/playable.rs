//! The uniform play/stop/duration/completion contract.

use std::cell::RefCell;

/// Anything that can be played, stopped and observed for completion.
///
/// Implementations fire their completion listeners exactly once per play,
/// whether the play ran to its end or was stopped part way.
pub trait Playable {
    /// Start immediately.
    fn play_now(&self);

    /// Start on the next frame, so the caller can finish a batch of scene
    /// changes that should count as the starting state.
    fn play_deferred(&self);

    /// Stop, optionally snapping every property to its end value first.
    fn stop(&self, jump_to_end: bool);

    /// Total running time in seconds.
    fn duration(&self) -> f64;

    fn is_running(&self) -> bool;

    /// Capture start and end state. Runs at most once per playable.
    fn initialize(&self) {}

    /// Append a completion listener.
    fn on_complete(&self, listener: Box<dyn FnMut()>);
}

/// Ordered completion listeners.
///
/// Listeners may register further listeners or replay the owner while
/// running; the list is never borrowed during a call.
#[derive(Default)]
pub struct CompletionListeners {
    listeners: RefCell<Vec<Box<dyn FnMut()>>>,
}

impl CompletionListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, listener: Box<dyn FnMut()>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call every listener in registration order.
    pub fn fire(&self) {
        let mut current = std::mem::take(&mut *self.listeners.borrow_mut());
        for listener in current.iter_mut() {
            listener();
        }
        let mut slot = self.listeners.borrow_mut();
        let added = std::mem::take(&mut *slot);
        current.extend(added);
        *slot = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_fire_in_order_and_keep() {
        let listeners = CompletionListeners::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let log = log.clone();
            listeners.add(Box::new(move || log.borrow_mut().push(i)));
        }

        listeners.fire();
        listeners.fire();
        assert_eq!(*log.borrow(), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_listener_can_register_listener() {
        let listeners = Rc::new(CompletionListeners::new());
        let count = Rc::new(Cell::new(0));

        let (l, c) = (Rc::downgrade(&listeners), count.clone());
        listeners.add(Box::new(move || {
            c.set(c.get() + 1);
            if let Some(l) = l.upgrade() {
                let c = c.clone();
                l.add(Box::new(move || c.set(c.get() + 100)));
            }
        }));

        listeners.fire();
        assert_eq!(count.get(), 1);
        assert_eq!(listeners.len(), 2);
    }
}
