//! Dispatcher for follow-up actions
//!
//! Hooks and subscribers run while the store is mutably borrowed, so they
//! cannot call [`Store::dispatch`](crate::Store::dispatch) themselves. They
//! capture a [`Dispatcher`] instead. Actions sent through it are queued and
//! run through the full middleware chain once the current dispatch has
//! finished notifying subscribers.
//!
//! This enables patterns like:
//! - a subscriber reacting to `Loaded` by dispatching `Render`
//! - a middleware expanding one action into a follow-up action

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

/// Cloneable handle that queues actions on a store
pub struct Dispatcher<A> {
    action_tx: Sender<A>,
}

impl<A> Dispatcher<A> {
    /// Queue an action for the owning store
    ///
    /// `None` is ignored. If the store has been dropped the action is
    /// discarded.
    pub fn dispatch(&self, action: impl Into<Option<A>>) {
        let action: Option<A> = action.into();
        let Some(action) = action else {
            return;
        };
        if self.action_tx.send(action).is_err() {
            log::warn!("Dispatcher: store is gone, dropping queued action");
        }
    }
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            action_tx: self.action_tx.clone(),
        }
    }
}

/// Receiving side of the follow-up queue, owned by the store
pub(crate) struct ActionQueue<A> {
    action_tx: Sender<A>,
    action_rx: Receiver<A>,
    // Filled lazily from the channel, so counting works through `&self`
    pending: RefCell<VecDeque<A>>,
}

impl<A> ActionQueue<A> {
    pub fn new() -> Self {
        let (action_tx, action_rx) = mpsc::channel();
        Self {
            action_tx,
            action_rx,
            pending: RefCell::new(VecDeque::new()),
        }
    }

    pub fn dispatcher(&self) -> Dispatcher<A> {
        Dispatcher {
            action_tx: self.action_tx.clone(),
        }
    }

    /// Take the next queued action, oldest first
    pub fn pop(&mut self) -> Option<A> {
        let pending = self.pending.get_mut();
        pending.extend(self.action_rx.try_iter());
        pending.pop_front()
    }

    /// Number of actions waiting to be dispatched
    pub fn len(&self) -> usize {
        let mut pending = self.pending.borrow_mut();
        pending.extend(self.action_rx.try_iter());
        pending.len()
    }
}
