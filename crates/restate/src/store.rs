use crate::dispatcher::{ActionQueue, Dispatcher};
use crate::error::{Result, StoreError};
use crate::middleware::Middleware;
use crate::subscription::{SubscriptionId, Subscriptions};
use std::fmt::{self, Debug};

/// Boxed reducer; infallible reducers are wrapped to always return `Ok`
type Reducer<S, A> = Box<dyn Fn(&S, &A) -> anyhow::Result<S> + Send>;

/// What happened to a dispatched action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The reducer ran and the new state was committed
    Committed,
    /// No action was given, or a middleware cancelled it
    Skipped,
}

impl DispatchOutcome {
    pub fn is_committed(self) -> bool {
        self == Self::Committed
    }
}

/// Redux-style Store that holds application state and dispatches actions
///
/// - Centralized state management
/// - Actions are dispatched to modify state
/// - A pure reducer handles state transitions
/// - State is replaced, never mutated, on each action
///
/// # Dispatch
///
/// ```text
/// Action → before_reduce chain → Reducer → commit → after_reduce chain → Subscribers → queued follow-ups
/// ```
///
/// # Example
///
/// ```rust
/// use restate::{Middleware, Store};
///
/// let mut store = Store::new(|state: &i64, amount: &i64| state + amount, 0);
/// store.add_middleware(
///     Middleware::new().before_reduce(|_state, amount: i64| (amount > 0).then_some(amount)),
/// );
///
/// store.dispatch(5)?;
/// store.dispatch(-1)?; // cancelled by the middleware
/// store.dispatch(None)?; // nothing to do
/// assert_eq!(*store.state(), 5);
/// # Ok::<(), restate::StoreError>(())
/// ```
pub struct Store<S, A> {
    state: S,
    reducer: Reducer<S, A>,
    middleware: Vec<Middleware<S, A>>,
    subscriptions: Subscriptions<S>,
    queue: ActionQueue<A>,
}

impl<S, A> Store<S, A> {
    /// Create a new store with a reducer and initial state
    pub fn new<R>(reducer: R, initial_state: S) -> Self
    where
        R: Fn(&S, &A) -> S + Send + 'static,
    {
        Self::try_new(move |state, action| Ok(reducer(state, action)), initial_state)
    }

    /// Create a new store whose reducer may fail
    ///
    /// A failing reducer aborts the dispatch and leaves the state untouched.
    pub fn try_new<R>(reducer: R, initial_state: S) -> Self
    where
        R: Fn(&S, &A) -> anyhow::Result<S> + Send + 'static,
    {
        Self {
            state: initial_state,
            reducer: Box::new(reducer),
            middleware: Vec::new(),
            subscriptions: Subscriptions::new(),
            queue: ActionQueue::new(),
        }
    }

    /// Get the current state
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Alias of [`state`](Self::state)
    pub fn get_state(&self) -> &S {
        &self.state
    }

    /// Process an action through the middleware chain and reducer
    ///
    /// `None` returns straight away without running anything. Otherwise the
    /// `before_reduce` hooks run in order and may replace or cancel the
    /// action. If it survives, the reducer result is committed, the
    /// `after_reduce` hooks and subscribers run in order, and finally any
    /// actions queued through a [`Dispatcher`] are dispatched the same way.
    ///
    /// The first failing callback stops the dispatch and is returned. See
    /// [`StoreError`] for which stages leave the new state committed. A
    /// failure in a queued follow-up comes back as [`StoreError::FollowUp`],
    /// carrying the outcome of this action.
    ///
    /// Follow-ups are drained until the queue is empty, so callbacks must
    /// eventually stop queueing or this never returns.
    pub fn dispatch(&mut self, action: impl Into<Option<A>>) -> Result<DispatchOutcome> {
        let action: Option<A> = action.into();
        let Some(action) = action else {
            log::trace!("Dispatch: no action");
            return Ok(DispatchOutcome::Skipped);
        };

        let outcome = self.run(action)?;
        self.drain_queue().map_err(|source| StoreError::FollowUp {
            primary: outcome,
            source: Box::new(source),
        })?;
        Ok(outcome)
    }

    fn run(&mut self, mut action: A) -> Result<DispatchOutcome> {
        for (index, middleware) in self.middleware.iter_mut().enumerate() {
            let Some(before) = middleware.before.as_mut() else {
                continue;
            };
            match before(&self.state, action)
                .map_err(|source| StoreError::BeforeReduce { index, source })?
            {
                Some(next) => action = next,
                None => {
                    log::debug!("Dispatch: action cancelled by middleware #{}", index);
                    return Ok(DispatchOutcome::Skipped);
                }
            }
        }

        let new_state =
            (self.reducer)(&self.state, &action).map_err(|source| StoreError::Reducer { source })?;
        self.state = new_state;
        log::trace!("Dispatch: state committed");

        for (index, middleware) in self.middleware.iter_mut().enumerate() {
            if let Some(after) = middleware.after.as_mut() {
                after(&self.state, &action)
                    .map_err(|source| StoreError::AfterReduce { index, source })?;
            }
        }

        self.subscriptions
            .notify(&self.state)
            .map_err(|(id, source)| StoreError::Subscriber { id, source })?;

        Ok(DispatchOutcome::Committed)
    }

    /// Dispatch follow-up actions until the queue is empty
    fn drain_queue(&mut self) -> Result<()> {
        let mut drained = 0usize;
        while let Some(action) = self.queue.pop() {
            drained += 1;
            self.run(action)?;
        }
        if drained > 0 {
            log::debug!("Dispatch: processed {} queued action(s)", drained);
        }
        Ok(())
    }

    /// Register a subscriber notified with the new state after every commit
    pub fn subscribe<F>(&mut self, mut subscriber: F) -> SubscriptionId
    where
        F: FnMut(&S) + Send + 'static,
    {
        self.try_subscribe(move |state| {
            subscriber(state);
            Ok(())
        })
    }

    /// Register a subscriber that may fail
    ///
    /// A failure skips the remaining subscribers of that dispatch; the new
    /// state stays committed.
    pub fn try_subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&S) -> anyhow::Result<()> + Send + 'static,
    {
        let id = self.subscriptions.insert(Box::new(subscriber));
        log::trace!("Subscriber {} added", id);
        id
    }

    /// Remove the subscriber registered under `id`
    ///
    /// Returns `false` and does nothing if it was never registered or is
    /// already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.subscriptions.remove(id);
        log::trace!("Subscriber {} removed: {}", id, removed);
        removed
    }

    /// Add middleware to the store
    ///
    /// Middleware is called in the order it was added.
    pub fn add_middleware(&mut self, middleware: Middleware<S, A>) {
        self.middleware.push(middleware);
    }

    /// Add several middlewares, keeping their order
    pub fn add_middlewares<I>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = Middleware<S, A>>,
    {
        self.middleware.extend(middlewares);
    }

    /// Get a dispatcher for queueing follow-up actions from callbacks
    ///
    /// Queued actions run at the end of the current dispatch, including
    /// actions queued by those follow-ups. A callback that queues on every
    /// state change without a stop condition keeps `dispatch` looping.
    pub fn dispatcher(&self) -> Dispatcher<A> {
        self.queue.dispatcher()
    }

    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Number of queued follow-up actions not yet dispatched
    ///
    /// Non-zero only after a dispatch failed before its queue was drained.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
}

impl<S: Debug, A> Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("middleware", &self.middleware.len())
            .field("subscribers", &self.subscriptions.len())
            .finish()
    }
}
