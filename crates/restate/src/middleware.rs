//! Middleware for the dispatch loop
//!
//! Middleware wraps reduction with two optional hooks:
//!
//! ```text
//! Action → before_reduce (M1, M2, ..) → Reducer → State → after_reduce (M1, M2, ..) → Subscribers
//! ```
//!
//! A `before_reduce` hook receives the current state and the action and
//! returns the action to continue with. Returning `None` cancels the
//! dispatch. An `after_reduce` hook observes the committed state and the
//! action that produced it; it cannot change either.
//!
//! Both hooks run in registration order. After-hooks are not reversed.
//!
//! ## Example
//!
//! ```rust
//! use restate::Middleware;
//!
//! // Drop non-positive amounts before they reach the reducer
//! let positive_only = Middleware::new()
//!     .before_reduce(|_state: &i64, amount: i64| (amount > 0).then_some(amount));
//! assert!(positive_only.has_before_reduce());
//! assert!(!positive_only.has_after_reduce());
//! ```

use std::fmt::{self, Debug};

/// Boxed `before_reduce` hook
pub(crate) type BeforeReduce<S, A> =
    Box<dyn FnMut(&S, A) -> anyhow::Result<Option<A>> + Send>;

/// Boxed `after_reduce` hook
pub(crate) type AfterReduce<S, A> = Box<dyn FnMut(&S, &A) -> anyhow::Result<()> + Send>;

/// A pair of optional hooks run around each reduction
pub struct Middleware<S, A> {
    pub(crate) before: Option<BeforeReduce<S, A>>,
    pub(crate) after: Option<AfterReduce<S, A>>,
}

impl<S, A> Middleware<S, A> {
    /// Middleware with no hooks; attach them with the builder methods
    pub fn new() -> Self {
        Self {
            before: None,
            after: None,
        }
    }

    /// Set the hook run before the reducer
    ///
    /// The returned action replaces the dispatched one; `None` cancels the
    /// dispatch.
    pub fn before_reduce<F>(self, mut hook: F) -> Self
    where
        F: FnMut(&S, A) -> Option<A> + Send + 'static,
    {
        self.try_before_reduce(move |state, action| Ok(hook(state, action)))
    }

    /// Fallible variant of [`before_reduce`](Self::before_reduce)
    ///
    /// An error aborts the dispatch before the state is touched.
    pub fn try_before_reduce<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&S, A) -> anyhow::Result<Option<A>> + Send + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    /// Set the hook run after the new state is committed
    pub fn after_reduce<F>(self, mut hook: F) -> Self
    where
        F: FnMut(&S, &A) + Send + 'static,
    {
        self.try_after_reduce(move |state, action| {
            hook(state, action);
            Ok(())
        })
    }

    /// Fallible variant of [`after_reduce`](Self::after_reduce)
    pub fn try_after_reduce<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&S, &A) -> anyhow::Result<()> + Send + 'static,
    {
        self.after = Some(Box::new(hook));
        self
    }

    pub fn has_before_reduce(&self) -> bool {
        self.before.is_some()
    }

    pub fn has_after_reduce(&self) -> bool {
        self.after.is_some()
    }
}

impl<S: Debug, A: Debug> Middleware<S, A> {
    /// Middleware that logs every action passing through
    ///
    /// Actions are logged at `debug` before reduction and the committed
    /// state at `trace` afterwards. Actions are never altered.
    pub fn logging() -> Self {
        Self::new()
            .before_reduce(|_state, action| {
                log::debug!("Action: {:?}", action);
                Some(action)
            })
            .after_reduce(|state, action| {
                log::trace!("State after {:?}: {:?}", action, state);
            })
    }
}

impl<S, A> Default for Middleware<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Debug for Middleware<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("before_reduce", &self.has_before_reduce())
            .field("after_reduce", &self.has_after_reduce())
            .finish()
    }
}
