//! # restate
//!
//! A minimal unidirectional state container.
//!
//! A single [`Store`] owns the state. The state only changes when an action
//! is dispatched and the reducer returns a new value for it:
//!
//! ```text
//! dispatch(action) → Middleware (before_reduce) → Reducer → State → Middleware (after_reduce) → Subscribers
//! ```
//!
//! - [`Middleware`] can transform or cancel actions before reduction and
//!   observe the committed state afterwards.
//! - Subscribers are notified with the new state after every commit and can
//!   be removed again with the [`SubscriptionId`] returned on registration.
//! - Callbacks cannot dispatch re-entrantly; they queue follow-up actions
//!   through a [`Dispatcher`] instead.
//!
//! ## Usage
//!
//! ```rust
//! use restate::{Middleware, Store};
//!
//! #[derive(Debug)]
//! enum Action {
//!     Add(i64),
//!     Reset,
//! }
//!
//! fn reduce(state: &i64, action: &Action) -> i64 {
//!     match action {
//!         Action::Add(n) => state + n,
//!         Action::Reset => 0,
//!     }
//! }
//!
//! let mut store = Store::new(reduce, 0);
//! store.add_middleware(Middleware::logging());
//! let id = store.subscribe(|state| println!("state is now {state}"));
//!
//! store.dispatch(Action::Add(5))?;
//! store.dispatch(Action::Add(3))?;
//! assert_eq!(*store.state(), 8);
//!
//! store.unsubscribe(id);
//! store.dispatch(Action::Reset)?;
//! assert_eq!(*store.state(), 0);
//! # Ok::<(), restate::StoreError>(())
//! ```
//!
//! The crate logs through the [`log`] facade and never installs a logger.

pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod store;
pub mod subscription;

// Re-export commonly used types
pub use dispatcher::Dispatcher;
pub use error::{Result, StoreError};
pub use middleware::Middleware;
pub use store::{DispatchOutcome, Store};
pub use subscription::SubscriptionId;
