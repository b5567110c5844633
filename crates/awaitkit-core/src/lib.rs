//! # Async state, generations, and resolution
//!
//! Awaitkit renders the state of one asynchronous computation declaratively.
//! The pieces, leaves first:
//!
//! - `Fingerprint` — the dependency keys of a computation; a change means
//!   "run it again".
//! - `FutureSlot` — the remembered status/value/error of one instance, plus
//!   the generation of the invocation that is allowed to write it.
//! - `InvocationScheduler` — spawns the computation on the host executor and
//!   offers the result back to the slot under its generation.
//! - `resolve` — picks the output for the current state from the caller's
//!   callbacks.
//!
//! ## Hooks
//!
//! `use_future` ties those together at a composition position:
//!
//! ```rust
//! use std::rc::Rc;
//! use awaitkit_core::*;
//! use futures::executor::LocalPool;
//!
//! let mut pool = LocalPool::new();
//! let mut scheduler = Scheduler::new(Rc::new(pool.spawner()));
//!
//! let callbacks = Callbacks::<u32, String, String>::new()
//!     .then(|n| format!("{n} items"))
//!     .meanwhile("loading".to_string());
//!
//! let mut frame = || {
//!     let items = use_future(|| async { Ok::<u32, String>(3) }, Some(deps![]));
//!     View::new(ViewKind::Text { text: items.resolve(&callbacks) })
//! };
//!
//! assert_eq!(scheduler.compose(&mut frame).root.text_content(), "loading");
//! pool.run_until_stalled();
//! assert!(scheduler.needs_recompose());
//! assert_eq!(scheduler.compose(&mut frame).root.text_content(), "3 items");
//! ```
//!
//! ## Generations
//!
//! Every time the fingerprint changes the slot opens a new generation and
//! goes back to `Pending`. Running computations are never interrupted; when
//! one finishes, its result is kept only if its generation is still the
//! latest. A slow request that was superseded can therefore never overwrite
//! a newer one, whatever order they finish in. Disposing the instance (or
//! letting it fall out of the composition) closes the fence for good.
//!
//! ## Remembered state
//!
//! - `remember` is order‑based: the Nth call in a composition always refers
//!   to the Nth stored value.
//! - `remember_with_key` is key‑based and stable across conditional branches.
//!
//! Slots that a frame does not reach are dropped when the frame ends.

pub mod effects;
pub mod error;
pub mod fingerprint;
pub mod future;
pub mod hooks;
pub mod invocation;
pub mod locals;
pub mod prelude;
pub mod resolve;
pub mod runtime;
pub mod scope;
pub mod tests;
pub mod view;

pub use prelude::*;
