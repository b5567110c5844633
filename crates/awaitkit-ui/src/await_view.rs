//! # Await
//!
//! `Await` renders one asynchronous computation without the caller tracking
//! loading, value and error flags by hand:
//!
//! ```rust
//! use awaitkit_core::*;
//! use awaitkit_ui::*;
//!
//! fn Profile(user_id: u64) -> View {
//!     Await(
//!         AwaitConfig::new(move || async move { load_name(user_id).await })
//!             .dependencies(deps![user_id])
//!             .then(|name: &String| Text(format!("Hello, {name}")))
//!             .fail(|e| Text(format!("Could not load profile: {e}")))
//!             .meanwhile(Text("Loading...")),
//!     )
//! }
//!
//! async fn load_name(id: u64) -> Result<String, std::io::Error> {
//!     Ok(format!("user-{id}"))
//! }
//! ```
//!
//! The output is chosen on every composition, first match wins:
//!
//! | state    | supplied    | renders                             |
//! |----------|-------------|-------------------------------------|
//! | pending  | `meanwhile` | `meanwhile`                         |
//! | resolved | `then`      | `then(&value)`                      |
//! | rejected | `fail`      | `fail(&error)`                      |
//! | any      | `catchall`  | `catchall(value, error, is_pending)` |
//! | any      | nothing     | an empty view                       |
//!
//! A rejection with neither `fail` nor `catchall` renders nothing.
//!
//! The computation runs again only when `dependencies` change. Without a
//! dependency list it runs once per instance. Results of superseded runs are
//! dropped, whichever finishes first.

use std::future::Future;

use awaitkit_core::*;

pub struct AwaitConfig<T: 'static, E: 'static> {
    source: Source<T, E>,
    fingerprint: Fingerprint,
    key: Option<String>,
    callbacks: Callbacks<T, E, View>,
}

impl<T: 'static, E: 'static> AwaitConfig<T, E> {
    pub fn new<F, Fut>(source_fn: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        Self {
            source: source(source_fn),
            fingerprint: Fingerprint::identity_of::<F>(),
            key: None,
            callbacks: Callbacks::new(),
        }
    }

    /// Keys that decide when the computation runs again.
    pub fn dependencies(mut self, deps: impl Into<Fingerprint>) -> Self {
        self.fingerprint = deps.into();
        self
    }

    /// Find this instance by key instead of by composition order.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn then(mut self, f: impl Fn(&T) -> View + 'static) -> Self {
        self.callbacks = self.callbacks.then(f);
        self
    }

    pub fn fail(mut self, f: impl Fn(&InvocationError<E>) -> View + 'static) -> Self {
        self.callbacks = self.callbacks.fail(f);
        self
    }

    pub fn meanwhile(mut self, view: View) -> Self {
        self.callbacks = self.callbacks.meanwhile(view);
        self
    }

    pub fn catchall(
        mut self,
        f: impl Fn(Option<&T>, Option<&InvocationError<E>>, bool) -> View + 'static,
    ) -> Self {
        self.callbacks = self.callbacks.catchall(f);
        self
    }
}

pub fn Await<T: 'static, E: 'static>(config: AwaitConfig<T, E>) -> View {
    let AwaitConfig {
        source,
        fingerprint,
        key,
        callbacks,
    } = config;
    use_future_source(key, source, fingerprint).resolve(&callbacks)
}
