use std::cell::Ref;
use std::future::Future;
use std::rc::Rc;

use crate::fingerprint::Fingerprint;
use crate::future::{FutureSlot, FutureState, Generation, Status};
use crate::invocation::{InvocationScheduler, Source, source};
use crate::resolve::{Callbacks, resolve};
use crate::{Dispose, on_unmount, remember, remember_with_key, scoped_effect};

/// The remembered state of one `use_future` call site.
pub struct FutureHandle<T, E> {
    slot: Rc<FutureSlot<T, E>>,
}

impl<T, E> Clone for FutureHandle<T, E> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T, E> FutureHandle<T, E> {
    pub fn state(&self) -> Ref<'_, FutureState<T, E>> {
        self.slot.state()
    }

    pub fn status(&self) -> Status {
        self.slot.state().status()
    }

    pub fn generation(&self) -> Generation {
        self.slot.generation()
    }

    pub fn resolve<O: Clone + Default>(&self, callbacks: &Callbacks<T, E, O>) -> O {
        resolve(&self.slot.state(), callbacks)
    }
}

/// Runs `source` when `dependencies` change and remembers its latest result
/// at this position in the composition.
///
/// With `dependencies == None` the type of `source` is the fingerprint, so
/// the computation runs once for the lifetime of the call site.
pub fn use_future<T, E, F, Fut>(source_fn: F, dependencies: Option<Fingerprint>) -> FutureHandle<T, E>
where
    T: 'static,
    E: 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let fingerprint = dependencies.unwrap_or_else(Fingerprint::identity_of::<F>);
    use_future_source(None, source(source_fn), fingerprint)
}

/// Like [`use_future`], but the state is found by `key` instead of by call
/// order, so it survives conditional composition around it.
pub fn use_future_with_key<T, E, F, Fut>(
    key: impl Into<String>,
    source_fn: F,
    dependencies: Option<Fingerprint>,
) -> FutureHandle<T, E>
where
    T: 'static,
    E: 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    let fingerprint = dependencies.unwrap_or_else(Fingerprint::identity_of::<F>);
    use_future_source(Some(key.into()), source(source_fn), fingerprint)
}

/// A remembered slot plus the cleanup it registered with its scope. Dropping
/// it (when the composer sweeps it) runs the cleanup, which also takes the
/// registration out of the scope.
struct Mounted<T, E> {
    slot: Rc<FutureSlot<T, E>>,
    unmount: Dispose,
}

impl<T, E> Drop for Mounted<T, E> {
    fn drop(&mut self) {
        self.unmount.run();
    }
}

/// Type-erased core of the `use_future*` hooks.
pub fn use_future_source<T: 'static, E: 'static>(
    key: Option<String>,
    computation: Source<T, E>,
    fingerprint: Fingerprint,
) -> FutureHandle<T, E> {
    let init = || {
        let slot = Rc::new(FutureSlot::<T, E>::new());
        let target = Rc::downgrade(&slot);
        let unmount = on_unmount(move || {
            if let Some(slot) = target.upgrade() {
                slot.dispose();
            }
        });
        let registered = unmount.clone();
        scoped_effect(move || registered);
        Mounted { slot, unmount }
    };
    let mounted = match key {
        Some(key) => remember_with_key(format!("future:{key}"), init),
        None => remember(init),
    };
    let slot = mounted.slot.clone();

    if slot.needs_invocation(&fingerprint) {
        let generation = slot.begin(fingerprint);
        InvocationScheduler::current().start(&slot, generation, computation);
    }

    FutureHandle { slot }
}
