//! Starting computations and fencing their results.
//!
//! Nothing here can stop a computation once it is running. A superseded or
//! disposed instance simply never sees the result: the settlement carries the
//! generation it was started under, and [`FutureSlot::settle`] rejects it
//! unless that generation is still the latest one.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::error::{InvocationError, panic_message};
use crate::future::{FutureSlot, Generation};
use crate::locals::{self, Spawner};
use crate::runtime::Recomposer;

/// Type-erased zero-argument computation.
pub type Source<T, E> = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<T, E>>>;

/// Erases a closure returning any `'static` future into a [`Source`].
pub fn source<T, E, F, Fut>(f: F) -> Source<T, E>
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    Rc::new(move || f().boxed_local())
}

pub struct InvocationScheduler {
    spawner: Option<Spawner>,
    recomposer: Option<Recomposer>,
}

impl InvocationScheduler {
    pub fn new(spawner: Option<Spawner>, recomposer: Option<Recomposer>) -> Self {
        Self {
            spawner,
            recomposer,
        }
    }

    /// Scheduler bound to the spawner and recomposer of the current
    /// composition.
    pub fn current() -> Self {
        Self::new(locals::spawner(), locals::recomposer())
    }

    /// Runs `computation` under `generation` and returns immediately. When it
    /// settles the result is offered to `slot`; if the slot accepted it a
    /// re-evaluation is requested.
    pub fn start<T, E>(
        &self,
        slot: &Rc<FutureSlot<T, E>>,
        generation: Generation,
        computation: Source<T, E>,
    ) where
        T: 'static,
        E: 'static,
    {
        let Some(spawner) = &self.spawner else {
            log::error!("invocation {generation} has no spawner; compose inside a Scheduler");
            slot.settle(generation, Err(InvocationError::NoSpawner));
            return;
        };

        log::debug!("starting invocation {generation}");
        let target = Rc::downgrade(slot);
        let recomposer = self.recomposer.clone();
        let task = async move {
            let outcome = invoke(computation).await;
            let Some(slot) = target.upgrade() else {
                log::trace!("invocation {generation} settled after its instance was dropped");
                return;
            };
            if slot.settle(generation, outcome)
                && let Some(r) = recomposer
            {
                r.request();
            }
        };

        if let Err(err) = spawner.spawn_local(task) {
            log::warn!("failed to spawn invocation {generation}: {err}");
            slot.settle(generation, Err(InvocationError::Spawn(err)));
        }
    }
}

async fn invoke<T, E>(computation: Source<T, E>) -> Result<T, InvocationError<E>> {
    let fut = match panic::catch_unwind(AssertUnwindSafe(|| computation())) {
        Ok(fut) => fut,
        Err(payload) => return Err(InvocationError::Panicked(panic_message(&*payload))),
    };
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(InvocationError::Failed(e)),
        Err(payload) => Err(InvocationError::Panicked(panic_message(&*payload))),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::channel::oneshot;
    use futures::executor::LocalPool;

    use super::*;
    use crate::deps;
    use crate::future::Status;

    fn scheduler(pool: &LocalPool) -> (InvocationScheduler, Recomposer) {
        let recomposer = Recomposer::new();
        let spawner: Spawner = Rc::new(pool.spawner());
        (
            InvocationScheduler::new(Some(spawner), Some(recomposer.clone())),
            recomposer,
        )
    }

    #[test]
    fn start_does_not_run_the_computation_inline() {
        let mut pool = LocalPool::new();
        let (sched, recomposer) = scheduler(&pool);
        let slot = Rc::new(FutureSlot::<u32, String>::new());
        let calls = Rc::new(Cell::new(0));

        let g = slot.begin(deps![]);
        let c = calls.clone();
        sched.start(
            &slot,
            g,
            source(move || {
                c.set(c.get() + 1);
                async { Ok(0) }
            }),
        );
        assert_eq!(calls.get(), 0);
        assert!(slot.state().is_pending());

        pool.run_until_stalled();
        assert_eq!(calls.get(), 1);
        assert_eq!(slot.state().value(), Some(&0));
        assert!(recomposer.is_requested());
    }

    #[test]
    fn slow_earlier_invocation_cannot_clobber_later_one() {
        let mut pool = LocalPool::new();
        let (sched, _) = scheduler(&pool);
        let slot = Rc::new(FutureSlot::<&'static str, String>::new());

        let (tx_a, rx_a) = oneshot::channel::<&'static str>();
        let rx_a = Rc::new(Cell::new(Some(rx_a)));
        let g1 = slot.begin(deps!["a"]);
        sched.start(
            &slot,
            g1,
            source(move || {
                let rx = rx_a.take();
                async move {
                    match rx {
                        Some(rx) => rx.await.map_err(|e| e.to_string()),
                        None => Err("polled twice".to_string()),
                    }
                }
            }),
        );

        let g2 = slot.begin(deps!["b"]);
        sched.start(&slot, g2, source(|| async { Ok("b") }));
        pool.run_until_stalled();
        assert_eq!(slot.state().value(), Some(&"b"));

        tx_a.send("a").unwrap();
        pool.run_until_stalled();
        assert_eq!(slot.state().value(), Some(&"b"));
        assert_eq!(slot.state().generation(), g2);
    }

    #[test]
    fn dropped_slot_swallows_settlement() {
        let mut pool = LocalPool::new();
        let (sched, recomposer) = scheduler(&pool);
        let slot = Rc::new(FutureSlot::<u8, String>::new());
        let g = slot.begin(deps![]);
        sched.start(&slot, g, source(|| async { Ok(1) }));
        drop(slot);

        pool.run_until_stalled();
        assert!(!recomposer.is_requested());
    }

    #[test]
    fn panics_become_rejections() {
        let mut pool = LocalPool::new();
        let (sched, _) = scheduler(&pool);
        let slot = Rc::new(FutureSlot::<u8, String>::new());
        let g = slot.begin(deps![]);
        sched.start(
            &slot,
            g,
            source(|| async {
                if true {
                    panic!("exploded");
                }
                Ok(1)
            }),
        );
        pool.run_until_stalled();

        let state = slot.state();
        assert_eq!(state.status(), Status::Rejected);
        assert!(state.error().is_some_and(|e| e.is_panic()));
        assert_eq!(
            state.error().map(|e| e.to_string()).as_deref(),
            Some("computation panicked: exploded")
        );
    }

    #[test]
    fn missing_spawner_rejects_immediately() {
        let sched = InvocationScheduler::new(None, None);
        let slot = Rc::new(FutureSlot::<u8, String>::new());
        let g = slot.begin(deps![]);
        sched.start(&slot, g, source(|| async { Ok(1) }));
        assert!(matches!(
            slot.state().error(),
            Some(InvocationError::NoSpawner)
        ));
    }
}
