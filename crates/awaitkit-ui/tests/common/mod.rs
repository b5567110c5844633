#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use awaitkit_core::{Scheduler, View};
use futures::channel::oneshot;
use futures::executor::LocalPool;

pub struct Harness {
    pool: LocalPool,
    pub scheduler: Scheduler,
}

impl Harness {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let scheduler = Scheduler::new(Rc::new(pool.spawner()));
        Self { pool, scheduler }
    }

    pub fn compose(&mut self, build: impl FnOnce() -> View) -> View {
        self.scheduler.compose(build).root
    }

    /// Runs spawned work until nothing can progress. Returns whether a
    /// settlement asked for a new frame.
    pub fn settle(&mut self) -> bool {
        self.pool.run_until_stalled();
        self.scheduler.needs_recompose()
    }

    pub fn into_parts(self) -> (LocalPool, Scheduler) {
        (self.pool, self.scheduler)
    }
}

/// A computation result the test releases by hand.
pub struct Gate<T> {
    tx: RefCell<Option<oneshot::Sender<Result<T, String>>>>,
    rx: RefCell<Option<oneshot::Receiver<Result<T, String>>>>,
    waits: Cell<usize>,
}

impl<T: 'static> Gate<T> {
    pub fn new() -> Rc<Self> {
        let (tx, rx) = oneshot::channel();
        Rc::new(Self {
            tx: RefCell::new(Some(tx)),
            rx: RefCell::new(Some(rx)),
            waits: Cell::new(0),
        })
    }

    pub fn wait(&self) -> impl Future<Output = Result<T, String>> + use<T> {
        self.waits.set(self.waits.get() + 1);
        let rx = self.rx.borrow_mut().take();
        async move {
            match rx {
                Some(rx) => rx.await.unwrap_or_else(|e| Err(e.to_string())),
                None => Err("gate awaited twice".to_string()),
            }
        }
    }

    pub fn open(&self, result: Result<T, String>) {
        if let Some(tx) = self.tx.borrow_mut().take() {
            let _ = tx.send(result);
        }
    }

    /// How many times the computation behind this gate was started.
    pub fn waits(&self) -> usize {
        self.waits.get()
    }
}
