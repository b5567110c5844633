use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::View;
use crate::locals::{Spawner, with_recomposer, with_spawner};
use crate::scope::Scope;

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
    touched: HashSet<String>,
}

impl Composer {
    /// Detaches every slot the last frame did not reach. Anything a swept slot
    /// owned (and any in-flight work holding only a weak reference to it) is
    /// released when the returned boxes drop.
    fn sweep(&mut self) -> Vec<Box<dyn Any>> {
        let mut stale = self.slots.split_off(self.cursor.min(self.slots.len()));

        let touched = std::mem::take(&mut self.touched);
        let keyed = std::mem::take(&mut self.keyed_slots);
        for (key, slot) in keyed {
            if touched.contains(&key) {
                self.keyed_slots.insert(key, slot);
            } else {
                stale.push(slot);
            }
        }
        stale
    }
}

pub struct ComposeGuard {
    scope: Scope,
}

impl ComposeGuard {
    pub fn begin(scope: Scope) -> Self {
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            c.cursor = 0;
            c.touched.clear();
        });

        ComposeGuard { scope }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        // Slots are dropped outside the composer borrow so their destructors
        // may call back into `remember`.
        let stale = COMPOSER.with(|c| c.borrow_mut().sweep());
        if !stale.is_empty() {
            log::debug!("compose: dropped {} unused slots", stale.len());
        }
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            // replace (else panics)
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();
        c.touched.insert(key.clone());

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            } else {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

/// Handle through which background work asks the host for a new frame.
#[derive(Clone, Default)]
pub struct Recomposer(Rc<RecomposerInner>);

#[derive(Default)]
struct RecomposerInner {
    requested: Cell<bool>,
    waker: RefCell<Option<Rc<dyn Fn()>>>,
}

impl Recomposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the composition dirty and notifies the waker, if any.
    pub fn request(&self) {
        self.0.requested.set(true);
        let waker = self.0.waker.borrow().clone();
        if let Some(w) = waker {
            w();
        }
    }

    pub fn is_requested(&self) -> bool {
        self.0.requested.get()
    }

    /// Called on every `request`, for hosts that poll a channel or wake an
    /// event loop instead of checking `is_requested`.
    pub fn set_waker(&self, waker: impl Fn() + 'static) {
        *self.0.waker.borrow_mut() = Some(Rc::new(waker));
    }

    fn clear(&self) {
        self.0.requested.set(false);
    }
}

/// Frame — output of composition for a tick.
pub struct Frame {
    pub root: View,
    /// 1-based count of compositions performed by the scheduler.
    pub composition: u64,
}

/// Drives one composition tree. Each scheduler keeps its own slots; they
/// are installed as the thread's composer only while `compose` runs, so
/// several schedulers on one thread never see each other's state.
pub struct Scheduler {
    spawner: Spawner,
    recomposer: Recomposer,
    root: Scope,
    composer: Composer,
    compositions: u64,
}

impl Scheduler {
    pub fn new(spawner: Spawner) -> Self {
        Self {
            spawner,
            recomposer: Recomposer::new(),
            root: Scope::new(),
            composer: Composer::default(),
            compositions: 0,
        }
    }

    pub fn recomposer(&self) -> Recomposer {
        self.recomposer.clone()
    }

    /// True once a settled computation has asked for re-evaluation since the
    /// last `compose`.
    pub fn needs_recompose(&self) -> bool {
        self.recomposer.is_requested()
    }

    pub fn compose<F>(&mut self, build_root: F) -> Frame
    where
        F: FnOnce() -> View,
    {
        self.recomposer.clear();
        // `guard` sweeps before `_installed` swaps the composer back out
        let root = {
            let _installed = InstalledComposer::swap_in(&mut self.composer);
            let guard = ComposeGuard::begin(self.root.clone());
            with_spawner(self.spawner.clone(), || {
                with_recomposer(self.recomposer.clone(), || guard.scope().run(build_root))
            })
        };

        self.compositions += 1;
        Frame {
            root,
            composition: self.compositions,
        }
    }

    /// Tears down every instance composed by this scheduler. In-flight
    /// computations keep running but their results are dropped.
    pub fn dispose(self) {
        let Scheduler { root, composer, .. } = self;
        root.dispose();
        drop(composer);
    }
}

/// Holds a scheduler's composer in `COMPOSER` and swaps it back on drop,
/// including when the frame panics.
struct InstalledComposer<'a> {
    owner: &'a mut Composer,
}

impl<'a> InstalledComposer<'a> {
    fn swap_in(owner: &'a mut Composer) -> Self {
        COMPOSER.with(|c| std::mem::swap(&mut *c.borrow_mut(), owner));
        Self { owner }
    }
}

impl Drop for InstalledComposer<'_> {
    fn drop(&mut self) {
        COMPOSER.with(|c| std::mem::swap(&mut *c.borrow_mut(), self.owner));
    }
}
