//! # Composition locals
//!
//! Awaitkit uses thread‑local “composition locals” to hand host services to
//! components without threading them through every call:
//!
//! - `Spawner` — where asynchronous computations run.
//! - `Recomposer` — how a finished computation asks for a new frame.
//!
//! `Scheduler::compose` installs both for the duration of a frame. You can
//! override them for a subtree using `with_spawner` and `with_recomposer`:
//!
//! ```rust
//! use std::rc::Rc;
//! use awaitkit_core::*;
//! use futures::executor::LocalPool;
//!
//! let pool = LocalPool::new();
//! with_spawner(Rc::new(pool.spawner()), || {
//!     assert!(spawner().is_some());
//! });
//! assert!(spawner().is_none());
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::task::LocalSpawn;

use crate::Recomposer;

/// Host executor handle. Anything implementing `LocalSpawn` works, e.g.
/// `futures::executor::LocalSpawner`.
pub type Spawner = Rc<dyn LocalSpawn>;

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = RefCell::new(Vec::new());
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // Non-panicking frame guard (ensures pop on unwind)
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        if let Some(top) = st.borrow_mut().last_mut() {
            top.insert(t, v);
        } else {
            // no frame: create a temporary one
            let mut m = HashMap::new();
            m.insert(t, v);
            st.borrow_mut().push(m);
        }
    });
}

fn local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        st.borrow()
            .iter()
            .rev()
            .find_map(|frame| frame.get(&TypeId::of::<T>())?.downcast_ref::<T>().cloned())
    })
}

pub fn with_spawner<R>(spawner: Spawner, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Spawner>(), Box::new(spawner));
        f()
    })
}

pub fn with_recomposer<R>(recomposer: Recomposer, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Recomposer>(), Box::new(recomposer));
        f()
    })
}

/// `None` outside a composition.
pub fn spawner() -> Option<Spawner> {
    local::<Spawner>()
}

pub fn recomposer() -> Option<Recomposer> {
    local::<Recomposer>()
}
