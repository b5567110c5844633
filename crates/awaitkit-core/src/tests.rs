#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use futures::executor::LocalPool;

    use crate::runtime::COMPOSER;
    use crate::*;

    fn scheduler(pool: &LocalPool) -> Scheduler {
        Scheduler::new(Rc::new(pool.spawner()))
    }

    #[test]
    fn test_scope_cleanup_on_drop() {
        let cleaned_up = Rc::new(RefCell::new(false));

        {
            let scope = Scope::new();
            let cleaned_up_clone = cleaned_up.clone();
            scope.add_disposer(move || {
                *cleaned_up_clone.borrow_mut() = true;
            });

            assert!(!*cleaned_up.borrow());
        } // Scope drops here

        assert!(*cleaned_up.borrow());
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned_up = Rc::new(RefCell::new(0));

        let scope = Scope::new();
        let child = scope.child();
        let c = cleaned_up.clone();
        scope.add_disposer(move || *c.borrow_mut() += 1);
        let c = cleaned_up.clone();
        child.add_disposer(move || *c.borrow_mut() += 10);

        assert_eq!(*cleaned_up.borrow(), 0);
        scope.clone().dispose();
        assert_eq!(*cleaned_up.borrow(), 11);
        assert!(scope.is_disposed());

        // late registration runs right away
        let c = cleaned_up.clone();
        scope.add_disposer(move || *c.borrow_mut() += 100);
        assert_eq!(*cleaned_up.borrow(), 111);
    }

    #[test]
    fn test_dispose_runs_once() {
        let runs = Rc::new(Cell::new(0));
        let r = runs.clone();
        let d = on_unmount(move || r.set(r.get() + 1));
        d.run();
        d.clone().run();
        assert_eq!(runs.get(), 1);
        assert!(d.is_spent());
    }

    #[test]
    fn test_key_based_remember() {
        COMPOSER.with(|c| c.borrow_mut().keyed_slots.clear());

        let val1 = remember_with_key("test", || 42);
        let val2 = remember_with_key("test", || 100);

        // Should return the same instance
        assert_eq!(*val1, 42);
        assert_eq!(*val2, 42); // Not 100, because key exists
    }

    #[test]
    fn test_unreached_slots_are_swept() {
        let pool = LocalPool::new();
        let mut s = scheduler(&pool);
        let inits = Rc::new(Cell::new(0));

        let frame = |with_keyed: bool| {
            let inits = inits.clone();
            move || {
                let n = remember(|| 1u8);
                if with_keyed {
                    let _ = remember_with_key("k", || inits.set(inits.get() + 1));
                }
                View::new(ViewKind::Text {
                    text: n.to_string(),
                })
            }
        };

        s.compose(frame(true));
        s.compose(frame(true));
        assert_eq!(inits.get(), 1);

        s.compose(frame(false));
        s.compose(frame(true));
        assert_eq!(inits.get(), 2);
    }

    #[test]
    fn test_recomposer_waker() {
        let woken = Rc::new(Cell::new(0));
        let r = Recomposer::new();
        let w = woken.clone();
        r.set_waker(move || w.set(w.get() + 1));
        assert!(!r.is_requested());
        r.request();
        assert!(r.is_requested());
        assert_eq!(woken.get(), 1);
    }

    #[test]
    fn test_locals_installed_only_while_composing() {
        let pool = LocalPool::new();
        let mut s = scheduler(&pool);
        let seen = Rc::new(Cell::new(false));
        let seen2 = seen.clone();
        s.compose(move || {
            seen2.set(spawner().is_some() && recomposer().is_some());
            View::empty()
        });
        assert!(seen.get());
        assert!(spawner().is_none());
    }

    #[test]
    fn test_use_future_runs_once_per_fingerprint() {
        let mut pool = LocalPool::new();
        let mut s = scheduler(&pool);
        let calls = Rc::new(Cell::new(0));
        let key = Rc::new(Cell::new(1u32));

        let frame = || {
            let calls = calls.clone();
            let k = key.get();
            move || {
                let h = use_future(
                    move || {
                        calls.set(calls.get() + 1);
                        async move { Ok::<_, String>(k * 10) }
                    },
                    Some(deps![k]),
                );
                let text = match h.state().value() {
                    Some(v) => v.to_string(),
                    None => format!("{:?}", h.status()),
                };
                View::new(ViewKind::Text { text })
            }
        };

        assert_eq!(s.compose(frame()).root.text_content(), "Pending");
        pool.run_until_stalled();
        assert!(s.needs_recompose());
        assert_eq!(s.compose(frame()).root.text_content(), "10");
        assert!(!s.needs_recompose());
        assert_eq!(s.compose(frame()).root.text_content(), "10");
        assert_eq!(calls.get(), 1);

        key.set(2);
        assert_eq!(s.compose(frame()).root.text_content(), "Pending");
        pool.run_until_stalled();
        assert_eq!(s.compose(frame()).root.text_content(), "20");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_dispose_fences_pending_work() {
        let mut pool = LocalPool::new();
        let mut s = scheduler(&pool);
        let recomposer = s.recomposer();
        let handle = Rc::new(RefCell::new(None));

        let h = handle.clone();
        s.compose(move || {
            let fut = use_future_with_key("profile", || async { Ok::<_, String>("late") }, None);
            *h.borrow_mut() = Some(fut);
            View::empty()
        });
        s.dispose();
        pool.run_until_stalled();

        let fut = handle.borrow_mut().take();
        let Some(fut) = fut else {
            panic!("hook did not run");
        };
        assert_eq!(fut.status(), Status::Pending);
        assert!(!recomposer.is_requested());
    }

    #[test]
    fn test_use_future_outside_scheduler_rejects() {
        let h = use_future(|| async { Ok::<u8, String>(1) }, None);
        assert!(matches!(
            h.state().error(),
            Some(InvocationError::NoSpawner)
        ));
    }

    #[test]
    fn test_swept_instances_release_scope_registrations() {
        let pool = LocalPool::new();
        let mut s = scheduler(&pool);
        let root = Rc::new(RefCell::new(None));

        for frame in 0..100 {
            let mounted = frame % 2 == 0;
            let root = root.clone();
            s.compose(move || {
                *root.borrow_mut() = current_scope();
                if mounted {
                    let _ = use_future_with_key("k", || async { Ok::<u8, String>(1) }, None);
                }
                View::empty()
            });
        }

        let scope = root.borrow_mut().take();
        let Some(scope) = scope else {
            panic!("compose installs no scope");
        };
        assert!(scope.live_effects() <= 1);
    }

    #[test]
    fn test_schedulers_on_one_thread_keep_separate_slots() {
        let mut pool = LocalPool::new();
        let mut a = scheduler(&pool);
        let mut b = scheduler(&pool);
        let calls = Rc::new(Cell::new(0));

        let window_a = || {
            let calls = calls.clone();
            move || {
                let h = use_future(
                    move || {
                        calls.set(calls.get() + 1);
                        async { Ok::<_, String>("A") }
                    },
                    Some(deps![1]),
                );
                let text = h.state().value().map_or("Loading...", |v| *v).to_string();
                View::new(ViewKind::Text { text })
            }
        };
        let window_b = || {
            View::new(ViewKind::Text {
                text: "other window".into(),
            })
        };

        assert_eq!(a.compose(window_a()).root.text_content(), "Loading...");
        b.compose(window_b);
        pool.run_until_stalled();
        assert!(a.needs_recompose());
        assert_eq!(a.compose(window_a()).root.text_content(), "A");
        assert_eq!(calls.get(), 1);

        // disposing one scheduler leaves the other's state alone
        b.dispose();
        assert_eq!(a.compose(window_a()).root.text_content(), "A");
        assert_eq!(calls.get(), 1);
    }
}
