use std::rc::Rc;

use crate::View;
use crate::error::InvocationError;
use crate::future::{FutureState, Status};

pub type ThenFn<T, O> = Rc<dyn Fn(&T) -> O>;
pub type FailFn<E, O> = Rc<dyn Fn(&InvocationError<E>) -> O>;
pub type CatchallFn<T, E, O> = Rc<dyn Fn(Option<&T>, Option<&InvocationError<E>>, bool) -> O>;

/// Render strategies supplied by the caller. Every one is optional.
pub struct Callbacks<T, E, O = View> {
    pub then: Option<ThenFn<T, O>>,
    pub fail: Option<FailFn<E, O>>,
    pub meanwhile: Option<O>,
    pub catchall: Option<CatchallFn<T, E, O>>,
}

impl<T, E, O> Default for Callbacks<T, E, O> {
    fn default() -> Self {
        Self {
            then: None,
            fail: None,
            meanwhile: None,
            catchall: None,
        }
    }
}

impl<T, E, O> Clone for Callbacks<T, E, O>
where
    O: Clone,
{
    fn clone(&self) -> Self {
        Self {
            then: self.then.clone(),
            fail: self.fail.clone(),
            meanwhile: self.meanwhile.clone(),
            catchall: self.catchall.clone(),
        }
    }
}

impl<T, E, O> Callbacks<T, E, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, f: impl Fn(&T) -> O + 'static) -> Self {
        self.then = Some(Rc::new(f));
        self
    }

    pub fn fail(mut self, f: impl Fn(&InvocationError<E>) -> O + 'static) -> Self {
        self.fail = Some(Rc::new(f));
        self
    }

    pub fn meanwhile(mut self, output: O) -> Self {
        self.meanwhile = Some(output);
        self
    }

    pub fn catchall(
        mut self,
        f: impl Fn(Option<&T>, Option<&InvocationError<E>>, bool) -> O + 'static,
    ) -> Self {
        self.catchall = Some(Rc::new(f));
        self
    }
}

/// Picks the output for `state`. First match wins:
///
/// 1. pending with `meanwhile`
/// 2. resolved with `then`
/// 3. rejected with `fail`
/// 4. `catchall`, given the current value, error and whether it is pending
/// 5. `O::default()` (nothing)
///
/// Only the status tag is consulted, so a resolved `0`, `""` or `None` still
/// goes to `then`.
pub fn resolve<T, E, O>(state: &FutureState<T, E>, callbacks: &Callbacks<T, E, O>) -> O
where
    O: Clone + Default,
{
    let status = state.status();
    if status == Status::Pending
        && let Some(output) = &callbacks.meanwhile
    {
        return output.clone();
    }
    if status == Status::Resolved
        && let (Some(then), Some(value)) = (&callbacks.then, state.value())
    {
        return then(value);
    }
    if status == Status::Rejected
        && let (Some(fail), Some(error)) = (&callbacks.fail, state.error())
    {
        return fail(error);
    }
    match &callbacks.catchall {
        Some(catchall) => catchall(state.value(), state.error(), status == Status::Pending),
        None => O::default(),
    }
}
