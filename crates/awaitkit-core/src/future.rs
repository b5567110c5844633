use std::cell::{Cell, Ref, RefCell};
use std::fmt;

use crate::error::InvocationError;
use crate::fingerprint::{Fingerprint, fingerprint_changed};

pub type Generation = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Pending,
    Resolved,
    Rejected,
}

enum Phase<T, E> {
    Pending,
    Resolved(T),
    Rejected(InvocationError<E>),
}

/// Status/value/error of one instance, tagged with the generation of the
/// invocation that produced it.
pub struct FutureState<T, E> {
    generation: Generation,
    phase: Phase<T, E>,
}

impl<T, E> FutureState<T, E> {
    pub fn pending(generation: Generation) -> Self {
        Self {
            generation,
            phase: Phase::Pending,
        }
    }

    pub fn resolved(generation: Generation, value: T) -> Self {
        Self {
            generation,
            phase: Phase::Resolved(value),
        }
    }

    pub fn rejected(generation: Generation, error: InvocationError<E>) -> Self {
        Self {
            generation,
            phase: Phase::Rejected(error),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn status(&self) -> Status {
        match self.phase {
            Phase::Pending => Status::Pending,
            Phase::Resolved(_) => Status::Resolved,
            Phase::Rejected(_) => Status::Rejected,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.phase, Phase::Pending)
    }

    /// Present only while resolved.
    pub fn value(&self) -> Option<&T> {
        match &self.phase {
            Phase::Resolved(v) => Some(v),
            _ => None,
        }
    }

    /// Present only while rejected.
    pub fn error(&self) -> Option<&InvocationError<E>> {
        match &self.phase {
            Phase::Rejected(e) => Some(e),
            _ => None,
        }
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for FutureState<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("FutureState");
        s.field("generation", &self.generation);
        match &self.phase {
            Phase::Pending => s.field("status", &Status::Pending),
            Phase::Resolved(v) => s.field("value", v),
            Phase::Rejected(e) => s.field("error", e),
        };
        s.finish()
    }
}

/// Per-instance holder of the current [`FutureState`].
///
/// `latest` is the fence: a settlement is applied only if it carries the
/// generation of the most recently started invocation. Disposal advances
/// `latest` too, so nothing lands after an instance is gone.
pub struct FutureSlot<T, E> {
    state: RefCell<FutureState<T, E>>,
    fingerprint: RefCell<Option<Fingerprint>>,
    latest: Cell<Generation>,
    disposed: Cell<bool>,
}

impl<T, E> Default for FutureSlot<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> FutureSlot<T, E> {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(FutureState::pending(0)),
            fingerprint: RefCell::new(None),
            latest: Cell::new(0),
            disposed: Cell::new(false),
        }
    }

    /// Whether `next` differs from the fingerprint of the last invocation.
    pub fn needs_invocation(&self, next: &Fingerprint) -> bool {
        fingerprint_changed(self.fingerprint.borrow().as_ref(), next)
    }

    /// Records `fingerprint` and opens a new generation in `Pending`.
    pub fn begin(&self, fingerprint: Fingerprint) -> Generation {
        let generation = self.latest.get() + 1;
        self.latest.set(generation);
        *self.fingerprint.borrow_mut() = Some(fingerprint);
        *self.state.borrow_mut() = FutureState::pending(generation);
        generation
    }

    /// Applies a settlement if `generation` is still current. Returns whether
    /// the state changed.
    pub fn settle(&self, generation: Generation, outcome: Result<T, InvocationError<E>>) -> bool {
        if self.disposed.get() || generation != self.latest.get() {
            log::trace!(
                "discarding settlement of generation {generation} (latest {})",
                self.latest.get()
            );
            return false;
        }
        let mut state = self.state.borrow_mut();
        if !state.is_pending() {
            return false;
        }
        *state = match outcome {
            Ok(v) => FutureState::resolved(generation, v),
            Err(e) => FutureState::rejected(generation, e),
        };
        true
    }

    pub fn dispose(&self) {
        if !self.disposed.replace(true) {
            self.latest.set(self.latest.get() + 1);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Generation of the most recently started invocation.
    pub fn generation(&self) -> Generation {
        self.latest.get()
    }

    pub fn state(&self) -> Ref<'_, FutureState<T, E>> {
        self.state.borrow()
    }
}
