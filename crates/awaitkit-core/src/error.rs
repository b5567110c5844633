use std::any::Any;

use futures::task::SpawnError;
use thiserror::Error;

/// Why an invocation did not produce a value. This is what `fail` and
/// `catchall` receive; it is never raised into the surrounding view tree.
#[derive(Debug, Error)]
pub enum InvocationError<E> {
    /// The computation completed with `Err`.
    #[error("{0}")]
    Failed(E),
    /// The computation panicked while being created or polled.
    #[error("computation panicked: {0}")]
    Panicked(String),
    /// Composed outside a `Scheduler`, so there was nothing to run the
    /// computation on.
    #[error("no spawner is installed for this composition")]
    NoSpawner,
    #[error("spawner rejected the computation: {0}")]
    Spawn(#[from] SpawnError),
}

impl<E> InvocationError<E> {
    /// The caller's own error, if that is what failed.
    pub fn failure(&self) -> Option<&E> {
        match self {
            InvocationError::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_panic(&self) -> bool {
        matches!(self, InvocationError::Panicked(_))
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}
