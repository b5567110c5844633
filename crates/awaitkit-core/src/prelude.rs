pub use crate::deps;
pub use crate::effects::{Dispose, on_unmount};
pub use crate::error::InvocationError;
pub use crate::fingerprint::{DepKey, Fingerprint, fingerprint_changed};
pub use crate::future::{FutureSlot, FutureState, Generation, Status};
pub use crate::hooks::{FutureHandle, use_future, use_future_source, use_future_with_key};
pub use crate::invocation::{InvocationScheduler, Source, source};
pub use crate::locals::{Spawner, recomposer, spawner, with_recomposer, with_spawner};
pub use crate::resolve::{Callbacks, resolve};
pub use crate::runtime::{ComposeGuard, Frame, Recomposer, Scheduler, remember, remember_with_key};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::view::{View, ViewKind};
