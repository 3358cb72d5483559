//! tweener-core: a time-driven value-interpolation scheduler.
//!
//! Each started [`Anim`] advances independently on every external tick: its
//! elapsed time grows, a fixed-point [`AnimPath`] maps the elapsed fraction
//! onto the configured value range, and the result is delivered to the
//! record's setter callback. Records carry a full lifecycle (start delay,
//! forward leg, optional playback leg, repeats, completion callbacks), and
//! the registry stays consistent even when callbacks start or delete records
//! mid-tick.
//!
//! The crate owns no clock and no timer: the host's periodic driver calls
//! [`Anims::tick`] with a monotonic millisecond timestamp, and the registry
//! gates that driver through [`TickDriver`] so nothing fires while idle.

pub mod anim;
pub mod error;
pub mod ids;
pub mod path;
pub mod sched;
pub mod timer;

pub use anim::{Anim, ExecCb, HookCb, Target, ValueCb, PLAYTIME_INFINITE, REPEAT_INFINITE};
pub use error::PathError;
pub use ids::AnimId;
pub use path::bezier::{BEZIER_VAL_MAX, BEZIER_VAL_SHIFT};
pub use path::AnimPath;
pub use sched::{AnimCtx, Anims};
pub use timer::{speed_to_duration, tick_elaps, NoopDriver, TickDriver};
