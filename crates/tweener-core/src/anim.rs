//! Animation records and templates.

use serde::{Deserialize, Serialize};

use crate::ids::AnimId;
use crate::path::AnimPath;
use crate::sched::AnimCtx;

/// Sentinel repeat count: run forever.
pub const REPEAT_INFINITE: u32 = u32::MAX;
/// Remaining playtime reported for an infinitely repeating record.
pub const PLAYTIME_INFINITE: u32 = u32::MAX;

/// Opaque handle a setter receives back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// No target bound.
    None,
    /// Caller-defined handle.
    Handle(u64),
    /// The record's own identity (self-referential animations).
    Anim(AnimId),
}

/// Setter callback: applies an interpolated value to the target.
pub type ExecCb<T> = fn(&mut AnimCtx<'_, T>, Target, i32);
/// Lifecycle callback (start / ready / deleted).
pub type HookCb<T> = fn(&mut AnimCtx<'_, T>, AnimId, Target);
/// Value-offset source, read at most once per record lifetime.
pub type ValueCb<T> = fn(&mut AnimCtx<'_, T>, Target) -> i32;

/// One scheduled interpolation's complete state.
///
/// An `Anim` doubles as the start template: configure it with the `with_*`
/// setters, then hand it to [`Anims::start`](crate::Anims::start). `T` is
/// the caller's world type threaded into every callback.
pub struct Anim<T> {
    pub(crate) id: AnimId,
    pub(crate) target: Target,
    pub(crate) target_self: bool,
    pub(crate) exec: Option<ExecCb<T>>,
    pub(crate) start_value: i32,
    pub(crate) end_value: i32,
    pub(crate) current_value: i32,
    pub(crate) duration: i32,
    /// Elapsed ms in the current phase; negative while a delay is pending.
    pub(crate) act_time: i32,
    pub(crate) repeat_cnt: u32,
    pub(crate) repeat_delay: u32,
    pub(crate) playback_duration: i32,
    pub(crate) playback_delay: u32,
    pub(crate) playback_now: bool,
    pub(crate) path: AnimPath,
    pub(crate) start_cb: Option<HookCb<T>>,
    pub(crate) ready_cb: Option<HookCb<T>>,
    pub(crate) deleted_cb: Option<HookCb<T>>,
    pub(crate) get_value_cb: Option<ValueCb<T>>,
    pub(crate) early_apply: bool,
    pub(crate) run_round: bool,
    pub(crate) last_tick: u32,
    pub(crate) start_cb_called: bool,
}

// Every field is Copy (callbacks are plain fn pointers), so the record is
// too, with no bound on the world type.
impl<T> Copy for Anim<T> {}

impl<T> Clone for Anim<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for Anim<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Anim<T> {
    /// Fresh template: 500 ms, 0 → 100, one repeat, linear path, applied
    /// immediately on start.
    pub fn new() -> Self {
        Self {
            id: AnimId(0),
            target: Target::None,
            target_self: false,
            exec: None,
            start_value: 0,
            end_value: 100,
            current_value: 0,
            duration: 500,
            act_time: 0,
            repeat_cnt: 1,
            repeat_delay: 0,
            playback_duration: 0,
            playback_delay: 0,
            playback_now: false,
            path: AnimPath::Linear,
            start_cb: None,
            ready_cb: None,
            deleted_cb: None,
            get_value_cb: None,
            early_apply: true,
            run_round: false,
            last_tick: 0,
            start_cb_called: false,
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Bind the target to the record's own identity, resolved at start.
    pub fn with_self_target(mut self) -> Self {
        self.target_self = true;
        self
    }

    pub fn with_exec(mut self, exec: ExecCb<T>) -> Self {
        self.exec = Some(exec);
        self
    }

    pub fn with_values(mut self, start: i32, end: i32) -> Self {
        self.start_value = start;
        self.end_value = end;
        self
    }

    pub fn with_duration(mut self, ms: u32) -> Self {
        self.duration = ms.min(i32::MAX as u32) as i32;
        self
    }

    /// Delay before the forward leg starts advancing.
    pub fn with_delay(mut self, ms: u32) -> Self {
        self.act_time = -(ms.min(i32::MAX as u32) as i32);
        self
    }

    pub fn with_path(mut self, path: AnimPath) -> Self {
        self.path = path;
        self
    }

    /// Number of forward legs to run; [`REPEAT_INFINITE`] never terminates.
    pub fn with_repeat_count(mut self, count: u32) -> Self {
        self.repeat_cnt = count;
        self
    }

    pub fn with_repeat_delay(mut self, ms: u32) -> Self {
        self.repeat_delay = ms;
        self
    }

    /// Enable the mirrored reverse leg; 0 disables playback.
    pub fn with_playback_duration(mut self, ms: u32) -> Self {
        self.playback_duration = ms.min(i32::MAX as u32) as i32;
        self
    }

    pub fn with_playback_delay(mut self, ms: u32) -> Self {
        self.playback_delay = ms;
        self
    }

    /// Whether the value offset and the initial setter delivery happen at
    /// start (true, the default) or at the first active tick.
    pub fn with_early_apply(mut self, early: bool) -> Self {
        self.early_apply = early;
        self
    }

    pub fn with_start_cb(mut self, cb: HookCb<T>) -> Self {
        self.start_cb = Some(cb);
        self
    }

    pub fn with_ready_cb(mut self, cb: HookCb<T>) -> Self {
        self.ready_cb = Some(cb);
        self
    }

    pub fn with_deleted_cb(mut self, cb: HookCb<T>) -> Self {
        self.deleted_cb = Some(cb);
        self
    }

    pub fn with_get_value_cb(mut self, cb: ValueCb<T>) -> Self {
        self.get_value_cb = Some(cb);
        self
    }

    pub fn id(&self) -> AnimId {
        self.id
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn start_value(&self) -> i32 {
        self.start_value
    }

    pub fn end_value(&self) -> i32 {
        self.end_value
    }

    /// Last value delivered to the setter.
    pub fn current_value(&self) -> i32 {
        self.current_value
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    /// Elapsed ms in the current phase; negative while a delay is pending.
    pub fn elapsed(&self) -> i32 {
        self.act_time
    }

    pub fn in_playback(&self) -> bool {
        self.playback_now
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_cnt
    }

    pub fn path(&self) -> AnimPath {
        self.path
    }

    /// Estimated remaining playtime in ms: the rest of the current leg, one
    /// playback leg if not already in it, and the full round-trip for every
    /// remaining repeat. [`PLAYTIME_INFINITE`] when repeating forever.
    pub fn playtime(&self) -> u32 {
        if self.repeat_cnt == REPEAT_INFINITE {
            return PLAYTIME_INFINITE;
        }

        let mut t = i64::from(self.duration) - i64::from(self.act_time);
        if !self.playback_now {
            t += i64::from(self.playback_delay) + i64::from(self.playback_duration);
        }
        if self.repeat_cnt > 1 {
            let round_trip = i64::from(self.repeat_delay)
                + i64::from(self.duration)
                + i64::from(self.playback_delay)
                + i64::from(self.playback_duration);
            t += round_trip * i64::from(self.repeat_cnt - 1);
        }
        t.clamp(0, i64::from(u32::MAX - 1)) as u32
    }
}
