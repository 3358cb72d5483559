//! The animation registry and its tick loop.
//!
//! Records live in `Rc<RefCell<_>>` cells inside a head-ordered list, so a
//! record being stepped survives its own deletion and callbacks can mutate
//! the registry freely. Two mechanisms keep iteration sound under that
//! reentrancy: a structural-change flag that restarts the scan from the head
//! whenever a callback inserts or removes a record, and a per-record round
//! parity bit so a restarted scan never steps the same record twice in one
//! tick.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::anim::{Anim, ExecCb, HookCb, Target, ValueCb, REPEAT_INFINITE};
use crate::ids::{AnimId, IdAllocator};
use crate::timer::{tick_elaps, NoopDriver, TickDriver};

type Slot<T> = Rc<RefCell<Anim<T>>>;

/// Registry plus world handle passed into every callback. Callbacks may
/// start, delete, or query animations synchronously through it.
pub struct AnimCtx<'a, T> {
    pub anims: &'a mut Anims<T>,
    pub world: &'a mut T,
}

impl<T> AnimCtx<'_, T> {
    /// Start a record at the registry's current clock (the timestamp of the
    /// tick this callback runs inside).
    pub fn start(&mut self, template: Anim<T>) -> AnimId {
        let now = self.anims.time;
        self.anims.start(self.world, template, now)
    }

    pub fn delete(&mut self, target: Option<Target>, exec: Option<ExecCb<T>>) -> bool {
        self.anims.delete(self.world, target, exec)
    }

    pub fn delete_all(&mut self) {
        self.anims.delete_all();
    }

    pub fn find(&self, target: Target, exec: Option<ExecCb<T>>) -> Option<AnimId> {
        self.anims.find(target, exec)
    }

    pub fn count(&self) -> usize {
        self.anims.count()
    }
}

/// Registry of live animation records.
///
/// `T` is the caller's world type: it is not stored here, only threaded from
/// [`tick`](Anims::tick) (and the other entry points) into callbacks.
pub struct Anims<T> {
    list: Vec<Slot<T>>,
    ids: IdAllocator,
    run_round: bool,
    list_changed: bool,
    driver: Box<dyn TickDriver>,
    /// Last clock value observed by the registry.
    time: u32,
}

impl<T> Default for Anims<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Anims<T> {
    pub fn new() -> Self {
        Self::with_driver(Box::new(NoopDriver))
    }

    /// Registry gating an external periodic driver. The driver starts
    /// paused; it is resumed on the first start and paused again whenever
    /// the list drains.
    pub fn with_driver(driver: Box<dyn TickDriver>) -> Self {
        let mut anims = Self {
            list: Vec::new(),
            ids: IdAllocator::new(),
            run_round: false,
            list_changed: false,
            driver,
            time: 0,
        };
        anims.driver.pause();
        anims
    }

    /// Start an animation from a configured template at `now_ms` (the same
    /// clock fed to [`tick`](Anims::tick)) and return its id.
    ///
    /// A (target, setter) pair has at most one live record: any existing
    /// match is deleted first. The new record is stamped with the current
    /// round parity, so a start from inside a callback does not advance
    /// until the next tick.
    pub fn start(&mut self, world: &mut T, template: Anim<T>, now_ms: u32) -> AnimId {
        self.time = now_ms;
        if !template.target_self {
            if let Some(exec) = template.exec {
                self.delete(world, Some(template.target), Some(exec));
            }
        }

        let id = self.ids.alloc();
        let mut a = template;
        a.id = id;
        if a.target_self {
            a.target = Target::Anim(id);
        }
        a.run_round = self.run_round;
        a.last_tick = now_ms;
        a.start_cb_called = false;

        let slot = Rc::new(RefCell::new(a));
        self.list.insert(0, Rc::clone(&slot));
        self.mark_list_change();

        if a.early_apply {
            if let Some(get_cb) = a.get_value_cb {
                let ofs = self.call_value(world, get_cb, a.target);
                if self.contains(&slot) {
                    let mut rec = slot.borrow_mut();
                    rec.start_value = rec.start_value.wrapping_add(ofs);
                    rec.end_value = rec.end_value.wrapping_add(ofs);
                }
            }
            if self.contains(&slot) {
                let (exec, target, start_value) = {
                    let rec = slot.borrow();
                    (rec.exec, rec.target, rec.start_value)
                };
                if let Some(exec) = exec {
                    slot.borrow_mut().current_value = start_value;
                    self.call_exec(world, exec, target, start_value);
                }
            }
        }

        trace!(id = id.0, "animation started");
        id
    }

    /// Delete every record matching the filters; `None` is a wildcard.
    /// Fires `deleted_cb` per removed record and returns whether anything
    /// was removed.
    pub fn delete(
        &mut self,
        world: &mut T,
        target: Option<Target>,
        exec: Option<ExecCb<T>>,
    ) -> bool {
        let mut deleted = false;
        let mut idx = 0;
        while idx < self.list.len() {
            let matched = {
                let a = self.list[idx].borrow();
                let target_ok = target.map_or(true, |t| a.target == t);
                let exec_ok = exec.map_or(true, |e| a.exec.is_some_and(|ae| cb_eq(ae, e)));
                target_ok && exec_ok
            };
            if matched {
                let slot = self.list.remove(idx);
                self.mark_list_change();
                deleted = true;
                let (cb, id, tgt) = {
                    let a = slot.borrow();
                    (a.deleted_cb, a.id, a.target)
                };
                trace!(id = id.0, "animation deleted");
                if let Some(cb) = cb {
                    self.call_hook(world, cb, id, tgt);
                }
                // deleted_cb may have restructured the list.
                idx = 0;
            } else {
                idx += 1;
            }
        }
        deleted
    }

    /// Delete a single record by id; `deleted_cb` fires if set.
    pub fn delete_by_id(&mut self, world: &mut T, id: AnimId) -> bool {
        let Some(pos) = self.list.iter().position(|s| s.borrow().id == id) else {
            return false;
        };
        let slot = self.list.remove(pos);
        self.mark_list_change();
        let (cb, tgt) = {
            let a = slot.borrow();
            (a.deleted_cb, a.target)
        };
        trace!(id = id.0, "animation deleted");
        if let Some(cb) = cb {
            self.call_hook(world, cb, id, tgt);
        }
        true
    }

    /// Drop every record without firing any callback.
    pub fn delete_all(&mut self) {
        if self.list.is_empty() {
            return;
        }
        self.list.clear();
        self.mark_list_change();
    }

    pub fn find(&self, target: Target, exec: Option<ExecCb<T>>) -> Option<AnimId> {
        self.list.iter().find_map(|s| {
            let a = s.borrow();
            let exec_ok = exec.map_or(true, |e| a.exec.is_some_and(|ae| cb_eq(ae, e)));
            if a.target == target && exec_ok {
                Some(a.id)
            } else {
                None
            }
        })
    }

    /// Snapshot of a live record's state.
    pub fn get(&self, id: AnimId) -> Option<Anim<T>> {
        self.list.iter().find_map(|s| {
            let a = s.borrow();
            if a.id == id {
                Some(*a)
            } else {
                None
            }
        })
    }

    pub fn count(&self) -> usize {
        self.list.len()
    }

    /// Estimated remaining playtime of a live record, in ms.
    pub fn playtime(&self, id: AnimId) -> Option<u32> {
        self.get(id).map(|a| a.playtime())
    }

    /// Advance every record to `now_ms` (monotonic milliseconds).
    ///
    /// Each record is stepped at most once per call even when a structural
    /// change restarts the scan from the head.
    pub fn tick(&mut self, world: &mut T, now_ms: u32) {
        self.time = now_ms;
        self.run_round = !self.run_round;

        let mut idx = 0;
        while idx < self.list.len() {
            let slot = Rc::clone(&self.list[idx]);
            self.list_changed = false;
            self.step_record(world, &slot, now_ms);
            if self.list_changed {
                idx = 0;
            } else {
                idx += 1;
            }
        }
    }

    /// Out-of-band evaluation between driver firings; identical to
    /// [`tick`](Anims::tick).
    pub fn refr_now(&mut self, world: &mut T, now_ms: u32) {
        self.tick(world, now_ms);
    }

    fn step_record(&mut self, world: &mut T, slot: &Slot<T>, now: u32) {
        let (elaps, crossing, early_apply, get_cb, start_cb, target, id) = {
            let mut a = slot.borrow_mut();
            if a.run_round == self.run_round {
                // Already stepped this round; the scan restarted.
                return;
            }
            a.run_round = self.run_round;
            let elaps = tick_elaps(now, a.last_tick).min(i32::MAX as u32) as i32;
            a.last_tick = now;
            let crossing = !a.start_cb_called && a.act_time <= 0 && a.act_time + elaps >= 0;
            (
                elaps,
                crossing,
                a.early_apply,
                a.get_value_cb,
                a.start_cb,
                a.target,
                a.id,
            )
        };

        // The delay has just elapsed: resolve the late value offset and fire
        // the start hook, exactly once per record lifetime.
        if crossing {
            if !early_apply {
                if let Some(get_cb) = get_cb {
                    let ofs = self.call_value(world, get_cb, target);
                    if !self.contains(slot) {
                        return;
                    }
                    let mut a = slot.borrow_mut();
                    a.start_value = a.start_value.wrapping_add(ofs);
                    a.end_value = a.end_value.wrapping_add(ofs);
                }
            }
            if let Some(cb) = start_cb {
                self.call_hook(world, cb, id, target);
                if !self.contains(slot) {
                    return;
                }
            }
            slot.borrow_mut().start_cb_called = true;
        }

        let (changed, exec, target, value, ready) = {
            let mut guard = slot.borrow_mut();
            let a = &mut *guard;
            a.act_time = a.act_time.saturating_add(elaps);
            if a.act_time < 0 {
                return;
            }
            if a.act_time > a.duration {
                a.act_time = a.duration;
            }
            let value = a.path.eval(a.act_time, a.duration, a.start_value, a.end_value);
            let changed = value != a.current_value;
            if changed {
                a.current_value = value;
            }
            (changed, a.exec, a.target, value, a.act_time >= a.duration)
        };

        if changed {
            if let Some(exec) = exec {
                self.call_exec(world, exec, target, value);
                if !self.contains(slot) {
                    return;
                }
            }
        }

        if ready {
            self.ready_handler(world, slot);
        }
    }

    /// A leg finished: either retire the record or rearm it for the next
    /// phase (repeat delay, playback leg with swapped endpoints).
    fn ready_handler(&mut self, world: &mut T, slot: &Slot<T>) {
        let terminal = {
            let mut guard = slot.borrow_mut();
            let a = &mut *guard;
            // Repeats are counted at the end of the forward leg.
            if !a.playback_now && a.repeat_cnt > 0 && a.repeat_cnt != REPEAT_INFINITE {
                a.repeat_cnt -= 1;
            }
            a.repeat_cnt == 0 && (a.playback_duration == 0 || a.playback_now)
        };

        if terminal {
            if let Some(pos) = self.list.iter().position(|s| Rc::ptr_eq(s, slot)) {
                self.list.remove(pos);
                self.mark_list_change();
            }
            let (ready_cb, deleted_cb, id, target) = {
                let a = slot.borrow();
                (a.ready_cb, a.deleted_cb, a.id, a.target)
            };
            trace!(id = id.0, "animation finished");
            if let Some(cb) = ready_cb {
                self.call_hook(world, cb, id, target);
            }
            if let Some(cb) = deleted_cb {
                self.call_hook(world, cb, id, target);
            }
        } else {
            let mut guard = slot.borrow_mut();
            let a = &mut *guard;
            a.act_time = -(a.repeat_delay.min(i32::MAX as u32) as i32);
            if a.playback_duration != 0 {
                if !a.playback_now {
                    a.act_time = -(a.playback_delay.min(i32::MAX as u32) as i32);
                }
                a.playback_now = !a.playback_now;
                std::mem::swap(&mut a.start_value, &mut a.end_value);
                std::mem::swap(&mut a.duration, &mut a.playback_duration);
            }
        }
    }

    // Whether the record is still registered; a callback may have removed it.
    fn contains(&self, slot: &Slot<T>) -> bool {
        self.list.iter().any(|s| Rc::ptr_eq(s, slot))
    }

    fn mark_list_change(&mut self) {
        self.list_changed = true;
        if self.list.is_empty() {
            self.driver.pause();
        } else {
            self.driver.resume();
        }
    }

    fn call_exec(&mut self, world: &mut T, cb: ExecCb<T>, target: Target, value: i32) {
        let mut ctx = AnimCtx { anims: self, world };
        cb(&mut ctx, target, value);
    }

    fn call_hook(&mut self, world: &mut T, cb: HookCb<T>, id: AnimId, target: Target) {
        let mut ctx = AnimCtx { anims: self, world };
        cb(&mut ctx, id, target);
    }

    fn call_value(&mut self, world: &mut T, cb: ValueCb<T>, target: Target) -> i32 {
        let mut ctx = AnimCtx { anims: self, world };
        cb(&mut ctx, target)
    }
}

// Plain fn pointers compare by address; this is the identity the
// (target, setter) uniqueness rule keys on.
fn cb_eq<T>(a: ExecCb<T>, b: ExecCb<T>) -> bool {
    a as usize == b as usize
}
