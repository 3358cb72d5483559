//! Path functions: pure mappings from elapsed-time fraction to output value.
//!
//! Every variant is a function of (elapsed, duration, start, end) only, so a
//! record can be re-evaluated idempotently — there is no accumulated curve
//! state beyond the record itself.

pub mod bezier;

use serde::{Deserialize, Serialize};

use crate::error::PathError;
use bezier::{bezier3, cubic_bezier, map, BEZIER_VAL_MAX, BEZIER_VAL_SHIFT};

// Control coordinates of the named bezier variants, in the 1024 domain.
// The curve anchors (0,0) and (1024,1024) are implicit.
const EASE_IN: (i32, i32, i32, i32) = (430, 0, 1024, 1024);
const EASE_OUT: (i32, i32, i32, i32) = (0, 0, 593, 1024);
const EASE_IN_OUT: (i32, i32, i32, i32) = (430, 0, 593, 1024);
const OVERSHOOT: (i32, i32, i32, i32) = (341, 0, 683, 1300);

/// Interpolation curve, selected per record at creation time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimPath {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Overshoot,
    /// Three decaying bounces settling on the end value.
    Bounce,
    /// Start value until the duration elapses, then the end value.
    Step,
    /// Caller-supplied cubic-bezier control points (1024 domain).
    Bezier3 { x1: i32, y1: i32, x2: i32, y2: i32 },
}

impl Default for AnimPath {
    fn default() -> Self {
        AnimPath::Linear
    }
}

impl AnimPath {
    /// Look up a named variant. Custom control points have no name form.
    pub fn from_name(name: &str) -> Result<Self, PathError> {
        match name {
            "linear" => Ok(AnimPath::Linear),
            "ease_in" => Ok(AnimPath::EaseIn),
            "ease_out" => Ok(AnimPath::EaseOut),
            "ease_in_out" => Ok(AnimPath::EaseInOut),
            "overshoot" => Ok(AnimPath::Overshoot),
            "bounce" => Ok(AnimPath::Bounce),
            "step" => Ok(AnimPath::Step),
            _ => Err(PathError::UnknownPath {
                name: name.to_string(),
            }),
        }
    }

    /// Evaluate the curve at `act_time` of `duration`, scaled onto
    /// `start..end`.
    pub fn eval(&self, act_time: i32, duration: i32, start: i32, end: i32) -> i32 {
        match *self {
            AnimPath::Linear => {
                let step = map(act_time, 0, duration, 0, BEZIER_VAL_MAX);
                rescale(step, start, end)
            }
            AnimPath::EaseIn => bezier_path(act_time, duration, start, end, EASE_IN),
            AnimPath::EaseOut => bezier_path(act_time, duration, start, end, EASE_OUT),
            AnimPath::EaseInOut => bezier_path(act_time, duration, start, end, EASE_IN_OUT),
            AnimPath::Overshoot => bezier_path(act_time, duration, start, end, OVERSHOOT),
            AnimPath::Bounce => bounce(act_time, duration, start, end),
            AnimPath::Step => {
                if act_time >= duration {
                    end
                } else {
                    start
                }
            }
            AnimPath::Bezier3 { x1, y1, x2, y2 } => {
                bezier_path(act_time, duration, start, end, (x1, y1, x2, y2))
            }
        }
    }
}

// Scale a 0..1024 curve output onto the value range.
fn rescale(step: i32, start: i32, end: i32) -> i32 {
    let v = (i64::from(step) * (i64::from(end) - i64::from(start))) >> BEZIER_VAL_SHIFT;
    (v + i64::from(start)) as i32
}

fn bezier_path(act_time: i32, duration: i32, start: i32, end: i32, ctrl: (i32, i32, i32, i32)) -> i32 {
    let t = map(act_time, 0, duration, 0, BEZIER_VAL_MAX);
    let step = cubic_bezier(t, ctrl.0, ctrl.1, ctrl.2, ctrl.3);
    rescale(step, start, end)
}

/// Three bounces in five time segments: three falls and two rises. Each fall
/// is shaped by a bezier arc; the amplitude is damped per segment.
fn bounce(act_time: i32, duration: i32, start: i32, end: i32) -> i32 {
    let mut t = map(act_time, 0, duration, 0, BEZIER_VAL_MAX);
    let mut diff = i64::from(end) - i64::from(start);

    if t < 408 {
        // First fall.
        t = (t * 2500) >> BEZIER_VAL_SHIFT;
    } else if t < 614 {
        // First bounce back.
        t -= 408;
        t *= 5;
        t = BEZIER_VAL_MAX - t;
        diff /= 20;
    } else if t < 819 {
        // Second fall.
        t -= 614;
        t *= 5;
        diff /= 20;
    } else if t < 921 {
        // Second bounce back.
        t -= 819;
        t *= 10;
        t = BEZIER_VAL_MAX - t;
        diff /= 40;
    } else {
        // Final fall.
        t -= 921;
        t *= 10;
        diff /= 40;
    }
    let t = t.clamp(0, BEZIER_VAL_MAX);

    let step = i64::from(bezier3(t, BEZIER_VAL_MAX, 800, 500, 0));
    let fall = (step * diff) >> BEZIER_VAL_SHIFT;
    (i64::from(end) - fall) as i32
}
