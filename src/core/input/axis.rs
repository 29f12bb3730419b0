//=========================================================================
// Virtual Axes
//=========================================================================
//
// Turns pairs of held keys into analog-style axis values in [-1, 1].
//
// Architecture:
//   StateTracker (keys held) → AxisMapper::update(dt) → values[axis]
//
// Without smoothing the value is the raw target. With smoothing it moves
// toward the target at `sensitivity` units/s and falls back to zero at
// `gravity` units/s once the keys are released.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use super::event::KeyCode;
use super::state_tracker::StateTracker;

//=== Axis ================================================================

/// Identifier of a virtual axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Strafe left (-1) / right (+1).
    Horizontal,

    /// Back (-1) / forward (+1).
    Vertical,

    /// Game-defined axis.
    Custom(u32),
}

//=== AxisSmoothing =======================================================

/// Response curve applied to digital axis input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSmoothing {
    /// Speed (units/s) toward a non-zero target.
    pub sensitivity: f32,

    /// Speed (units/s) back toward zero when no key is held.
    pub gravity: f32,

    /// Jump to zero first when the target flips sign.
    pub snap: bool,
}

impl Default for AxisSmoothing {
    fn default() -> Self {
        Self {
            sensitivity: 3.0,
            gravity: 3.0,
            snap: true,
        }
    }
}

impl AxisSmoothing {
    fn step(&self, current: f32, target: f32, dt: f32) -> f32 {
        let mut current = current;

        if self.snap && target != 0.0 && current != 0.0 && current.signum() != target.signum() {
            current = 0.0;
        }

        let rate = if target == 0.0 { self.gravity } else { self.sensitivity };
        move_towards(current, target, rate * dt)
    }
}

fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

//=== AxisBinding =========================================================

/// A positive/negative key pair driving one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisBinding {
    pub positive: KeyCode,
    pub negative: KeyCode,
}

//=== AxisMapper ==========================================================

/// Evaluates bound axes once per frame.
pub(crate) struct AxisMapper {
    bindings: HashMap<Axis, Vec<AxisBinding>>,
    values: HashMap<Axis, f32>,
    smoothing: Option<AxisSmoothing>,
}

impl AxisMapper {
    pub(crate) fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            values: HashMap::new(),
            smoothing: None,
        }
    }

    /// Adds a key pair to an axis; an axis may have several pairs
    /// (WASD and arrows), whose contributions are summed then clamped.
    pub(crate) fn bind(&mut self, axis: Axis, positive: KeyCode, negative: KeyCode) {
        self.bindings
            .entry(axis)
            .or_default()
            .push(AxisBinding { positive, negative });
    }

    pub(crate) fn set_smoothing(&mut self, smoothing: Option<AxisSmoothing>) {
        self.smoothing = smoothing;
    }

    /// Recomputes every bound axis from the held keys.
    pub(crate) fn update(&mut self, state: &StateTracker, dt: f32) {
        for (axis, bindings) in &self.bindings {
            let target = raw_value(bindings, state);
            let current = self.values.get(axis).copied().unwrap_or(0.0);

            let value = match &self.smoothing {
                Some(smoothing) => smoothing.step(current, target, dt),
                None => target,
            };

            self.values.insert(*axis, value.clamp(-1.0, 1.0));
        }
    }

    /// Current value of an axis (0 when unbound).
    pub(crate) fn value(&self, axis: Axis) -> f32 {
        self.values.get(&axis).copied().unwrap_or(0.0)
    }

    /// Snapshot of all evaluated axes.
    pub(crate) fn values(&self) -> &HashMap<Axis, f32> {
        &self.values
    }
}

fn raw_value(bindings: &[AxisBinding], state: &StateTracker) -> f32 {
    let sum: f32 = bindings
        .iter()
        .map(|b| {
            let pos = if state.is_key_down(b.positive) { 1.0 } else { 0.0 };
            let neg = if state.is_key_down(b.negative) { 1.0 } else { 0.0 };
            pos - neg
        })
        .sum();

    sum.clamp(-1.0, 1.0)
}

//=========================================================================
// Unit Tests
//=========================================================================
