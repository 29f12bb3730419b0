//=========================================================================
// Input Buffer
//=========================================================================
//
// Per-frame holding area between winit callbacks and the channel flush.
//
// Discrete events (keys, buttons) keep their arrival order so a press and
// release inside one frame still reach the state tracker as a pair.
// Continuous events (cursor motion) collapse to the latest value. A frame
// the channel could not take goes back in front of newer events.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Buffering --------------------------------------------------------

    /// Appends a key or button event. OS key repeat produces identical
    /// consecutive events; only the first is kept.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    /// Replaces any earlier event of the same kind.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    //--- Flush ------------------------------------------------------------

    /// Takes this frame's events, or `None` when nothing arrived.
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }

        let discrete = self.discrete.drain(..).collect();
        let continuous = self.continuous.drain().collect();
        Some((discrete, continuous))
    }

    /// Puts an unsent frame back ahead of anything buffered since.
    pub(crate) fn requeue(&mut self, discrete: Vec<InputEvent>, continuous: Vec<InputEvent>) {
        let newer = std::mem::replace(&mut self.discrete, discrete);
        for event in newer {
            self.push_discrete(event);
        }

        // A newer value of the same kind wins
        for event in continuous {
            if !self.continuous.contains(&event) {
                self.continuous.insert(event);
            }
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
