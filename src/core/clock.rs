//=========================================================================
// Fixed Timestep
//=========================================================================
//
// Accumulator that splits variable frame time into whole physics steps.
//
//   frame dt ──► accumulator ──► N × step   (N ≤ max_steps)
//
// When a frame would need more than `max_steps` steps the backlog is
// dropped, so a stalled frame never triggers a catch-up spiral.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== FixedTimestep =======================================================

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// # Panics
    /// If `step` is not positive or `max_steps` is zero.
    pub fn new(step: f32, max_steps: u32) -> Self {
        assert!(step > 0.0, "Fixed timestep must be positive");
        assert!(max_steps > 0, "max_steps must be at least 1");

        Self {
            step,
            max_steps,
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Time carried over to the next frame.
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    /// Adds frame time and returns the number of steps to run now.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }

        if self.accumulator >= self.step {
            warn!(
                "Fixed step backlog of {:.3}s dropped after {} steps",
                self.accumulator, steps
            );
            self.accumulator %= self.step;
        }

        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(0.02, 5)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
