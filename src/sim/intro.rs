//! Opening sequence
//!
//! A timed step script played in the `Intro` phase: the cat finds the bowl,
//! eats, the dog shows up, and the run begins.

use serde::{Deserialize, Serialize};

/// Food pieces in the bowl
pub const FOOD_PIECES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroStep {
    /// Cat walks to the bowl
    Approach,
    /// One food piece disappears at a time
    Eating,
    /// Dog runs in barking
    DogArrives,
    /// Final caption before handing over
    Run,
    /// Script finished
    Done,
}

impl IntroStep {
    pub fn caption(&self) -> Option<&'static str> {
        match self {
            IntroStep::Approach => Some("A hungry cat spots some delicious dog food..."),
            IntroStep::Eating => Some("*munch munch* Mmm, tasty!"),
            IntroStep::DogArrives => Some("*WOOF WOOF!* The dog is coming!"),
            IntroStep::Run => Some("RUN!!!"),
            IntroStep::Done => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroScript {
    pub step: IntroStep,
    /// Seconds spent in the current step
    pub timer: f32,
    pub food_left: u32,
}

impl Default for IntroScript {
    fn default() -> Self {
        Self {
            step: IntroStep::Approach,
            timer: 0.0,
            food_left: FOOD_PIECES,
        }
    }
}

impl IntroScript {
    /// Advance the script; returns the new step when it changes
    pub fn advance(&mut self, dt: f32) -> Option<IntroStep> {
        self.timer += dt;
        let next = match self.step {
            IntroStep::Approach if self.timer > 2.0 => IntroStep::Eating,
            IntroStep::Eating => {
                if self.food_left > 0 && self.timer > 0.5 {
                    self.food_left -= 1;
                    // Next piece goes 0.2 s later
                    self.timer = 0.3;
                }
                if self.food_left > 0 {
                    return None;
                }
                IntroStep::DogArrives
            }
            IntroStep::DogArrives if self.timer > 2.0 => IntroStep::Run,
            IntroStep::Run if self.timer > 1.0 => IntroStep::Done,
            _ => return None,
        };
        self.step = next;
        self.timer = 0.0;
        Some(next)
    }

    pub fn is_done(&self) -> bool {
        self.step == IntroStep::Done
    }
}
