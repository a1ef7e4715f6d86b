//! # Input State
//!
//! This module defines the input state types used by the input manager.
//! It provides enums and structs for representing the state of the player's
//! intents from one tick to the next.

/// Represents the state of a key or button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawInputState {
    /// Key/button is not pressed
    #[default]
    NotPressed,
    /// Key/button was just pressed this frame
    Pressed,
    /// Key/button has been held down for multiple frames
    Held,
    /// Key/button was just released this frame
    Released,
}

impl RawInputState {
    /// Determines if the input is actively down (either pressed or held)
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Determines if the input was just pressed this frame
    pub fn is_just_pressed(&self) -> bool {
        matches!(self, RawInputState::Pressed)
    }

    /// Determines if the input was just released this frame
    pub fn is_just_released(&self) -> bool {
        matches!(self, RawInputState::Released)
    }

    /// Updates the input state based on the previous and current raw states
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// Number of distinct intents.
pub const INTENT_COUNT: usize = 7;

/// Something the player wants to do, independent of which key asked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward = 0,
    Backward,
    Left,
    Right,
    /// Jump while walking, ascend while flying
    Up,
    /// Descend while flying
    Down,
    ToggleFly,
}

impl Intent {
    pub fn all() -> [Intent; INTENT_COUNT] {
        [
            Intent::Forward,
            Intent::Backward,
            Intent::Left,
            Intent::Right,
            Intent::Up,
            Intent::Down,
            Intent::ToggleFly,
        ]
    }
}

/// Immutable view of the input for one tick.
///
/// Produced by `InputManager::snapshot` and consumed by the engine; nothing
/// reads input state from anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSnapshot {
    /// Transition state of every intent, indexed by `Intent as usize`
    pub intents: [RawInputState; INTENT_COUNT],
    /// Look movement accumulated since the previous snapshot
    pub look_delta: (f64, f64),
    /// Whether look input is currently captured
    pub look_captured: bool,
}

impl InputSnapshot {
    /// Gets the transition state of an intent
    pub fn state(&self, intent: Intent) -> RawInputState {
        self.intents[intent as usize]
    }

    /// Whether the intent is down (just pressed or held)
    pub fn is_active(&self, intent: Intent) -> bool {
        self.state(intent).is_active()
    }

    /// Whether the intent went down since the previous snapshot
    pub fn just_pressed(&self, intent: Intent) -> bool {
        self.state(intent).is_just_pressed()
    }

    /// The look delta, if look is captured and the pointer moved
    pub fn look(&self) -> Option<(f64, f64)> {
        (self.look_captured && self.look_delta != (0.0, 0.0)).then_some(self.look_delta)
    }
}
