//! # Input Manager
//!
//! This module handles input processing for the application, including:
//! - Mapping physical keys to intents
//! - Tracking intent state between ticks
//! - Accumulating look movement while look is captured
//!
//! Once per tick the manager is asked for an `InputSnapshot`, which also
//! advances its notion of "previous" state.

use std::collections::HashMap;

use log::trace;
use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{InputSnapshot, Intent, RawInputState, INTENT_COUNT};

/// Default key bindings.
const KEY_BINDINGS: [(KeyCode, Intent); 7] = [
    (KeyCode::KeyW, Intent::Forward),
    (KeyCode::KeyS, Intent::Backward),
    (KeyCode::KeyA, Intent::Left),
    (KeyCode::KeyD, Intent::Right),
    (KeyCode::Space, Intent::Up),
    (KeyCode::ShiftLeft, Intent::Down),
    (KeyCode::KeyF, Intent::ToggleFly),
];

/// Manages the state of the input devices and processes input events.
pub struct InputManager {
    /// Physical key to intent
    bindings: HashMap<KeyCode, Intent>,
    /// Intent state as of the previous snapshot
    intents_old: [bool; INTENT_COUNT],
    /// Intent state right now
    intents_new: [bool; INTENT_COUNT],
    /// Look movement since the previous snapshot
    look_delta: (f64, f64),
    look_captured: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with the default bindings and nothing held.
    pub fn new() -> Self {
        Self {
            bindings: KEY_BINDINGS.into_iter().collect(),
            intents_old: [false; INTENT_COUNT],
            intents_new: [false; INTENT_COUNT],
            look_delta: (0.0, 0.0),
            look_captured: false,
        }
    }

    /// Binds a key to an intent, replacing any previous binding for that key.
    pub fn bind(&mut self, key: KeyCode, intent: Intent) {
        self.bindings.insert(key, intent);
    }

    /// Processes a window event and updates internal input state.
    ///
    /// Keyboard events drive intents. A left click captures look input, and
    /// losing focus releases everything so no key stays stuck down.
    ///
    /// # Arguments
    /// * `event` - The window event to process
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => {
                self.intake_key(*key, *state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => self.set_look_captured(true),
            WindowEvent::Focused(false) => self.reset_inputs(),
            _ => {}
        }
    }

    /// Records a key going down or up. Unbound keys are ignored.
    pub fn intake_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(intent) = self.bindings.get(&key) {
            self.intents_new[*intent as usize] = pressed;
        }
    }

    /// Accumulates raw mouse motion. Ignored unless look is captured.
    ///
    /// # Arguments
    /// * `delta` - The (x, y) delta of mouse movement since the last update
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.look_captured {
            return;
        }
        self.look_delta.0 += delta.0;
        self.look_delta.1 += delta.1;
    }

    pub fn set_look_captured(&mut self, captured: bool) {
        if self.look_captured != captured {
            trace!("Look capture {}", if captured { "on" } else { "off" });
        }
        self.look_captured = captured;
        if !captured {
            self.look_delta = (0.0, 0.0);
        }
    }

    pub fn is_look_captured(&self) -> bool {
        self.look_captured
    }

    /// Returns the input for this tick and starts tracking the next one.
    ///
    /// # Returns
    /// A snapshot with the transition state of every intent and the look
    /// movement accumulated since the previous call.
    pub fn snapshot(&mut self) -> InputSnapshot {
        let mut intents = [RawInputState::NotPressed; INTENT_COUNT];
        for (index, state) in intents.iter_mut().enumerate() {
            *state = RawInputState::from_raw_states(self.intents_old[index], self.intents_new[index]);
        }

        let snapshot = InputSnapshot {
            intents,
            look_delta: self.look_delta,
            look_captured: self.look_captured,
        };

        self.intents_old = self.intents_new;
        self.look_delta = (0.0, 0.0);
        snapshot
    }

    /// Releases every intent and look capture.
    ///
    /// This is typically called when the window loses focus to prevent
    /// stuck keys.
    pub fn reset_inputs(&mut self) {
        self.intents_new = [false; INTENT_COUNT];
        self.set_look_captured(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_goes_pressed_held_released() {
        let mut input = InputManager::new();

        input.intake_key(KeyCode::KeyW, true);
        assert_eq!(input.snapshot().state(Intent::Forward), RawInputState::Pressed);
        assert_eq!(input.snapshot().state(Intent::Forward), RawInputState::Held);

        input.intake_key(KeyCode::KeyW, false);
        assert_eq!(input.snapshot().state(Intent::Forward), RawInputState::Released);
        assert_eq!(input.snapshot().state(Intent::Forward), RawInputState::NotPressed);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = InputManager::new();
        input.intake_key(KeyCode::KeyQ, true);
        let snapshot = input.snapshot();
        assert!(Intent::all().iter().all(|&i| !snapshot.is_active(i)));
    }

    #[test]
    fn rebinding_moves_an_intent() {
        let mut input = InputManager::new();
        input.bind(KeyCode::ArrowUp, Intent::Forward);
        input.intake_key(KeyCode::ArrowUp, true);
        assert!(input.snapshot().is_active(Intent::Forward));
    }

    #[test]
    fn mouse_motion_counts_only_while_captured() {
        let mut input = InputManager::new();
        input.intake_mouse_motion((5.0, 5.0));
        assert_eq!(input.snapshot().look(), None);

        input.set_look_captured(true);
        input.intake_mouse_motion((5.0, 2.0));
        input.intake_mouse_motion((-1.0, 1.0));
        let snapshot = input.snapshot();
        assert_eq!(snapshot.look(), Some((4.0, 3.0)));

        // Consumed by the snapshot.
        assert_eq!(input.snapshot().look(), None);
    }

    #[test]
    fn losing_focus_releases_everything() {
        let mut input = InputManager::new();
        input.set_look_captured(true);
        input.intake_key(KeyCode::Space, true);
        input.intake_key(KeyCode::KeyD, true);
        input.snapshot();

        input.intake_input(&WindowEvent::Focused(false));
        let snapshot = input.snapshot();
        assert_eq!(snapshot.state(Intent::Up), RawInputState::Released);
        assert_eq!(snapshot.state(Intent::Right), RawInputState::Released);
        assert!(!snapshot.look_captured);
        assert!(!input.is_look_captured());
    }
}
