use super::keys::{Command, ControlKey};
use nalgebra as na;
use std::collections::BTreeSet;

/// Control demand for a single simulation step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlFrame {
    /// Body-frame translation demand, each component in {-1, 0, 1}.
    pub translation: na::Vector3<f64>,
    /// Body-frame rotation demand, each component in {-1, 0, 1}.
    pub rotation: na::Vector3<f64>,
    pub commands: Vec<Command>,
}

/// Discrete key state. Motion keys act while held; with fine control held
/// they act only on the step after their key-down edge. Commands always
/// fire once per key-down edge.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: BTreeSet<ControlKey>,
    pressed: Vec<ControlKey>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: ControlKey) {
        if self.held.insert(key) {
            self.pressed.push(key);
        }
    }

    pub fn key_up(&mut self, key: ControlKey) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: ControlKey) -> bool {
        self.held.contains(&key)
    }

    pub fn release_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    pub fn take_frame(&mut self) -> ControlFrame {
        let fine = self.held.contains(&ControlKey::FineControl);
        let pressed = std::mem::take(&mut self.pressed);

        let mut engaged: BTreeSet<ControlKey> = pressed.iter().copied().collect();
        if !fine {
            engaged.extend(self.held.iter().copied());
        }

        let sum = |f: fn(ControlKey) -> Option<na::Vector3<f64>>| {
            engaged
                .iter()
                .filter_map(|k| f(*k))
                .fold(na::Vector3::zeros(), |acc, v| acc + v)
                .map(|c: f64| c.clamp(-1.0, 1.0))
        };

        ControlFrame {
            translation: sum(ControlKey::translation),
            rotation: sum(ControlKey::rotation),
            commands: pressed.iter().filter_map(|k| k.command()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_act_every_frame() {
        let mut input = InputState::new();
        input.key_down(ControlKey::TranslateForward);
        input.key_down(ControlKey::YawLeft);
        for _ in 0..3 {
            let frame = input.take_frame();
            assert_eq!(frame.translation, na::Vector3::x());
            assert_eq!(frame.rotation, na::Vector3::z());
        }
        input.key_up(ControlKey::TranslateForward);
        assert_eq!(input.take_frame().translation, na::Vector3::zeros());
    }

    #[test]
    fn fine_control_pulses_once() {
        let mut input = InputState::new();
        input.key_down(ControlKey::FineControl);
        input.key_down(ControlKey::PitchUp);
        assert_eq!(input.take_frame().rotation, na::Vector3::y());
        assert_eq!(input.take_frame().rotation, na::Vector3::zeros());

        // A fresh press pulses again
        input.key_up(ControlKey::PitchUp);
        input.key_down(ControlKey::PitchUp);
        assert_eq!(input.take_frame().rotation, na::Vector3::y());
    }

    #[test]
    fn commands_are_edge_triggered() {
        let mut input = InputState::new();
        input.key_down(ControlKey::ToggleMode);
        assert_eq!(input.take_frame().commands, vec![Command::ToggleMode]);
        assert!(input.take_frame().commands.is_empty());
        // Repeated key-down without key-up is auto-repeat, not a new press
        input.key_down(ControlKey::ToggleMode);
        assert!(input.take_frame().commands.is_empty());
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut input = InputState::new();
        input.key_down(ControlKey::TranslateUp);
        input.key_down(ControlKey::TranslateDown);
        assert_eq!(input.take_frame().translation, na::Vector3::zeros());
    }

    #[test]
    fn tap_within_a_frame_still_registers() {
        let mut input = InputState::new();
        input.key_down(ControlKey::TranslateLeft);
        input.key_up(ControlKey::TranslateLeft);
        assert_eq!(input.take_frame().translation, na::Vector3::y());
    }
}
