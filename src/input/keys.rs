use nalgebra as na;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKey {
    TranslateForward,
    TranslateBack,
    TranslateLeft,
    TranslateRight,
    TranslateUp,
    TranslateDown,
    PitchUp,
    PitchDown,
    YawLeft,
    YawRight,
    RollLeft,
    RollRight,
    ToggleMode,
    Desaturate,
    Reset,
    Dock,
    Undock,
    StopAll,
    FineControl,
}

/// One-shot commands, triggered on the key-down edge only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Command {
    ToggleMode,
    Desaturate,
    Reset,
    Dock,
    Undock,
    StopAll,
}

impl ControlKey {
    /// Body-frame translation direction for motion keys.
    pub fn translation(self) -> Option<na::Vector3<f64>> {
        match self {
            ControlKey::TranslateForward => Some(na::Vector3::x()),
            ControlKey::TranslateBack => Some(-na::Vector3::x()),
            ControlKey::TranslateLeft => Some(na::Vector3::y()),
            ControlKey::TranslateRight => Some(-na::Vector3::y()),
            ControlKey::TranslateUp => Some(na::Vector3::z()),
            ControlKey::TranslateDown => Some(-na::Vector3::z()),
            _ => None,
        }
    }

    /// Body-frame rotation axis for attitude keys.
    pub fn rotation(self) -> Option<na::Vector3<f64>> {
        match self {
            ControlKey::RollRight => Some(na::Vector3::x()),
            ControlKey::RollLeft => Some(-na::Vector3::x()),
            ControlKey::PitchUp => Some(na::Vector3::y()),
            ControlKey::PitchDown => Some(-na::Vector3::y()),
            ControlKey::YawLeft => Some(na::Vector3::z()),
            ControlKey::YawRight => Some(-na::Vector3::z()),
            _ => None,
        }
    }

    pub fn command(self) -> Option<Command> {
        match self {
            ControlKey::ToggleMode => Some(Command::ToggleMode),
            ControlKey::Desaturate => Some(Command::Desaturate),
            ControlKey::Reset => Some(Command::Reset),
            ControlKey::Dock => Some(Command::Dock),
            ControlKey::Undock => Some(Command::Undock),
            ControlKey::StopAll => Some(Command::StopAll),
            _ => None,
        }
    }
}
