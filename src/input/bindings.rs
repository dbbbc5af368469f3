use super::keys::ControlKey;
use lazy_static::lazy_static;
use std::collections::{BTreeMap, HashMap};

lazy_static! {
    static ref DEFAULT_BINDINGS: HashMap<&'static str, ControlKey> = {
        let mut m = HashMap::new();
        m.insert("w", ControlKey::TranslateForward);
        m.insert("s", ControlKey::TranslateBack);
        m.insert("a", ControlKey::TranslateLeft);
        m.insert("d", ControlKey::TranslateRight);
        m.insert("r", ControlKey::TranslateUp);
        m.insert("f", ControlKey::TranslateDown);
        m.insert("i", ControlKey::PitchUp);
        m.insert("k", ControlKey::PitchDown);
        m.insert("j", ControlKey::YawLeft);
        m.insert("l", ControlKey::YawRight);
        m.insert("u", ControlKey::RollLeft);
        m.insert("o", ControlKey::RollRight);
        m.insert("m", ControlKey::ToggleMode);
        m.insert("t", ControlKey::Desaturate);
        m.insert("backspace", ControlKey::Reset);
        m.insert("enter", ControlKey::Dock);
        m.insert("g", ControlKey::Undock);
        m.insert("x", ControlKey::StopAll);
        m.insert("shift", ControlKey::FineControl);
        m
    };
}

/// Maps key names (case-insensitive) to control keys.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<String, ControlKey>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            map: DEFAULT_BINDINGS
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

impl KeyBindings {
    /// Default layout with per-vehicle overrides applied on top.
    pub fn with_overrides(overrides: &BTreeMap<String, ControlKey>) -> Self {
        let mut bindings = Self::default();
        for (name, key) in overrides {
            bindings.map.insert(name.to_lowercase(), *key);
        }
        bindings
    }

    pub fn resolve(&self, name: &str) -> Option<ControlKey> {
        self.map.get(&name.to_lowercase()).copied()
    }
}
