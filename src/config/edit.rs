//! One-directional edit pipeline: an edit applied to a snapshot yields a new
//! validated snapshot, from which the simulation rebuilds its derived state.

use super::errors::EditError;
use super::spacecraft::*;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEdit {
    AddThruster(ThrusterConfig),
    UpdateThruster { index: usize, thruster: ThrusterConfig },
    RemoveThruster { index: usize },
    AddReactionWheel(ReactionWheelConfig),
    UpdateReactionWheel { index: usize, wheel: ReactionWheelConfig },
    RemoveReactionWheel { index: usize },
    AddCmg(CmgConfig),
    UpdateCmg { index: usize, cmg: CmgConfig },
    RemoveCmg { index: usize },
    SetProperties(SpacecraftProperties),
    SetDocking(DockingConfig),
}

fn slot<'a, T>(items: &'a mut [T], index: usize, kind: &'static str) -> Result<&'a mut T, EditError> {
    let len = items.len();
    items
        .get_mut(index)
        .ok_or(EditError::IndexOutOfRange { kind, index, len })
}

fn remove<T>(items: &mut Vec<T>, index: usize, kind: &'static str) -> Result<(), EditError> {
    if index >= items.len() {
        return Err(EditError::IndexOutOfRange {
            kind,
            index,
            len: items.len(),
        });
    }
    items.remove(index);
    Ok(())
}

impl SpacecraftConfig {
    /// Returns the edited snapshot; `self` is left untouched.
    pub fn apply(&self, edit: ConfigEdit) -> Result<SpacecraftConfig, EditError> {
        let mut next = self.clone();
        match edit {
            ConfigEdit::AddThruster(t) => next.thrusters.push(t),
            ConfigEdit::UpdateThruster { index, thruster } => {
                *slot(&mut next.thrusters, index, "thruster")? = thruster
            }
            ConfigEdit::RemoveThruster { index } => remove(&mut next.thrusters, index, "thruster")?,
            ConfigEdit::AddReactionWheel(w) => next.reaction_wheels.push(w),
            ConfigEdit::UpdateReactionWheel { index, wheel } => {
                *slot(&mut next.reaction_wheels, index, "reaction wheel")? = wheel
            }
            ConfigEdit::RemoveReactionWheel { index } => {
                remove(&mut next.reaction_wheels, index, "reaction wheel")?
            }
            ConfigEdit::AddCmg(c) => next.cmgs.push(c),
            ConfigEdit::UpdateCmg { index, cmg } => *slot(&mut next.cmgs, index, "CMG")? = cmg,
            ConfigEdit::RemoveCmg { index } => remove(&mut next.cmgs, index, "CMG")?,
            ConfigEdit::SetProperties(p) => next.properties = p,
            ConfigEdit::SetDocking(d) => next.docking = d,
        }
        next.validate()?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::DEFAULT_SPACECRAFT;

    #[test]
    fn edits_produce_new_snapshot() {
        let base = DEFAULT_SPACECRAFT.clone();
        let edited = base
            .apply(ConfigEdit::RemoveThruster { index: 0 })
            .unwrap();
        assert_eq!(edited.thrusters.len(), base.thrusters.len() - 1);
        assert_eq!(base, *DEFAULT_SPACECRAFT);
        assert_eq!(edited.thrusters[0], base.thrusters[1]);
    }

    #[test]
    fn update_replaces_entry() {
        let mut wheel = DEFAULT_SPACECRAFT.reaction_wheels[1].clone();
        wheel.max_angular_momentum = 30.0;
        let edited = DEFAULT_SPACECRAFT
            .apply(ConfigEdit::UpdateReactionWheel { index: 1, wheel })
            .unwrap();
        assert_eq!(edited.reaction_wheels[1].max_angular_momentum, 30.0);
    }

    #[test]
    fn out_of_range_edit_is_rejected() {
        let err = DEFAULT_SPACECRAFT
            .apply(ConfigEdit::RemoveCmg { index: 9 })
            .unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange { kind: "CMG", index: 9, len: 4 }
        );
    }

    #[test]
    fn invalid_result_is_rejected() {
        let mut props = DEFAULT_SPACECRAFT.properties.clone();
        props.dry_mass = -1.0;
        assert!(matches!(
            DEFAULT_SPACECRAFT.apply(ConfigEdit::SetProperties(props)),
            Err(EditError::Invalid(_))
        ));
    }

    #[test]
    fn edited_snapshot_survives_persistence() {
        let edited = DEFAULT_SPACECRAFT
            .apply(ConfigEdit::RemoveReactionWheel { index: 2 })
            .unwrap();
        let restored = SpacecraftConfig::from_json(&edited.to_json().unwrap()).unwrap();
        assert_eq!(restored, edited);
    }
}
