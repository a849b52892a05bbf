//! Element visibility rules.
//!
//! A condition list is the logical AND of its entries. Codes the editor does
//! not evaluate count as satisfied, so files written for newer ports still
//! show everything they can.

use crate::doom::{AmmoType, weapon_ammo};
use crate::state::GameState;
use crate::types::{Condition, ConditionCode, Element};

/// Result of a single condition, or `None` when the code is not evaluated.
pub fn test(condition: &Condition, state: &GameState) -> Option<bool> {
    let param = condition.param;
    let selected = state.selected_weapon.code();

    let result = match condition.code {
        ConditionCode::WeaponOwned => state.weapon_owned(param),
        ConditionCode::WeaponSelected => selected == param,
        ConditionCode::WeaponNotSelected => selected != param,
        ConditionCode::WeaponHasAmmo => weapon_ammo(param) != AmmoType::NoAmmo,
        ConditionCode::SelectedWeaponHasAmmo => weapon_ammo(selected) != AmmoType::NoAmmo,
        ConditionCode::SelectedWeaponAmmoType => weapon_ammo(selected).code() == param,
        ConditionCode::WeaponSlotOwned => state.weapon_slot_owned(param),
        ConditionCode::WeaponSlotNotOwned => !state.weapon_slot_owned(param),
        ConditionCode::WeaponSlotSelected => state.selected_slot == param,
        ConditionCode::WeaponSlotNotSelected => state.selected_slot != param,
        ConditionCode::SessionTypeEqual => state.session.code() == param,
        ConditionCode::SessionTypeNotEqual => state.session.code() != param,
        ConditionCode::ModeEqual => state.game_mode.code() == param,
        ConditionCode::ModeNotEqual => state.game_mode.code() != param,
        ConditionCode::HudModeEqual => i32::from(state.compact_hud) == param,
        ConditionCode::ItemOwned
        | ConditionCode::ItemNotOwned
        | ConditionCode::FeatureLevelGreaterEqual
        | ConditionCode::FeatureLevelLess
        | ConditionCode::Other(_) => {
            log::trace!("Condition {} not evaluated", condition.code);
            return None;
        }
    };
    Some(result)
}

/// AND of all conditions; an empty list is true.
pub fn evaluate(conditions: &[Condition], state: &GameState) -> bool {
    conditions
        .iter()
        .all(|condition| test(condition, state).unwrap_or(true))
}

/// Whether `element` (and therefore its subtree) is visible.
pub fn is_visible(element: &Element, state: &GameState) -> bool {
    evaluate(element.conditions(), state)
}
