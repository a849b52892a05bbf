use crate::doom::{AmmoType, GameMode, NUM_AMMO, NUM_SLOTS, NUM_WEAPONS, SessionType, Weapon, weapon_slot};
use serde::{Deserialize, Serialize};

/// Game flags that drive element visibility.
///
/// Partial JSON is accepted: missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    /// Ownership per weapon, indexed by [`Weapon`] number.
    pub weapons_owned: [bool; NUM_WEAPONS],
    /// Ownership per ammo type (clip, shell, cell, missile). No condition
    /// reads it; state files carry it to describe a full player.
    pub ammo_owned: [bool; NUM_AMMO],
    /// Ownership per weapon slot, index 0 is slot 1.
    pub slots_owned: [bool; NUM_SLOTS],
    pub selected_weapon: Weapon,
    /// 1-based.
    pub selected_slot: i32,
    pub session: SessionType,
    pub game_mode: GameMode,
    pub compact_hud: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            weapons_owned: [true; NUM_WEAPONS],
            ammo_owned: [true; NUM_AMMO],
            slots_owned: [true; NUM_SLOTS],
            selected_weapon: Weapon::Pistol,
            selected_slot: 1,
            session: SessionType::Singleplayer,
            game_mode: GameMode::Commercial,
            compact_hud: false,
        }
    }
}

impl GameState {
    /// Whether the raw weapon number is owned. Unknown weapons are not.
    pub fn weapon_owned(&self, weapon: i32) -> bool {
        usize::try_from(weapon)
            .ok()
            .and_then(|i| self.weapons_owned.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Whether the 1-based slot is owned. Unknown slots are not.
    pub fn slot_owned(&self, slot: i32) -> bool {
        usize::try_from(slot - 1)
            .ok()
            .and_then(|i| self.slots_owned.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Ownership of the slot holding the 1-based weapon number `weapon`.
    pub fn weapon_slot_owned(&self, weapon: i32) -> bool {
        weapon_slot(weapon).is_some_and(|slot| self.slot_owned(slot))
    }

    pub fn set_weapon_owned(&mut self, weapon: Weapon, owned: bool) {
        self.weapons_owned[weapon as usize] = owned;
    }

    /// `NoAmmo` is never owned.
    pub fn owns_ammo(&self, ammo: AmmoType) -> bool {
        usize::try_from(ammo.code())
            .ok()
            .and_then(|i| self.ammo_owned.get(i))
            .copied()
            .unwrap_or(false)
    }

    /// Returns `false` for `NoAmmo`.
    pub fn set_ammo_owned(&mut self, ammo: AmmoType, owned: bool) -> bool {
        match usize::try_from(ammo.code())
            .ok()
            .and_then(|i| self.ammo_owned.get_mut(i))
        {
            Some(flag) => {
                *flag = owned;
                true
            }
            None => false,
        }
    }

    /// Returns `false` when `slot` is out of range.
    pub fn set_slot_owned(&mut self, slot: i32, owned: bool) -> bool {
        match usize::try_from(slot - 1)
            .ok()
            .and_then(|i| self.slots_owned.get_mut(i))
        {
            Some(flag) => {
                *flag = owned;
                true
            }
            None => false,
        }
    }
}
