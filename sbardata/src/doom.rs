//! Static Doom tables consulted by status bar conditions.
//!
//! Numeric values match the engine's enums since SBARDEF condition
//! parameters are raw integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width of the status bar canvas in pixels. Height comes from the bar.
pub const SCREEN_WIDTH: i32 = 320;

/// Height of the full screen, used for fullscreen bars without a height.
pub const SCREEN_HEIGHT: i32 = 200;

/// Lump drawn for `face` elements.
pub const FACE_PATCH: &str = "STFST00";

pub const NUM_WEAPONS: usize = 9;
pub const NUM_AMMO: usize = 4;
pub const NUM_SLOTS: usize = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {what} '{value}'")]
pub struct ParseNameError {
    what: &'static str,
    value: String,
}

impl ParseNameError {
    fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

/// Weapons, in engine order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weapon {
    Fist,
    #[default]
    Pistol,
    Shotgun,
    Chaingun,
    Missile,
    Plasma,
    Bfg,
    Chainsaw,
    SuperShotgun,
}

impl Weapon {
    pub const ALL: [Weapon; NUM_WEAPONS] = [
        Weapon::Fist,
        Weapon::Pistol,
        Weapon::Shotgun,
        Weapon::Chaingun,
        Weapon::Missile,
        Weapon::Plasma,
        Weapon::Bfg,
        Weapon::Chainsaw,
        Weapon::SuperShotgun,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            Weapon::Fist => "fist",
            Weapon::Pistol => "pistol",
            Weapon::Shotgun => "shotgun",
            Weapon::Chaingun => "chaingun",
            Weapon::Missile => "missile",
            Weapon::Plasma => "plasma",
            Weapon::Bfg => "bfg",
            Weapon::Chainsaw => "chainsaw",
            Weapon::SuperShotgun => "supershotgun",
        }
    }

    /// Ammo consumed by this weapon.
    pub fn ammo(self) -> AmmoType {
        WEAPON_AMMO[self as usize]
    }

    /// 1-based weapon slot this weapon lives in.
    pub fn slot(self) -> i32 {
        WEAPON_SLOTS[self as usize]
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weapon {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<i32>() {
            return Self::from_code(code).ok_or_else(|| ParseNameError::new("weapon", s));
        }
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|w| w.name() == lower)
            .ok_or_else(|| ParseNameError::new("weapon", s))
    }
}

/// Ammo types. `NoAmmo` is 5 in the engine (4 is the ammo count).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmmoType {
    Clip = 0,
    Shell = 1,
    Cell = 2,
    Missile = 3,
    NoAmmo = 5,
}

impl AmmoType {
    /// Ammo types a player can carry, in engine order.
    pub const OWNABLE: [AmmoType; NUM_AMMO] =
        [AmmoType::Clip, AmmoType::Shell, AmmoType::Cell, AmmoType::Missile];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            AmmoType::Clip => "clip",
            AmmoType::Shell => "shell",
            AmmoType::Cell => "cell",
            AmmoType::Missile => "missile",
            AmmoType::NoAmmo => "noammo",
        }
    }
}

impl fmt::Display for AmmoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the carried types only, by name or number.
impl FromStr for AmmoType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::OWNABLE
            .into_iter()
            .find(|a| a.name() == lower || a.code().to_string() == lower)
            .ok_or_else(|| ParseNameError::new("ammo type", s))
    }
}

const WEAPON_AMMO: [AmmoType; NUM_WEAPONS] = [
    AmmoType::NoAmmo,
    AmmoType::Clip,
    AmmoType::Shell,
    AmmoType::Clip,
    AmmoType::Missile,
    AmmoType::Cell,
    AmmoType::Cell,
    AmmoType::Clip,
    AmmoType::Shell,
];

const WEAPON_SLOTS: [i32; NUM_WEAPONS] = [1, 2, 3, 4, 5, 6, 7, 1, 3];

/// Ammo type of a raw weapon number, `NoAmmo` when out of range.
pub fn weapon_ammo(weapon: i32) -> AmmoType {
    Weapon::from_code(weapon).map_or(AmmoType::NoAmmo, Weapon::ammo)
}

/// Slot of a 1-based weapon number, as the SBARDEF slot conditions index it.
pub fn weapon_slot(weapon: i32) -> Option<i32> {
    let index = usize::try_from(weapon.checked_sub(1)?).ok()?;
    WEAPON_SLOTS.get(index).copied()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    Singleplayer,
    Cooperative,
    Deathmatch,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Singleplayer,
        SessionType::Cooperative,
        SessionType::Deathmatch,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            SessionType::Singleplayer => "singleplayer",
            SessionType::Cooperative => "cooperative",
            SessionType::Deathmatch => "deathmatch",
        }
    }
}

impl FromStr for SessionType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == lower || t.code().to_string() == lower)
            .ok_or_else(|| ParseNameError::new("session type", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Doom 1 shareware, E1 M9.
    Shareware,
    /// Doom 1 registered, E3 M27.
    Registered,
    /// Doom 2 retail, E1 M34.
    #[default]
    Commercial,
    /// Doom 1 retail, E4 M36.
    Retail,
    Indetermined,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Shareware,
        GameMode::Registered,
        GameMode::Commercial,
        GameMode::Retail,
        GameMode::Indetermined,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            GameMode::Shareware => "shareware",
            GameMode::Registered => "registered",
            GameMode::Commercial => "commercial",
            GameMode::Retail => "retail",
            GameMode::Indetermined => "indetermined",
        }
    }
}

impl FromStr for GameMode {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.name() == lower || m.code().to_string() == lower)
            .ok_or_else(|| ParseNameError::new("game mode", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_tables() {
        assert_eq!(Weapon::Fist.ammo(), AmmoType::NoAmmo);
        assert_eq!(Weapon::Plasma.ammo(), AmmoType::Cell);
        assert_eq!(Weapon::Chainsaw.slot(), 1);
        assert_eq!(Weapon::SuperShotgun.slot(), 3);
    }

    #[test]
    fn test_out_of_range_weapon_has_no_ammo() {
        assert_eq!(weapon_ammo(-1), AmmoType::NoAmmo);
        assert_eq!(weapon_ammo(9), AmmoType::NoAmmo);
        assert_eq!(weapon_ammo(4), AmmoType::Missile);
    }

    #[test]
    fn test_weapon_slot_is_one_based() {
        assert_eq!(weapon_slot(1), Some(1));
        assert_eq!(weapon_slot(9), Some(3));
        assert_eq!(weapon_slot(0), None);
        assert_eq!(weapon_slot(10), None);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("BFG".parse::<Weapon>(), Ok(Weapon::Bfg));
        assert_eq!("3".parse::<Weapon>(), Ok(Weapon::Chaingun));
        assert!("railgun".parse::<Weapon>().is_err());
        assert_eq!("deathmatch".parse::<SessionType>(), Ok(SessionType::Deathmatch));
        assert_eq!("1".parse::<GameMode>(), Ok(GameMode::Registered));
        assert_eq!("Cell".parse::<AmmoType>(), Ok(AmmoType::Cell));
        assert_eq!("3".parse::<AmmoType>(), Ok(AmmoType::Missile));
        assert!("noammo".parse::<AmmoType>().is_err());
        assert!("5".parse::<AmmoType>().is_err());
    }
}
