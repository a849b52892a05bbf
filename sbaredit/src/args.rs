use clap::{Args, Parser, Subcommand};
use sbardata::doom::{AmmoType, GameMode, SessionType, Weapon};
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SBARDEF JSON document
    #[arg(long, env = "SBAREDIT_SBARDEF", global = true)]
    pub sbardef: Option<PathBuf>,

    /// Directory of lumps exported as PNG (e.g. STBAR.png)
    #[arg(long, env = "SBAREDIT_LUMPS", global = true)]
    pub lumps: Option<PathBuf>,

    /// Game state JSON file; missing fields keep their defaults
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(flatten)]
    pub overrides: StateOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Game state tweaks applied on top of `--state`.
#[derive(Args, Debug, Default, PartialEq)]
pub struct StateOverrides {
    /// Selected weapon, by name or number (e.g. "shotgun", 2)
    #[arg(long, global = true)]
    pub weapon: Option<Weapon>,

    /// Selected weapon slot (1-7)
    #[arg(long, global = true)]
    pub slot: Option<i32>,

    /// Session type: singleplayer, cooperative or deathmatch
    #[arg(long, global = true)]
    pub session: Option<SessionType>,

    /// Game mode: shareware, registered, commercial, retail, indetermined
    #[arg(long, global = true)]
    pub mode: Option<GameMode>,

    /// Preview the compact HUD
    #[arg(long, global = true)]
    pub compact: bool,

    /// Mark a weapon as not owned (repeatable)
    #[arg(long = "without-weapon", value_name = "WEAPON", global = true)]
    pub without_weapons: Vec<Weapon>,

    /// Mark a weapon slot as not owned (repeatable)
    #[arg(long = "without-slot", value_name = "SLOT", global = true)]
    pub without_slots: Vec<i32>,

    /// Mark an ammo type (clip, shell, cell, missile) as not owned (repeatable)
    #[arg(long = "without-ammo", value_name = "AMMO", global = true)]
    pub without_ammo: Vec<AmmoType>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    Graphic,
    Number,
    Percent,
    Face,
}

/// Where an edit applies and where the result goes.
#[derive(Args, Debug, PartialEq)]
pub struct EditTarget {
    /// Status bar index
    #[arg(long, default_value_t = 0)]
    pub bar: usize,

    /// Write the edited document here instead of overwriting --sbardef
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List the status bars of the document.
    Bars,

    /// Print the laid out nodes of a status bar.
    Layout {
        /// Status bar index
        #[arg(long, default_value_t = 0)]
        bar: usize,
    },

    /// Show the properties of one element.
    ///
    /// Element ids are the `#N` numbers printed by `layout`.
    Inspect {
        /// Element id
        id: u32,
    },

    /// Render a status bar preview to a PNG file.
    Render {
        /// Status bar index
        #[arg(long, default_value_t = 0)]
        bar: usize,

        /// Output path for the image.
        #[arg(short, long, default_value = "statusbar.png")]
        output: PathBuf,
    },

    /// Drop an element so that it draws at canvas position X,Y.
    ///
    /// The position is clamped to the canvas like a mouse drag.
    Move {
        /// Element id
        id: u32,
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[command(flatten)]
        target: EditTarget,
    },

    /// Append a new element at the parent's origin.
    Add {
        /// Parent element id (default: top level of the status bar)
        #[arg(long)]
        parent: Option<u32>,

        #[arg(long, value_enum)]
        kind: KindArg,

        /// Lump name, for graphics
        #[arg(long)]
        patch: Option<String>,

        /// Number font name, for numbers and percents
        #[arg(long)]
        font: Option<String>,

        /// Digit slots, for numbers and percents
        #[arg(long, default_value_t = 3)]
        max_length: i32,

        #[command(flatten)]
        target: EditTarget,
    },

    /// Remove an element and everything below it.
    Remove {
        /// Element id
        id: u32,
        #[command(flatten)]
        target: EditTarget,
    },

    /// List loaded lumps.
    Lumps {
        /// Only names containing this text (case-insensitive)
        #[arg(long)]
        filter: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_with_negative_position() {
        let cli = Cli::try_parse_from([
            "sbaredit", "--sbardef", "SBARDEF.json", "move", "4", "-3", "12", "--bar", "1",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Commands::Move {
                id: 4,
                x: -3,
                y: 12,
                target: EditTarget {
                    bar: 1,
                    output: None
                },
            }
        );
    }

    #[test]
    fn test_global_state_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sbaredit",
            "layout",
            "--weapon",
            "plasma",
            "--session",
            "deathmatch",
            "--without-slot",
            "2",
            "--without-slot",
            "3",
            "--without-ammo",
            "shell",
        ])
        .unwrap();
        assert_eq!(cli.overrides.weapon, Some(Weapon::Plasma));
        assert_eq!(cli.overrides.session, Some(SessionType::Deathmatch));
        assert_eq!(cli.overrides.without_slots, vec![2, 3]);
        assert_eq!(cli.overrides.without_ammo, vec![AmmoType::Shell]);
        assert!(!cli.overrides.compact);
    }

    #[test]
    fn test_add_kind() {
        let cli = Cli::try_parse_from([
            "sbaredit", "add", "--kind", "percent", "--font", "BigRed", "--parent", "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                parent, kind, font, max_length, ..
            } => {
                assert_eq!(parent, Some(4));
                assert_eq!(kind, KindArg::Percent);
                assert_eq!(font.as_deref(), Some("BigRed"));
                assert_eq!(max_length, 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_weapon_rejected() {
        assert!(Cli::try_parse_from(["sbaredit", "bars", "--weapon", "railgun"]).is_err());
    }
}
