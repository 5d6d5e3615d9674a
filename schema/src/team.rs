use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumString;

/// Index into the six-slot EV/IV arrays carried by a [`Member`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum StatName {
    #[strum(serialize = "hp")]
    Hp,
    #[strum(serialize = "atk", serialize = "attack")]
    Atk,
    #[strum(serialize = "def", serialize = "defense")]
    Def,
    #[strum(serialize = "spa", serialize = "spatk", serialize = "sp.atk")]
    SpA,
    #[strum(serialize = "spd", serialize = "spdef", serialize = "sp.def")]
    SpD,
    #[strum(serialize = "spe", serialize = "speed")]
    Spe,
}

impl StatName {
    /// Slot order of the EV/IV arrays.
    pub const ALL: [StatName; 6] = [
        StatName::Hp,
        StatName::Atk,
        StatName::Def,
        StatName::SpA,
        StatName::SpD,
        StatName::Spe,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatName::Hp => "HP",
            StatName::Atk => "Atk",
            StatName::Def => "Def",
            StatName::SpA => "SpA",
            StatName::SpD => "SpD",
            StatName::Spe => "Spe",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    /// Speed stat multiplier applied at stat calculation time.
    pub fn speed_multiplier(self) -> f32 {
        match self {
            Nature::Timid | Nature::Jolly | Nature::Hasty | Nature::Naive => 1.1,
            Nature::Brave | Nature::Quiet | Nature::Relaxed | Nature::Sassy => 0.9,
            _ => 1.0,
        }
    }

    pub fn boosts_speed(self) -> bool {
        self.speed_multiplier() > 1.0
    }

    pub fn hinders_speed(self) -> bool {
        self.speed_multiplier() < 1.0
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single Smogon-style set: one slot on a team.
///
/// Immutable once parsed; the analysis chain never mutates a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Nickname if one was given, otherwise the species name.
    pub name: String,
    /// Species identifier used for data lookups (e.g. "Landorus-Therian").
    pub species: String,
    pub item: Option<String>,
    pub ability: Option<String>,
    pub tera_type: Option<PokemonType>,
    pub nature: Option<Nature>,
    /// HP, Atk, Def, SpA, SpD, Spe (indexed by [`StatName`])
    pub evs: [u8; 6],
    /// HP, Atk, Def, SpA, SpD, Spe (indexed by [`StatName`])
    pub ivs: [u8; 6],
    /// Up to 4 move names, in listed order.
    pub moves: Vec<String>,
    /// Lines the parser did not recognize, kept verbatim.
    pub notes: Vec<String>,
}

impl Member {
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            species: species.into(),
            item: None,
            ability: None,
            tera_type: None,
            nature: None,
            evs: [0; 6],
            ivs: [31; 6],
            moves: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn ev(&self, stat: StatName) -> u8 {
        self.evs[stat.index()]
    }

    pub fn iv(&self, stat: StatName) -> u8 {
        self.ivs[stat.index()]
    }

    /// True if any listed move name matches `name` case-insensitively.
    pub fn has_move(&self, name: &str) -> bool {
        self.moves.iter().any(|m| m.eq_ignore_ascii_case(name))
    }
}

/// An ordered team of up to six members. Slot order is display order only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub name: Option<String>,
    pub members: Vec<Member>,
}

pub const MAX_ROSTER_SIZE: usize = 6;
pub const MAX_MOVES_PER_MEMBER: usize = 4;
pub const MAX_EV: u8 = 252;
pub const MAX_EV_TOTAL: u16 = 508;

impl Roster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    /// True if `species` names someone already on the team (folded comparison,
    /// so "Iron Hands" matches "iron-hands").
    pub fn contains_species(&self, species: &str) -> bool {
        let target = fold_species_name(species);
        self.members
            .iter()
            .any(|m| fold_species_name(&m.species) == target)
    }
}

/// Case/space/hyphen-insensitive species key used when matching names coming
/// from different data sources.
pub fn fold_species_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
