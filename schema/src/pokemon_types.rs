use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumString;

/// The 18 elemental types of the modern type chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PokemonType {
    /// Every type, in chart order.
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fighting,
        PokemonType::Flying,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Rock,
        PokemonType::Bug,
        PokemonType::Ghost,
        PokemonType::Steel,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Grass,
        PokemonType::Electric,
        PokemonType::Psychic,
        PokemonType::Ice,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Fairy,
    ];

    /// Calculate type effectiveness multiplier for attacking type vs defending type.
    /// Returns: 2.0 = Super Effective, 1.0 = Normal, 0.5 = Not Very Effective, 0.0 = No Effect
    pub fn type_effectiveness(attacking: PokemonType, defending: PokemonType) -> f32 {
        use PokemonType::*;

        match (attacking, defending) {
            // Normal
            (Normal, Ghost) => 0.0,
            (Normal, Rock) | (Normal, Steel) => 0.5,
            (Normal, _) => 1.0,

            // Fighting
            (Fighting, Ghost) => 0.0,
            (Fighting, Poison) | (Fighting, Flying) | (Fighting, Psychic) | (Fighting, Bug)
            | (Fighting, Fairy) => 0.5,
            (Fighting, Normal) | (Fighting, Ice) | (Fighting, Rock) | (Fighting, Dark)
            | (Fighting, Steel) => 2.0,
            (Fighting, _) => 1.0,

            // Flying
            (Flying, Electric) | (Flying, Rock) | (Flying, Steel) => 0.5,
            (Flying, Grass) | (Flying, Fighting) | (Flying, Bug) => 2.0,
            (Flying, _) => 1.0,

            // Poison
            (Poison, Steel) => 0.0,
            (Poison, Poison) | (Poison, Ground) | (Poison, Rock) | (Poison, Ghost) => 0.5,
            (Poison, Grass) | (Poison, Fairy) => 2.0,
            (Poison, _) => 1.0,

            // Ground
            (Ground, Flying) => 0.0,
            (Ground, Grass) | (Ground, Bug) => 0.5,
            (Ground, Fire) | (Ground, Electric) | (Ground, Poison) | (Ground, Rock)
            | (Ground, Steel) => 2.0,
            (Ground, _) => 1.0,

            // Rock
            (Rock, Fighting) | (Rock, Ground) | (Rock, Steel) => 0.5,
            (Rock, Fire) | (Rock, Ice) | (Rock, Flying) | (Rock, Bug) => 2.0,
            (Rock, _) => 1.0,

            // Bug
            (Bug, Fire) | (Bug, Fighting) | (Bug, Poison) | (Bug, Flying) | (Bug, Ghost)
            | (Bug, Steel) | (Bug, Fairy) => 0.5,
            (Bug, Grass) | (Bug, Psychic) | (Bug, Dark) => 2.0,
            (Bug, _) => 1.0,

            // Ghost
            (Ghost, Normal) => 0.0,
            (Ghost, Dark) => 0.5,
            (Ghost, Psychic) | (Ghost, Ghost) => 2.0,
            (Ghost, _) => 1.0,

            // Steel
            (Steel, Fire) | (Steel, Water) | (Steel, Electric) | (Steel, Steel) => 0.5,
            (Steel, Ice) | (Steel, Rock) | (Steel, Fairy) => 2.0,
            (Steel, _) => 1.0,

            // Fire
            (Fire, Fire) | (Fire, Water) | (Fire, Rock) | (Fire, Dragon) => 0.5,
            (Fire, Grass) | (Fire, Ice) | (Fire, Bug) | (Fire, Steel) => 2.0,
            (Fire, _) => 1.0,

            // Water
            (Water, Water) | (Water, Grass) | (Water, Dragon) => 0.5,
            (Water, Fire) | (Water, Ground) | (Water, Rock) => 2.0,
            (Water, _) => 1.0,

            // Grass
            (Grass, Fire)
            | (Grass, Grass)
            | (Grass, Poison)
            | (Grass, Flying)
            | (Grass, Bug)
            | (Grass, Dragon)
            | (Grass, Steel) => 0.5,
            (Grass, Water) | (Grass, Ground) | (Grass, Rock) => 2.0,
            (Grass, _) => 1.0,

            // Electric
            (Electric, Ground) => 0.0,
            (Electric, Electric) | (Electric, Grass) | (Electric, Dragon) => 0.5,
            (Electric, Water) | (Electric, Flying) => 2.0,
            (Electric, _) => 1.0,

            // Psychic
            (Psychic, Dark) => 0.0,
            (Psychic, Psychic) | (Psychic, Steel) => 0.5,
            (Psychic, Fighting) | (Psychic, Poison) => 2.0,
            (Psychic, _) => 1.0,

            // Ice
            (Ice, Fire) | (Ice, Water) | (Ice, Ice) | (Ice, Steel) => 0.5,
            (Ice, Grass) | (Ice, Ground) | (Ice, Flying) | (Ice, Dragon) => 2.0,
            (Ice, _) => 1.0,

            // Dragon
            (Dragon, Fairy) => 0.0,
            (Dragon, Steel) => 0.5,
            (Dragon, Dragon) => 2.0,
            (Dragon, _) => 1.0,

            // Dark
            (Dark, Fighting) | (Dark, Dark) | (Dark, Fairy) => 0.5,
            (Dark, Psychic) | (Dark, Ghost) => 2.0,
            (Dark, _) => 1.0,

            // Fairy
            (Fairy, Fire) | (Fairy, Poison) | (Fairy, Steel) => 0.5,
            (Fairy, Fighting) | (Fairy, Dragon) | (Fairy, Dark) => 2.0,
            (Fairy, _) => 1.0,
        }
    }

    /// Multiplier of an attack against a (possibly dual-typed) defender.
    /// The product of the single-type multipliers; always one of
    /// {0, 0.25, 0.5, 1, 2, 4}.
    pub fn defensive_multiplier(attacking: PokemonType, defenders: &[PokemonType]) -> f32 {
        defenders
            .iter()
            .fold(1.0, |acc, d| acc * Self::type_effectiveness(attacking, *d))
    }

    pub fn is_immune(attacking: PokemonType, defending: PokemonType) -> bool {
        Self::type_effectiveness(attacking, defending) == 0.0
    }
}
