use crate::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a provider lookup. Providers never error for unknown
/// identifiers; they answer `NotFound` and the analysis degrades locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Lookup::Found(value) => Lookup::Found(value),
            Lookup::NotFound => Lookup::NotFound,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl MoveCategory {
    pub fn is_damaging(self) -> bool {
        !matches!(self, MoveCategory::Status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u8,
    pub attack: u8,
    pub defense: u8,
    pub sp_attack: u8,
    pub sp_defense: u8,
    pub speed: u8,
}

/// Static species record supplied by the pokedex provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub name: String,
    /// 1-2 elemental types.
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub abilities: Vec<String>,
}

/// Static move record supplied by the pokedex provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveProfile {
    pub name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    /// Base power; `None` for status and variable-power moves.
    pub power: Option<u16>,
    pub priority: i8,
}

impl MoveProfile {
    pub fn has_priority(&self) -> bool {
        self.priority > 0
    }
}

/// A teammate seen alongside a species in usage data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeammateUsage {
    pub species: String,
    /// Co-occurrence rate in [0,1].
    pub usage: f32,
}

/// A species that historically performs well against the subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub species: String,
    /// Win rate against the subject, in [0,1].
    pub win_rate: f32,
}

/// Metagame record for one (species, format) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageProfile {
    pub species: String,
    /// Share of teams running this species, in [0,1].
    pub usage_rate: f32,
    pub types: Vec<PokemonType>,
    pub base_stats: Option<BaseStats>,
    /// Move types this species is commonly equipped with.
    pub move_types: Vec<PokemonType>,
    /// Most frequent partners, ranked.
    pub teammates: Vec<TeammateUsage>,
    /// Species that beat this one, with win rates.
    pub checks: Vec<MatchupRecord>,
}

impl UsageProfile {
    pub fn base_speed(&self) -> Option<u8> {
        self.base_stats.map(|s| s.speed)
    }
}

impl fmt::Display for SpeciesProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<String> = self.types.iter().map(|t| t.to_string()).collect();
        write!(f, "{} ({})", self.name, types.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_found_maps_to_option() {
        let hit: Lookup<u8> = Lookup::Found(7);
        let miss: Lookup<u8> = Lookup::NotFound;
        assert_eq!(hit.found(), Some(7));
        assert_eq!(miss.found(), None);
        assert_eq!(Lookup::from(Some(3u8)), Lookup::Found(3));
    }

    #[test]
    fn status_moves_are_not_damaging() {
        assert!(!MoveCategory::Status.is_damaging());
        assert!(MoveCategory::Physical.is_damaging());
        assert!(MoveCategory::Special.is_damaging());
    }
}
