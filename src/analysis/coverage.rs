//! Offensive and defensive type coverage.

use crate::analysis::context::MemberContext;
use schema::PokemonType;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// A defensive coverage gap opens once this many members share a weakness.
pub const DEFENSIVE_GAP_THRESHOLD: usize = 3;

/// Which members an attack type pressures or bounces off.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefenseTally {
    /// Members taking super-effective damage (multiplier > 1).
    pub weak: Vec<String>,
    /// Members resisting (0 < multiplier < 1).
    pub resist: Vec<String>,
    /// Members immune (multiplier = 0).
    pub immune: Vec<String>,
}

/// Derived per-analysis coverage matrices. Recomputed every run; never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageMatrix {
    /// Attack type -> who it threatens on the roster.
    pub defense: BTreeMap<PokemonType, DefenseTally>,
    /// Defending type -> members able to hit it super-effectively with a
    /// damaging move.
    pub offense: BTreeMap<PokemonType, Vec<String>>,
    /// Defending types reachable at neutral-or-better by some damaging move.
    pub covered: BTreeSet<PokemonType>,
    /// Attack types with `weak` counts at or past the gap threshold.
    pub defensive_gaps: Vec<PokemonType>,
    /// Defending types no damaging roster move reaches at >= 1x.
    pub offensive_gaps: Vec<PokemonType>,
}

/// Compute both coverage matrices for the resolved roster.
///
/// Members whose species could not be resolved carry an "unknown data" note
/// from resolution and are left out of the tallies; the computation itself
/// never fails.
pub fn compute_coverage(contexts: &[MemberContext]) -> CoverageMatrix {
    let mut defense = BTreeMap::new();
    let mut offense: BTreeMap<PokemonType, Vec<String>> = BTreeMap::new();
    let mut covered = BTreeSet::new();
    let mut defensive_gaps = Vec::new();
    let mut offensive_gaps = Vec::new();

    for attack in PokemonType::ALL {
        let mut tally = DefenseTally::default();
        for ctx in contexts {
            let types = ctx.types();
            if types.is_empty() {
                continue;
            }
            let multiplier = PokemonType::defensive_multiplier(attack, types);
            if multiplier > 1.0 {
                tally.weak.push(ctx.name.clone());
            } else if multiplier == 0.0 {
                tally.immune.push(ctx.name.clone());
            } else if multiplier < 1.0 {
                tally.resist.push(ctx.name.clone());
            }
        }
        if tally.weak.len() >= DEFENSIVE_GAP_THRESHOLD {
            defensive_gaps.push(attack);
        }
        defense.insert(attack, tally);
    }

    for defend in PokemonType::ALL {
        let mut hitters = Vec::new();
        for ctx in contexts {
            let move_types = ctx.damaging_move_types();
            if move_types
                .iter()
                .any(|&t| PokemonType::type_effectiveness(t, defend) >= 1.0)
            {
                covered.insert(defend);
            }
            if move_types
                .iter()
                .any(|&t| PokemonType::type_effectiveness(t, defend) > 1.0)
            {
                hitters.push(ctx.name.clone());
            }
        }
        if !hitters.is_empty() {
            offense.insert(defend, hitters);
        }
        if !covered.contains(&defend) {
            offensive_gaps.push(defend);
        }
    }

    CoverageMatrix {
        defense,
        offense,
        covered,
        defensive_gaps,
        offensive_gaps,
    }
}

impl CoverageMatrix {
    /// The attack type hurting the most members, if any member is weak to
    /// anything.
    pub fn top_weakness(&self) -> Option<(PokemonType, usize)> {
        self.defense
            .iter()
            .map(|(t, tally)| (*t, tally.weak.len()))
            .filter(|(_, count)| *count > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
    }

    pub fn weak_count(&self, attack: PokemonType) -> usize {
        self.defense.get(&attack).map(|t| t.weak.len()).unwrap_or(0)
    }

    /// Human-readable gap descriptions for the report.
    pub fn gap_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        for attack in &self.defensive_gaps {
            messages.push(format!(
                "{} attacks pressure {} team members.",
                attack,
                self.weak_count(*attack)
            ));
        }
        if !self.offensive_gaps.is_empty() {
            let names: Vec<String> = self.offensive_gaps.iter().map(|t| t.to_string()).collect();
            messages.push(format!(
                "No damaging move reaches {} at neutral or better.",
                names.join(", ")
            ));
        }
        messages
    }
}
