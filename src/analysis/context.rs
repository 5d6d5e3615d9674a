//! Per-member lookup resolution.
//!
//! External lookups are the only latency-bound step of an analysis, and
//! members are data-independent, so the species/move/usage lookups for the
//! whole roster fan out concurrently and join before the engines run. A
//! failed lookup becomes an "unknown data" note on the member, never an
//! error.

use crate::providers::{PokedexProvider, UsageProvider};
use schema::{Member, MoveProfile, PokemonType, Roster, SpeciesProfile, UsageProfile};
use std::sync::Arc;
use tokio::task::JoinSet;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMove {
    pub name: String,
    pub profile: Option<MoveProfile>,
}

/// Everything the engines know about one roster slot after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberContext {
    pub name: String,
    pub species_id: String,
    pub species: Option<SpeciesProfile>,
    pub moves: Vec<ResolvedMove>,
    pub usage: Option<UsageProfile>,
    /// "unknown data" notes recorded during resolution.
    pub notes: Vec<String>,
}

impl MemberContext {
    pub fn types(&self) -> &[PokemonType] {
        self.species.as_ref().map(|s| s.types.as_slice()).unwrap_or(&[])
    }

    /// Types of the member's resolved damaging moves, deduplicated.
    pub fn damaging_move_types(&self) -> Vec<PokemonType> {
        let mut types: Vec<PokemonType> = self
            .moves
            .iter()
            .filter_map(|m| m.profile.as_ref())
            .filter(|p| p.category.is_damaging())
            .map(|p| p.move_type)
            .collect();
        types.sort();
        types.dedup();
        types
    }

    pub fn base_speed(&self) -> Option<u8> {
        self.species
            .as_ref()
            .map(|s| s.base_stats.speed)
            .or_else(|| self.usage.as_ref().and_then(|u| u.base_speed()))
    }

    pub fn has_known_species(&self) -> bool {
        self.species.is_some()
    }
}

/// Lookup bookkeeping feeding the report's completeness indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupTally {
    pub attempted: usize,
    pub failed: usize,
    pub usage_attempted: usize,
    pub usage_missing: usize,
}

impl LookupTally {
    pub fn absorb(&mut self, other: LookupTally) {
        self.attempted += other.attempted;
        self.failed += other.failed;
        self.usage_attempted += other.usage_attempted;
        self.usage_missing += other.usage_missing;
    }
}

/// Resolve every member of the roster concurrently and join the results in
/// roster order.
pub async fn build_contexts<P, U>(
    roster: &Roster,
    dex: &Arc<P>,
    usage: &Arc<U>,
    format: &str,
) -> (Vec<MemberContext>, LookupTally)
where
    P: PokedexProvider,
    U: UsageProvider,
{
    let mut join_set = JoinSet::new();
    for (index, member) in roster.members.iter().enumerate() {
        let member = member.clone();
        let dex = Arc::clone(dex);
        let usage = Arc::clone(usage);
        let format = format.to_string();
        join_set.spawn(async move {
            let resolved = resolve_member(&member, dex.as_ref(), usage.as_ref(), &format).await;
            (index, resolved)
        });
    }

    let mut slots: Vec<Option<(MemberContext, LookupTally)>> =
        (0..roster.len()).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        // A panicked lookup task is a lost member; degrade like a failed lookup.
        if let Ok((index, resolved)) = joined {
            slots[index] = Some(resolved);
        }
    }

    let mut contexts = Vec::with_capacity(roster.len());
    let mut tally = LookupTally::default();
    for (index, slot) in slots.into_iter().enumerate() {
        match slot {
            Some((ctx, member_tally)) => {
                tally.absorb(member_tally);
                contexts.push(ctx);
            }
            None => {
                let member = &roster.members[index];
                tally.attempted += 1;
                tally.failed += 1;
                contexts.push(MemberContext {
                    name: member.name.clone(),
                    species_id: member.species.clone(),
                    species: None,
                    moves: Vec::new(),
                    usage: None,
                    notes: vec![format!("unknown data: lookups for '{}' were lost", member.name)],
                });
            }
        }
    }
    (contexts, tally)
}

async fn resolve_member<P, U>(
    member: &Member,
    dex: &P,
    usage: &U,
    format: &str,
) -> (MemberContext, LookupTally)
where
    P: PokedexProvider,
    U: UsageProvider,
{
    let mut tally = LookupTally::default();
    let mut notes = Vec::new();

    let species_id = member.species.trim();
    let mut species = None;
    let mut usage_profile = None;

    if species_id.is_empty() {
        tally.attempted += 1;
        tally.failed += 1;
        notes.push("unknown data: blank species identifier".to_string());
    } else {
        tally.attempted += 1;
        match dex.species(species_id).await.found() {
            Some(profile) => species = Some(profile),
            None => {
                tally.failed += 1;
                notes.push(format!("unknown data: species '{}' not found", species_id));
            }
        }

        tally.usage_attempted += 1;
        match usage.usage(species_id, format).await.found() {
            Some(profile) => usage_profile = Some(profile),
            None => {
                tally.usage_missing += 1;
                notes.push(format!(
                    "unknown data: no usage statistics for '{}' in {}",
                    species_id, format
                ));
            }
        }
    }

    let mut moves = Vec::with_capacity(member.moves.len());
    for move_name in &member.moves {
        tally.attempted += 1;
        let profile = dex.move_profile(move_name).await.found();
        if profile.is_none() {
            tally.failed += 1;
            notes.push(format!("unknown data: move '{}' not found", move_name));
        }
        moves.push(ResolvedMove {
            name: move_name.clone(),
            profile,
        });
    }

    (
        MemberContext {
            name: member.name.clone(),
            species_id: member.species.clone(),
            species,
            moves,
            usage: usage_profile,
            notes,
        },
        tally,
    )
}
