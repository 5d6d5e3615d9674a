//! Metagame threat assessment.
//!
//! Cross-references the roster against ranked usage data: which common
//! species pressure this team, how much of the roster they touch, and why.

use crate::analysis::context::MemberContext;
use crate::analysis::AnalyzerConfig;
use ordered_float::OrderedFloat;
use schema::{fold_species_name, PokemonType, Roster, UsageProfile};
use serde::Serialize;
use std::collections::BTreeMap;

/// One metagame species pressuring the roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threat {
    pub species: String,
    /// Fraction of the roster this species pressures, in (0, 1].
    pub pressure: f32,
    /// Names of the pressured members, in roster order.
    pub threatened: Vec<String>,
    /// Short factual strings explaining the pressure.
    pub reasons: Vec<String>,
    /// Usage rate of the threat in the analyzed format (0 when unknown);
    /// the ordering tie-break.
    pub usage_rate: f32,
}

/// A candidate species with whatever usage data could be resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreatCandidate {
    pub species: String,
    pub profile: Option<UsageProfile>,
}

/// Names of every species appearing in some member's checks list with a win
/// rate at or above the configured floor. The analysis pipeline resolves
/// usage profiles for these before calling [`assess_threats`].
pub fn check_candidate_names(contexts: &[MemberContext], config: &AnalyzerConfig) -> Vec<String> {
    let mut seen = BTreeMap::new();
    for ctx in contexts {
        let Some(usage) = &ctx.usage else { continue };
        for check in &usage.checks {
            if check.win_rate >= config.check_win_rate_floor {
                seen.entry(fold_species_name(&check.species))
                    .or_insert_with(|| check.species.clone());
            }
        }
    }
    seen.into_values().collect()
}

/// Merge check-derived candidates with the format's top usage entries,
/// dropping species already on the roster and folded duplicates.
pub fn merge_candidates(
    check_candidates: Vec<ThreatCandidate>,
    ladder: Vec<UsageProfile>,
    roster: &Roster,
) -> Vec<ThreatCandidate> {
    let mut merged: Vec<ThreatCandidate> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    let mut push = |candidate: ThreatCandidate| {
        let key = fold_species_name(&candidate.species);
        if key.is_empty() || seen.contains(&key) || roster.contains_species(&candidate.species) {
            return;
        }
        seen.push(key);
        merged.push(candidate);
    };
    for candidate in check_candidates {
        push(candidate);
    }
    for profile in ladder {
        push(ThreatCandidate {
            species: profile.species.clone(),
            profile: Some(profile),
        });
    }
    merged
}

/// Score every candidate against the roster.
///
/// A member is pressured when (i) the candidate is a recorded check against
/// it, or (ii) the candidate's own typing is super-effective into the member
/// and its known move coverage carries that type. Candidates pressuring
/// nobody are discarded. Runs entirely on pre-resolved data; usage being
/// unavailable shrinks the candidate set but never fails the engine.
pub fn assess_threats(
    contexts: &[MemberContext],
    roster: &Roster,
    candidates: &[ThreatCandidate],
    config: &AnalyzerConfig,
) -> Vec<Threat> {
    let roster_size = roster.len();
    if roster_size == 0 {
        return Vec::new();
    }

    let mut threats = Vec::new();
    for candidate in candidates {
        let candidate_key = fold_species_name(&candidate.species);
        let mut threatened = Vec::new();
        let mut reasons = Vec::new();

        for ctx in contexts {
            let mut pressured = false;

            // (i) recorded matchup: the candidate is listed as a check.
            if let Some(usage) = &ctx.usage {
                if let Some(check) = usage
                    .checks
                    .iter()
                    .find(|c| fold_species_name(&c.species) == candidate_key)
                {
                    if check.win_rate >= config.check_win_rate_floor {
                        pressured = true;
                        reasons.push(format!(
                            "Beats {} in {:.0}% of recorded games",
                            ctx.name,
                            check.win_rate * 100.0
                        ));
                    }
                }
            }

            // (ii) typing: super-effective STAB the candidate actually runs.
            if let Some(profile) = &candidate.profile {
                for &stab in &profile.types {
                    if !ctx.types().is_empty()
                        && PokemonType::defensive_multiplier(stab, ctx.types()) > 1.0
                        && (profile.move_types.is_empty() || profile.move_types.contains(&stab))
                    {
                        pressured = true;
                        reasons.push(format!(
                            "{}-type STAB is super-effective into {}",
                            stab, ctx.name
                        ));
                    }
                }
            }

            if pressured {
                threatened.push(ctx.name.clone());
            }
        }

        if threatened.is_empty() {
            continue;
        }

        reasons.dedup();
        threats.push(Threat {
            species: candidate.species.clone(),
            pressure: threatened.len() as f32 / roster_size as f32,
            threatened,
            reasons,
            usage_rate: candidate
                .profile
                .as_ref()
                .map(|p| p.usage_rate)
                .unwrap_or(0.0),
        });
    }

    // Strict weak ordering: pressure desc, usage desc, name asc.
    threats.sort_by(|a, b| {
        OrderedFloat(b.pressure)
            .cmp(&OrderedFloat(a.pressure))
            .then_with(|| OrderedFloat(b.usage_rate).cmp(&OrderedFloat(a.usage_rate)))
            .then_with(|| a.species.cmp(&b.species))
    });
    threats.truncate(config.max_threats);
    threats
}
