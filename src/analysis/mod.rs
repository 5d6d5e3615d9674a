//! The team analysis core.
//!
//! One async entry point, [`TeamAnalyzer::analyze`], fans out the external
//! lookups and then runs the sequential engine chain — coverage, threats,
//! insights, report — as pure functions over the resolved inputs.

pub mod context;
pub mod coverage;
pub mod insight;
pub mod report;
pub mod speed;
pub mod strategy;
pub mod threat;

#[cfg(test)]
mod tests;

pub use context::{LookupTally, MemberContext, ResolvedMove};
pub use coverage::{compute_coverage, CoverageMatrix, DefenseTally};
pub use insight::{build_insights, build_recommendations, infer_role, Insight, Role};
pub use report::{DataCompleteness, TeamReport};
pub use speed::{speed_control_availability, speed_tier, SpeedControlAvailability, SpeedTier};
pub use strategy::{detect_strategies, StrategyFinding};
pub use threat::{assess_threats, Threat, ThreatCandidate};

use crate::errors::{AnalysisResult, RosterError};
use crate::providers::{PokedexProvider, UsageProvider};
use schema::{Roster, MAX_ROSTER_SIZE};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Tunable analysis policy. The thresholds are provisional; callers can
/// tighten or loosen them per format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Minimum recorded win rate for a checks-list entry to count.
    pub check_win_rate_floor: f32,
    /// How many top-usage species join the threat candidate pool.
    pub usage_candidate_limit: usize,
    /// Threats kept in the report after ranking.
    pub max_threats: usize,
    /// Strategy findings kept after ranking.
    pub max_strategies: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            check_win_rate_floor: 0.5,
            usage_candidate_limit: 10,
            max_threats: 5,
            max_strategies: 8,
        }
    }
}

/// The analysis pipeline. Holds the injected providers and a config;
/// carries no state between calls.
pub struct TeamAnalyzer<P, U> {
    dex: Arc<P>,
    usage: Arc<U>,
    config: AnalyzerConfig,
}

impl<P, U> TeamAnalyzer<P, U>
where
    P: PokedexProvider,
    U: UsageProvider,
{
    pub fn new(dex: Arc<P>, usage: Arc<U>) -> Self {
        Self::with_config(dex, usage, AnalyzerConfig::default())
    }

    pub fn with_config(dex: Arc<P>, usage: Arc<U>, config: AnalyzerConfig) -> Self {
        TeamAnalyzer { dex, usage, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze a roster for the given format.
    ///
    /// The format string is opaque here; it is handed to the usage provider
    /// unexamined. Fails only on roster preconditions — every data problem
    /// downstream degrades into notes and completeness counters.
    pub async fn analyze(&self, roster: &Roster, format: &str) -> AnalysisResult<TeamReport> {
        validate_roster(roster)?;

        let (contexts, tally) = context::build_contexts(roster, &self.dex, &self.usage, format).await;

        let check_names = threat::check_candidate_names(&contexts, &self.config);
        let check_candidates = self.resolve_candidates(check_names, format).await;
        let ladder = self
            .usage
            .top_usage(format, self.config.usage_candidate_limit)
            .await;
        let candidates = threat::merge_candidates(check_candidates, ladder, roster);

        let coverage = compute_coverage(&contexts);
        let threats = assess_threats(&contexts, roster, &candidates, &self.config);

        let tiers: Vec<SpeedTier> = roster
            .members
            .iter()
            .zip(&contexts)
            .map(|(member, ctx)| speed_tier(member, ctx))
            .collect();
        let speed_control = speed_control_availability(roster, &tiers);

        let insights = build_insights(roster, &contexts, &tiers, &speed_control, format);
        let recommendations = build_recommendations(roster, &coverage, &threats, &insights);
        let strategies = detect_strategies(roster, &contexts, self.config.max_strategies);

        Ok(report::assemble(
            roster.len(),
            coverage,
            threats,
            insights,
            recommendations,
            strategies,
            tiers,
            &speed_control,
            DataCompleteness::from_tally(tally),
        ))
    }

    /// Resolve usage profiles for check-derived candidate names, fanned out
    /// like the member lookups and rejoined in name order.
    async fn resolve_candidates(&self, names: Vec<String>, format: &str) -> Vec<ThreatCandidate> {
        let mut join_set = JoinSet::new();
        let total = names.len();
        for (index, name) in names.into_iter().enumerate() {
            let usage = Arc::clone(&self.usage);
            let format = format.to_string();
            join_set.spawn(async move {
                let profile = usage.usage(&name, &format).await.found();
                (index, ThreatCandidate { species: name, profile })
            });
        }

        let mut slots: Vec<Option<ThreatCandidate>> = (0..total).map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            if let Ok((index, candidate)) = joined {
                slots[index] = Some(candidate);
            }
        }
        slots.into_iter().flatten().collect()
    }
}

fn validate_roster(roster: &Roster) -> Result<(), RosterError> {
    if roster.is_empty() {
        return Err(RosterError::Empty);
    }
    if roster.len() > MAX_ROSTER_SIZE {
        return Err(RosterError::TooLarge(roster.len()));
    }
    Ok(())
}
