//! Report assembly.
//!
//! Pure aggregation of the engine outputs plus a short summary rendered
//! deterministically from the same fields, so the prose and the structured
//! data can never disagree.

use crate::analysis::context::LookupTally;
use crate::analysis::coverage::CoverageMatrix;
use crate::analysis::insight::Insight;
use crate::analysis::speed::{SpeedControlAvailability, SpeedTier};
use crate::analysis::strategy::StrategyFinding;
use crate::analysis::threat::Threat;
use serde::Serialize;

/// How much of the analysis ran on resolved data. Always present, so a
/// partial analysis is never mistaken for a fully-informed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataCompleteness {
    /// Species + move lookups issued.
    pub lookups_attempted: usize,
    /// Of those, how many answered "not found".
    pub lookups_failed: usize,
    /// Usage lookups issued (one per member with a species id).
    pub usage_attempted: usize,
    /// Of those, how many had no usage record.
    pub usage_missing: usize,
    /// Set when no member resolved any usage data; threat assessment fell
    /// back to coverage-based inference alone.
    pub usage_data_unavailable: bool,
}

impl DataCompleteness {
    pub fn from_tally(tally: LookupTally) -> Self {
        DataCompleteness {
            lookups_attempted: tally.attempted,
            lookups_failed: tally.failed,
            usage_attempted: tally.usage_attempted,
            usage_missing: tally.usage_missing,
            usage_data_unavailable: tally.usage_attempted > 0
                && tally.usage_missing == tally.usage_attempted,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.lookups_failed == 0 && self.usage_missing == 0
    }
}

/// The analyzer's sole output: one immutable value per analysis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamReport {
    pub summary: String,
    pub coverage: CoverageMatrix,
    pub threats: Vec<Threat>,
    pub insights: Vec<Insight>,
    pub coverage_gaps: Vec<String>,
    pub recommendations: Vec<String>,
    pub strategies: Vec<StrategyFinding>,
    pub speed_tiers: Vec<SpeedTier>,
    pub completeness: DataCompleteness,
}

#[allow(clippy::too_many_arguments)]
pub fn assemble(
    member_count: usize,
    coverage: CoverageMatrix,
    threats: Vec<Threat>,
    insights: Vec<Insight>,
    recommendations: Vec<String>,
    strategies: Vec<StrategyFinding>,
    speed_tiers: Vec<SpeedTier>,
    speed_control: &SpeedControlAvailability,
    completeness: DataCompleteness,
) -> TeamReport {
    let summary = render_summary(
        member_count,
        &coverage,
        &threats,
        speed_control,
        &completeness,
    );
    let coverage_gaps = coverage.gap_messages();
    TeamReport {
        summary,
        coverage,
        threats,
        insights,
        coverage_gaps,
        recommendations,
        strategies,
        speed_tiers,
        completeness,
    }
}

/// 2-4 sentences, rendered from report fields only.
fn render_summary(
    member_count: usize,
    coverage: &CoverageMatrix,
    threats: &[Threat],
    speed_control: &SpeedControlAvailability,
    completeness: &DataCompleteness,
) -> String {
    let mut sentences = Vec::new();

    let weakness = match coverage.top_weakness() {
        Some((attack, count)) => format!(
            "top defensive weakness is {} ({} member{} hit super-effectively)",
            attack,
            count,
            if count == 1 { "" } else { "s" }
        ),
        None => "the defensive type chart is balanced".to_string(),
    };
    sentences.push(format!(
        "Analyzed {} Pokemon; {}.",
        member_count, weakness
    ));

    if speed_control.any() {
        sentences.push(format!(
            "Speed control present via {}.",
            speed_control.describe().join(", ")
        ));
    } else {
        sentences.push("No obvious speed control.".to_string());
    }

    if let Some(top) = threats.first() {
        sentences.push(format!(
            "{} applies the most metagame pressure, threatening {:.0}% of the roster.",
            top.species,
            top.pressure * 100.0
        ));
    }

    if !completeness.is_complete() {
        sentences.push(format!(
            "{} of {} data lookups and {} of {} usage lookups went unresolved; treat this analysis as partial.",
            completeness.lookups_failed,
            completeness.lookups_attempted,
            completeness.usage_missing,
            completeness.usage_attempted
        ));
    }

    sentences.join(" ")
}
