//! Per-member insights and team recommendations.
//!
//! Role inference and risk detection run as an explicit ordered list of
//! named rules, each a pure function over one member plus roster context.
//! Keeping the rules in a table makes each one testable alone and lets new
//! checks slot in without touching the walk.

use crate::analysis::context::MemberContext;
use crate::analysis::coverage::CoverageMatrix;
use crate::analysis::speed::{
    member_has_move_in, SpeedControlAvailability, SpeedTier, SPEED_REDUCTION_MOVES,
    TAILWIND_MOVES, TRICK_ROOM_MOVES,
};
use crate::analysis::strategy::{REDIRECTION_MOVES, SETUP_MOVES};
use crate::analysis::threat::Threat;
use schema::{Member, Roster, StatName};
use serde::Serialize;
use std::fmt;

/// Moves that mark a dedicated support set.
pub const SUPPORT_MOVES: &[&str] = &[
    "reflect",
    "light screen",
    "will-o-wisp",
    "rage powder",
    "follow me",
    "snarl",
    "parting shot",
    "fake out",
    "spore",
    "helping hand",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    SpeedControl,
    Support,
    SetupSweeper,
    Attacker,
    DefensivePivot,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::SpeedControl => "Speed control",
            Role::Support => "Utility support",
            Role::SetupSweeper => "Setup sweeper",
            Role::Attacker => "Primary attacker",
            Role::DefensivePivot => "Defensive pivot",
        };
        write!(f, "{}", label)
    }
}

/// Notes about an individual member of the team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub member: String,
    pub role: Option<Role>,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
}

/// First-match role classification over moves, EVs and items.
pub fn infer_role(member: &Member, ctx: &MemberContext) -> Option<Role> {
    let offensive = member.ev(StatName::Atk).max(member.ev(StatName::SpA));
    if member_has_move_in(member, TRICK_ROOM_MOVES)
        || member_has_move_in(member, TAILWIND_MOVES)
        || member_has_move_in(member, SPEED_REDUCTION_MOVES)
    {
        return Some(Role::SpeedControl);
    }
    if member_has_move_in(member, REDIRECTION_MOVES) || member_has_move_in(member, SUPPORT_MOVES) {
        return Some(Role::Support);
    }
    if member_has_move_in(member, SETUP_MOVES) && offensive >= 200 {
        return Some(Role::SetupSweeper);
    }
    if offensive >= 200 || ctx.damaging_move_types().len() >= 3 {
        return Some(Role::Attacker);
    }
    if member.ev(StatName::Hp) >= 200
        && (member.ev(StatName::Def) >= 100 || member.ev(StatName::SpD) >= 100)
    {
        return Some(Role::DefensivePivot);
    }
    None
}

#[derive(Debug, Clone, PartialEq)]
pub enum Finding {
    Strength(String),
    Risk(String),
}

/// Everything a rule may look at for one member.
pub struct RuleContext<'a> {
    pub member: &'a Member,
    pub ctx: &'a MemberContext,
    pub tier: &'a SpeedTier,
    pub role: Option<Role>,
    pub speed_control: &'a SpeedControlAvailability,
    pub format: &'a str,
}

pub struct InsightRule {
    pub name: &'static str,
    pub apply: fn(&RuleContext) -> Option<Finding>,
}

pub const INSIGHT_RULES: &[InsightRule] = &[
    InsightRule {
        name: "usage-presence",
        apply: |rc: &RuleContext| {
            let usage = rc.ctx.usage.as_ref()?;
            (usage.usage_rate > 0.0).then(|| {
                Finding::Strength(format!(
                    "Seen on {:.1}% of {} teams",
                    usage.usage_rate * 100.0,
                    rc.format
                ))
            })
        },
    },
    InsightRule {
        name: "tera-flexibility",
        apply: |rc: &RuleContext| {
            let tera = rc.member.tera_type?;
            let types = rc.ctx.types();
            (!types.is_empty() && !types.contains(&tera)).then(|| {
                Finding::Strength(format!("Tera {} adds matchup flexibility", tera))
            })
        },
    },
    InsightRule {
        name: "coverage-breadth",
        apply: |rc: &RuleContext| {
            let breadth = rc.ctx.damaging_move_types().len();
            (breadth >= 3).then(|| {
                Finding::Strength(format!("{} damaging move types keep walls honest", breadth))
            })
        },
    },
    InsightRule {
        name: "unknown-data",
        apply: |rc: &RuleContext| {
            (!rc.ctx.notes.is_empty()).then(|| Finding::Risk(rc.ctx.notes.join("; ")))
        },
    },
    InsightRule {
        name: "role-unclear",
        apply: |rc: &RuleContext| {
            rc.role
                .is_none()
                .then(|| Finding::Risk("Role unclear from listed moves".to_string()))
        },
    },
    InsightRule {
        name: "speed-control-gap",
        apply: |rc: &RuleContext| {
            let fast = rc.tier.base_speed.map(|s| s >= 100).unwrap_or(false);
            let no_priority = rc.tier.priority_moves.is_empty();
            let team_uncovered = !rc.speed_control.tailwind && !rc.speed_control.trick_room;
            (fast && no_priority && team_uncovered).then(|| {
                Finding::Risk(
                    "Relies on raw speed with no priority and no team speed control".to_string(),
                )
            })
        },
    },
    InsightRule {
        name: "mono-coverage",
        apply: |rc: &RuleContext| {
            let types = rc.ctx.damaging_move_types();
            let damaging_moves = rc
                .ctx
                .moves
                .iter()
                .filter(|m| {
                    m.profile
                        .as_ref()
                        .map(|p| p.category.is_damaging())
                        .unwrap_or(false)
                })
                .count();
            (damaging_moves >= 2 && types.len() == 1).then(|| {
                Finding::Risk(format!(
                    "All damaging moves are {}-type; easy to wall",
                    types[0]
                ))
            })
        },
    },
    InsightRule {
        name: "passive-set",
        apply: |rc: &RuleContext| {
            let resolved = rc
                .ctx
                .moves
                .iter()
                .filter_map(|m| m.profile.as_ref())
                .count();
            let damaging = rc
                .ctx
                .moves
                .iter()
                .filter_map(|m| m.profile.as_ref())
                .filter(|p| p.category.is_damaging())
                .count();
            (resolved > 0 && damaging == 0).then(|| {
                Finding::Risk("No damaging moves; applies no direct pressure".to_string())
            })
        },
    },
];

/// Build one insight per member, in roster order.
pub fn build_insights(
    roster: &Roster,
    contexts: &[MemberContext],
    tiers: &[SpeedTier],
    speed_control: &SpeedControlAvailability,
    format: &str,
) -> Vec<Insight> {
    let roles: Vec<Option<Role>> = roster
        .members
        .iter()
        .zip(contexts)
        .map(|(m, c)| infer_role(m, c))
        .collect();

    let mut insights: Vec<Insight> = roster
        .members
        .iter()
        .zip(contexts)
        .zip(tiers)
        .zip(&roles)
        .map(|(((member, ctx), tier), role)| {
            let rc = RuleContext {
                member,
                ctx,
                tier,
                role: *role,
                speed_control,
                format,
            };
            let mut strengths = Vec::new();
            let mut risks = Vec::new();
            for rule in INSIGHT_RULES {
                match (rule.apply)(&rc) {
                    Some(Finding::Strength(text)) => strengths.push(text),
                    Some(Finding::Risk(text)) => risks.push(text),
                    None => {}
                }
            }
            Insight {
                member: member.name.clone(),
                role: *role,
                strengths,
                risks,
            }
        })
        .collect();

    apply_redundancy_check(&mut insights, contexts, &roles);
    insights
}

/// Flag members doubling up on a role with overlapping defensive typing.
fn apply_redundancy_check(
    insights: &mut [Insight],
    contexts: &[MemberContext],
    roles: &[Option<Role>],
) {
    for i in 0..roles.len() {
        for j in (i + 1)..roles.len() {
            let (Some(role_a), Some(role_b)) = (roles[i], roles[j]) else {
                continue;
            };
            if role_a != role_b {
                continue;
            }
            let shared: Vec<String> = contexts[i]
                .types()
                .iter()
                .filter(|t| contexts[j].types().contains(t))
                .map(|t| t.to_string())
                .collect();
            if shared.is_empty() {
                continue;
            }
            let note_i = format!(
                "Duplicates the {} role of {} with shared {} typing",
                role_a,
                contexts[j].name,
                shared.join("/")
            );
            let note_j = format!(
                "Duplicates the {} role of {} with shared {} typing",
                role_b,
                contexts[i].name,
                shared.join("/")
            );
            insights[i].risks.push(note_i);
            insights[j].risks.push(note_j);
        }
    }
}

/// Ranked, self-contained recommendation strings:
/// defensive gaps first, then the top threats, then members drawing
/// multiple risk flags, then missing-attacker structure advice.
pub fn build_recommendations(
    roster: &Roster,
    coverage: &CoverageMatrix,
    threats: &[Threat],
    insights: &[Insight],
) -> Vec<String> {
    let mut recommendations = Vec::new();
    let size = roster.len();

    for gap in &coverage.defensive_gaps {
        recommendations.push(format!(
            "Add a {} resist or immunity; {} of {} members take super-effective {} damage.",
            gap,
            coverage.weak_count(*gap),
            size,
            gap
        ));
    }

    for threat in threats.iter().take(2) {
        recommendations.push(format!(
            "Prepare answers for {}; it pressures {}.",
            threat.species,
            threat.threatened.join(", ")
        ));
    }

    for insight in insights {
        if insight.risks.len() >= 2 {
            recommendations.push(format!(
                "Revisit {}'s set; it drew {} risk flags.",
                insight.member,
                insight.risks.len()
            ));
        }
    }

    let has_attacker = insights
        .iter()
        .any(|i| matches!(i.role, Some(Role::Attacker) | Some(Role::SetupSweeper)));
    if !has_attacker {
        recommendations
            .push("Team lacks a defined primary attacker; consider a dedicated damage dealer.".to_string());
    }

    recommendations.dedup();
    recommendations
}
