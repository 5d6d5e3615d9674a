//! Team archetype detection.
//!
//! A cascade of independent pattern checks over movesets, abilities, EV
//! spreads and resolved typings. Each detector is a pure function producing
//! at most one finding with a confidence score; findings are ranked, not
//! exclusive — a team can read as both "Trick Room" and "Bulky Offense".

use crate::analysis::context::MemberContext;
use crate::analysis::speed::{
    member_has_move_in, SPEED_REDUCTION_MOVES, TAILWIND_MOVES, TRICK_ROOM_MOVES,
};
use ordered_float::OrderedFloat;
use schema::{Member, PokemonType, Roster, StatName};
use serde::Serialize;

pub const SETUP_MOVES: &[&str] = &[
    "swords dance",
    "nasty plot",
    "shell smash",
    "calm mind",
    "dragon dance",
    "quiver dance",
    "bulk up",
    "shift gear",
    "tail glow",
    "agility",
    "rock polish",
];
pub const REDIRECTION_MOVES: &[&str] = &["follow me", "rage powder"];
pub const STALL_MOVES: &[&str] = &[
    "protect",
    "substitute",
    "recover",
    "roost",
    "wish",
    "heal bell",
];
pub const PRIORITY_ATTACKS: &[&str] = &[
    "fake out",
    "extreme speed",
    "sucker punch",
    "aqua jet",
    "ice shard",
    "bullet punch",
    "mach punch",
    "grassy glide",
    "first impression",
];

const SUN_SETTERS: (&[&str], &[&str]) = (&["sunny day"], &["drought", "desolate land"]);
const RAIN_SETTERS: (&[&str], &[&str]) = (&["rain dance"], &["drizzle", "primordial sea"]);
const SNOW_SETTERS: (&[&str], &[&str]) = (&["snowscape", "hail"], &["snow warning"]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyFinding {
    pub name: String,
    /// "archetype", "win_condition" or "composition".
    pub category: &'static str,
    /// Heuristic confidence in [0, 1].
    pub confidence: f32,
    pub summary: String,
    pub details: Vec<String>,
}

fn member_has_ability_in(member: &Member, table: &[&str]) -> bool {
    member
        .ability
        .as_deref()
        .map(|a| table.contains(&a.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn offensive_investment(member: &Member) -> u8 {
    member.ev(StatName::Atk).max(member.ev(StatName::SpA))
}

/// Run every detector and rank the findings: confidence desc, name asc.
pub fn detect_strategies(
    roster: &Roster,
    contexts: &[MemberContext],
    limit: usize,
) -> Vec<StrategyFinding> {
    let mut findings = Vec::new();
    findings.extend(detect_trick_room(roster));
    findings.extend(detect_tailwind(roster));
    findings.extend(detect_speed_reduction(roster));
    findings.extend(detect_weather(roster, contexts, "Sun", SUN_SETTERS, PokemonType::Fire));
    findings.extend(detect_weather(roster, contexts, "Rain", RAIN_SETTERS, PokemonType::Water));
    findings.extend(detect_weather(roster, contexts, "Snow", SNOW_SETTERS, PokemonType::Ice));
    findings.extend(detect_setup_sweepers(roster));
    findings.extend(detect_priority_spam(roster));
    findings.extend(detect_redirection(roster));
    findings.extend(detect_composition(roster));

    findings.sort_by(|a, b| {
        OrderedFloat(b.confidence)
            .cmp(&OrderedFloat(a.confidence))
            .then_with(|| a.name.cmp(&b.name))
    });
    findings.truncate(limit);
    findings
}

fn detect_trick_room(roster: &Roster) -> Option<StrategyFinding> {
    let setters: Vec<&str> = roster
        .members
        .iter()
        .filter(|m| member_has_move_in(m, TRICK_ROOM_MOVES))
        .map(|m| m.name.as_str())
        .collect();
    if setters.is_empty() {
        return None;
    }
    let slow: Vec<&str> = roster
        .members
        .iter()
        .filter(|m| {
            m.nature.map(|n| n.hinders_speed()).unwrap_or(false) || m.iv(StatName::Spe) == 0
        })
        .map(|m| m.name.as_str())
        .collect();

    let mut confidence = 0.4 + 0.2 * setters.len() as f32 + 0.1 * slow.len() as f32;
    let mut details = vec![format!("{} member(s) carry Trick Room", setters.len())];
    if !slow.is_empty() {
        details.push(format!(
            "{} member(s) built slow: {}",
            slow.len(),
            slow.join(", ")
        ));
    }
    if slow.len() >= 3 {
        confidence += 0.2;
        details.push("Multiple minimum-speed builds lean into reversed turn order".to_string());
    }
    Some(StrategyFinding {
        name: "Trick Room".to_string(),
        category: "archetype",
        confidence: confidence.min(1.0),
        summary: "Reverses turn order to favor slow, bulky attackers".to_string(),
        details,
    })
}

fn detect_tailwind(roster: &Roster) -> Option<StrategyFinding> {
    let setters: Vec<&str> = roster
        .members
        .iter()
        .filter(|m| member_has_move_in(m, TAILWIND_MOVES))
        .map(|m| m.name.as_str())
        .collect();
    if setters.is_empty() {
        return None;
    }
    let fast = roster
        .members
        .iter()
        .filter(|m| {
            m.nature.map(|n| n.boosts_speed()).unwrap_or(false) || m.ev(StatName::Spe) >= 200
        })
        .count();

    let mut confidence = 0.5 + 0.2 * setters.len() as f32 + 0.05 * fast as f32;
    let mut details = vec![format!(
        "Tailwind from {}",
        setters.join(", ")
    )];
    if fast >= 3 {
        confidence += 0.1;
        details.push(format!("{} fast builds profit from doubled speed", fast));
    }
    Some(StrategyFinding {
        name: "Tailwind".to_string(),
        category: "archetype",
        confidence: confidence.min(1.0),
        summary: "Doubles team speed for fast offensive pressure".to_string(),
        details,
    })
}

fn detect_speed_reduction(roster: &Roster) -> Option<StrategyFinding> {
    let users = roster
        .members
        .iter()
        .filter(|m| member_has_move_in(m, SPEED_REDUCTION_MOVES))
        .count();
    (users >= 2).then(|| StrategyFinding {
        name: "Speed Control (Reduction)".to_string(),
        category: "archetype",
        confidence: 0.6,
        summary: "Slows opponents down with Icy Wind/Electroweb-style moves".to_string(),
        details: vec![format!("{} member(s) carry speed reduction", users)],
    })
}

fn detect_weather(
    roster: &Roster,
    contexts: &[MemberContext],
    label: &str,
    (setter_moves, setter_abilities): (&[&str], &[&str]),
    abuser_type: PokemonType,
) -> Option<StrategyFinding> {
    let setters: Vec<&str> = roster
        .members
        .iter()
        .filter(|m| member_has_move_in(m, setter_moves) || member_has_ability_in(m, setter_abilities))
        .map(|m| m.name.as_str())
        .collect();
    if setters.is_empty() {
        return None;
    }
    let abusers: Vec<&str> = contexts
        .iter()
        .filter(|ctx| ctx.types().contains(&abuser_type))
        .map(|ctx| ctx.name.as_str())
        .collect();

    let confidence = (0.5 + 0.2 * setters.len() as f32 + 0.1 * abusers.len() as f32).min(1.0);
    let mut details = vec![format!("{} setter(s): {}", label, setters.join(", "))];
    if !abusers.is_empty() {
        details.push(format!(
            "{} {}-type member(s) benefit: {}",
            abusers.len(),
            abuser_type,
            abusers.join(", ")
        ));
    }
    Some(StrategyFinding {
        name: format!("{} Team", label),
        category: "archetype",
        confidence,
        summary: format!("{} weather core with on-type beneficiaries", label),
        details,
    })
}

fn detect_setup_sweepers(roster: &Roster) -> Option<StrategyFinding> {
    let sweepers: Vec<&str> = roster
        .members
        .iter()
        .filter(|m| member_has_move_in(m, SETUP_MOVES) && offensive_investment(m) >= 200)
        .map(|m| m.name.as_str())
        .collect();
    if sweepers.is_empty() {
        return None;
    }
    Some(StrategyFinding {
        name: "Setup Sweeper".to_string(),
        category: "win_condition",
        confidence: (0.6 + 0.15 * sweepers.len() as f32).min(1.0),
        summary: "Wins through stat-boosting sweeps".to_string(),
        details: vec![format!("Setup from {}", sweepers.join(", "))],
    })
}

fn detect_priority_spam(roster: &Roster) -> Option<StrategyFinding> {
    let users: Vec<&str> = roster
        .members
        .iter()
        .filter(|m| member_has_move_in(m, PRIORITY_ATTACKS))
        .map(|m| m.name.as_str())
        .collect();
    (users.len() >= 3).then(|| StrategyFinding {
        name: "Priority Spam".to_string(),
        category: "win_condition",
        confidence: 0.7,
        summary: "Controls turn order with stacked priority attacks".to_string(),
        details: vec![format!("Priority on {}", users.join(", "))],
    })
}

fn detect_redirection(roster: &Roster) -> Option<StrategyFinding> {
    let users: Vec<&str> = roster
        .members
        .iter()
        .filter(|m| member_has_move_in(m, REDIRECTION_MOVES))
        .map(|m| m.name.as_str())
        .collect();
    if users.is_empty() {
        return None;
    }
    Some(StrategyFinding {
        name: "Redirection Support".to_string(),
        category: "win_condition",
        confidence: 0.8,
        summary: "Protects key attackers behind Follow Me/Rage Powder".to_string(),
        details: vec![format!("Redirection from {}", users.join(", "))],
    })
}

fn detect_composition(roster: &Roster) -> Option<StrategyFinding> {
    let mut attackers = 0;
    let mut defensive = 0;
    let mut stallers = 0;
    for member in &roster.members {
        if offensive_investment(member) >= 200 {
            attackers += 1;
        }
        if member.ev(StatName::Hp) >= 200
            && (member.ev(StatName::Def) >= 100 || member.ev(StatName::SpD) >= 100)
        {
            defensive += 1;
        }
        if member_has_move_in(member, STALL_MOVES) {
            stallers += 1;
        }
    }

    let finding = if attackers >= 4 && defensive <= 1 {
        ("Hyper Offense", 0.8, "Overwhelms opponents before they set up")
    } else if stallers >= 3 || (defensive >= 3 && attackers <= 2) {
        ("Stall", 0.7, "Wins through attrition and recovery")
    } else if attackers >= 2 && defensive >= 2 {
        ("Bulky Offense", 0.7, "Pairs power with durable pivots")
    } else if attackers >= 2 && defensive >= 1 {
        ("Balance", 0.75, "Mixes offense, defense and support")
    } else {
        return None;
    };

    Some(StrategyFinding {
        name: finding.0.to_string(),
        category: "composition",
        confidence: finding.1,
        summary: finding.2.to_string(),
        details: vec![
            format!("{} offensive build(s)", attackers),
            format!("{} defensive build(s)", defensive),
        ],
    })
}
