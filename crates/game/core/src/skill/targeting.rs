use super::def::{SkillTargeting, TargetTeam};
use crate::state::{Combatant, CombatantId, Roster};

/// Resolves the final target list for `user` casting a skill with `targeting`.
///
/// Candidates are the living combatants the selector allows. The list is
/// filled in priority order (explicitly requested ids, then the preferred
/// target, then the remaining candidates in roster order) without
/// duplicates, and cut to the selector's limit. Ids that are not valid
/// candidates are ignored. Ally selectors that find nobody fall back to the
/// user.
pub fn resolve_targets(
    roster: &Roster,
    user: &Combatant,
    targeting: &SkillTargeting,
    requested: &[CombatantId],
    preferred: Option<CombatantId>,
) -> Vec<CombatantId> {
    if user.is_dead() {
        return Vec::new();
    }
    if targeting.target_team == TargetTeam::SelfOnly {
        return vec![user.id()];
    }

    let allowed = |c: &Combatant| is_candidate(user, targeting, c);
    let valid = |id: CombatantId| roster.get(id).is_some_and(allowed);

    let mut targets: Vec<CombatantId> = Vec::new();
    let ordered = requested
        .iter()
        .copied()
        .chain(preferred)
        .filter(|&id| valid(id))
        .chain(roster.iter().filter(|c| allowed(*c)).map(Combatant::id));

    let limit = targeting.limit().unwrap_or(usize::MAX);
    for id in ordered {
        if targets.len() >= limit {
            break;
        }
        if !targets.contains(&id) {
            targets.push(id);
        }
    }

    if targets.is_empty() && !targeting.target_team.is_hostile() {
        targets.push(user.id());
    }
    targets
}

fn is_candidate(user: &Combatant, targeting: &SkillTargeting, candidate: &Combatant) -> bool {
    if candidate.is_dead() {
        return false;
    }
    match targeting.target_team {
        TargetTeam::SelfOnly => candidate.id() == user.id(),
        TargetTeam::Enemy | TargetTeam::AllEnemies => candidate.team == user.team.opponent(),
        TargetTeam::Ally | TargetTeam::AllAllies => {
            candidate.team == user.team && (targeting.include_self || candidate.id() != user.id())
        }
    }
}
