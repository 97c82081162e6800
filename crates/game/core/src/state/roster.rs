use super::combatant::Combatant;
use super::common::{CombatantId, Team};

/// Ordered set of combatants in one encounter.
///
/// Roster order is significant: it breaks every tie in actor and target
/// selection.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    combatants: Vec<Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_vec(combatants: Vec<Combatant>) -> Self {
        Self { combatants }
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn ids(&self) -> Vec<CombatantId> {
        self.combatants.iter().map(Combatant::id).collect()
    }

    pub fn index_of(&self, id: CombatantId) -> Option<usize> {
        self.combatants.iter().position(|c| c.id() == id)
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id() == id)
    }

    pub fn at(&self, index: usize) -> Option<&Combatant> {
        self.combatants.get(index)
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Option<&mut Combatant> {
        self.combatants.get_mut(index)
    }

    /// True when `id` is in the roster and alive.
    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(Combatant::is_alive)
    }

    /// Living members of `team`, in roster order.
    pub fn living(&self, team: Team) -> impl Iterator<Item = &Combatant> {
        self.combatants
            .iter()
            .filter(move |c| c.team == team && c.is_alive())
    }

    pub fn living_count(&self, team: Team) -> usize {
        self.living(team).count()
    }

    /// First living member of `team` in roster order.
    pub fn first_living(&self, team: Team) -> Option<CombatantId> {
        self.living(team).next().map(Combatant::id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatBlock;

    fn unit(id: u32, team: Team, hp: i32) -> Combatant {
        let mut c = Combatant::new(format!("u{id}"), team, StatBlock::new(hp, 10, 0, 100));
        c.id = CombatantId(id);
        c
    }

    #[test]
    fn living_respects_order_and_team() {
        let roster = Roster::from_vec(vec![
            unit(1, Team::Player, 10),
            unit(2, Team::Enemy, 0),
            unit(3, Team::Enemy, 10),
            unit(4, Team::Enemy, 10),
        ]);

        assert_eq!(roster.first_living(Team::Enemy), Some(CombatantId(3)));
        assert_eq!(roster.living_count(Team::Enemy), 2);
        assert!(!roster.is_alive(CombatantId(2)));
        assert!(!roster.is_alive(CombatantId(99)));
        assert_eq!(roster.index_of(CombatantId(4)), Some(3));
    }
}
