use std::fmt;

/// Identifier of a combatant inside one encounter.
///
/// Ids are handed out by the scheduler when a roster is installed and are
/// never reused, so an id kept from a previous roster simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl CombatantId {
    /// Placeholder carried by combatants that have not joined a roster yet.
    pub const UNASSIGNED: Self = Self(u32::MAX);

    #[inline]
    pub const fn is_assigned(self) -> bool {
        self.0 != Self::UNASSIGNED.0
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Side a combatant fights for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    #[default]
    Player,
    Enemy,
}

impl Team {
    /// The opposing side.
    #[inline]
    pub const fn opponent(self) -> Self {
        match self {
            Team::Player => Team::Enemy,
            Team::Enemy => Team::Player,
        }
    }
}

/// Who decides a combatant's action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Control {
    /// An external caller picks the skill and targets.
    Manual,
    /// The scheduler picks on the combatant's behalf.
    #[default]
    Auto,
}
