//! Static status-effect catalog entries.

/// Broad category of a status effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusType {
    Buff,
    Debuff,
    Dot,
    Control,
    Shield,
    #[default]
    Other,
}

/// When an effect's periodic part fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TickTiming {
    /// Fires once, at the moment the effect is applied.
    Instant,
    /// Fires when the owner's turn starts.
    #[default]
    PerTurnStart,
    /// Fires when the owner's turn ends (durations also count down here).
    PerTurnEnd,
    /// Fires for every whole second of simulated time.
    PerSecond,
}

/// Immutable definition of a named status effect.
///
/// Definitions are shared between every instance created from them; two
/// definitions are the same effect iff their `id`s match.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatusEffectDef {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub kind: StatusType,
    /// Higher sorts first in a ledger.
    pub ui_priority: i32,

    pub tick_timing: TickTiming,
    pub max_stacks: u32,
    /// Harmful effects are the ones a cleanse removes.
    pub is_harmful: bool,

    /// +0.2 = +20% ATK per stack.
    pub atk_mod_percent: f32,
    /// +0.2 = +20% DEF per stack.
    pub def_mod_percent: f32,
    /// +0.2 = +20% SPD per stack.
    pub speed_mod_percent: f32,
    /// Damage per stack each time the effect ticks.
    pub dot_per_tick: i32,
    /// Stun, freeze and the like.
    pub prevents_action: bool,
}

impl StatusEffectDef {
    pub const DEFAULT_MAX_STACKS: u32 = 10;

    pub fn new(id: impl Into<String>, kind: StatusType) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            kind,
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_timing(mut self, timing: TickTiming) -> Self {
        self.tick_timing = timing;
        self
    }

    pub fn with_max_stacks(mut self, max_stacks: u32) -> Self {
        self.max_stacks = max_stacks.max(1);
        self
    }

    pub fn with_dot(mut self, dot_per_tick: i32) -> Self {
        self.dot_per_tick = dot_per_tick;
        self
    }

    pub fn with_modifiers(mut self, atk: f32, def: f32, speed: f32) -> Self {
        self.atk_mod_percent = atk;
        self.def_mod_percent = def;
        self.speed_mod_percent = speed;
        self
    }

    pub fn with_priority(mut self, ui_priority: i32) -> Self {
        self.ui_priority = ui_priority;
        self
    }

    pub fn harmful(mut self) -> Self {
        self.is_harmful = true;
        self
    }

    pub fn preventing_action(mut self) -> Self {
        self.prevents_action = true;
        self
    }

    /// Stack cap with a floor of one, whatever the authored value says.
    #[inline]
    pub fn stack_cap(&self) -> u32 {
        self.max_stacks.max(1)
    }
}

impl Default for StatusEffectDef {
    fn default() -> Self {
        Self {
            id: String::new(),
            display_name: String::new(),
            description: String::new(),
            kind: StatusType::Other,
            ui_priority: 0,
            tick_timing: TickTiming::PerTurnStart,
            max_stacks: Self::DEFAULT_MAX_STACKS,
            is_harmful: false,
            atk_mod_percent: 0.0,
            def_mod_percent: 0.0,
            speed_mod_percent: 0.0,
            dot_per_tick: 0,
            prevents_action: false,
        }
    }
}
