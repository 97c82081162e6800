/// Scheduling discipline selected at encounter start.
///
/// The discipline is fixed for the lifetime of a [`crate::TurnScheduler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(ascii_case_insensitive)]
pub enum SchedulingMode {
    /// Gauges advance by a fixed time step on every external tick; the first
    /// eligible combatant in roster order acts.
    #[default]
    #[strum(serialize = "continuous")]
    Continuous,

    /// Time jumps straight to the next moment a gauge fills; the highest gauge
    /// acts, and manually controlled actors suspend the loop until an action
    /// is submitted.
    #[cfg_attr(feature = "serde", serde(alias = "discrete"))]
    #[strum(to_string = "discrete-step", serialize = "discrete")]
    DiscreteStep,
}

/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Gauge fill per point of SPD per second of simulated time.
    pub rate_factor: f32,

    /// Smallest time jump taken in discrete-step mode when no one is ready yet.
    pub min_step: f32,

    /// Simulated seconds covered by one continuous-mode tick.
    pub fixed_dt: f32,

    /// Scheduling discipline for the encounter.
    pub mode: SchedulingMode,

    /// Seed for every probability roll (crit, apply chance, bridge rules).
    pub seed: u64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_SKILL_SLOTS: usize = 8;
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_RATE_FACTOR: f32 = 0.01;
    pub const DEFAULT_MIN_STEP: f32 = 0.001;
    pub const DEFAULT_FIXED_DT: f32 = 1.0 / 60.0;

    pub fn new() -> Self {
        Self {
            rate_factor: Self::DEFAULT_RATE_FACTOR,
            min_step: Self::DEFAULT_MIN_STEP,
            fixed_dt: Self::DEFAULT_FIXED_DT,
            mode: SchedulingMode::default(),
            seed: 0,
        }
    }

    pub fn with_mode(mut self, mode: SchedulingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_rate_factor(mut self, rate_factor: f32) -> Self {
        self.rate_factor = rate_factor;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
