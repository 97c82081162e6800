//! Gauge advancement and actor selection for both scheduling modes.

use super::{Phase, StepOutcome, TurnScheduler};
use crate::events::EventSink;
use crate::state::Combatant;
use crate::status::TickTiming;

/// Gauges within this distance of 1 count as full; absorbs the rounding of
/// the closed-form jump in discrete-step mode.
const READY_EPSILON: f32 = 1e-5;

type Selection = Result<Option<usize>, StepOutcome>;

impl TurnScheduler {
    /// Continuous mode: advance by `dt`, then the first ready combatant in
    /// roster order acts. Gauge magnitude never breaks ties.
    pub(super) fn advance_continuous(&mut self, dt: f32, sink: &mut impl EventSink) -> Selection {
        self.advance_time(dt, sink);
        let ready = self.roster.iter().position(Combatant::is_ready);
        if ready.is_none() && !self.phase.is_terminal() && self.is_frozen() {
            tracing::warn!(target: "battle::scheduler", "no living combatant can fill its gauge");
            return Err(StepOutcome::Stalled);
        }
        Ok(ready)
    }

    /// Discrete-step mode: jump straight to the moment the next gauge fills
    /// (no jump at all when someone is already full), then the highest gauge
    /// acts, first in roster order on a tie.
    pub(super) fn advance_discrete(&mut self, sink: &mut impl EventSink) -> Selection {
        let rate = self.config.rate_factor;
        let already_ready = self
            .roster
            .iter()
            .any(|c| c.is_alive() && c.gauge() >= 1.0 - READY_EPSILON);

        if !already_ready {
            let wait = self
                .roster
                .iter()
                .filter_map(|c| c.time_to_ready(rate))
                .reduce(f32::min);
            let wait = match wait {
                Some(wait) => wait,
                // only per-second damage can still end the fight
                None if !self.is_frozen() => 1.0 - self.second_carry,
                None => {
                    tracing::warn!(target: "battle::scheduler", "no living combatant can fill its gauge");
                    return Err(StepOutcome::Stalled);
                }
            };
            self.advance_time(wait.max(self.config.min_step), sink);
            if self.phase.is_terminal() {
                return Ok(None);
            }
        }

        for combatant in self.roster.iter_mut() {
            if combatant.is_alive() && combatant.gauge() >= 1.0 - READY_EPSILON {
                combatant.set_gauge(1.0);
            }
        }

        let mut best: Option<(usize, f32)> = None;
        for (index, combatant) in self.roster.iter().enumerate() {
            if combatant.is_dead() {
                continue;
            }
            if best.is_none_or(|(_, gauge)| combatant.gauge() > gauge) {
                best = Some((index, combatant.gauge()));
            }
        }
        Ok(best.filter(|&(_, gauge)| gauge >= 1.0).map(|(index, _)| index))
    }

    /// True when no living gauge charges and no `PerSecond` damage is ticking,
    /// so nothing can ever change the encounter again.
    fn is_frozen(&self) -> bool {
        let rate = self.config.rate_factor;
        self.roster.iter().filter(|c| c.is_alive()).all(|c| {
            c.time_to_ready(rate).is_none()
                && c.status()
                    .dot_hits(TickTiming::PerSecond)
                    .iter()
                    .all(|hit| hit.amount <= 0)
        })
    }

    /// Moves simulated time forward: every living gauge charges, and each
    /// whole second elapsed fires the `PerSecond` status tick on every living
    /// combatant in roster order.
    fn advance_time(&mut self, dt: f32, sink: &mut impl EventSink) {
        if dt <= 0.0 {
            return;
        }
        self.phase = Phase::AdvancingGauges;

        let rate = self.config.rate_factor;
        for combatant in self.roster.iter_mut() {
            combatant.advance_gauge(dt, rate);
        }
        self.elapsed += dt;
        self.second_carry += dt;
        tracing::trace!(target: "battle::scheduler", dt, elapsed = self.elapsed, "gauges advanced");

        let mut ticked = false;
        while self.second_carry >= 1.0 {
            self.second_carry -= 1.0;
            for combatant in self.roster.iter_mut().filter(|c| c.is_alive()) {
                combatant.tick_status(TickTiming::PerSecond, sink);
            }
            ticked = true;
        }

        self.phase = Phase::SelectingActor;
        if ticked && self.check_terminal(sink).is_none() {
            self.clear_dead_target(sink);
        }
    }
}
