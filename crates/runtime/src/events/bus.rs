//! Topic-based event bus implementation.

use std::sync::Arc;

use battle_core::BattleEvent;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tokio::sync::broadcast;

use super::types::StageEvent;

/// Topics for event routing
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Topic {
    /// Roster replacement, target selection, wave starts
    Roster,
    /// Turn boundaries, prevented and rejected actions
    Turn,
    /// Skill use, damage, healing, deaths
    Combat,
    /// Status effects added, updated or removed
    Status,
    /// Side wipes and stage results
    Outcome,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Battle(BattleEvent),
    Stage(StageEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Battle(event) => battle_topic(event),
            Event::Stage(StageEvent::WaveStarted { .. }) => Topic::Roster,
            Event::Stage(_) => Topic::Outcome,
        }
    }
}

fn battle_topic(event: &BattleEvent) -> Topic {
    match event {
        BattleEvent::RosterChanged { .. } | BattleEvent::TargetChanged { .. } => Topic::Roster,
        BattleEvent::TurnStarted { .. }
        | BattleEvent::PlayerTurnBegan { .. }
        | BattleEvent::ActionPrevented { .. }
        | BattleEvent::TurnEnded { .. }
        | BattleEvent::ActionRejected { .. } => Topic::Turn,
        BattleEvent::SkillUsed { .. }
        | BattleEvent::Damaged { .. }
        | BattleEvent::Healed { .. }
        | BattleEvent::Died { .. } => Topic::Combat,
        BattleEvent::EffectAdded(_)
        | BattleEvent::EffectUpdated(_)
        | BattleEvent::EffectRemoved(_) => Topic::Status,
        BattleEvent::EnemiesDefeated | BattleEvent::PlayersDefeated => Topic::Outcome,
    }
}

/// Topic-based event bus
///
/// Each topic has its own broadcast channel. A separate channel carries every
/// event, so a consumer that wants the whole stream sees it in emission order.
/// Publishing never blocks; slow subscribers lag and lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    topics: Arc<[broadcast::Sender<Event>]>,
    all: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let topics: Vec<_> = Topic::iter()
            .map(|_| broadcast::channel(capacity).0)
            .collect();

        Self {
            topics: topics.into(),
            all: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        // One sender per variant, in declaration order.
        &self.topics[topic as usize]
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event.clone()).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "battle::bus", %topic, "no subscribers");
        }
        let _ = self.all.send(event);
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to several topics, one receiver each
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    /// Subscribe to every event, in publication order
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.all.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
