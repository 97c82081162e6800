//! Topic-based event bus for runtime events.
//!
//! Everything the scheduler emits is republished here together with the
//! runtime's own stage progression events. Consumers subscribe to the topics
//! they need, or to the ordered stream of all of them.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{FailureReason, StageEvent};
