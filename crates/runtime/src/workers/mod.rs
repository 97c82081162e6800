//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the scheduler; every mutation of the encounter
//! is a command processed on that one task.

mod simulation;

pub use simulation::{Command, SimulationWorker};
