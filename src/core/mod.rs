//! Event-driven molecular dynamics of hard disks in a circular container.
//!
//! Leaves first: `vector` math, `particle` bodies, `container` geometry,
//! `event`s and their `schedule`, closed-form `predict`ion, initial placement
//! by the `sampler`, and the `sim` engine that ties them together.

pub mod container;
pub mod event;
pub mod particle;
pub mod predict;
pub mod sampler;
pub mod schedule;
pub mod sim;
pub mod vector;

pub use container::Container;
pub use event::{Event, EventKind};
pub use particle::Particle;
pub use schedule::EventQueue;
pub use sim::{EngineState, EventStats, RunSummary, Simulation, Step};
