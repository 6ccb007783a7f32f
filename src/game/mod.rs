//! Game simulation: maze model, generation, collision, and the tick loop.

pub mod collision;
pub mod events;
pub mod generator;
pub mod maze;
pub mod state;
pub mod tick;
