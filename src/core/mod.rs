//! Core primitives shared by the simulation layers.

pub mod rng;
pub mod vec2;

pub use rng::DeterministicRng;
pub use vec2::Vec2;
