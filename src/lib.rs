//! Grid Snake simulation core.
//!
//! The crate owns the body, input buffering, direction resolution, food
//! placement and the per-tick state transition. Rendering and scheduling are
//! left to the caller: drive [`game::Game::tick`] from any clock you like.

pub mod body;
pub mod clock;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod score;
